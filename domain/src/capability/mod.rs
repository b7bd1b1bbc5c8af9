//! Backend capability descriptors and the topics they are expressed in.

pub mod capabilities;
pub mod topic;

pub use capabilities::ModelCapabilities;
pub use topic::Topic;
