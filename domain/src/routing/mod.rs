//! Query routing
//!
//! ```text
//! Query ──► TopicClassifier ──► ClassifiedQuery ──► Router::select ──► [ModelCapabilities]
//!                                                     │
//!                          score = Σ strength_weight − Σ weakness_penalty
//!                          keep max score, order by PriorityOrder
//! ```

pub mod classifier;
pub mod priority;
pub mod router;

pub use classifier::{
    ClassifiedQuery, TopicClassifier, TopicVocabulary, default_vocabulary, merge_vocabulary,
};
pub use priority::PriorityOrder;
pub use router::{Router, RoutingPolicy};
