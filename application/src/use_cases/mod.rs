//! Use cases

pub mod answer_query;
pub mod execute_backends;
