//! Orchestration value objects
//!
//! The types that flow through one `answer` call: per-backend results, the
//! response set and the final response handed back to the caller.

pub mod value_objects;
