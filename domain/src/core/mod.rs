//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: a validated user query
//! - [`error::DomainError`]: domain-level errors
//! - [`string::truncate`]: UTF-8 safe truncation of provider error text

pub mod error;
pub mod query;
pub mod string;
