//! Answer formatting

pub mod console;
pub mod formatter;
