//! Progress reporting while backends run

pub mod reporter;
