//! Response fusion
//!
//! | Strategy | Output |
//! |----------|--------|
//! | `best_parts` | Query-relevant, non-redundant units from all responses |
//! | `average` | Mean of numeric judgments |
//! | `vote` | Claims that enough responses agree on |
//!
//! Every strategy is deterministic and falls back to the highest-priority
//! response when it has nothing to offer.

pub mod average;
pub mod best_parts;
pub mod mixer;
pub mod rule;
pub mod strategy;
pub mod text;
pub mod vote;

pub use mixer::{MixerConfig, ResponseMixer};
pub use rule::AgreementRule;
pub use strategy::MixStrategy;
