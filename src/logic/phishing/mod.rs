//! Phishing Module
//!
//! Scores a message's phishing risk from independent lure signals and
//! explains the score with ordered reason codes.
//!
//! - `rules`: signal table and threshold bands
//! - `classifier`: saturating additive scoring

pub mod rules;
pub mod classifier;

pub use classifier::{classify, classify_with_thresholds};
pub use rules::PhishingThresholds;
