//! Feedback Module
//!
//! Captures user corrections against a frozen snapshot of the verdicts
//! and logs disagreements for future retraining input. Feedback is
//! advisory data only: it never mutates the message it corrects.
//!
//! - `recorder`: VerdictSnapshot, Correction, FeedbackRecord
//! - `misclassification`: divergence check, MisclassificationLogEntry

pub mod recorder;
pub mod misclassification;

pub use misclassification::{diverges, MisclassificationLogEntry};
pub use recorder::{record_and_store, record_feedback, Correction, FeedbackRecord, VerdictSnapshot};
