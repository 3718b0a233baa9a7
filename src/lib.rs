//! SMS Shield - Classification Core
//!
//! Library implementing the SMS classification and review pipeline:
//! feature extraction, OTP and phishing classifiers, versioned
//! re-classification, a review-queue state machine, and a
//! feedback/misclassification loop. Storage, UI, and SMS ingestion live
//! in the surrounding application behind the [`MessageStore`] contract.
//!
//! ## Usage
//! ```ignore
//! use sms_shield_core::{classify_message, ClassifierConfig, Message};
//!
//! let config = ClassifierConfig::with_version(3);
//! let outcome = classify_message(&mut message, &config);
//! store.save(&message)?;
//! ```

pub mod constants;
pub mod logic;

pub use logic::audit::{AuditLog, PipelineEvent, PipelineEventKind};
pub use logic::features::{extract, ExtractionError, FeatureVector};
pub use logic::feedback::{
    record_and_store, record_feedback, Correction, FeedbackRecord, MisclassificationLogEntry,
    VerdictSnapshot,
};
pub use logic::message::{
    ClassificationVerdict, Message, ReasonCode, RiskBand, Sensitivity, Verdict,
};
pub use logic::otp::{OtpClassification, OtpIntent, OtpThresholds};
pub use logic::phishing::PhishingThresholds;
pub use logic::pipeline::{
    classify_message, run_sweep, ClassifierConfig, InflightSet, Outcome, SweepReport, Sweeper,
};
pub use logic::review::{mark_reviewed, needs_review, state_of, ReviewState};
pub use logic::storage::{MemoryStore, MessageStore, StorageError};
