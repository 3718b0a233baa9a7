//! Pipeline Module - Classification Coordination
//!
//! Orchestrates extraction and both classifiers per message, stamps the
//! classifier version, and runs batch re-classification sweeps.
//!
//! - `coordinator`: per-message skip/classify/commit decision
//! - `inflight`: at-most-one in-flight classification per message id
//! - `sweep`: worker pool draining the pending queue

pub mod coordinator;
pub mod inflight;
pub mod sweep;


pub use coordinator::{classify_message, ClassifierConfig, Outcome};
pub use inflight::{InflightGuard, InflightSet};
pub use sweep::{run_sweep, SweepReport, Sweeper};
