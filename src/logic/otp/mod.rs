//! OTP Module
//!
//! Decides whether a message carries a one-time passcode and, if so, what
//! the code is for.
//!
//! - `types`: OtpIntent, OtpClassification
//! - `rules`: signal weights and threshold bands
//! - `classifier`: weighted rule combination + intent selection
//! - `code`: code extraction for notification actions

pub mod types;
pub mod rules;
pub mod classifier;
pub mod code;

pub use classifier::{classify, classify_with_thresholds};
pub use code::{extract_code, extract_code_for_copy};
pub use rules::OtpThresholds;
pub use types::{OtpClassification, OtpIntent};
