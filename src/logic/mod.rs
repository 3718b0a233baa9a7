//! Logic Module - Classification Engines
//!
//! The pipeline is leaf-first:
//! - `features/` - feature extraction from raw message text and sender
//! - `otp/` - OTP verdict + intent subtype
//! - `phishing/` - phishing verdict + risk score + reasons
//! - `pipeline/` - per-message coordination, version stamping, batch sweep
//! - `review/` - review-queue state machine
//! - `feedback/` - user corrections and misclassification logging
//! - `audit/` - append-only JSONL event trail
//! - `storage` - the external store contract

pub mod message;
pub mod features;
pub mod otp;
pub mod phishing;
pub mod pipeline;
pub mod review;
pub mod feedback;
pub mod audit;
pub mod storage;
