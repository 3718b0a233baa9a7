//! Classification Coordinator
//!
//! Decides whether a message needs classification, runs the extractor and
//! both classifiers, and commits verdicts together with the version
//! stamp. Re-classification is idempotent and monotonic: bumping the
//! classifier version is the only way to force a settled message through
//! again.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::constants::MAX_BODY_LEN;
use crate::logic::features::extractor;
use crate::logic::message::{ClassificationVerdict, Message, Verdict};
use crate::logic::otp::{self, OtpClassification, OtpThresholds};
use crate::logic::phishing::{self, PhishingThresholds};

// ============================================================================
// CONFIG
// ============================================================================

/// The frozen scoring function in effect, injected by the caller.
///
/// Never a process-wide global: two configs with different versions can
/// run side by side in tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Monotonically increasing release number of the scoring function
    pub version: u32,
    pub max_body_len: usize,
    pub otp: OtpThresholds,
    pub phishing: PhishingThresholds,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            version: 1,
            max_body_len: MAX_BODY_LEN,
            otp: OtpThresholds::default(),
            phishing: PhishingThresholds::default(),
        }
    }
}

impl ClassifierConfig {
    pub fn with_version(version: u32) -> Self {
        Self { version, ..Self::default() }
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// What one coordinator visit did to the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Both classifiers ran and the results were committed
    Classified,
    /// Already at the current version with settled verdicts; untouched
    Skipped,
    /// Extraction refused the input; version stamped, verdicts unknown
    ExtractionFailed,
}

// ============================================================================
// COORDINATION
// ============================================================================

/// Classify one message in place.
///
/// All verdict fields and the version stamp are committed together;
/// callers persist the whole row afterwards, so a half-classified message
/// is never observable.
pub fn classify_message(message: &mut Message, config: &ClassifierConfig) -> Outcome {
    if config.version < message.version {
        log::warn!(
            "message {} already stamped v{}, refusing to move back to v{}",
            message.id,
            message.version,
            config.version
        );
        return Outcome::Skipped;
    }
    if message.version == config.version && message.is_settled() {
        return Outcome::Skipped;
    }

    let bumped = message.version != config.version;

    let features = match extractor::extract_with_limit(
        &message.sender,
        &message.body,
        message.language.as_deref(),
        config.max_body_len,
    ) {
        Ok(features) => features,
        Err(e) => {
            log::warn!("extraction failed for message {}: {}; routing to review", message.id, e);
            let changed = message.otp != Verdict::Unknown
                || message.phishing != Verdict::Unknown
                || message.otp_intent.is_some();
            message.features = None;
            message.otp = Verdict::Unknown;
            message.otp_intent = None;
            message.phishing = Verdict::Unknown;
            message.phish_score = None;
            message.reasons.clear();
            // Stamp anyway: one visit per version, no retry loop
            message.version = config.version;
            if bumped && changed && message.reviewed {
                message.reviewed = false;
            }
            return Outcome::ExtractionFailed;
        }
    };

    // The classifiers are pure and must not fail on well-formed input. A
    // panic here is an implementation bug; it degrades that axis to an
    // unknown verdict instead of aborting the batch.
    let otp_result = catch_unwind(AssertUnwindSafe(|| {
        otp::classify_with_thresholds(&features, &config.otp)
    }))
    .unwrap_or_else(|_| {
        log::error!("otp classifier panicked on message {}", message.id);
        OtpClassification::unknown()
    });
    let phishing_result = catch_unwind(AssertUnwindSafe(|| {
        phishing::classify_with_thresholds(&features, &config.phishing)
    }))
    .unwrap_or_else(|_| {
        log::error!("phishing classifier panicked on message {}", message.id);
        ClassificationVerdict::unknown()
    });

    let changed = message.otp != otp_result.verdict.verdict
        || message.otp_intent != otp_result.intent
        || message.phishing != phishing_result.verdict;

    message.features = Some(features);
    message.otp = otp_result.verdict.verdict;
    message.otp_intent = otp_result.intent;
    message.phishing = phishing_result.verdict;
    message.phish_score = phishing_result.score;
    message.reasons = phishing_result.reasons;
    message.version = config.version;

    // A new classifier release invalidates a human sign-off only when its
    // output actually changed.
    if bumped && changed && message.reviewed {
        log::info!(
            "message {} verdicts changed under v{}; review sign-off dropped",
            message.id,
            config.version
        );
        message.reviewed = false;
    }

    log::debug!(
        "message {} classified at v{}: otp={} phishing={} score={:?}",
        message.id,
        config.version,
        message.otp,
        message.phishing,
        message.phish_score
    );
    Outcome::Classified
}

// ============================================================================
// TESTS
// ============================================================================
