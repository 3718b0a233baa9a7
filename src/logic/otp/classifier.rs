//! OTP Classifier
//!
//! Weighted rule combination over feature indicators. Pure function of the
//! FeatureVector; never fails on well-formed input. Absence of signal is
//! a negative verdict, not an error.

use crate::logic::features::{idx, FeatureVector};
use crate::logic::message::{ClassificationVerdict, ReasonCode, Verdict};

use super::rules::{
    IntentSignal, OtpThresholds, BARE_CODE_CONFIDENCE, CONFIDENCE_CAP, INTENT_FLOOR_WEIGHT,
    INTENT_SIGNALS, LURE_DAMPING, MULTI_SIGNAL_BONUS, OTP_SIGNALS, SHORT_BODY_LENGTH_NORM,
};
use super::types::{OtpClassification, OtpIntent};

/// Classify with the default threshold bands
pub fn classify(features: &FeatureVector) -> OtpClassification {
    classify_with_thresholds(features, &OtpThresholds::default())
}

/// Classify with explicit threshold bands
pub fn classify_with_thresholds(
    features: &FeatureVector,
    thresholds: &OtpThresholds,
) -> OtpClassification {
    // A 4-8 digit code is the gate; without one there is nothing to be an
    // OTP about.
    if !features.flag(idx::NUMERIC_CODE) {
        return OtpClassification {
            verdict: ClassificationVerdict {
                verdict: Verdict::Negative,
                score: Some(0.0),
                reasons: Vec::new(),
            },
            intent: None,
        };
    }

    // Confidence ladder: strongest fired phrasing wins, multiple distinct
    // phrasings add a small bonus.
    let mut reasons: Vec<ReasonCode> = Vec::new();
    let mut confidence: f32 = 0.0;
    for signal in OTP_SIGNALS {
        if features.flag(signal.feature) {
            confidence = confidence.max(signal.weight);
            reasons.push(signal.reason);
        }
    }
    if reasons.len() >= 2 {
        confidence = (confidence + MULTI_SIGNAL_BONUS).min(CONFIDENCE_CAP);
    }

    // Bare code in a single-segment body still hints OTP, below the
    // positive band so it lands in review.
    if reasons.is_empty() && features.get(idx::LENGTH_NORM) <= SHORT_BODY_LENGTH_NORM {
        confidence = BARE_CODE_CONFIDENCE;
    }

    // Lure language undercuts OTP confidence
    if features.flag(idx::URL_PRESENT)
        || features.flag(idx::URGENCY_LANGUAGE)
        || features.flag(idx::REWARD_BAIT)
    {
        confidence *= LURE_DAMPING;
    }

    // OTP_SIGNALS is in descending weight order, so reasons already are
    // too; the gating code reads last, it carries the least explanation.
    reasons.push(ReasonCode::NumericCode);

    let verdict = if confidence >= thresholds.positive_min {
        Verdict::Positive
    } else if confidence < thresholds.negative_max {
        Verdict::Negative
    } else {
        Verdict::Unknown
    };

    let intent = if verdict == Verdict::Positive {
        Some(select_intent(features))
    } else {
        None
    };

    OtpClassification {
        verdict: ClassificationVerdict { verdict, score: Some(confidence), reasons },
        intent,
    }
}

/// Pick the intent subtype with the highest accumulated vote. Ties break
/// toward the strongest individual signal, then lexicographic tag order.
fn select_intent(features: &FeatureVector) -> OtpIntent {
    struct Candidate {
        intent: OtpIntent,
        total: f32,
        strongest: f32,
    }

    let mut candidates = vec![Candidate {
        intent: OtpIntent::Unspecified,
        total: INTENT_FLOOR_WEIGHT,
        strongest: INTENT_FLOOR_WEIGHT,
    }];

    for IntentSignal { intent, feature, weight } in INTENT_SIGNALS {
        if !features.flag(*feature) {
            continue;
        }
        match candidates.iter_mut().find(|c| c.intent == *intent) {
            Some(c) => {
                c.total += weight;
                c.strongest = c.strongest.max(*weight);
            }
            None => candidates.push(Candidate { intent: *intent, total: *weight, strongest: *weight }),
        }
    }

    candidates.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then(b.strongest.total_cmp(&a.strongest))
            .then(a.intent.tag().cmp(b.intent.tag()))
    });
    candidates[0].intent
}

// ============================================================================
// TESTS
// ============================================================================
