//! Phishing Classifier
//!
//! Saturating additive model over the signal table. Pure function of the
//! FeatureVector; the score is always computable, only the verdict
//! carries the three-way ambiguity.

use crate::logic::features::FeatureVector;
use crate::logic::message::{ClassificationVerdict, ReasonCode, Verdict};

use super::rules::{PhishingThresholds, PHISH_SIGNALS};

/// Classify with the default threshold bands
pub fn classify(features: &FeatureVector) -> ClassificationVerdict {
    classify_with_thresholds(features, &PhishingThresholds::default())
}

/// Classify with explicit threshold bands
pub fn classify_with_thresholds(
    features: &FeatureVector,
    thresholds: &PhishingThresholds,
) -> ClassificationVerdict {
    let mut contributions: Vec<(ReasonCode, f32)> = Vec::new();
    for signal in PHISH_SIGNALS {
        let activation = (signal.fires)(features);
        if activation > 0.0 {
            contributions.push((signal.reason, signal.weight * activation));
        }
    }

    let score: f32 = contributions.iter().map(|(_, c)| c).sum::<f32>().clamp(0.0, 1.0);

    let verdict = if score >= thresholds.positive_min {
        Verdict::Positive
    } else if score < thresholds.negative_max {
        Verdict::Negative
    } else {
        Verdict::Unknown
    };

    // Descending contribution; the sort is stable, so equal contributions
    // keep signal-definition order.
    contributions.sort_by(|a, b| b.1.total_cmp(&a.1));

    ClassificationVerdict {
        verdict,
        score: Some(score),
        reasons: contributions.into_iter().map(|(reason, _)| reason).collect(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::extract;

    fn features(sender: &str, body: &str) -> FeatureVector {
        extract(sender, body, None).unwrap()
    }

    #[test]
    fn test_lottery_phish_scores_high() {
        let fv = features(
            "9876543210",
            "Congratulations! You won! Click http://bit.ly/xyz to claim now!!!",
        );
        let result = classify(&fv);
        assert_eq!(result.verdict, Verdict::Positive);
        let score = result.score.unwrap();
        assert!(score >= 0.8, "score {}", score);
        assert!(result.reasons.contains(&ReasonCode::UrgencyLanguage));
        assert!(result.reasons.contains(&ReasonCode::SuspiciousLink));
        assert!(result.reasons.contains(&ReasonCode::UrlShortener));
    }

    #[test]
    fn test_clean_otp_scores_low() {
        let fv = features("AX-HDFCBK", "Your OTP is 482913, valid for 5 minutes. Do not share.");
        let result = classify(&fv);
        assert_eq!(result.verdict, Verdict::Negative);
        assert_eq!(result.score, Some(0.0));
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_lone_link_lands_in_review_band() {
        let fv = features("FRIEND", "new blog post up at https://example.org/posts/42");
        let result = classify(&fv);
        assert_eq!(result.verdict, Verdict::Unknown);
        let score = result.score.unwrap();
        assert!((0.3..0.6).contains(&score), "score {}", score);
        assert_eq!(result.reasons, vec![ReasonCode::SuspiciousLink]);
    }

    #[test]
    fn test_score_is_clamped() {
        // Every signal at once still reports a score inside [0,1]
        let fv = features(
            "9876543210",
            "URGENT!!!!! Your bank account is locked. Verify your account now: click http://bit.ly/x to claim your prize immediately!!!",
        );
        let result = classify(&fv);
        let score = result.score.unwrap();
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(result.verdict, Verdict::Positive);
    }

    #[test]
    fn test_reasons_ordered_by_contribution() {
        let fv = features(
            "9876543210",
            "Congratulations! You won! Click http://bit.ly/xyz to claim now!!!",
        );
        let result = classify(&fv);
        // reward-bait (0.35) outranks suspicious-link (0.30), which
        // outranks the shortener (0.20)
        let reward = result.reasons.iter().position(|r| *r == ReasonCode::RewardBait).unwrap();
        let link = result.reasons.iter().position(|r| *r == ReasonCode::SuspiciousLink).unwrap();
        let short = result.reasons.iter().position(|r| *r == ReasonCode::UrlShortener).unwrap();
        assert!(reward < link);
        assert!(link < short);
    }

    #[test]
    fn test_equal_contributions_keep_definition_order() {
        // suspicious-link and credential-lure share weight 0.30; the link
        // is defined first and must stay first.
        let fv = features("FRIEND", "please verify your account at https://example.org/login");
        let result = classify(&fv);
        let link = result.reasons.iter().position(|r| *r == ReasonCode::SuspiciousLink).unwrap();
        let lure = result.reasons.iter().position(|r| *r == ReasonCode::CredentialLure).unwrap();
        assert!(link < lure);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let fv = features("9876543210", "Account blocked! Verify now: http://bit.ly/x");
        assert_eq!(classify(&fv), classify(&fv));
    }
}
