//! OTP code extraction for notification actions
//!
//! The copy action must not leak codes out of messages the pipeline has
//! not (or only weakly) recognized as OTPs, so extraction is gated on the
//! stored verdict or a high-confidence on-the-spot classification.

use crate::constants::OTP_COPY_MIN_CONFIDENCE;
use crate::logic::features::{extract, first_code};
use crate::logic::message::Verdict;

use super::classifier;

/// First 4-8 digit code in the body, ungated
pub fn extract_code(body: &str) -> Option<&str> {
    first_code(body)
}

/// Code for the clipboard-copy action.
///
/// Yields the code when the stored verdict is already `Positive`, or when
/// a fresh classification is confident enough on its own.
pub fn extract_code_for_copy<'a>(
    body: &'a str,
    sender: &str,
    stored_verdict: Verdict,
) -> Option<&'a str> {
    let code = first_code(body)?;
    if stored_verdict == Verdict::Positive {
        return Some(code);
    }
    let features = extract(sender, body, None).ok()?;
    let result = classifier::classify(&features);
    if result.is_otp() && result.confidence() >= OTP_COPY_MIN_CONFIDENCE {
        Some(code)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_code_finds_first_token() {
        assert_eq!(extract_code("Your OTP is 482913, then 111222"), Some("482913"));
        assert_eq!(extract_code("no digits"), None);
    }

    #[test]
    fn test_copy_allows_stored_positive() {
        let code = extract_code_for_copy("ref 4821 thanks", "54321", Verdict::Positive);
        assert_eq!(code, Some("4821"));
    }

    #[test]
    fn test_copy_allows_confident_heuristic() {
        let code = extract_code_for_copy(
            "Your OTP is 482913, valid for 5 minutes",
            "AX-NOTIFY",
            Verdict::Unknown,
        );
        assert_eq!(code, Some("482913"));
    }

    #[test]
    fn test_copy_refuses_weak_match() {
        // A bare code classifies into the unknown band, below the copy gate
        let code = extract_code_for_copy("ref 4821 thanks", "54321", Verdict::Unknown);
        assert_eq!(code, None);
    }

    #[test]
    fn test_copy_refuses_without_code() {
        assert_eq!(extract_code_for_copy("hello there", "54321", Verdict::Positive), None);
    }
}
