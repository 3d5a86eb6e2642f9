use serde::Serialize;
use std::fmt;

const LOGIT_INTERCEPT: f64 = -3.399;
const LOGIT_CORRELATION_WEIGHT: f64 = 0.725;
const LOGIT_GOOD_COUNT_WEIGHT: f64 = 1.814;
const LOGIT_RATIO_WEIGHT: f64 = 1.215;

/// Qualitative confidence call derived from the same evidence as the
/// numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    Low,
    High,
    VeryHigh,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "Low"),
            Confidence::High => write!(f, "High"),
            Confidence::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// Logistic quantitation score on a 0 to 50 scale.
///
/// The score collapses to zero whenever the isotope distribution
/// correlation is undefined or no elution profile correlated well. The
/// ratio term contributes only when both H/L ratios are defined.
pub fn quant_score(
    isotope_correlation: Option<f64>,
    isotope_ratio: Option<f64>,
    good_elution_count: usize,
    elution_ratio: Option<f64>,
) -> f64 {
    let correlation = match isotope_correlation {
        Some(c) if good_elution_count > 0 => c,
        _ => return 0.0,
    };
    let ratio_term = if isotope_ratio.is_some() && elution_ratio.is_some() {
        1.0
    } else {
        0.0
    };
    let count = good_elution_count as f64;
    let top = (LOGIT_INTERCEPT
        + LOGIT_CORRELATION_WEIGHT * correlation
        + LOGIT_GOOD_COUNT_WEIGHT * count
        + LOGIT_RATIO_WEIGHT * ratio_term)
        .exp();
    let bottom = 1.0
        + (LOGIT_INTERCEPT
            + LOGIT_CORRELATION_WEIGHT * correlation
            + LOGIT_GOOD_COUNT_WEIGHT * count
            + LOGIT_RATIO_WEIGHT * ratio_term)
            .exp();
    (top / bottom) * 50.0
}

/// Confidence call from the same inputs as [`quant_score`].
///
/// Both H/L ratios must be defined for anything above Low. An undefined
/// isotope correlation fails every threshold.
pub fn quant_confidence(
    isotope_correlation: Option<f64>,
    isotope_ratio: Option<f64>,
    good_elution_count: usize,
    elution_ratio: Option<f64>,
) -> Confidence {
    if isotope_ratio.is_none() || elution_ratio.is_none() {
        return Confidence::Low;
    }
    let correlation = match isotope_correlation {
        Some(c) => c,
        None => return Confidence::Low,
    };
    if correlation >= 0.99 && good_elution_count == 3 {
        Confidence::VeryHigh
    } else if correlation >= 0.75 && good_elution_count >= 2 {
        Confidence::High
    } else {
        Confidence::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_evidence_scores_near_the_ceiling() {
        let score = quant_score(
            Some(0.999_999_999_4),
            Some(0.480_281_162_3),
            3,
            Some(0.484_256_363_6),
        );
        assert!((score - 49.085_552_529_8).abs() < 1e-6);
        let confidence = quant_confidence(
            Some(0.999_999_999_4),
            Some(0.480_281_162_3),
            3,
            Some(0.484_256_363_6),
        );
        assert_eq!(confidence, Confidence::VeryHigh);
    }

    #[test]
    fn moderate_evidence_scores_high() {
        let score = quant_score(
            Some(0.923_886_253),
            Some(0.437_552_39),
            2,
            Some(0.368_289_828),
        );
        assert!((score - 44.611_946_69).abs() < 1e-6);
        let confidence = quant_confidence(
            Some(0.923_886_253),
            Some(0.437_552_39),
            2,
            Some(0.368_289_828),
        );
        assert_eq!(confidence, Confidence::High);
    }

    #[test]
    fn absent_evidence_scores_zero_and_low() {
        assert_eq!(quant_score(None, None, 0, None), 0.0);
        assert_eq!(quant_confidence(None, None, 0, None), Confidence::Low);
    }

    #[test]
    fn no_good_elution_profiles_zeroes_the_score() {
        assert_eq!(quant_score(Some(0.99), Some(1.0), 0, Some(1.0)), 0.0);
    }

    #[test]
    fn missing_ratio_weakens_but_does_not_zero_the_score() {
        let with_ratio = quant_score(Some(0.9), Some(1.0), 2, Some(1.0));
        let without_ratio = quant_score(Some(0.9), None, 2, Some(1.0));
        assert!(with_ratio > without_ratio);
        assert!(without_ratio > 0.0);
    }

    #[test]
    fn missing_ratio_caps_confidence_at_low() {
        let confidence = quant_confidence(Some(0.999), None, 3, Some(1.0));
        assert_eq!(confidence, Confidence::Low);
    }

    #[test]
    fn confidence_display_labels() {
        assert_eq!(Confidence::Low.to_string(), "Low");
        assert_eq!(Confidence::High.to_string(), "High");
        assert_eq!(Confidence::VeryHigh.to_string(), "Very High");
    }
}
