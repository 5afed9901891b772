use serde::Serialize;

/// Whether the alternative fuel is worth choosing over the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Favorable,
    Unfavorable,
}

/// Classifies an alternative/baseline price ratio.
///
/// | Ratio           | Verdict     |
/// |-----------------|-------------|
/// | < threshold     | Favorable   |
/// | >= threshold    | Unfavorable |
pub fn classify(ratio: f64, threshold: f64) -> Verdict {
    if ratio < threshold {
        Verdict::Favorable
    } else {
        Verdict::Unfavorable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FAVORABLE_RATIO;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(3.40 / 5.00, FAVORABLE_RATIO), Verdict::Favorable);
        assert_eq!(classify(0.75, FAVORABLE_RATIO), Verdict::Unfavorable);
        assert_eq!(classify(0.70, FAVORABLE_RATIO), Verdict::Unfavorable);
        assert_eq!(classify(0.6999, FAVORABLE_RATIO), Verdict::Favorable);
        assert_eq!(classify(1.20, FAVORABLE_RATIO), Verdict::Unfavorable);
    }
}
