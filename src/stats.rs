//! Descriptive statistics over values that may be missing.
//!
//! Every function skips `None` entries; an input with no present values gives
//! `None` rather than zero.

use serde::Serialize;

/// Present values of an optional series, in order.
pub fn present<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().collect()
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Mean, spread and range of one group of values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Summary {
    pub fn from_values(values: &[f64]) -> Self {
        Summary {
            count: values.len(),
            mean: mean(values),
            std_dev: sample_std_dev(values),
            min: min(values),
            max: max(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mean_skips_missing() {
        let values = present([Some(1.0), None, Some(3.0)]);
        assert_eq!(mean(&values), Some(2.0));
    }

    #[test]
    fn test_mean_of_nothing_is_missing() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&present([None, None])), None);
    }

    #[test]
    fn test_sample_std_dev() {
        let sd = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(approx(sd, 2.138089935299395));
    }

    #[test]
    fn test_sample_std_dev_needs_two_values() {
        assert_eq!(sample_std_dev(&[5.0]), None);
        assert_eq!(sample_std_dev(&[5.0, 5.0]), Some(0.0));
    }

    #[test]
    fn test_min_max() {
        let values = [3.0, -1.5, 8.25];
        assert_eq!(min(&values), Some(-1.5));
        assert_eq!(max(&values), Some(8.25));
        assert_eq!(min(&[]), None);
    }

    #[test]
    fn test_summary_from_values() {
        let summary = Summary::from_values(&[4.0, 6.0]);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, Some(5.0));
        assert!(approx(summary.std_dev.unwrap(), 2f64.sqrt()));
        assert_eq!(summary.min, Some(4.0));
        assert_eq!(summary.max, Some(6.0));
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(Summary::from_values(&[]), Summary::default());
    }
}
