//! Trailing Window Statistics

/// Summary of the values inside one trailing window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    /// Number of observed values
    pub count: usize,
    /// Sum of observed values
    pub sum: f64,
    /// Mean of observed values
    pub mean: f64,
    /// Sample standard deviation (ddof = 1); `None` below two values
    pub std_dev: Option<f64>,
}

impl WindowStats {
    /// Compute window statistics; `None` when the window holds no values
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let mean = sum / n;

        let std_dev = if values.len() >= 2 {
            let m2: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            Some((m2 / (n - 1.0)).sqrt())
        } else {
            None
        };

        Some(Self {
            count: values.len(),
            sum,
            mean,
            std_dev,
        })
    }

    /// Statistics of the observed (non-missing) values in a window
    pub fn compute_observed(values: &[Option<f64>]) -> Option<Self> {
        let observed: Vec<f64> = values.iter().flatten().copied().collect();
        Self::compute(&observed)
    }
}

/// Trailing window ending at `end` (inclusive), truncated at the series start
pub fn trailing<T>(values: &[T], end: usize, window: usize) -> &[T] {
    let start = (end + 1).saturating_sub(window);
    &values[start..=end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_computation() {
        let stats = WindowStats::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_relative_eq!(stats.mean, 3.0);
        assert_relative_eq!(stats.sum, 15.0);
    }

    #[test]
    fn test_sample_std_dev() {
        let stats = WindowStats::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        // Sample variance = 32 / 7
        assert_relative_eq!(stats.std_dev.unwrap(), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let stats = WindowStats::compute(&[42.0]).unwrap();
        assert_eq!(stats.std_dev, None);
    }

    #[test]
    fn test_empty_values() {
        assert!(WindowStats::compute(&[]).is_none());
        assert!(WindowStats::compute_observed(&[None, None]).is_none());
    }

    #[test]
    fn test_trailing_window_truncates() {
        let values = [1, 2, 3, 4, 5];
        assert_eq!(trailing(&values, 1, 3), &[1, 2]);
        assert_eq!(trailing(&values, 4, 3), &[3, 4, 5]);
    }
}
