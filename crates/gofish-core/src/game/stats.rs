use serde::Serialize;
use tracing::debug;

/// Accumulates (actual − predicted) residuals for request outcomes.
///
/// A pure observability signal for judging the estimator's calibration; it
/// never feeds back into the rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestStats {
    samples: usize,
    error_sum: f64,
    abs_error_sum: f64,
}

impl RequestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, predicted: f64, actual: usize) {
        let error = actual as f64 - predicted;
        debug!(predicted, actual, error, "request residual");
        self.samples += 1;
        self.error_sum += error;
        self.abs_error_sum += error.abs();
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn mean_error(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.error_sum / self.samples as f64)
    }

    pub fn mean_abs_error(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.abs_error_sum / self.samples as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::RequestStats;

    #[test]
    fn empty_stats_report_no_means() {
        let stats = RequestStats::new();
        assert_eq!(stats.samples(), 0);
        assert_eq!(stats.mean_error(), None);
        assert_eq!(stats.mean_abs_error(), None);
    }

    #[test]
    fn residuals_accumulate() {
        let mut stats = RequestStats::new();
        stats.record(0.5, 2);
        stats.record(1.5, 0);
        assert_eq!(stats.samples(), 2);
        assert_eq!(stats.mean_error(), Some(0.0));
        assert_eq!(stats.mean_abs_error(), Some(1.5));
    }
}
