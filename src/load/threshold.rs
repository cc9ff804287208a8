use super::events::{EventSink, LoadEvent};

pub const ERROR_RATE_MESSAGE: &str = "The API's error rate is unacceptably high under this load.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBreach {
    pub threshold: f64,
    pub actual_rate: f64,
}

impl ThresholdBreach {
    #[must_use]
    pub fn into_event(self) -> LoadEvent {
        LoadEvent::ErrorRateExceeded {
            threshold: format_percent(self.threshold),
            actual_rate: format_percent(self.actual_rate),
            message: ERROR_RATE_MESSAGE.to_owned(),
        }
    }
}

/// Compares a run's error rate against the configured ceiling. Purely
/// observational: a breach never fails the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdMonitor {
    threshold: f64,
}

impl ThresholdMonitor {
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn evaluate(self, error_rate: f64) -> Option<ThresholdBreach> {
        (error_rate > self.threshold).then_some(ThresholdBreach {
            threshold: self.threshold,
            actual_rate: error_rate,
        })
    }

    /// Evaluates `error_rate` and emits an `error_rate_exceeded` event on a
    /// breach.
    pub fn check(self, error_rate: f64, events: &dyn EventSink) -> Option<ThresholdBreach> {
        let breach = self.evaluate(error_rate)?;
        events.emit(breach.into_event());
        Some(breach)
    }
}

/// Formats a fraction as a percentage with two decimals, e.g. `"20.00%"`.
#[must_use]
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}
