use serde::{Serialize, Serializer};

use super::threshold::format_percent;
use super::types::UserMetrics;

const P90_PERCENT: usize = 90;

/// A latency statistic, or the `"N/A"` sentinel when no request succeeded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LatencyStat {
    Value(f64),
    NoData,
}

impl LatencyStat {
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            LatencyStat::Value(value) => Some(value),
            LatencyStat::NoData => None,
        }
    }
}

impl Serialize for LatencyStat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LatencyStat::Value(value) => serializer.serialize_str(&format!("{:.2}", value)),
            LatencyStat::NoData => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyStats {
    pub mean: LatencyStat,
    pub min: LatencyStat,
    pub max: LatencyStat,
    pub p90: LatencyStat,
}

impl LatencyStats {
    /// Statistics over successful-request latencies.
    #[must_use]
    pub fn from_samples(mut samples: Vec<f64>) -> Self {
        if samples.is_empty() {
            return Self {
                mean: LatencyStat::NoData,
                min: LatencyStat::NoData,
                max: LatencyStat::NoData,
                p90: LatencyStat::NoData,
            };
        }
        samples.sort_by(f64::total_cmp);

        let sum: f64 = samples.iter().sum();
        let mean = sum / samples.len() as f64;
        let stat = |index: usize| {
            samples
                .get(index)
                .copied()
                .map_or(LatencyStat::NoData, LatencyStat::Value)
        };

        Self {
            mean: LatencyStat::Value(mean),
            min: stat(0),
            max: stat(samples.len().saturating_sub(1)),
            p90: stat(nearest_rank_index(samples.len(), P90_PERCENT)),
        }
    }
}

/// Index of the `percent` percentile in an ascending sequence of `len`
/// values: `floor(len * percent / 100)`, no interpolation.
#[must_use]
pub const fn nearest_rank_index(len: usize, percent: usize) -> usize {
    let index = len.saturating_mul(percent) / 100;
    if index >= len {
        len.saturating_sub(1)
    } else {
        index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsBlock {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    #[serde(serialize_with = "serialize_rate")]
    pub error_rate: f64,
    #[serde(rename = "average_latency_ms")]
    pub mean_latency_ms: LatencyStat,
    pub max_latency_ms: LatencyStat,
    pub min_latency_ms: LatencyStat,
    pub p90_latency_ms: LatencyStat,
}

/// Reduces per-user results into run totals and latency statistics.
#[must_use]
pub fn aggregate(results: &[UserMetrics]) -> MetricsBlock {
    let records = || results.iter().flat_map(|user| user.requests.iter());

    let total_requests = records().count();
    let successful_requests = records().filter(|record| record.success).count();
    let failed_requests = total_requests.saturating_sub(successful_requests);
    let error_rate = if total_requests == 0 {
        0.0
    } else {
        failed_requests as f64 / total_requests as f64
    };

    let latencies: Vec<f64> = records()
        .filter(|record| record.success)
        .filter_map(|record| record.latency_ms)
        .collect();
    let stats = LatencyStats::from_samples(latencies);

    MetricsBlock {
        total_requests,
        successful_requests,
        failed_requests,
        error_rate,
        mean_latency_ms: stats.mean,
        max_latency_ms: stats.max,
        min_latency_ms: stats.min,
        p90_latency_ms: stats.p90,
    }
}

fn serialize_rate<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_percent(*value))
}
