//! Multi-step virtual-user load testing.
//!
//! Each virtual user runs its own session chain (registration, login,
//! authenticated target request) on a dedicated task. The orchestrator joins
//! every session, aggregates the recorded requests into a
//! [`LoadTestSummary`], and reports error-rate breaches to an
//! [`EventSink`].
mod aggregate;
mod credentials;
mod events;
mod orchestrator;
mod recorder;
mod session;
mod threshold;
mod types;


pub use aggregate::{LatencyStat, LatencyStats, MetricsBlock, aggregate, nearest_rank_index};
pub use credentials::{GeneratedCredentials, generate_credentials, generate_credentials_with};
pub use events::{EventSink, LoadEvent, MemoryEventSink, TracingEventSink};
pub use orchestrator::{LoadTester, build_population};
pub use threshold::{ERROR_RATE_MESSAGE, ThresholdBreach, ThresholdMonitor, format_percent};
pub use types::{
    ExistingUser, LoadMode, LoadTestConfig, LoadTestSummary, RequestRecord, RequestStep,
    TestParameters, UserMetrics, UserSeed, VirtualUser,
};
