use std::sync::Mutex;

use serde::Serialize;
use tracing::{error, warn};

/// Operator-facing diagnostics raised during a load test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LoadEvent {
    LoginFailed {
        user: String,
        status_code: i32,
        error_detail: String,
    },
    ErrorRateExceeded {
        threshold: String,
        actual_rate: String,
        message: String,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: LoadEvent);
}

/// Forwards events to `tracing` as structured records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: LoadEvent) {
        match event {
            LoadEvent::LoginFailed {
                user,
                status_code,
                error_detail,
            } => error!(
                event = "login_failed",
                user = %user,
                status_code,
                error_detail = %error_detail,
                "Virtual user failed to log in."
            ),
            LoadEvent::ErrorRateExceeded {
                threshold,
                actual_rate,
                message,
            } => warn!(
                event = "error_rate_exceeded",
                threshold = %threshold,
                actual_rate = %actual_rate,
                "{}",
                message
            ),
        }
    }
}

/// Keeps emitted events in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<LoadEvent>>,
}

impl MemoryEventSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<LoadEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: LoadEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
