use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::info;

use super::aggregate::aggregate;
use super::events::EventSink;
use super::session::SessionRunner;
use super::threshold::ThresholdMonitor;
use super::types::{LoadMode, LoadTestConfig, LoadTestSummary, TestParameters, UserMetrics, UserSeed};
use crate::error::{AppError, AppResult, LoadError};
use crate::http::RequestExecutor;

/// Runs one load test: fans out a session per virtual user, waits for all of
/// them, and summarises the recorded requests.
pub struct LoadTester {
    config: Arc<LoadTestConfig>,
    executor: Arc<dyn RequestExecutor>,
    events: Arc<dyn EventSink>,
}

impl LoadTester {
    #[must_use]
    pub fn new(
        config: LoadTestConfig,
        executor: Arc<dyn RequestExecutor>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            executor,
            events,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LoadTestConfig {
        &self.config
    }

    /// Executes the load test.
    ///
    /// # Errors
    ///
    /// Returns an error before any request is sent when the user source is
    /// missing or ambiguous, and if a session task panics.
    pub async fn run(&self) -> AppResult<LoadTestSummary> {
        let (mode, seeds) = build_population(&self.config)?;
        let num_users = seeds.len();
        info!(
            users = num_users,
            mode = ?mode,
            method = self.config.http_method.as_str(),
            target = %self.config.target_endpoint,
            "Starting load test."
        );

        let start = Instant::now();
        let results = self.fan_out(seeds).await?;
        let total_runtime = start.elapsed();

        let metrics = aggregate(&results);
        info!(
            total = metrics.total_requests,
            successful = metrics.successful_requests,
            failed = metrics.failed_requests,
            p90_ms = ?metrics.p90_latency_ms.value(),
            runtime_ms = u64::try_from(total_runtime.as_millis()).unwrap_or(u64::MAX),
            "Load test finished."
        );
        ThresholdMonitor::new(self.config.error_threshold)
            .check(metrics.error_rate, self.events.as_ref());

        Ok(LoadTestSummary {
            test_mode: mode,
            test_parameters: TestParameters {
                num_users,
                http_method: self.config.http_method,
                target_endpoint: self.config.target_endpoint.clone(),
                total_runtime,
            },
            metrics,
            user_results_detail: results,
        })
    }

    /// One task per seed; results come back in seed order regardless of
    /// completion order.
    async fn fan_out(&self, seeds: Vec<UserSeed>) -> AppResult<Vec<UserMetrics>> {
        let limiter = self
            .config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.get())));

        let handles: Vec<_> = seeds
            .into_iter()
            .map(|seed| {
                let config = Arc::clone(&self.config);
                let executor = Arc::clone(&self.executor);
                let events = Arc::clone(&self.events);
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    let _permit = match limiter {
                        Some(limiter) => limiter.acquire_owned().await.ok(),
                        None => None,
                    };
                    SessionRunner::new(&config, executor.as_ref(), events.as_ref())
                        .run(seed)
                        .await
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.map_err(AppError::from))
            .collect()
    }
}

/// Resolves the virtual-user population, in order, from exactly one source.
///
/// # Errors
///
/// Returns an error when neither or both of `num_new_users` and
/// `existing_users` are set, when an existing user has no email, or when the
/// new-user id range does not fit in `u64`.
pub fn build_population(config: &LoadTestConfig) -> Result<(LoadMode, Vec<UserSeed>), LoadError> {
    match (config.num_new_users, config.existing_users.is_empty()) {
        (0, true) => Err(LoadError::MissingUserSource),
        (num_new_users, true) => {
            let seeds = (0..num_new_users)
                .map(|offset| {
                    u64::try_from(offset)
                        .ok()
                        .and_then(|offset| config.start_user_id.checked_add(offset))
                        .map(|numeric_id| UserSeed::New { numeric_id })
                })
                .collect::<Option<Vec<_>>>()
                .ok_or(LoadError::UserIdOverflow {
                    start_user_id: config.start_user_id,
                    num_new_users,
                })?;
            Ok((LoadMode::NewUsers, seeds))
        }
        (0, false) => {
            if let Some(index) = config
                .existing_users
                .iter()
                .position(|user| user.email.trim().is_empty())
            {
                return Err(LoadError::ExistingUserMissingEmail { index });
            }
            let seeds = config
                .existing_users
                .iter()
                .cloned()
                .map(UserSeed::Existing)
                .collect();
            Ok((LoadMode::ExistingUsers, seeds))
        }
        (num_new_users, false) => Err(LoadError::ConflictingUserSources {
            num_new_users,
            existing_users: config.existing_users.len(),
        }),
    }
}
