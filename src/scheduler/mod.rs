//! Reconciliation scheduler
//!
//! Competition state advances on a fixed cron cadence instead of
//! piggybacking on read requests, so transitions happen predictably
//! regardless of traffic. Each tick tops up the week horizon and
//! reconciles statuses.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use croner::Cron;
use thiserror::Error;

use crate::competitions::{CompetitionResult, ReconcileReport};
use crate::observability::Logger;
use crate::platform::Platform;

/// Result type for scheduler construction
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Invalid cron expression \"{expression}\": {message}")]
    InvalidCron { expression: String, message: String },
}

/// Runs lifecycle maintenance on a cron cadence
pub struct ReconcileScheduler {
    platform: Arc<Platform>,
    schedule: Cron,
}

impl ReconcileScheduler {
    pub fn new(platform: Arc<Platform>, expression: &str) -> SchedulerResult<Self> {
        let schedule = Cron::new(expression)
            .parse()
            .map_err(|e| SchedulerError::InvalidCron {
                expression: expression.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { platform, schedule })
    }

    /// One maintenance pass: top up the horizon, then reconcile
    pub fn tick(&self) -> CompetitionResult<ReconcileReport> {
        let created = self.platform.lifecycle.ensure_upcoming_weeks()?;
        if !created.is_empty() {
            Logger::info(
                "HORIZON_TOPPED_UP",
                &[("weeks_created", &created.len().to_string())],
            );
        }
        self.platform.lifecycle.reconcile_statuses()
    }

    /// Next scheduled tick strictly after `after`
    pub fn next_occurrence(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.find_next_occurrence(&after, false).ok()
    }

    /// Tick forever on the configured cadence
    pub async fn run(&self) {
        loop {
            match self.tick() {
                Ok(report) => {
                    if !report.completed.is_empty() || !report.activated.is_empty() {
                        Logger::info(
                            "RECONCILE_TICK",
                            &[
                                ("activated", &report.activated.len().to_string()),
                                ("completed", &report.completed.len().to_string()),
                                ("failures", &report.failures.to_string()),
                            ],
                        );
                    }
                }
                Err(e) => {
                    Logger::error("RECONCILE_TICK_FAILED", &[("error", &e.to_string())]);
                }
            }

            let now = self.platform.clock.now();
            let next = self
                .next_occurrence(now)
                .unwrap_or(now + Duration::minutes(5));
            let wait = (next - now)
                .to_std()
                .unwrap_or(std::time::Duration::from_secs(60));
            tokio::time::sleep(wait).await;
        }
    }
}
