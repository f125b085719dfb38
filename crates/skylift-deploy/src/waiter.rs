//! Bounded polling for asynchronous scheduler deployments.
//!
//! Mutating scheduler calls return a handle; the change is complete
//! once that handle leaves the in-flight deployment list. The waiter
//! polls that list on a backoff schedule until the handle clears or
//! the overall timeout elapses.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, warn};

use skylift_marathon::{DeploymentHandle, Scheduler};

use crate::error::{DeployError, DeployResult};

/// Poll-delay policy: delays double from the initial value up to the
/// cap, then repeat at the cap.
#[derive(Debug, Clone, Copy)]
pub struct BackoffSchedule {
    next: Duration,
    cap: Duration,
}

impl BackoffSchedule {
    pub const fn new(initial: Duration, cap: Duration) -> Self {
        Self { next: initial, cap }
    }

    /// The next delay in the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let current = self.next;
        self.next = (current * 2).min(self.cap);
        current
    }
}

impl Default for BackoffSchedule {
    /// 30s, 60s, 120s, then steady 150s polls.
    fn default() -> Self {
        Self::new(Duration::from_secs(30), Duration::from_secs(150))
    }
}

/// Waits for a deployment handle to clear, bounded by an overall
/// timeout.
#[derive(Debug, Clone)]
pub struct DeploymentWaiter {
    schedule: BackoffSchedule,
    timeout: Duration,
}

impl DeploymentWaiter {
    pub fn new(timeout: Duration) -> Self {
        Self::with_schedule(timeout, BackoffSchedule::default())
    }

    pub fn with_schedule(timeout: Duration, schedule: BackoffSchedule) -> Self {
        Self { schedule, timeout }
    }

    /// Poll until `handle` disappears from the in-flight list.
    ///
    /// A failure to list deployments counts as "not yet confirmed",
    /// not as a fatal error; the loop keeps polling until the timeout.
    /// The timeout error is only raised once elapsed time has reached
    /// the configured window, never earlier.
    pub async fn wait<S: Scheduler>(
        &self,
        scheduler: &S,
        handle: &DeploymentHandle,
    ) -> DeployResult<()> {
        let start = Instant::now();
        let mut schedule = self.schedule;
        while start.elapsed() < self.timeout {
            time::sleep(schedule.next_delay()).await;
            let deployments = match scheduler.list_deployments().await {
                Ok(deployments) => deployments,
                Err(error) => {
                    warn!(%error, "failed to list in-flight deployments, still waiting");
                    continue;
                }
            };
            if deployments.iter().all(|d| d.id != handle.id) {
                debug!(deployment = %handle.id, "deployment confirmed complete");
                return Ok(());
            }
            debug!(deployment = %handle.id, "deployment still in flight");
        }
        Err(DeployError::Timeout {
            id: handle.id.clone(),
            timeout: self.timeout,
        })
    }
}
