//! Bounded polling of asynchronous generation tasks.
//!
//! A task moves from `Pending` to `Succeeded` or `Failed`; running out of
//! attempts turns into [`GatewayError::Timeout`]. The wait between attempts
//! goes through a [`Sleeper`] so tests can drive the loop without real
//! delays.

use crate::{GatewayError, GatewayResult};
use std::{future::Future, time::Duration};
use tracing::debug;

#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before every status check, including the first.
    pub interval: Duration,
    /// Hard cap on status checks.
    pub max_attempts: usize,
}

impl PollPolicy {
    #[must_use]
    pub const fn new(interval: Duration, max_attempts: usize) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

/// The observed state of a task after one status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState<T> {
    /// Still running. Carries the provider status label when one was returned.
    Pending(Option<String>),
    Succeeded(T),
    Failed(String),
}

/// Check a task until it settles or `policy.max_attempts` is exhausted.
pub async fn poll_task<T, F, Fut>(
    provider: &'static str,
    task_id: &str,
    policy: PollPolicy,
    sleeper: &dyn Sleeper,
    mut check: F,
) -> GatewayResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = GatewayResult<TaskState<T>>>,
{
    for attempt in 1..=policy.max_attempts {
        sleeper.sleep(policy.interval).await;

        match check().await? {
            TaskState::Succeeded(value) => return Ok(value),
            TaskState::Failed(message) => {
                return Err(GatewayError::TaskFailed {
                    provider,
                    task_id: task_id.to_string(),
                    message,
                })
            }
            TaskState::Pending(status) => {
                debug!(
                    provider,
                    task_id,
                    attempt,
                    status = status.as_deref().unwrap_or("unknown"),
                    "task still pending"
                );
            }
        }
    }

    Err(GatewayError::Timeout {
        provider,
        task_id: task_id.to_string(),
        attempts: policy.max_attempts,
    })
}
