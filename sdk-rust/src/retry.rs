use crate::{
    polling::{Sleeper, TokioSleeper},
    GatewayResult, TextModel, TextModelInput,
};
use std::{future::Future, sync::Arc, time::Duration};
use tracing::warn;

/// Attempts a call up to `max_attempts` times. After the n-th failed attempt
/// it waits `base_delay * n` before trying again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Run `operation` under `policy`, surfacing the last error once attempts
/// run out. Errors that are not retryable return immediately.
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    sleeper: &dyn Sleeper,
    mut operation: F,
) -> GatewayResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = GatewayResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if !error.is_retryable() || attempt >= max_attempts => return Err(error),
            Err(error) => {
                warn!(attempt, max_attempts, error = %error, "request failed, retrying");
                sleeper.sleep(policy.delay_after(attempt)).await;
                attempt += 1;
            }
        }
    }
}

/// Wraps a text model so every `generate` call goes through a
/// [`RetryPolicy`].
pub struct RetryingTextModel {
    inner: Arc<dyn TextModel>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryingTextModel {
    #[must_use]
    pub fn new(inner: Arc<dyn TextModel>) -> Self {
        Self {
            inner,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }
}

#[async_trait::async_trait]
impl TextModel for RetryingTextModel {
    fn provider(&self) -> &'static str {
        self.inner.provider()
    }

    fn model_id(&self) -> String {
        self.inner.model_id()
    }

    async fn generate(&self, input: TextModelInput) -> GatewayResult<String> {
        with_retry(self.policy, self.sleeper.as_ref(), || {
            self.inner.generate(input.clone())
        })
        .await
    }
}
