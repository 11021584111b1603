use crate::{GatewayError, GatewayResult, TextModel, TextModelInput};
use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Result for a mocked `generate` call.
pub enum MockTextResult {
    Text(String),
    Error(GatewayError),
}

impl MockTextResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn error(error: GatewayError) -> Self {
        Self::Error(error)
    }
}

impl From<&str> for MockTextResult {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for MockTextResult {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<GatewayError> for MockTextResult {
    fn from(error: GatewayError) -> Self {
        Self::Error(error)
    }
}

#[derive(Default)]
struct MockTextModelState {
    mocked_results: VecDeque<MockTextResult>,
    tracked_inputs: Vec<TextModelInput>,
}

/// A text model that records its inputs and replays enqueued results in
/// order.
pub struct MockTextModel {
    provider: &'static str,
    model_id: String,
    state: Mutex<MockTextModelState>,
}

impl Default for MockTextModel {
    fn default() -> Self {
        Self {
            provider: "mock",
            model_id: "mock-text-model".to_string(),
            state: Mutex::new(MockTextModelState::default()),
        }
    }
}

impl MockTextModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_model_id(&mut self, model_id: impl Into<String>) {
        self.model_id = model_id.into();
    }

    fn state(&self) -> MutexGuard<'_, MockTextModelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue a single mocked result.
    pub fn enqueue<R>(&self, result: R) -> &Self
    where
        R: Into<MockTextResult>,
    {
        self.state().mocked_results.push_back(result.into());
        self
    }

    /// Inputs received so far, oldest first.
    pub fn tracked_inputs(&self) -> Vec<TextModelInput> {
        self.state().tracked_inputs.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().tracked_inputs.len()
    }

    /// Clear both tracked inputs and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state();
        state.mocked_results.clear();
        state.tracked_inputs.clear();
    }
}

#[async_trait::async_trait]
impl TextModel for MockTextModel {
    fn provider(&self) -> &'static str {
        self.provider
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: TextModelInput) -> GatewayResult<String> {
        let mut state = self.state();
        state.tracked_inputs.push(input);

        let result = state.mocked_results.pop_front().ok_or_else(|| {
            GatewayError::InvalidInput("no mocked text results available".to_string())
        })?;

        match result {
            MockTextResult::Text(text) => Ok(text),
            MockTextResult::Error(error) => Err(error),
        }
    }
}
