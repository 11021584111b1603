use crate::{GatewayError, GatewayResult, ImageModel, ImageModelInput, ImageResult};
use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Result for a mocked image `generate` call.
pub enum MockImageResult {
    Images(Vec<ImageResult>),
    Error(GatewayError),
}

impl From<Vec<ImageResult>> for MockImageResult {
    fn from(images: Vec<ImageResult>) -> Self {
        Self::Images(images)
    }
}

impl From<ImageResult> for MockImageResult {
    fn from(image: ImageResult) -> Self {
        Self::Images(vec![image])
    }
}

impl From<GatewayError> for MockImageResult {
    fn from(error: GatewayError) -> Self {
        Self::Error(error)
    }
}

#[derive(Default)]
struct MockImageModelState {
    mocked_results: VecDeque<MockImageResult>,
    tracked_inputs: Vec<ImageModelInput>,
}

/// An image model that records its inputs and replays enqueued results.
pub struct MockImageModel {
    model_id: String,
    state: Mutex<MockImageModelState>,
}

impl Default for MockImageModel {
    fn default() -> Self {
        Self {
            model_id: "mock-image-model".to_string(),
            state: Mutex::new(MockImageModelState::default()),
        }
    }
}

impl MockImageModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockImageModelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue<R>(&self, result: R) -> &Self
    where
        R: Into<MockImageResult>,
    {
        self.state().mocked_results.push_back(result.into());
        self
    }

    pub fn tracked_inputs(&self) -> Vec<ImageModelInput> {
        self.state().tracked_inputs.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().tracked_inputs.len()
    }
}

#[async_trait::async_trait]
impl ImageModel for MockImageModel {
    fn provider(&self) -> &'static str {
        "mock"
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: ImageModelInput) -> GatewayResult<Vec<ImageResult>> {
        let mut state = self.state();
        state.tracked_inputs.push(input);

        let result = state.mocked_results.pop_front().ok_or_else(|| {
            GatewayError::InvalidInput("no mocked image results available".to_string())
        })?;

        match result {
            MockImageResult::Images(images) => Ok(images),
            MockImageResult::Error(error) => Err(error),
        }
    }
}
