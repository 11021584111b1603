use crate::{GatewayResult, ImageModelInput, ImageResult};

/// A model that turns a prompt into one or more images.
///
/// Implementations backed by asynchronous task APIs resolve only once the
/// task has finished, failed or exhausted its poll budget.
#[async_trait::async_trait]
pub trait ImageModel: Send + Sync {
    fn provider(&self) -> &'static str;
    fn model_id(&self) -> String;
    async fn generate(&self, input: ImageModelInput) -> GatewayResult<Vec<ImageResult>>;
}
