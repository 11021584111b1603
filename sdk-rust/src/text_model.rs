use crate::{GatewayResult, TextModelInput};

/// A model that turns a chat conversation into plain text.
#[async_trait::async_trait]
pub trait TextModel: Send + Sync {
    fn provider(&self) -> &'static str;
    fn model_id(&self) -> String;
    async fn generate(&self, input: TextModelInput) -> GatewayResult<String>;
}
