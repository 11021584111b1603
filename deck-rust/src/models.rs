use slide_sdk::{
    gateway::{image_model_for, text_model_for, GatewayOptions},
    GatewayResult, ImageModel, ModelEndpointConfig, TextModel,
};
use std::sync::Arc;

/// Builds models from the endpoint configs supplied with each request.
pub trait ModelProvider: Send + Sync {
    fn text_model(&self, config: &ModelEndpointConfig) -> GatewayResult<Arc<dyn TextModel>>;
    fn image_model(&self, config: &ModelEndpointConfig) -> GatewayResult<Arc<dyn ImageModel>>;
}

/// Detects each endpoint's wire format through the slide SDK gateway.
#[derive(Clone, Default)]
pub struct GatewayModelProvider {
    options: GatewayOptions,
}

impl GatewayModelProvider {
    #[must_use]
    pub fn new(options: GatewayOptions) -> Self {
        Self { options }
    }
}

impl ModelProvider for GatewayModelProvider {
    fn text_model(&self, config: &ModelEndpointConfig) -> GatewayResult<Arc<dyn TextModel>> {
        text_model_for(config, &self.options)
    }

    fn image_model(&self, config: &ModelEndpointConfig) -> GatewayResult<Arc<dyn ImageModel>> {
        image_model_for(config, &self.options)
    }
}
