//! Entry points that pick the wire format for a configured endpoint and call
//! it.
//!
//! Each [`TextProvider`] / [`ImageProvider`] variant maps to exactly one model
//! implementation. Text models are always wrapped in a [`RetryingTextModel`].

use crate::{
    anthropic::{AnthropicModel, AnthropicModelOptions},
    dashscope::{DashScopeImageModel, DashScopeImageModelOptions},
    modelscope::{ModelScopeImageModel, ModelScopeImageModelOptions},
    openai::{
        OpenAIChatModel, OpenAIChatModelOptions, OpenAIImagesModel, OpenAIImagesModelOptions,
    },
    polling::{Sleeper, TokioSleeper},
    provider::{classify_image_provider, classify_text_provider, ImageProvider, TextProvider},
    retry::{RetryPolicy, RetryingTextModel},
    GatewayResult, ImageModel, ImageModelInput, ImageResult, ModelEndpointConfig, TextModel,
    TextModelInput,
};
use reqwest::Client;
use std::sync::Arc;

/// Shared settings for the models built by this module.
#[derive(Clone, Default)]
pub struct GatewayOptions {
    pub client: Option<Client>,
    pub sleeper: Option<Arc<dyn Sleeper>>,
    pub retry_policy: Option<RetryPolicy>,
    /// Overrides the public DashScope task status endpoint.
    pub dashscope_tasks_url: Option<String>,
}

impl GatewayOptions {
    fn sleeper(&self) -> Arc<dyn Sleeper> {
        self.sleeper
            .clone()
            .unwrap_or_else(|| Arc::new(TokioSleeper))
    }
}

/// Build the text model for `provider` without retries.
#[must_use]
pub fn build_text_model(
    provider: TextProvider,
    config: &ModelEndpointConfig,
    options: &GatewayOptions,
) -> Arc<dyn TextModel> {
    match provider {
        TextProvider::Anthropic => Arc::new(AnthropicModel::new(
            config.model.clone(),
            AnthropicModelOptions {
                base_url: Some(config.base_url.clone()),
                api_key: config.api_key.clone(),
                client: options.client.clone(),
                ..Default::default()
            },
        )),
        TextProvider::OpenAICompatible => Arc::new(OpenAIChatModel::new(
            config.model.clone(),
            OpenAIChatModelOptions {
                base_url: Some(config.base_url.clone()),
                api_key: config.api_key.clone(),
                client: options.client.clone(),
                ..Default::default()
            },
        )),
    }
}

#[must_use]
pub fn build_image_model(
    provider: ImageProvider,
    config: &ModelEndpointConfig,
    options: &GatewayOptions,
) -> Arc<dyn ImageModel> {
    match provider {
        ImageProvider::DashScope => Arc::new(DashScopeImageModel::new(
            config.model.clone(),
            DashScopeImageModelOptions {
                base_url: config.base_url.clone(),
                api_key: config.api_key.clone(),
                tasks_url: options.dashscope_tasks_url.clone(),
                sleeper: Some(options.sleeper()),
                client: options.client.clone(),
                ..Default::default()
            },
        )),
        ImageProvider::ModelScope => Arc::new(ModelScopeImageModel::new(
            config.model.clone(),
            ModelScopeImageModelOptions {
                base_url: Some(config.base_url.clone()),
                api_key: config.api_key.clone(),
                sleeper: Some(options.sleeper()),
                client: options.client.clone(),
                ..Default::default()
            },
        )),
        ImageProvider::OpenAICompatible => Arc::new(OpenAIImagesModel::new(
            config.model.clone(),
            OpenAIImagesModelOptions {
                base_url: Some(config.base_url.clone()),
                api_key: config.api_key.clone(),
                client: options.client.clone(),
            },
        )),
    }
}

/// Validate `config`, detect its provider and build a retrying text model.
pub fn text_model_for(
    config: &ModelEndpointConfig,
    options: &GatewayOptions,
) -> GatewayResult<Arc<dyn TextModel>> {
    config.validate()?;
    let provider = classify_text_provider(&config.base_url, &config.model);
    let model = RetryingTextModel::new(build_text_model(provider, config, options))
        .with_policy(options.retry_policy.unwrap_or_default())
        .with_sleeper(options.sleeper());
    Ok(Arc::new(model))
}

/// Validate `config`, detect its provider and build the image model.
pub fn image_model_for(
    config: &ModelEndpointConfig,
    options: &GatewayOptions,
) -> GatewayResult<Arc<dyn ImageModel>> {
    config.validate()?;
    let provider = classify_image_provider(&config.base_url);
    Ok(build_image_model(provider, config, options))
}

/// Call the text model behind `config` with retries and return its text.
pub async fn call_text_model(
    config: &ModelEndpointConfig,
    input: TextModelInput,
) -> GatewayResult<String> {
    text_model_for(config, &GatewayOptions::default())?
        .generate(input)
        .await
}

/// Call the image model behind `config` and return its images.
pub async fn call_image_model(
    config: &ModelEndpointConfig,
    input: ImageModelInput,
) -> GatewayResult<Vec<ImageResult>> {
    image_model_for(config, &GatewayOptions::default())?
        .generate(input)
        .await
}
