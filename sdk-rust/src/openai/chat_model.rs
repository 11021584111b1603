use super::api::{ChatCompletion, ChatCompletionCreateParams, ChatCompletionMessageParam};
use crate::{client_utils, GatewayError, GatewayResult, TextModel, TextModelInput};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;
use tracing::info;

const PROVIDER: &str = "openai";

pub struct OpenAIChatModel {
    model_id: String,
    api_key: String,
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct OpenAIChatModelOptions {
    pub base_url: Option<String>,
    pub api_key: String,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl OpenAIChatModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: OpenAIChatModelOptions) -> Self {
        let OpenAIChatModelOptions {
            base_url,
            api_key,
            headers,
            client,
        } = options;

        let base_url = client_utils::trim_base_url(
            &base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
        );
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            model_id: model_id.into(),
            api_key,
            base_url,
            client,
            headers,
        }
    }

    fn request_headers(&self) -> GatewayResult<HeaderMap> {
        let mut headers = client_utils::bearer_headers(&self.api_key, PROVIDER)?;

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                GatewayError::InvalidInput(format!("Invalid OpenAI header name '{key}': {error}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                GatewayError::InvalidInput(format!(
                    "Invalid OpenAI header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl TextModel for OpenAIChatModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: TextModelInput) -> GatewayResult<String> {
        crate::opentelemetry::trace_text(self.provider(), &self.model_id, input, |input| async move {
            let url = format!("{}/chat/completions", self.base_url);
            info!(url = %url, model = %self.model_id, "openai text request");

            let params = convert_to_openai_params(input, &self.model_id);
            let headers = self.request_headers()?;

            let response: ChatCompletion =
                client_utils::send_json(&self.client, &url, &params, headers, PROVIDER).await?;

            Ok(response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message)
                .and_then(|message| message.content)
                .unwrap_or_default())
        })
        .await
    }
}

fn convert_to_openai_params(input: TextModelInput, model_id: &str) -> ChatCompletionCreateParams {
    ChatCompletionCreateParams {
        model: model_id.to_string(),
        messages: input
            .messages
            .into_iter()
            .map(|message| ChatCompletionMessageParam {
                role: message.role.as_str().to_string(),
                content: message.content,
            })
            .collect(),
        temperature: input.temperature,
        max_tokens: input.max_tokens,
    }
}
