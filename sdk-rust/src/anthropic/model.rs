use crate::{
    anthropic::api::{ContentBlock, CreateMessageParams, InputMessage, Message, MessageContent},
    client_utils, ChatMessage, ChatRole, GatewayError, GatewayResult, TextModel, TextModelInput,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;
use tracing::info;

const PROVIDER: &str = "anthropic";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_API_VERSION: &str = "2023-06-01";

pub struct AnthropicModel {
    model_id: String,
    api_key: String,
    base_url: String,
    api_version: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct AnthropicModelOptions {
    pub base_url: Option<String>,
    pub api_key: String,
    pub api_version: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl AnthropicModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, mut options: AnthropicModelOptions) -> Self {
        let base_url = client_utils::trim_base_url(
            &options
                .base_url
                .take()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        );

        let api_version = options
            .api_version
            .take()
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let client = options.client.take().unwrap_or_default();

        let headers = options.headers.unwrap_or_default();

        Self {
            model_id: model_id.into(),
            api_key: options.api_key,
            base_url,
            api_version,
            client,
            headers,
        }
    }

    fn request_headers(&self) -> GatewayResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(&self.api_key).map_err(|error| {
            GatewayError::InvalidInput(format!("Invalid Anthropic API key header value: {error}"))
        })?;
        api_key.set_sensitive(true);
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.api_version).map_err(|error| {
                GatewayError::InvalidInput(format!(
                    "Invalid Anthropic version header value: {error}"
                ))
            })?,
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                GatewayError::InvalidInput(format!(
                    "Invalid Anthropic header name '{key}': {error}"
                ))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                GatewayError::InvalidInput(format!(
                    "Invalid Anthropic header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl TextModel for AnthropicModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: TextModelInput) -> GatewayResult<String> {
        crate::opentelemetry::trace_text(self.provider(), &self.model_id, input, |input| async move {
            let url = format!("{}/v1/messages", self.base_url);
            info!(url = %url, model = %self.model_id, "anthropic text request");

            let payload = convert_to_anthropic_create_params(input, &self.model_id);
            let headers = self.request_headers()?;

            let response: Message =
                client_utils::send_json(&self.client, &url, &payload, headers, PROVIDER).await?;

            Ok(map_anthropic_content(response.content))
        })
        .await
    }
}

fn convert_to_anthropic_create_params(
    input: TextModelInput,
    model_id: &str,
) -> CreateMessageParams {
    let TextModelInput {
        messages,
        temperature,
        max_tokens,
    } = input;

    let (system, messages) = split_system_messages(messages);

    CreateMessageParams {
        model: model_id.to_string(),
        max_tokens,
        messages,
        temperature,
        system,
    }
}

/// Hoist all system messages into a single newline-joined prompt, keeping
/// the order of every other message.
fn split_system_messages(messages: Vec<ChatMessage>) -> (Option<String>, Vec<InputMessage>) {
    let mut system: Vec<String> = vec![];
    let mut input_messages = vec![];

    for message in messages {
        match message.role {
            ChatRole::System => system.push(message.content),
            role => input_messages.push(InputMessage {
                role: role.as_str().to_string(),
                content: message.content,
            }),
        }
    }

    let system = system.join("\n");
    let system = if system.is_empty() { None } else { Some(system) };

    (system, input_messages)
}

fn map_anthropic_content(content: Option<MessageContent>) -> String {
    match content {
        Some(MessageContent::Blocks(blocks)) => blocks
            .into_iter()
            .filter_map(|ContentBlock { type_field, text }| {
                if type_field == "text" {
                    text
                } else {
                    None
                }
            })
            .collect(),
        Some(MessageContent::Text(text)) => text,
        None => String::new(),
    }
}
