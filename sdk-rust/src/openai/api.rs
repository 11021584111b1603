use crate::ImageResult;
use serde::{Deserialize, Serialize};

// https://platform.openai.com/docs/api-reference/chat

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionCreateParams {
    /// Model ID used to generate the response, like `gpt-4o`.
    pub model: String,
    /// A list of messages comprising the conversation so far.
    pub messages: Vec<ChatCompletionMessageParam>,
    /// What sampling temperature to use, between 0 and 2.
    pub temperature: f64,
    /// The maximum number of tokens that can be generated in the chat
    /// completion. Compatible proxies still expect the legacy name.
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionMessageParam {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    #[serde(default)]
    pub message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

// https://platform.openai.com/docs/api-reference/images/create

#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerateParams {
    pub model: String,
    /// A text description of the desired image(s).
    pub prompt: String,
    /// The size of the generated images, e.g. `1024x1024`.
    pub size: String,
    /// The number of images to generate.
    pub n: u32,
    /// `url` or `b64_json`. Always `b64_json` so results need no second
    /// download.
    pub response_format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub data: Vec<ImageResult>,
}
