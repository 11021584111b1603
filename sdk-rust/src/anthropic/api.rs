use serde::{Deserialize, Serialize};

// https://docs.anthropic.com/en/api/messages

#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageParams {
    pub model: String,
    /// The maximum number of tokens to generate before stopping.
    pub max_tokens: u32,
    /// Input messages. System content is not allowed here and goes into
    /// `system` instead.
    pub messages: Vec<InputMessage>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Conforming endpoints return a list of blocks. Some proxies return a bare
/// string instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Blocks(Vec<ContentBlock>),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub type_field: String,
    #[serde(default)]
    pub text: Option<String>,
}
