use serde::{Deserialize, Serialize};

// https://www.alibabacloud.com/help/en/model-studio/qwen-image-api

#[derive(Debug, Clone, Serialize)]
pub struct GenerationParams {
    pub model: String,
    pub input: GenerationInput,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationInput {
    pub messages: Vec<InputMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: String,
    pub content: Vec<InputContent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputContent {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationParameters {
    /// Resolution as `WIDTH*HEIGHT`.
    pub size: String,
}

/// Both the synchronous generation response and the task status response
/// share this envelope; which fields are present decides the shape.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerationResponse {
    #[serde(default)]
    pub output: Option<GenerationOutput>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerationOutput {
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
    #[serde(default)]
    pub results: Option<Vec<TaskResult>>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub task_status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<ChoiceContent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChoiceContent {
    Items(Vec<ContentItem>),
    Text(serde::de::IgnoredAny),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_image: Option<String>,
}
