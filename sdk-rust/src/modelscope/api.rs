use serde::{Deserialize, Serialize};

// https://modelscope.cn/docs/model-service/API-Inference/intro

#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationParams {
    pub model: String,
    pub prompt: String,
    pub parameters: ImageGenerationParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationParameters {
    /// Resolution as `WIDTH*HEIGHT`.
    pub size: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub task_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatusResponse {
    #[serde(default)]
    pub task_status: Option<String>,
    #[serde(default)]
    pub output_images: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
}
