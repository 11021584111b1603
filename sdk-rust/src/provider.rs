//! Classify a configured endpoint into the wire format it speaks.
//!
//! Detection is pure string matching on the base URL and model name. The
//! first matching rule wins. It is a best-effort heuristic: an
//! OpenAI-compatible proxy whose URL happens to contain `claude` is routed to
//! the Anthropic Messages format. A wrong guess surfaces as a provider error
//! from the call, never as a panic.

use serde::Serialize;

/// Wire formats supported for text generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextProvider {
    /// Anthropic Messages API (`/v1/messages`).
    Anthropic,
    /// `OpenAI` chat completions (`/chat/completions`).
    OpenAICompatible,
}

/// Wire formats supported for image generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageProvider {
    /// Alibaba Cloud DashScope native multimodal generation.
    DashScope,
    /// ModelScope asynchronous image generation tasks.
    ModelScope,
    /// `OpenAI` images API (`/images/generations`).
    OpenAICompatible,
}

impl TextProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAICompatible => "openai-compatible",
        }
    }
}

impl ImageProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DashScope => "dashscope",
            Self::ModelScope => "modelscope",
            Self::OpenAICompatible => "openai-compatible",
        }
    }
}

#[must_use]
pub fn classify_text_provider(base_url: &str, model: &str) -> TextProvider {
    if model.to_lowercase().contains("claude")
        || base_url.contains("anthropic.com")
        || base_url.contains("claude")
    {
        TextProvider::Anthropic
    } else {
        TextProvider::OpenAICompatible
    }
}

#[must_use]
pub fn classify_image_provider(base_url: &str) -> ImageProvider {
    if base_url.contains("dashscope.aliyuncs.com") {
        ImageProvider::DashScope
    } else if base_url.contains("modelscope.cn") {
        ImageProvider::ModelScope
    } else {
        ImageProvider::OpenAICompatible
    }
}
