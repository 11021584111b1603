use crate::{
    models::{GatewayModelProvider, ModelProvider},
    opentelemetry::trace_split,
    prompts, repair, DeckError, DeckResult, DetailLevel, Page, Template,
};
use slide_sdk::{ChatMessage, ModelEndpointConfig, TextModel, TextModelInput};
use std::sync::Arc;
use tracing::info;

pub const SPLIT_TEMPERATURE: f64 = 0.7;
pub const SPLIT_MAX_TOKENS: u32 = 16384;

/// Splits source material into an ordered list of pages with a text model.
pub struct ContentSplitter {
    text_model: Arc<dyn TextModel>,
}

impl ContentSplitter {
    #[must_use]
    pub fn new(text_model: Arc<dyn TextModel>) -> Self {
        Self { text_model }
    }

    pub async fn split(
        &self,
        text: &str,
        page_count: usize,
        template: Option<&Template>,
        detail_level: DetailLevel,
    ) -> DeckResult<Vec<Page>> {
        if page_count == 0 {
            return Err(DeckError::InvalidRequest(
                "page count must be at least 1".to_string(),
            ));
        }

        trace_split(page_count, async {
            let input = TextModelInput::new(vec![
                ChatMessage::system(prompts::split_system_prompt(
                    page_count,
                    template,
                    detail_level,
                )),
                ChatMessage::user(prompts::split_user_prompt(page_count, text)),
            ])
            .temperature(SPLIT_TEMPERATURE)
            .max_tokens(SPLIT_MAX_TOKENS);

            let response = self.text_model.generate(input).await?;
            let pages: Vec<Page> = repair::parse_json_array(&response)?;

            info!(
                requested = page_count,
                returned = pages.len(),
                model = %self.text_model.model_id(),
                "content split"
            );
            Ok(pages)
        })
        .await
    }
}

/// Split `text` into `page_count` pages using the endpoint in `config`.
pub async fn split_content(
    text: &str,
    page_count: usize,
    config: &ModelEndpointConfig,
    template: Option<&Template>,
    detail_level: DetailLevel,
) -> DeckResult<Vec<Page>> {
    let text_model = GatewayModelProvider::default().text_model(config)?;
    ContentSplitter::new(text_model)
        .split(text, page_count, template, detail_level)
        .await
}
