use crate::{Artifact, DeckResult, GenerationMethod, Page};
use opentelemetry::trace::Status;
use std::{error::Error, future::Future};
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct DeckSpan {
    span: Span,
}

impl DeckSpan {
    pub fn split(page_count: usize) -> Self {
        let span = info_span!("slide_deck.split");
        span.set_attribute("slide_deck.page_count", saturating_i64(page_count));
        Self { span }
    }

    pub fn generate_page(session_id: &str, page_index: usize, total_pages: usize) -> Self {
        let span = info_span!("slide_deck.generate_page");
        span.set_attribute("slide_deck.session_id", session_id.to_string());
        span.set_attribute("slide_deck.page_index", saturating_i64(page_index));
        span.set_attribute("slide_deck.total_pages", saturating_i64(total_pages));
        Self { span }
    }

    pub fn on_pages(&mut self, pages: &[Page]) {
        self.span
            .set_attribute("slide_deck.pages_returned", saturating_i64(pages.len()));
    }

    pub fn on_artifact(&mut self, artifact: &Artifact) {
        let method = match artifact.method {
            GenerationMethod::ImageModel => "image_model",
            GenerationMethod::HtmlGeneration => "html_generation",
        };
        self.span.set_attribute("slide_deck.method", method);
    }

    pub fn on_error(&mut self, error: &(dyn Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }
}

fn saturating_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub async fn trace_split<F>(page_count: usize, future: F) -> DeckResult<Vec<Page>>
where
    F: Future<Output = DeckResult<Vec<Page>>>,
{
    let mut span = DeckSpan::split(page_count);
    let result = future.instrument(span.span.clone()).await;

    match &result {
        Ok(pages) => span.on_pages(pages),
        Err(error) => span.on_error(error),
    }

    result
}

pub async fn trace_generate_page<F>(
    session_id: &str,
    page_index: usize,
    total_pages: usize,
    future: F,
) -> DeckResult<Artifact>
where
    F: Future<Output = DeckResult<Artifact>>,
{
    let mut span = DeckSpan::generate_page(session_id, page_index, total_pages);
    let result = future.instrument(span.span.clone()).await;

    match &result {
        Ok(artifact) => span.on_artifact(artifact),
        Err(error) => span.on_error(error),
    }

    result
}
