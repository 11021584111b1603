use crate::{GatewayResult, ImageModelInput, ImageResult, TextModelInput};
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct GatewaySpan {
    span: Span,
    start_time: Instant,
    image_count: Option<usize>,
    response_chars: Option<usize>,
}

impl GatewaySpan {
    fn new(span: Span, provider: &str, model_id: &str, operation: &'static str) -> Self {
        span.set_attribute("gen_ai.operation.name", operation);
        span.set_attribute("gen_ai.provider.name", provider.to_string());
        span.set_attribute("gen_ai.request.model", model_id.to_string());

        Self {
            span,
            start_time: Instant::now(),
            image_count: None,
            response_chars: None,
        }
    }

    pub fn text(provider: &str, model_id: &str, input: &TextModelInput) -> Self {
        let this = Self::new(info_span!("slide_sdk.text"), provider, model_id, "chat");
        this.span
            .set_attribute("gen_ai.request.temperature", input.temperature);
        this.span
            .set_attribute("gen_ai.request.max_tokens", i64::from(input.max_tokens));
        this
    }

    pub fn image(provider: &str, model_id: &str, input: &ImageModelInput) -> Self {
        let this = Self::new(
            info_span!("slide_sdk.image"),
            provider,
            model_id,
            "image_generation",
        );
        this.span
            .set_attribute("slide_sdk.image.size", input.size.clone());
        this.span
            .set_attribute("slide_sdk.image.n", i64::from(input.n));
        this
    }

    fn span(&self) -> Span {
        self.span.clone()
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span()).await
    }

    pub fn on_text(&mut self, text: &str) {
        self.response_chars = Some(text.chars().count());
    }

    pub fn on_images(&mut self, images: &[ImageResult]) {
        self.image_count = Some(images.len());
    }

    pub fn on_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        if let Some(count) = self.image_count {
            self.span.set_attribute(
                "slide_sdk.image.count",
                i64::try_from(count).unwrap_or(i64::MAX),
            );
        }
        if let Some(chars) = self.response_chars {
            self.span.set_attribute(
                "slide_sdk.response.chars",
                i64::try_from(chars).unwrap_or(i64::MAX),
            );
        }
        self.span.set_attribute(
            "slide_sdk.duration_seconds",
            self.start_time.elapsed().as_secs_f64(),
        );
    }
}

pub async fn trace_text<F, Fut>(
    provider: &str,
    model_id: &str,
    input: TextModelInput,
    f: F,
) -> GatewayResult<String>
where
    F: FnOnce(TextModelInput) -> Fut,
    Fut: std::future::Future<Output = GatewayResult<String>>,
{
    let mut span = GatewaySpan::text(provider, model_id, &input);
    let result = span.instrument_future(f(input)).await;

    match &result {
        Ok(text) => span.on_text(text),
        Err(error) => span.on_error(error),
    }

    span.on_end();
    result
}

pub async fn trace_image<F, Fut>(
    provider: &str,
    model_id: &str,
    input: ImageModelInput,
    f: F,
) -> GatewayResult<Vec<ImageResult>>
where
    F: FnOnce(ImageModelInput) -> Fut,
    Fut: std::future::Future<Output = GatewayResult<Vec<ImageResult>>>,
{
    let mut span = GatewaySpan::image(provider, model_id, &input);
    let result = span.instrument_future(f(input)).await;

    match &result {
        Ok(images) => span.on_images(images),
        Err(error) => span.on_error(error),
    }

    span.on_end();
    result
}
