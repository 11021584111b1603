//! Rendering of a single page.
//!
//! A configured image model is tried first. Any failure there is logged and
//! the page is rendered as an HTML document by the text model instead, so a
//! missing or broken image provider never blocks the deck.

use crate::{
    artifact_store::{ArtifactKind, ArtifactStore},
    download::{HttpImageDownloader, ImageDownloader},
    models::{GatewayModelProvider, ModelProvider},
    opentelemetry::trace_generate_page,
    prompts, repair, Artifact, DeckError, DeckResult, DetailLevel, GenerationMethod, Page,
    SlideRatio, Template, DEFAULT_RATIO,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use slide_sdk::{
    ChatMessage, ImageModel, ImageModelInput, ImageResult, ModelEndpointConfig, TextModel,
    TextModelInput,
};
use std::sync::Arc;
use tracing::{info, warn};

pub const HTML_TEMPERATURE: f64 = 0.8;
pub const HTML_MAX_TOKENS: u32 = 8192;

/// Everything needed to render one page.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: Page,
    pub page_index: usize,
    pub total_pages: usize,
    pub template: Option<&'static Template>,
    pub design_style: Option<String>,
    pub session_id: String,
    pub detail_level: DetailLevel,
    pub ratio: Option<String>,
}

impl PageRequest {
    pub fn new(
        page: Page,
        page_index: usize,
        total_pages: usize,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            page,
            page_index,
            total_pages,
            template: None,
            design_style: None,
            session_id: session_id.into(),
            detail_level: DetailLevel::default(),
            ratio: None,
        }
    }

    fn ratio(&self) -> &str {
        self.ratio
            .as_deref()
            .filter(|ratio| !ratio.trim().is_empty())
            .unwrap_or(DEFAULT_RATIO)
    }
}

pub struct PageImageGenerator {
    image_model: Option<Arc<dyn ImageModel>>,
    text_model: Option<Arc<dyn TextModel>>,
    store: ArtifactStore,
    downloader: Arc<dyn ImageDownloader>,
}

impl PageImageGenerator {
    #[must_use]
    pub fn new(store: ArtifactStore) -> Self {
        Self {
            image_model: None,
            text_model: None,
            store,
            downloader: Arc::new(HttpImageDownloader::default()),
        }
    }

    /// Build the models for whichever of the two endpoints are configured.
    pub fn from_configs(
        store: ArtifactStore,
        provider: &dyn ModelProvider,
        image_config: Option<&ModelEndpointConfig>,
        text_config: Option<&ModelEndpointConfig>,
    ) -> DeckResult<Self> {
        let mut generator = Self::new(store);
        if let Some(config) = image_config.filter(|config| config.is_configured()) {
            generator.image_model = Some(provider.image_model(config)?);
        }
        if let Some(config) = text_config.filter(|config| config.is_configured()) {
            generator.text_model = Some(provider.text_model(config)?);
        }
        Ok(generator)
    }

    #[must_use]
    pub fn with_image_model(mut self, image_model: Arc<dyn ImageModel>) -> Self {
        self.image_model = Some(image_model);
        self
    }

    #[must_use]
    pub fn with_text_model(mut self, text_model: Arc<dyn TextModel>) -> Self {
        self.text_model = Some(text_model);
        self
    }

    #[must_use]
    pub fn with_downloader(mut self, downloader: Arc<dyn ImageDownloader>) -> Self {
        self.downloader = downloader;
        self
    }

    pub async fn generate(&self, request: &PageRequest) -> DeckResult<Artifact> {
        trace_generate_page(
            &request.session_id,
            request.page_index,
            request.total_pages,
            async {
                if let Some(image_model) = &self.image_model {
                    if let Some(artifact) = self.try_image_model(image_model.as_ref(), request).await
                    {
                        return Ok(artifact);
                    }
                }
                self.generate_html(request).await
            },
        )
        .await
    }

    async fn try_image_model(
        &self,
        image_model: &dyn ImageModel,
        request: &PageRequest,
    ) -> Option<Artifact> {
        let prompt = prompts::image_prompt(
            &request.page,
            request.page_index,
            request.total_pages,
            request.template,
            request.design_style.as_deref(),
            request.detail_level,
            request.ratio(),
        );
        let input = ImageModelInput::new(prompt).size(request.ratio());

        let images = match image_model.generate(input).await {
            Ok(images) => images,
            Err(error) => {
                warn!(error = %error, page_index = request.page_index, "image model failed, falling back to HTML generation");
                return None;
            }
        };

        let Some(ImageResult { url, b64_json }) = images.into_iter().next() else {
            warn!(page_index = request.page_index, "image model returned no images, falling back to HTML generation");
            return None;
        };

        if let Some(data) = b64_json.filter(|data| !data.is_empty()) {
            return self.store_base64(request, &data).await;
        }

        if let Some(url) = url.filter(|url| !url.is_empty()) {
            return Some(self.store_remote(request, url).await);
        }

        warn!(page_index = request.page_index, "image result has neither data nor URL");
        None
    }

    async fn store_base64(&self, request: &PageRequest, data: &str) -> Option<Artifact> {
        let bytes = match STANDARD.decode(data.trim()) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(error = %error, "image data is not valid base64, falling back to HTML generation");
                return None;
            }
        };

        match self
            .store
            .write(&request.session_id, request.page_index, ArtifactKind::Png, &bytes)
            .await
        {
            Ok(image_url) => Some(image_artifact(image_url)),
            Err(error) => {
                warn!(error = %error, "failed to store image, falling back to HTML generation");
                None
            }
        }
    }

    /// Download a provider URL into the store. Any failure keeps the remote
    /// URL as the artifact.
    async fn store_remote(&self, request: &PageRequest, url: String) -> Artifact {
        let bytes = match self.downloader.download(&url).await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(error = %error, "failed to download image, using remote URL directly");
                return image_artifact(url);
            }
        };

        match self
            .store
            .write(&request.session_id, request.page_index, ArtifactKind::Png, &bytes)
            .await
        {
            Ok(image_url) => image_artifact(image_url),
            Err(error) => {
                warn!(error = %error, "failed to store downloaded image, using remote URL directly");
                image_artifact(url)
            }
        }
    }

    async fn generate_html(&self, request: &PageRequest) -> DeckResult<Artifact> {
        let text_model = self.text_model.as_ref().ok_or_else(|| {
            DeckError::Configuration(
                "no image was produced and no text model is configured for HTML generation"
                    .to_string(),
            )
        })?;

        let ratio = SlideRatio::resolve(request.ratio.as_deref());
        let input = TextModelInput::new(vec![
            ChatMessage::system(prompts::html_system_prompt(
                request.page_index,
                request.total_pages,
                request.template,
                request.design_style.as_deref(),
                request.detail_level,
                ratio,
            )),
            ChatMessage::user(prompts::html_user_prompt(&request.page)),
        ])
        .temperature(HTML_TEMPERATURE)
        .max_tokens(HTML_MAX_TOKENS);

        let response = text_model.generate(input).await?;
        let trimmed = response.trim();
        let html = repair::extract_fenced_block(trimmed)
            .unwrap_or(trimmed)
            .to_string();

        let image_url = self
            .store
            .write(
                &request.session_id,
                request.page_index,
                ArtifactKind::Html,
                html.as_bytes(),
            )
            .await?;

        info!(page_index = request.page_index, url = %image_url, "HTML slide generated");
        Ok(Artifact {
            image_url,
            html_content: Some(html),
            method: GenerationMethod::HtmlGeneration,
        })
    }
}

/// Render one page with whichever of the two endpoints are configured.
pub async fn generate_page_image(
    request: &PageRequest,
    image_config: Option<&ModelEndpointConfig>,
    text_config: Option<&ModelEndpointConfig>,
    store: ArtifactStore,
) -> DeckResult<Artifact> {
    PageImageGenerator::from_configs(
        store,
        &GatewayModelProvider::default(),
        image_config,
        text_config,
    )?
    .generate(request)
    .await
}

fn image_artifact(image_url: String) -> Artifact {
    Artifact {
        image_url,
        html_content: None,
        method: GenerationMethod::ImageModel,
    }
}
