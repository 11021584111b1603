//! HTTP surface consumed by the deck editor UI.

use crate::{
    artifact_store::{sanitize_session_id, ArtifactStore, PUBLIC_PREFIX},
    config::ServerConfig,
    download::{HttpImageDownloader, ImageDownloader},
    generator::{PageImageGenerator, PageRequest},
    models::{GatewayModelProvider, ModelProvider},
    sessions::{PageArtifact, SessionRegistry},
    splitter::ContentSplitter,
    templates::{get_template_by_id, get_templates},
    Artifact, DeckError, DetailLevel, Page, Template,
};
use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use slide_sdk::ModelEndpointConfig;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing::error;

/// Request bodies carry whole documents of source material.
pub const BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    store: ArtifactStore,
    sessions: Arc<SessionRegistry>,
    models: Arc<dyn ModelProvider>,
    downloader: Arc<dyn ImageDownloader>,
    default_text_model: ModelEndpointConfig,
    default_image_model: ModelEndpointConfig,
}

impl AppState {
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            store: ArtifactStore::new(config.generated_dir.clone()),
            sessions: Arc::new(SessionRegistry::new()),
            models: Arc::new(GatewayModelProvider::default()),
            downloader: Arc::new(HttpImageDownloader::default()),
            default_text_model: config.text_model.clone(),
            default_image_model: config.image_model.clone(),
        }
    }

    #[must_use]
    pub fn with_models(mut self, models: Arc<dyn ModelProvider>) -> Self {
        self.models = models;
        self
    }

    #[must_use]
    pub fn with_downloader(mut self, downloader: Arc<dyn ImageDownloader>) -> Self {
        self.downloader = downloader;
        self
    }

    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}

impl IntoResponse for DeckError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Configuration(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// CORS restricted to `app_url` when given, otherwise open to any origin.
pub fn cors_layer(app_url: Option<&str>) -> Result<CorsLayer, DeckError> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    match app_url {
        Some(app_url) => {
            let origin = HeaderValue::from_str(app_url).map_err(|error| {
                DeckError::Configuration(format!("APP_URL is not a valid origin: {error}"))
            })?;
            Ok(layer.allow_origin(origin))
        }
        None => Ok(layer.allow_origin(Any)),
    }
}

pub fn router(state: AppState) -> Router {
    let generated = ServeDir::new(state.store.dir());

    let ai = Router::new()
        .route("/split", post(split_handler))
        .route("/generate-page", post(generate_page_handler))
        .route("/regenerate-page", post(regenerate_page_handler))
        .route("/templates", get(templates_handler))
        .route(
            "/sessions/{session_id}",
            get(session_handler).delete(reset_session_handler),
        );

    Router::new()
        .nest("/api/ai", ai)
        .route("/api/config", get(config_handler))
        .route("/api/health", get(health_handler))
        .nest_service(PUBLIC_PREFIX, generated)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SplitBody {
    text: Option<String>,
    page_count: Option<Value>,
    text_model_config: Option<ModelEndpointConfig>,
    template_id: Option<String>,
    detail_level: Option<String>,
}

#[derive(Debug, Serialize)]
struct SplitResponse {
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratePageBody {
    page_data: Option<Page>,
    page_index: Option<Value>,
    total_pages: Option<Value>,
    template_id: Option<String>,
    image_model_config: Option<ModelEndpointConfig>,
    text_model_config: Option<ModelEndpointConfig>,
    design_style: Option<String>,
    session_id: Option<String>,
    detail_level: Option<String>,
    ratio: Option<String>,
    custom_prompt: Option<String>,
}

/// Accept counts sent either as JSON numbers or as numeric strings.
fn parse_count(value: Option<&Value>) -> Option<usize> {
    match value? {
        Value::Number(number) => number.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn lookup_template(template_id: Option<&str>) -> Option<&'static Template> {
    template_id
        .filter(|id| !id.is_empty())
        .and_then(get_template_by_id)
}

fn fully_configured(config: &ModelEndpointConfig) -> bool {
    config.is_configured() && !config.model.trim().is_empty()
}

async fn split_handler(
    State(state): State<AppState>,
    Json(body): Json<SplitBody>,
) -> Result<Json<SplitResponse>, DeckError> {
    let text = body
        .text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| DeckError::InvalidRequest("text and pageCount are required".to_string()))?;
    let page_count = parse_count(body.page_count.as_ref())
        .filter(|count| *count > 0)
        .ok_or_else(|| DeckError::InvalidRequest("text and pageCount are required".to_string()))?;
    let config = body
        .text_model_config
        .filter(fully_configured)
        .ok_or_else(|| {
            DeckError::InvalidRequest(
                "textModelConfig needs apiKey, baseUrl and model".to_string(),
            )
        })?;

    let text_model = state.models.text_model(&config)?;
    let pages = ContentSplitter::new(text_model)
        .split(
            &text,
            page_count,
            lookup_template(body.template_id.as_deref()),
            DetailLevel::from_request(body.detail_level.as_deref()),
        )
        .await?;

    Ok(Json(SplitResponse { pages }))
}

async fn generate_page_handler(
    State(state): State<AppState>,
    Json(body): Json<GeneratePageBody>,
) -> Result<Json<Artifact>, DeckError> {
    generate_page(&state, body, None).await.map(Json)
}

async fn regenerate_page_handler(
    State(state): State<AppState>,
    Json(mut body): Json<GeneratePageBody>,
) -> Result<Json<Artifact>, DeckError> {
    let custom_prompt = body
        .custom_prompt
        .take()
        .filter(|prompt| !prompt.trim().is_empty());
    generate_page(&state, body, custom_prompt).await.map(Json)
}

async fn generate_page(
    state: &AppState,
    body: GeneratePageBody,
    custom_prompt: Option<String>,
) -> Result<Artifact, DeckError> {
    let mut page = body
        .page_data
        .ok_or_else(|| DeckError::InvalidRequest("pageData is required".to_string()))?;
    let page_index = parse_count(body.page_index.as_ref())
        .ok_or_else(|| DeckError::InvalidRequest("pageIndex must be a number".to_string()))?;
    let total_pages = parse_count(body.total_pages.as_ref())
        .filter(|total| *total > page_index)
        .ok_or_else(|| {
            DeckError::InvalidRequest("totalPages must be a number above pageIndex".to_string())
        })?;

    let image_config = body.image_model_config.filter(ModelEndpointConfig::is_configured);
    let text_config = body.text_model_config.filter(ModelEndpointConfig::is_configured);
    if image_config.is_none() && text_config.is_none() {
        return Err(DeckError::InvalidRequest(
            "configure at least one model (image model or text model)".to_string(),
        ));
    }

    if let Some(custom_prompt) = custom_prompt {
        page.content = format!(
            "{}\n\nAdditional user requirements: {custom_prompt}",
            page.content
        );
    }

    let session_id = body
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis().to_string());
    let session_id = sanitize_session_id(&session_id);

    let request = PageRequest {
        page,
        page_index,
        total_pages,
        template: lookup_template(body.template_id.as_deref()),
        design_style: body.design_style,
        session_id,
        detail_level: DetailLevel::from_request(body.detail_level.as_deref()),
        ratio: body.ratio,
    };

    let artifact = PageImageGenerator::from_configs(
        state.store.clone(),
        state.models.as_ref(),
        image_config.as_ref(),
        text_config.as_ref(),
    )?
    .with_downloader(state.downloader.clone())
    .generate(&request)
    .await?;

    state
        .sessions
        .record(&request.session_id, request.page_index, artifact.clone());
    Ok(artifact)
}

async fn templates_handler() -> Json<Value> {
    Json(json!({ "templates": get_templates() }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    session_id: String,
    artifacts: Vec<PageArtifact>,
}

async fn session_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<SessionResponse> {
    let session_id = sanitize_session_id(&session_id);
    let artifacts = state.sessions.list(&session_id);
    Json(SessionResponse {
        session_id,
        artifacts,
    })
}

async fn reset_session_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, DeckError> {
    let session_id = sanitize_session_id(&session_id);
    let removed = state.sessions.reset(&session_id, &state.store).await?;
    Ok(Json(json!({ "sessionId": session_id, "removed": removed })))
}

async fn config_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "textModel": state.default_text_model,
        "imageModel": state.default_image_model,
    }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}
