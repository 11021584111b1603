use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use slide_deck::{
    config::ServerConfig,
    download::ImageDownloader,
    http::{router, AppState},
    models::ModelProvider,
    DownloadError,
};
use slide_sdk::{
    slide_sdk_test::{MockImageModel, MockTextModel},
    GatewayResult, ImageModel, ModelEndpointConfig, TextModel,
};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct MockProvider {
    text: Arc<MockTextModel>,
    image: Arc<MockImageModel>,
}

impl ModelProvider for MockProvider {
    fn text_model(&self, _config: &ModelEndpointConfig) -> GatewayResult<Arc<dyn TextModel>> {
        let model: Arc<dyn TextModel> = self.text.clone();
        Ok(model)
    }

    fn image_model(&self, _config: &ModelEndpointConfig) -> GatewayResult<Arc<dyn ImageModel>> {
        let model: Arc<dyn ImageModel> = self.image.clone();
        Ok(model)
    }
}

struct OfflineDownloader;

#[async_trait::async_trait]
impl ImageDownloader for OfflineDownloader {
    async fn download(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        Err(DownloadError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

struct TestApp {
    dir: TempDir,
    router: Router,
    text: Arc<MockTextModel>,
    image: Arc<MockImageModel>,
}

fn app() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = ServerConfig {
        generated_dir: dir.path().to_path_buf(),
        text_model: ModelEndpointConfig::new("https://api.anthropic.com", "", "claude"),
        ..ServerConfig::default()
    };
    let text = Arc::new(MockTextModel::new());
    let image = Arc::new(MockImageModel::new());
    let state = AppState::new(&config)
        .with_models(Arc::new(MockProvider {
            text: text.clone(),
            image: image.clone(),
        }))
        .with_downloader(Arc::new(OfflineDownloader));

    TestApp {
        dir,
        router: router(state),
        text,
        image,
    }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

fn text_config() -> Value {
    json!({ "baseUrl": "https://api.anthropic.com", "apiKey": "sk-test", "model": "claude" })
}

fn page_data() -> Value {
    json!({
        "title": "Results",
        "keyPoints": ["Revenue +20%"],
        "content": "Details",
        "emphasis": "Revenue",
        "layoutSuggestion": "data chart"
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app.router, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().expect("timestamp").ends_with('Z'));
}

#[tokio::test]
async fn lists_templates() {
    let app = app();
    let (status, body) = send(&app.router, "GET", "/api/ai/templates", None).await;
    assert_eq!(status, StatusCode::OK);
    let templates = body["templates"].as_array().expect("templates");
    assert_eq!(templates.len(), 5);
    assert_eq!(templates[0]["id"], "business");
    assert!(templates[0]["fontFamily"].is_string());
}

#[tokio::test]
async fn exposes_default_model_config() {
    let app = app();
    let (status, body) = send(&app.router, "GET", "/api/config", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["textModel"]["baseUrl"], "https://api.anthropic.com");
    assert_eq!(body["textModel"]["model"], "claude");
    assert_eq!(body["imageModel"]["model"], "");
}

#[tokio::test]
async fn split_rejects_incomplete_requests() {
    let app = app();
    let cases = [
        json!({ "pageCount": 3, "textModelConfig": text_config() }),
        json!({ "text": "material", "pageCount": 0, "textModelConfig": text_config() }),
        json!({ "text": "material", "pageCount": 3 }),
        json!({
            "text": "material",
            "pageCount": 3,
            "textModelConfig": { "baseUrl": "https://api.anthropic.com", "apiKey": "sk-test" }
        }),
    ];

    for case in cases {
        let (status, body) = send(&app.router, "POST", "/api/ai/split", Some(case)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
    assert_eq!(app.text.call_count(), 0);
}

#[tokio::test]
async fn split_returns_pages() {
    let app = app();
    app.text.enqueue(
        json!([
            { "title": "Cover", "keyPoints": ["a"], "content": "c", "emphasis": "e", "layoutSuggestion": "l" },
            { "title": "Summary", "keyPoints": ["b"], "content": "c", "emphasis": "e", "layoutSuggestion": "l" }
        ])
        .to_string(),
    );

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/ai/split",
        Some(json!({
            "text": "material",
            "pageCount": "2",
            "textModelConfig": text_config(),
            "templateId": "tech",
            "detailLevel": "brief"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pages"][0]["title"], "Cover");
    assert_eq!(body["pages"][1]["keyPoints"], json!(["b"]));
    let system = &app.text.tracked_inputs()[0].messages[0].content;
    assert!(system.contains("exactly 2 slides"));
    assert!(system.contains("Future Tech"));
}

#[tokio::test]
async fn split_parse_failures_are_server_errors() {
    let app = app();
    app.text.enqueue("no json here");

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/ai/split",
        Some(json!({ "text": "material", "pageCount": 2, "textModelConfig": text_config() })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .expect("error")
        .contains("no json here"));
}

#[tokio::test]
async fn generate_page_requires_a_model() {
    let app = app();
    let (status, body) = send(
        &app.router,
        "POST",
        "/api/ai/generate-page",
        Some(json!({
            "pageData": page_data(),
            "pageIndex": 0,
            "totalPages": 1,
            "imageModelConfig": { "baseUrl": "", "apiKey": "", "model": "" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .expect("error")
        .contains("at least one model"));
}

#[tokio::test]
async fn generate_page_validates_page_position() {
    let app = app();
    for (page_index, total_pages) in [(json!(null), json!(2)), (json!(2), json!(2))] {
        let (status, _) = send(
            &app.router,
            "POST",
            "/api/ai/generate-page",
            Some(json!({
                "pageData": page_data(),
                "pageIndex": page_index,
                "totalPages": total_pages,
                "textModelConfig": text_config()
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn generated_pages_are_served_and_tracked_per_session() {
    let app = app();
    app.text.enqueue("```html\n<html><body>Results</body></html>\n```");

    let (status, artifact) = send(
        &app.router,
        "POST",
        "/api/ai/generate-page",
        Some(json!({
            "pageData": page_data(),
            "pageIndex": "0",
            "totalPages": "2",
            "textModelConfig": text_config(),
            "sessionId": "deck/1",
            "ratio": "1:1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(artifact["method"], "html_generation");
    assert_eq!(artifact["imageUrl"], "/generated/page_deck_1_0.html");
    assert_eq!(artifact["htmlContent"], "<html><body>Results</body></html>");
    assert!(app
        .text
        .tracked_inputs()[0]
        .messages[0]
        .content
        .contains("1024x1024 pixels"));

    let (status, served) = send(&app.router, "GET", "/generated/page_deck_1_0.html", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, "<html><body>Results</body></html>");

    let (status, session) = send(&app.router, "GET", "/api/ai/sessions/deck_1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["sessionId"], "deck_1");
    assert_eq!(session["artifacts"][0]["pageIndex"], 0);
    assert_eq!(session["artifacts"][0]["method"], "html_generation");

    let (status, reset) = send(&app.router, "DELETE", "/api/ai/sessions/deck_1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reset["removed"], 1);
    assert!(!app.dir.path().join("page_deck_1_0.html").exists());

    let (_, session) = send(&app.router, "GET", "/api/ai/sessions/deck_1", None).await;
    assert_eq!(session["artifacts"], json!([]));
}

#[tokio::test]
async fn regenerate_appends_custom_requirements() {
    let app = app();
    app.image.enqueue(slide_sdk::ImageResult::from_url(
        "https://cdn.invalid/slide.png",
    ));

    let (status, artifact) = send(
        &app.router,
        "POST",
        "/api/ai/regenerate-page",
        Some(json!({
            "pageData": page_data(),
            "pageIndex": 0,
            "totalPages": 1,
            "imageModelConfig": { "baseUrl": "https://api.openai.com", "apiKey": "sk-image", "model": "dall-e-3" },
            "sessionId": "s",
            "customPrompt": "Use a darker background"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(artifact["method"], "image_model");
    assert_eq!(artifact["imageUrl"], "https://cdn.invalid/slide.png");
    assert!(artifact.get("htmlContent").is_none());
    let prompt = &app.image.tracked_inputs()[0].prompt;
    assert!(prompt.contains("Details\n\nAdditional user requirements: Use a darker background"));
}
