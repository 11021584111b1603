mod common;

use axum::http::StatusCode;
use common::{BoxedError, StubServer};
use serde_json::json;
use slide_sdk::{
    call_image_model, call_text_model,
    gateway::{image_model_for, text_model_for, GatewayOptions},
    slide_sdk_test::RecordingSleeper,
    ChatMessage, GatewayError, ImageModel, ImageModelInput, ModelEndpointConfig, TextModel,
    TextModelInput,
};
use std::{sync::Arc, time::Duration};

fn options(sleeper: &Arc<RecordingSleeper>) -> GatewayOptions {
    GatewayOptions {
        sleeper: Some(sleeper.clone()),
        ..Default::default()
    }
}

#[tokio::test]
async fn routes_claude_models_to_messages_api() -> Result<(), BoxedError> {
    let stub = StubServer::start().await?;
    stub.respond(
        "/v1/messages",
        StatusCode::OK,
        json!({ "content": [{ "type": "text", "text": "from anthropic" }] }),
    );

    let sleeper = Arc::new(RecordingSleeper::new());
    let config = ModelEndpointConfig::new(stub.url(), "key", "claude-sonnet-4-20250514");
    let model = text_model_for(&config, &options(&sleeper))?;

    assert_eq!(model.provider(), "anthropic");
    let text = model
        .generate(TextModelInput::new(vec![ChatMessage::user("hi")]))
        .await?;
    assert_eq!(text, "from anthropic");

    stub.stop().await
}

#[tokio::test]
async fn routes_other_models_to_chat_completions() -> Result<(), BoxedError> {
    let stub = StubServer::start().await?;
    stub.respond(
        "/chat/completions",
        StatusCode::OK,
        json!({ "choices": [{ "message": { "content": "from openai" } }] }),
    );

    let sleeper = Arc::new(RecordingSleeper::new());
    let config = ModelEndpointConfig::new(stub.url(), "key", "qwen-max");
    let model = text_model_for(&config, &options(&sleeper))?;

    assert_eq!(model.provider(), "openai");
    let text = model
        .generate(TextModelInput::new(vec![ChatMessage::user("hi")]))
        .await?;
    assert_eq!(text, "from openai");

    stub.stop().await
}

#[tokio::test]
async fn text_models_retry_server_errors() -> Result<(), BoxedError> {
    let stub = StubServer::start().await?;
    stub.respond(
        "/chat/completions",
        StatusCode::BAD_GATEWAY,
        json!({ "error": "upstream" }),
    );
    stub.respond(
        "/chat/completions",
        StatusCode::OK,
        json!({ "choices": [{ "message": { "content": "recovered" } }] }),
    );

    let sleeper = Arc::new(RecordingSleeper::new());
    let config = ModelEndpointConfig::new(stub.url(), "key", "gpt-4o");
    let text = text_model_for(&config, &options(&sleeper))?
        .generate(TextModelInput::new(vec![ChatMessage::user("hi")]))
        .await?;

    assert_eq!(text, "recovered");
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(1)]);
    assert_eq!(stub.requests_to("/chat/completions").len(), 2);

    stub.stop().await
}

#[tokio::test]
async fn missing_api_key_fails_before_any_request() {
    let sleeper = Arc::new(RecordingSleeper::new());
    let config = ModelEndpointConfig::new("https://api.openai.com/v1", "", "gpt-4o");

    let text_error = text_model_for(&config, &options(&sleeper))
        .err()
        .expect("configuration error");
    assert!(matches!(text_error, GatewayError::Configuration(_)));

    let image_error = image_model_for(&config, &options(&sleeper))
        .err()
        .expect("configuration error");
    assert!(matches!(image_error, GatewayError::Configuration(_)));
}

#[tokio::test]
async fn image_endpoints_default_to_openai_images() -> Result<(), BoxedError> {
    let stub = StubServer::start().await?;
    stub.respond(
        "/images/generations",
        StatusCode::OK,
        json!({ "data": [{ "b64_json": "Zm9v" }] }),
    );

    let sleeper = Arc::new(RecordingSleeper::new());
    let config = ModelEndpointConfig::new(stub.url(), "key", "gpt-image-1");
    let model = image_model_for(&config, &options(&sleeper))?;

    assert_eq!(model.provider(), "openai");
    let images = model.generate(ImageModelInput::new("slide")).await?;
    assert_eq!(images[0].b64_json.as_deref(), Some("Zm9v"));

    stub.stop().await
}

#[test]
fn hosted_image_endpoints_pick_their_native_format() {
    let sleeper = Arc::new(RecordingSleeper::new());

    let dashscope = ModelEndpointConfig::new(
        "https://dashscope.aliyuncs.com/api/v1/services/aigc/multimodal-generation/generation",
        "key",
        "qwen-image-plus",
    );
    let model = image_model_for(&dashscope, &options(&sleeper)).expect("valid config");
    assert_eq!(model.provider(), "dashscope");

    let modelscope =
        ModelEndpointConfig::new("https://api-inference.modelscope.cn", "key", "Qwen/Qwen-Image");
    let model = image_model_for(&modelscope, &options(&sleeper)).expect("valid config");
    assert_eq!(model.provider(), "modelscope");
}

#[tokio::test]
async fn call_text_model_returns_the_completion() -> Result<(), BoxedError> {
    let stub = StubServer::start().await?;
    stub.respond(
        "/chat/completions",
        StatusCode::OK,
        json!({ "choices": [{ "message": { "content": "split result" } }] }),
    );

    let config = ModelEndpointConfig::new(stub.url(), "key", "qwen-max");
    let text = call_text_model(
        &config,
        TextModelInput::new(vec![ChatMessage::user("split this")]).max_tokens(16384),
    )
    .await?;

    assert_eq!(text, "split result");
    let request = &stub.requests_to("/chat/completions")[0];
    assert_eq!(request.header("authorization"), Some("Bearer key"));
    assert_eq!(request.body["max_tokens"], 16384);

    stub.stop().await
}

#[tokio::test]
async fn call_image_model_returns_the_images() -> Result<(), BoxedError> {
    let stub = StubServer::start().await?;
    stub.respond(
        "/images/generations",
        StatusCode::OK,
        json!({ "data": [{ "url": "https://cdn.example.com/slide.png" }] }),
    );

    let config = ModelEndpointConfig::new(stub.url(), "key", "dall-e-3");
    let images = call_image_model(&config, ImageModelInput::new("slide").size("16:9")).await?;

    assert_eq!(
        images[0].url.as_deref(),
        Some("https://cdn.example.com/slide.png")
    );
    assert_eq!(stub.requests_to("/images/generations")[0].body["prompt"], "slide");

    stub.stop().await
}

#[tokio::test]
async fn call_functions_reject_incomplete_configs() {
    let config = ModelEndpointConfig::new("", "key", "gpt-4o");

    let text_error = call_text_model(&config, TextModelInput::new(vec![ChatMessage::user("hi")]))
        .await
        .expect_err("configuration error");
    assert!(matches!(text_error, GatewayError::Configuration(_)));

    let image_error = call_image_model(&config, ImageModelInput::new("slide"))
        .await
        .expect_err("configuration error");
    assert!(matches!(image_error, GatewayError::Configuration(_)));
}
