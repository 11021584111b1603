use slide_deck::{
    config::ServerConfig,
    http::{cors_layer, router, AppState},
    BoxedError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), BoxedError> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = AppState::new(&config);
    state.store().ensure_dir().await?;

    let app = router(state).layer(cors_layer(config.app_url.as_deref())?);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(
        address = %config.bind_address(),
        generated_dir = %config.generated_dir.display(),
        "slide deck server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
