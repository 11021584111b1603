use crate::{DeckError, DeckResult};
use slide_sdk::ModelEndpointConfig;
use std::{env, path::PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_GENERATED_DIR: &str = "generated";
pub const DEFAULT_TEXT_MODEL: &str = "claude-sonnet-4-20250514";

/// Server settings read from the environment.
///
/// The default model endpoints are only offered to the UI to prefill its
/// forms. Generation always uses the configs sent with each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub generated_dir: PathBuf,
    /// Allowed CORS origin. Any origin is allowed when unset.
    pub app_url: Option<String>,
    pub text_model: ModelEndpointConfig,
    pub image_model: ModelEndpointConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            generated_dir: PathBuf::from(DEFAULT_GENERATED_DIR),
            app_url: None,
            text_model: ModelEndpointConfig {
                model: DEFAULT_TEXT_MODEL.to_string(),
                ..Default::default()
            },
            image_model: ModelEndpointConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load an optional `.env` file, then read the process environment.
    pub fn from_env() -> DeckResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build the config from a variable lookup. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> DeckResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let first_of = |names: &[&str]| names.iter().find_map(|name| var(*name));

        let port = match var("PORT") {
            Some(port) => port.trim().parse::<u16>().map_err(|error| {
                DeckError::Configuration(format!("PORT must be a port number: {error}"))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            generated_dir: var("GENERATED_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_GENERATED_DIR), PathBuf::from),
            app_url: var("APP_URL"),
            text_model: ModelEndpointConfig {
                base_url: first_of(&["TEXT_MODEL_BASE_URL", "ANTHROPIC_BASE_URL"])
                    .unwrap_or_default(),
                api_key: first_of(&["TEXT_MODEL_API_KEY", "ANTHROPIC_AUTH_TOKEN"])
                    .unwrap_or_default(),
                model: var("TEXT_MODEL_NAME").unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            },
            image_model: ModelEndpointConfig {
                base_url: var("IMAGE_MODEL_BASE_URL").unwrap_or_default(),
                api_key: var("IMAGE_MODEL_API_KEY").unwrap_or_default(),
                model: var("IMAGE_MODEL_NAME").unwrap_or_default(),
            },
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
