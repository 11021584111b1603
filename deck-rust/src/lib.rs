pub mod artifact_store;
pub mod config;
pub mod download;
mod errors;
pub mod generator;
pub mod http;
pub mod models;
pub mod opentelemetry;
pub mod prompts;
pub mod repair;
pub mod sessions;
pub mod splitter;
pub mod templates;
mod types;

pub use artifact_store::ArtifactStore;
pub use errors::{BoxedError, DeckError, DeckResult, DownloadError};
pub use generator::{generate_page_image, PageImageGenerator, PageRequest};
pub use splitter::{split_content, ContentSplitter};
pub use types::*;
