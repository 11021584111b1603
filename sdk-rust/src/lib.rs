pub mod anthropic;
pub mod client_utils;
pub mod dashscope;
mod errors;
pub mod gateway;
mod image_model;
pub mod modelscope;
pub mod openai;
pub mod opentelemetry;
pub mod polling;
pub mod provider;
pub mod retry;
pub mod slide_sdk_test;
mod text_model;
mod types;

pub use errors::*;
pub use gateway::{call_image_model, call_text_model, image_model_for, text_model_for};
pub use image_model::ImageModel;
pub use provider::{ImageProvider, TextProvider};
pub use text_model::TextModel;
pub use types::*;
