mod api;
mod chat_model;
mod images_model;

pub use chat_model::{OpenAIChatModel, OpenAIChatModelOptions};
pub use images_model::{OpenAIImagesModel, OpenAIImagesModelOptions};
