//! Test doubles for code that depends on [`TextModel`](crate::TextModel),
//! [`ImageModel`](crate::ImageModel) or [`Sleeper`](crate::polling::Sleeper).

mod image_model;
mod sleeper;
mod text_model;

pub use image_model::{MockImageModel, MockImageResult};
pub use sleeper::RecordingSleeper;
pub use text_model::{MockTextModel, MockTextResult};
