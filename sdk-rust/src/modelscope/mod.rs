mod api;
mod model;

pub use model::{
    modelscope_size, ModelScopeImageModel, ModelScopeImageModelOptions, MODELSCOPE_POLL_POLICY,
};
