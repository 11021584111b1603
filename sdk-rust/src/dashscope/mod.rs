mod api;
mod model;

pub use model::{
    DashScopeImageModel, DashScopeImageModelOptions, DASHSCOPE_POLL_POLICY,
    DASHSCOPE_TASKS_URL,
};
