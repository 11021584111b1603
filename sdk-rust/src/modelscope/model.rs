use super::api::{
    ImageGenerationParameters, ImageGenerationParams, ImageGenerationResponse, TaskStatusResponse,
};
use crate::{
    client_utils,
    polling::{self, PollPolicy, Sleeper, TaskState, TokioSleeper},
    GatewayError, GatewayResult, ImageModel, ImageModelInput, ImageResult,
};
use reqwest::{header::HeaderMap, Client};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

const PROVIDER: &str = "modelscope";

/// Every 3 seconds for up to 2 minutes.
pub const MODELSCOPE_POLL_POLICY: PollPolicy = PollPolicy::new(Duration::from_secs(3), 40);

const DEFAULT_RESOLUTION: &str = "1664*928";

/// Map a requested size onto a resolution the service accepts.
///
/// Known aspect ratios map to fixed resolutions, explicit `WIDTH*HEIGHT`
/// values pass through and anything else falls back to the 16:9 resolution.
#[must_use]
pub fn modelscope_size(size: &str) -> String {
    let resolution = match size {
        "16:9" => "1664*928",
        "4:3" => "1472*1104",
        "1:1" => "1328*1328",
        "3:4" => "1104*1472",
        "9:16" => "928*1664",
        other if other.contains('*') => other,
        _ => DEFAULT_RESOLUTION,
    };
    resolution.to_string()
}

/// Image generation over ModelScope asynchronous inference tasks.
pub struct ModelScopeImageModel {
    model_id: String,
    api_key: String,
    base_url: String,
    poll_policy: PollPolicy,
    sleeper: Arc<dyn Sleeper>,
    client: Client,
}

#[derive(Clone, Default)]
pub struct ModelScopeImageModelOptions {
    pub base_url: Option<String>,
    pub api_key: String,
    pub poll_policy: Option<PollPolicy>,
    pub sleeper: Option<Arc<dyn Sleeper>>,
    pub client: Option<Client>,
}

impl ModelScopeImageModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: ModelScopeImageModelOptions) -> Self {
        let ModelScopeImageModelOptions {
            base_url,
            api_key,
            poll_policy,
            sleeper,
            client,
        } = options;

        Self {
            model_id: model_id.into(),
            api_key,
            base_url: client_utils::trim_base_url(
                &base_url.unwrap_or_else(|| "https://api-inference.modelscope.cn".to_string()),
            ),
            poll_policy: poll_policy.unwrap_or(MODELSCOPE_POLL_POLICY),
            sleeper: sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            client: client.unwrap_or_else(Client::new),
        }
    }

    fn task_headers(&self) -> GatewayResult<HeaderMap> {
        let mut headers = client_utils::bearer_headers(&self.api_key, PROVIDER)?;
        client_utils::insert_header(&mut headers, "x-modelscope-task-type", "image_generation");
        Ok(headers)
    }

    async fn poll(&self, task_id: &str) -> GatewayResult<Vec<ImageResult>> {
        let task_url = format!("{}/v1/tasks/{task_id}", self.base_url);
        let headers = self.task_headers()?;

        polling::poll_task(
            PROVIDER,
            task_id,
            self.poll_policy,
            self.sleeper.as_ref(),
            || {
                let task_url = &task_url;
                let headers = headers.clone();
                async move {
                    let response: TaskStatusResponse =
                        match client_utils::get_json(&self.client, task_url, headers, PROVIDER)
                            .await
                        {
                            Ok(response) => response,
                            Err(GatewayError::StatusCode { status, .. }) => {
                                warn!(%status, task_url = %task_url, "modelscope poll failed, retrying");
                                return Ok(TaskState::Pending(None));
                            }
                            Err(error) => return Err(error),
                        };

                    map_task_state(response)
                }
            },
        )
        .await
    }
}

#[async_trait::async_trait]
impl ImageModel for ModelScopeImageModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: ImageModelInput) -> GatewayResult<Vec<ImageResult>> {
        crate::opentelemetry::trace_image(self.provider(), &self.model_id, input, |input| async move {
            let url = format!("{}/v1/images/generations", self.base_url);
            info!(url = %url, model = %self.model_id, "modelscope image request");

            let params = ImageGenerationParams {
                model: self.model_id.clone(),
                prompt: input.prompt,
                parameters: ImageGenerationParameters {
                    size: modelscope_size(&input.size),
                },
            };
            let mut headers = client_utils::bearer_headers(&self.api_key, PROVIDER)?;
            client_utils::insert_header(&mut headers, "x-modelscope-async-mode", "true");

            let raw: Value =
                client_utils::send_json(&self.client, &url, &params, headers, PROVIDER).await?;
            let task_id = serde_json::from_value::<ImageGenerationResponse>(raw.clone())
                .ok()
                .and_then(|response| response.task_id)
                .ok_or_else(|| {
                    GatewayError::Format(
                        PROVIDER,
                        format!(
                            "response has no task_id: {}",
                            client_utils::excerpt(
                                &raw.to_string(),
                                client_utils::RESPONSE_EXCERPT_CHARS
                            )
                        ),
                    )
                })?;

            info!(task_id = %task_id, "modelscope async task started");
            self.poll(&task_id).await
        })
        .await
    }
}

fn map_task_state(response: TaskStatusResponse) -> GatewayResult<TaskState<Vec<ImageResult>>> {
    match response.task_status.as_deref() {
        Some("SUCCEED") => response
            .output_images
            .and_then(|images| images.into_iter().next())
            .map(|url| TaskState::Succeeded(vec![ImageResult::from_url(url)]))
            .ok_or_else(|| {
                GatewayError::Format(PROVIDER, "task succeeded without output images".to_string())
            }),
        Some("FAILED") => Ok(TaskState::Failed(
            response
                .message
                .unwrap_or_else(|| "unknown reason".to_string()),
        )),
        status => Ok(TaskState::Pending(status.map(str::to_string))),
    }
}
