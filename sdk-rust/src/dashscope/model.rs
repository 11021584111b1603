//! DashScope native image generation.
//!
//! A response carries an inline image, a results list, or a task id that is
//! polled on the tasks endpoint. A task that reports `SUCCEEDED` without a
//! `results` list ends the poll with a format error instead of being polled
//! again until the budget runs out.

use super::api::{
    ChoiceContent, GenerationInput, GenerationOutput, GenerationParameters, GenerationParams,
    GenerationResponse, InputContent, InputMessage, TaskResult,
};
use crate::{
    client_utils,
    polling::{self, PollPolicy, Sleeper, TaskState, TokioSleeper},
    GatewayError, GatewayResult, ImageModel, ImageModelInput, ImageResult,
};
use reqwest::Client;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

const PROVIDER: &str = "dashscope";

/// Task status endpoint of the public DashScope service. Used regardless of
/// the configured generation URL unless overridden in the options.
pub const DASHSCOPE_TASKS_URL: &str = "https://dashscope.aliyuncs.com/api/v1/tasks";

/// Every 3 seconds for up to 3 minutes.
pub const DASHSCOPE_POLL_POLICY: PollPolicy = PollPolicy::new(Duration::from_secs(3), 60);

/// Image generation over the DashScope native format. The configured base URL
/// is the full invocation endpoint.
pub struct DashScopeImageModel {
    model_id: String,
    api_key: String,
    endpoint: String,
    tasks_url: String,
    poll_policy: PollPolicy,
    sleeper: Arc<dyn Sleeper>,
    client: Client,
}

#[derive(Clone, Default)]
pub struct DashScopeImageModelOptions {
    pub base_url: String,
    pub api_key: String,
    pub tasks_url: Option<String>,
    pub poll_policy: Option<PollPolicy>,
    pub sleeper: Option<Arc<dyn Sleeper>>,
    pub client: Option<Client>,
}

impl DashScopeImageModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: DashScopeImageModelOptions) -> Self {
        let DashScopeImageModelOptions {
            base_url,
            api_key,
            tasks_url,
            poll_policy,
            sleeper,
            client,
        } = options;

        Self {
            model_id: model_id.into(),
            api_key,
            endpoint: client_utils::trim_base_url(&base_url),
            tasks_url: client_utils::trim_base_url(
                &tasks_url.unwrap_or_else(|| DASHSCOPE_TASKS_URL.to_string()),
            ),
            poll_policy: poll_policy.unwrap_or(DASHSCOPE_POLL_POLICY),
            sleeper: sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            client: client.unwrap_or_else(Client::new),
        }
    }

    async fn poll(&self, task_id: &str) -> GatewayResult<Vec<ImageResult>> {
        let task_url = format!("{}/{task_id}", self.tasks_url);
        let headers = client_utils::bearer_headers(&self.api_key, PROVIDER)?;

        polling::poll_task(
            PROVIDER,
            task_id,
            self.poll_policy,
            self.sleeper.as_ref(),
            || {
                let task_url = &task_url;
                let headers = headers.clone();
                async move {
                    let response: GenerationResponse =
                        match client_utils::get_json(&self.client, task_url, headers, PROVIDER)
                            .await
                        {
                            Ok(response) => response,
                            Err(GatewayError::StatusCode { status, .. }) => {
                                warn!(%status, task_url = %task_url, "dashscope poll failed, retrying");
                                return Ok(TaskState::Pending(None));
                            }
                            Err(error) => return Err(error),
                        };

                    map_task_state(response.output.unwrap_or_default())
                }
            },
        )
        .await
    }
}

#[async_trait::async_trait]
impl ImageModel for DashScopeImageModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: ImageModelInput) -> GatewayResult<Vec<ImageResult>> {
        crate::opentelemetry::trace_image(self.provider(), &self.model_id, input, |input| async move {
            info!(url = %self.endpoint, model = %self.model_id, "dashscope image request");

            let params = convert_to_dashscope_params(input, &self.model_id);
            let headers = client_utils::bearer_headers(&self.api_key, PROVIDER)?;

            let raw: Value =
                client_utils::send_json(&self.client, &self.endpoint, &params, headers, PROVIDER)
                    .await?;
            let response: GenerationResponse =
                serde_json::from_value(raw.clone()).map_err(|error| {
                    GatewayError::Format(PROVIDER, format!("{error}; response: {}", dump(&raw)))
                })?;

            match classify_response(response.output.unwrap_or_default()) {
                Some(ResponseShape::Images(images)) => Ok(images),
                Some(ResponseShape::Task(task_id)) => {
                    info!(task_id = %task_id, "dashscope async task started");
                    self.poll(&task_id).await
                }
                None => {
                    warn!(response = %dump(&raw), "unknown dashscope response");
                    Err(GatewayError::Format(PROVIDER, dump(&raw)))
                }
            }
        })
        .await
    }
}

fn convert_to_dashscope_params(input: ImageModelInput, model_id: &str) -> GenerationParams {
    GenerationParams {
        model: model_id.to_string(),
        input: GenerationInput {
            messages: vec![InputMessage {
                role: "user".to_string(),
                content: vec![InputContent { text: input.prompt }],
            }],
        },
        parameters: GenerationParameters {
            size: input.size.replacen('x', "*", 1),
        },
    }
}

enum ResponseShape {
    Images(Vec<ImageResult>),
    Task(String),
}

/// Resolve the response shape: an inline image in the first choice, then a
/// results list, then an asynchronous task id.
fn classify_response(output: GenerationOutput) -> Option<ResponseShape> {
    let inline_image = output
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .and_then(|content| match content {
            ChoiceContent::Items(items) => items.into_iter().find_map(|item| item.image),
            ChoiceContent::Text(_) => None,
        });

    if let Some(url) = inline_image {
        return Some(ResponseShape::Images(vec![ImageResult::from_url(url)]));
    }

    if let Some(results) = output.results {
        return Some(ResponseShape::Images(map_results(results)));
    }

    output.task_id.map(ResponseShape::Task)
}

fn map_task_state(output: GenerationOutput) -> GatewayResult<TaskState<Vec<ImageResult>>> {
    match output.task_status.as_deref() {
        Some("SUCCEEDED") => match output.results {
            Some(results) => Ok(TaskState::Succeeded(map_results(results))),
            None => Err(GatewayError::Format(
                PROVIDER,
                "task succeeded without results".to_string(),
            )),
        },
        Some("FAILED") => Ok(TaskState::Failed(
            output.message.unwrap_or_else(|| "unknown reason".to_string()),
        )),
        status => Ok(TaskState::Pending(status.map(str::to_string))),
    }
}

fn map_results(results: Vec<TaskResult>) -> Vec<ImageResult> {
    results
        .into_iter()
        .map(|result| ImageResult {
            url: result.url.filter(|url| !url.is_empty()),
            b64_json: result.b64_image.filter(|data| !data.is_empty()),
        })
        .collect()
}

fn dump(raw: &Value) -> String {
    client_utils::excerpt(&raw.to_string(), client_utils::RESPONSE_EXCERPT_CHARS)
}
