use super::api::{ImageGenerateParams, ImagesResponse};
use crate::{client_utils, GatewayResult, ImageModel, ImageModelInput, ImageResult};
use reqwest::Client;
use tracing::info;

const PROVIDER: &str = "openai";

/// Image generation over the `OpenAI` images API, also spoken by most
/// compatible gateways.
pub struct OpenAIImagesModel {
    model_id: String,
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Clone, Default)]
pub struct OpenAIImagesModelOptions {
    pub base_url: Option<String>,
    pub api_key: String,
    pub client: Option<Client>,
}

impl OpenAIImagesModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: OpenAIImagesModelOptions) -> Self {
        let OpenAIImagesModelOptions {
            base_url,
            api_key,
            client,
        } = options;

        Self {
            model_id: model_id.into(),
            api_key,
            base_url: client_utils::trim_base_url(
                &base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            ),
            client: client.unwrap_or_else(Client::new),
        }
    }
}

#[async_trait::async_trait]
impl ImageModel for OpenAIImagesModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: ImageModelInput) -> GatewayResult<Vec<ImageResult>> {
        crate::opentelemetry::trace_image(self.provider(), &self.model_id, input, |input| async move {
            let url = format!("{}/images/generations", self.base_url);
            info!(url = %url, model = %self.model_id, "openai image request");

            let params = ImageGenerateParams {
                model: self.model_id.clone(),
                prompt: input.prompt,
                size: input.size,
                n: input.n,
                response_format: "b64_json".to_string(),
            };
            let headers = client_utils::bearer_headers(&self.api_key, PROVIDER)?;

            let response: ImagesResponse =
                client_utils::send_json(&self.client, &url, &params, headers, PROVIDER).await?;

            Ok(response.data)
        })
        .await
    }
}
