use crate::{GatewayError, GatewayResult};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client, Response,
};
use serde::{de::DeserializeOwned, Serialize};

/// Maximum number of characters of a raw response kept in error messages.
pub const RESPONSE_EXCERPT_CHARS: usize = 500;

/// Create a JSON POST request, parse the response.
/// Fails on non-success status codes with the body and URL embedded.
pub async fn send_json<T: Serialize, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    data: &T,
    headers: HeaderMap,
    provider: &'static str,
) -> GatewayResult<R> {
    let response = client
        .post(url)
        .headers(headers)
        .json(data)
        .send()
        .await
        .map_err(|source| GatewayError::Transport {
            url: url.to_string(),
            source,
        })?;

    read_json(response, url, provider).await
}

/// Create a GET request, parse the JSON response.
pub async fn get_json<R: DeserializeOwned>(
    client: &Client,
    url: &str,
    headers: HeaderMap,
    provider: &'static str,
) -> GatewayResult<R> {
    let response = client
        .get(url)
        .headers(headers)
        .send()
        .await
        .map_err(|source| GatewayError::Transport {
            url: url.to_string(),
            source,
        })?;

    read_json(response, url, provider).await
}

async fn read_json<R: DeserializeOwned>(
    response: Response,
    url: &str,
    provider: &'static str,
) -> GatewayResult<R> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| GatewayError::Transport {
            url: url.to_string(),
            source,
        })?;

    if !status.is_success() {
        return Err(GatewayError::StatusCode {
            provider,
            status,
            body,
            url: url.to_string(),
        });
    }

    serde_json::from_str(&body).map_err(|error| {
        GatewayError::Format(
            provider,
            format!(
                "{error}; response: {}",
                excerpt(&body, RESPONSE_EXCERPT_CHARS)
            ),
        )
    })
}

/// Headers for providers that authenticate with `Authorization: Bearer`.
pub fn bearer_headers(api_key: &str, provider: &'static str) -> GatewayResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth_header =
        HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|error| {
            GatewayError::InvalidInput(format!("Invalid {provider} API key header value: {error}"))
        })?;
    auth_header.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, auth_header);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Ok(headers)
}

/// Insert a static header value, used for provider specific flags.
pub fn insert_header(headers: &mut HeaderMap, name: &'static str, value: &'static str) {
    headers.insert(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    );
}

#[must_use]
pub fn trim_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// The first `max_chars` characters of `text`, cut on a char boundary.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}
