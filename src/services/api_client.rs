use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        Url::parse(&config.api_base_url).map_err(|e| {
            Error::Config(format!("Invalid API_BASE_URL {}: {}", config.api_base_url, e))
        })?;

        let client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    pub fn url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| Error::BadRequest(format!("Invalid URL {}: {}", raw, e)))
    }

    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json");
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let text = Self::checked_text(response).await?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Transport(format!("Unexpected response body: {}", e)))
    }

    pub async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;
        Self::checked_text(response).await.map(|_| ())
    }

    async fn checked_text(response: Response) -> Result<String> {
        let status = response.status();
        let text = response.text().await?;
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(
                server_message(&text).unwrap_or_else(|| "Resource not found".to_string()),
            ));
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %text, "Backend request failed");
            return Err(Error::Transport(
                server_message(&text)
                    .unwrap_or_else(|| format!("HTTP error {}", status.as_u16())),
            ));
        }
        Ok(text)
    }
}

/// Extracts `error` or `message` from a JSON error body, or the raw text when short.
pub fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return ["error", "message"]
            .iter()
            .find_map(|key| match json.get(*key) {
                Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
                Some(serde_json::Value::Object(obj)) => obj
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string),
                _ => None,
            });
    }
    (trimmed.len() <= 300).then(|| trimmed.to_string())
}
