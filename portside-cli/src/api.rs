///! API client for the Portside server

use portside_common::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the authentication token
    pub async fn set_token(&self, token: String) {
        let mut t = self.token.write().await;
        *t = Some(token);
    }

    async fn get_token(&self) -> Option<String> {
        let t = self.token.read().await;
        t.clone()
    }

    /// Build request with authentication header
    async fn build_request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, &url);

        if let Some(token) = self.get_token().await {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| Error::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        Ok(response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!(method = "GET", path, "API request");
        let request = self.build_request(reqwest::Method::GET, path).await;
        let response = self.send(request).await?;
        response.json().await.map_err(|e| Error::Http(e.to_string()))
    }

    pub async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        tracing::debug!(method = "POST", path, "API request");
        let request = self.build_request(reqwest::Method::POST, path).await.json(body);
        self.send(request).await?;
        Ok(())
    }

    pub async fn put_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        tracing::debug!(method = "PUT", path, "API request");
        let request = self.build_request(reqwest::Method::PUT, path).await.json(body);
        self.send(request).await?;
        Ok(())
    }

    pub async fn patch_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        tracing::debug!(method = "PATCH", path, "API request");
        let request = self.build_request(reqwest::Method::PATCH, path).await.json(body);
        self.send(request).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!(method = "DELETE", path, "API request");
        let request = self.build_request(reqwest::Method::DELETE, path).await;
        self.send(request).await?;
        Ok(())
    }
}

/// Map a non-success response onto `Error::Api`, keeping the backend's
/// `error` field as the detail when the body is JSON
fn api_error(status: reqwest::StatusCode, body: &str) -> Error {
    let details = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .or_else(|| value.get("details"))
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
        });

    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    };

    Error::Api {
        status: status.as_u16(),
        message,
        details,
    }
}
