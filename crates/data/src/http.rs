//! REST client for the hosted backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

use crate::{Filter, RemoteError, RemoteStore};

/// `RemoteStore` over a PostgREST-style HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, RemoteError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::InvalidRequest(e.to_string()))?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, collection: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, collection);
        let mut req = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key).header("apikey", key);
        }
        req
    }

    async fn send(req: RequestBuilder) -> Result<Response, RemoteError> {
        let resp = req
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %message, "backend request failed");
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json_rows(resp: Response) -> Result<Vec<Value>, RemoteError> {
        let body: Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        match body {
            Value::Array(rows) => Ok(rows),
            Value::Object(_) => Ok(vec![body]),
            other => Err(RemoteError::Decode(format!("expected rows, got {other}"))),
        }
    }
}

/// Pulls a readable message out of an error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        for key in ["message", "error_description", "error", "msg"] {
            if let Some(Value::String(msg)) = json.get(key) {
                return Some(msg.clone());
            }
        }
    }
    Some(trimmed.to_string())
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, RemoteError> {
        let mut query = vec![("select".to_string(), "*".to_string())];
        query.extend(filter.to_query());
        let resp = Self::send(self.request(Method::GET, collection).query(&query)).await?;
        let rows = Self::json_rows(resp).await?;
        tracing::debug!(collection, count = rows.len(), "listed records");
        Ok(rows)
    }

    async fn create(&self, collection: &str, record: Value) -> Result<Value, RemoteError> {
        let req = self
            .request(Method::POST, collection)
            .header("Prefer", "return=representation")
            .json(&record);
        let rows = Self::json_rows(Self::send(req).await?).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::Decode("backend returned no created row".to_string()))
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<Value, RemoteError> {
        let req = self
            .request(Method::PATCH, collection)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&patch);
        let rows = Self::json_rows(Self::send(req).await?).await?;
        rows.into_iter().next().ok_or(RemoteError::NotFound)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), RemoteError> {
        let req = self
            .request(Method::DELETE, collection)
            .query(&[("id", format!("eq.{id}"))]);
        Self::send(req).await?;
        tracing::debug!(collection, id, "deleted record");
        Ok(())
    }
}
