//! Object storage for uploaded images.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::RemoteError;

/// Where an uploaded object ended up: public URL plus storage path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub path: String,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<UploadedFile, RemoteError>;

    async fn remove(&self, path: &str) -> Result<(), RemoteError>;
}

/// Bucket-style storage API (`/object/{bucket}/{path}`).
#[derive(Debug, Clone)]
pub struct HttpFileStore {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: Option<String>,
}

impl HttpFileStore {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
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

    pub fn public_url(&self, path: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, path)
    }

    async fn send(&self, method: Method, path: &str, body: Option<(Vec<u8>, &str)>) -> Result<(), RemoteError> {
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, path);
        let mut req = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        if let Some((bytes, content_type)) = body {
            req = req.header("Content-Type", content_type).body(bytes);
        }

        let resp = req.send().await.map_err(|e| RemoteError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = crate::http::error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_default();
            tracing::warn!(status = status.as_u16(), path, %message, "storage request failed");
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<UploadedFile, RemoteError> {
        self.send(Method::POST, path, Some((bytes, content_type))).await?;
        tracing::debug!(bucket = %self.bucket, path, "uploaded object");
        Ok(UploadedFile {
            url: self.public_url(path),
            path: path.to_string(),
        })
    }

    async fn remove(&self, path: &str) -> Result<(), RemoteError> {
        self.send(Method::DELETE, path, None).await
    }
}

#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    objects: RwLock<HashMap<String, (String, Vec<u8>)>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.objects.read().await.contains_key(path)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<UploadedFile, RemoteError> {
        self.objects
            .write()
            .await
            .insert(path.to_string(), (content_type.to_string(), bytes));
        Ok(UploadedFile {
            url: format!("memory://{path}"),
            path: path.to_string(),
        })
    }

    async fn remove(&self, path: &str) -> Result<(), RemoteError> {
        match self.objects.write().await.remove(path) {
            Some(_) => Ok(()),
            None => Err(RemoteError::NotFound),
        }
    }
}
