use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{Filter, RemoteError};

/// CRUD access to the hosted backend, one collection per entity kind.
///
/// Records travel as JSON objects carrying a string `id`.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, RemoteError>;

    async fn create(&self, collection: &str, record: Value) -> Result<Value, RemoteError>;

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<Value, RemoteError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), RemoteError>;
}

#[async_trait]
impl<S: RemoteStore + ?Sized> RemoteStore for Arc<S> {
    async fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, RemoteError> {
        (**self).list(collection, filter).await
    }

    async fn create(&self, collection: &str, record: Value) -> Result<Value, RemoteError> {
        (**self).create(collection, record).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<Value, RemoteError> {
        (**self).update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), RemoteError> {
        (**self).delete(collection, id).await
    }
}
