use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::filter::{Order, scalar_text};
use crate::{Filter, RemoteError, RemoteStore};

/// Process-local backend for tests and offline demos.
#[derive(Debug, Default)]
pub struct InMemoryRemoteStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    fail_next: Mutex<Option<RemoteError>>,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call (of any kind) fail with `err`.
    pub fn fail_next(&self, err: RemoteError) {
        if let Ok(mut slot) = self.fail_next.lock() {
            *slot = Some(err);
        }
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    fn take_failure(&self) -> Result<(), RemoteError> {
        match self.fail_next.lock().ok().and_then(|mut slot| slot.take()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn record_id(record: &Value) -> Option<String> {
    record.get("id").map(scalar_text)
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => scalar_text(x).cmp(&scalar_text(y)),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, RemoteError> {
        self.take_failure()?;
        let collections = self.collections.read().await;
        let mut rows: Vec<Value> = collections
            .get(collection)
            .map(|rows| rows.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default();

        if let Some((field, order)) = filter.ordering() {
            rows.sort_by(|a, b| {
                let ord = compare(a.get(field), b.get(field));
                match order {
                    Order::Asc => ord,
                    Order::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = filter.max_results() {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn create(&self, collection: &str, record: Value) -> Result<Value, RemoteError> {
        self.take_failure()?;
        let Value::Object(mut fields) = record else {
            return Err(RemoteError::InvalidRequest("record must be a JSON object".to_string()));
        };
        if !fields.contains_key("id") || fields["id"].is_null() {
            fields.insert("id".to_string(), Value::String(Uuid::now_v7().to_string()));
        }
        let record = Value::Object(fields);
        let id = record_id(&record);

        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection.to_string()).or_default();
        if rows.iter().any(|r| record_id(r) == id) {
            return Err(RemoteError::Api {
                status: 409,
                message: "duplicate key value violates unique constraint".to_string(),
            });
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<Value, RemoteError> {
        self.take_failure()?;
        let Value::Object(patch) = patch else {
            return Err(RemoteError::InvalidRequest("patch must be a JSON object".to_string()));
        };
        let mut collections = self.collections.write().await;
        let row = collections
            .get_mut(collection)
            .and_then(|rows| rows.iter_mut().find(|r| record_id(r).as_deref() == Some(id)))
            .ok_or(RemoteError::NotFound)?;

        let fields: &mut Map<String, Value> = row
            .as_object_mut()
            .ok_or_else(|| RemoteError::Decode("stored record is not an object".to_string()))?;
        for (key, value) in patch {
            if key != "id" {
                fields.insert(key, value);
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), RemoteError> {
        self.take_failure()?;
        let mut collections = self.collections.write().await;
        let rows = collections.get_mut(collection).ok_or(RemoteError::NotFound)?;
        let before = rows.len();
        rows.retain(|r| record_id(r).as_deref() != Some(id));
        if rows.len() == before {
            return Err(RemoteError::NotFound);
        }
        Ok(())
    }
}
