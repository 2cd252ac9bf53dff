//! Typed CRUD over a remote collection with a locally cached list.

use std::sync::Arc;

use serde_json::Value;
use tillpoint_core::Entity;
use tillpoint_inventory::{Consignment, Ingredient};

use crate::{Filter, Record, RemoteError, RemoteStore};

/// Cached view of one remote collection.
///
/// The cache only changes after the backend accepted the call; a failed
/// create/update/delete leaves it exactly as it was.
pub struct Repository<R: Record> {
    store: Arc<dyn RemoteStore>,
    cache: Vec<R>,
}

impl<R: Record> Repository<R> {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store, cache: Vec::new() }
    }

    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    /// Reloads the cache from the backend.
    pub async fn refresh(&mut self, filter: &Filter) -> Result<&[R], RemoteError> {
        let rows = self.store.list(R::COLLECTION, filter).await?;
        let records = rows.into_iter().map(decode).collect::<Result<Vec<R>, _>>()?;
        tracing::debug!(collection = R::COLLECTION, count = records.len(), "cache refreshed");
        self.cache = records;
        Ok(&self.cache)
    }

    pub fn cached(&self) -> &[R] {
        &self.cache
    }

    pub fn find_cached(&self, id: &R::Id) -> Option<&R> {
        self.cache.iter().find(|r| r.id() == id)
    }

    /// Loads one record by id and refreshes its cached copy.
    pub async fn fetch(&mut self, id: &R::Id) -> Result<R, RemoteError> {
        let filter = Filter::all().eq("id", id).limit(1);
        let row = self
            .store
            .list(R::COLLECTION, &filter)
            .await?
            .into_iter()
            .next()
            .ok_or(RemoteError::NotFound)?;
        let record: R = decode(row)?;
        self.upsert_cached(record.clone());
        Ok(record)
    }

    pub async fn create(&mut self, record: R) -> Result<R, RemoteError> {
        let created: R = decode(self.store.create(R::COLLECTION, encode(&record)?).await?)?;
        tracing::info!(collection = R::COLLECTION, id = %created.id(), "record created");
        self.cache.push(created.clone());
        Ok(created)
    }

    /// Writes the full record back and replaces the cached copy.
    pub async fn update(&mut self, record: &R) -> Result<R, RemoteError> {
        let id = record.id().to_string();
        let updated: R = decode(self.store.update(R::COLLECTION, &id, encode(record)?).await?)?;
        self.upsert_cached(updated.clone());
        tracing::info!(collection = R::COLLECTION, %id, "record updated");
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &R::Id) -> Result<(), RemoteError> {
        self.store.delete(R::COLLECTION, &id.to_string()).await?;
        self.cache.retain(|r| r.id() != id);
        tracing::info!(collection = R::COLLECTION, %id, "record deleted");
        Ok(())
    }

    fn upsert_cached(&mut self, record: R) {
        match self.cache.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => *slot = record,
            None => self.cache.push(record),
        }
    }
}

fn encode<R: Record>(record: &R) -> Result<Value, RemoteError> {
    serde_json::to_value(record).map_err(|e| RemoteError::InvalidRequest(e.to_string()))
}

fn decode<R: Record>(value: Value) -> Result<R, RemoteError> {
    Ok(serde_json::from_value(value)?)
}

impl Repository<Ingredient> {
    pub fn low_stock(&self) -> Vec<&Ingredient> {
        self.cache.iter().filter(|i| i.is_low_stock()).collect()
    }

    /// Adds each consignment line to the matching ingredient's quantity.
    ///
    /// Ingredients are written one at a time; on failure the ones already
    /// written stay updated and the error names the backend message.
    pub async fn receive_consignment(&mut self, consignment: &Consignment) -> Result<Vec<Ingredient>, RemoteError> {
        let mut updated = Vec::with_capacity(consignment.lines.len());
        for line in &consignment.lines {
            let mut ingredient = self
                .find_cached(&line.ingredient_id)
                .cloned()
                .ok_or(RemoteError::NotFound)?;
            ingredient.receive(line.quantity);
            updated.push(self.update(&ingredient).await?);
        }
        Ok(updated)
    }
}
