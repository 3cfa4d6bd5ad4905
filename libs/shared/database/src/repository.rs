use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::store::{Collection, DocumentStore, Query};

/// An entity persisted as one document in `COLLECTION`.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

/// Typed access to one collection of the shared store.
pub struct Repository<T: Record> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

fn decode<T: Record>(doc: Value) -> Result<T> {
    serde_json::from_value(doc)
        .map_err(|e| anyhow!("Malformed document in {}: {}", T::COLLECTION, e))
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn insert(&self, entity: &T) -> Result<T> {
        let doc = serde_json::to_value(entity)?;
        decode(self.store.insert(T::COLLECTION, doc).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Option<T>> {
        self.store
            .find_by_id(T::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn find(&self, query: &Query) -> Result<Vec<T>> {
        self.store
            .find(T::COLLECTION, query)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn find_one(&self, query: &Query) -> Result<Option<T>> {
        let query = query.clone().limit(1);
        Ok(self.find(&query).await?.into_iter().next())
    }

    /// Loads every entity whose id is in `ids`, keyed by id. Unknown ids are
    /// simply absent from the map.
    pub async fn get_many<'a, I>(&self, ids: I) -> Result<HashMap<String, T>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut wanted: Vec<&str> = ids.into_iter().collect();
        wanted.sort_unstable();
        wanted.dedup();
        if wanted.is_empty() {
            return Ok(HashMap::new());
        }

        let found = self.find(&Query::new().any_of("id", wanted)).await?;
        Ok(found
            .into_iter()
            .map(|entity| (entity.id().to_string(), entity))
            .collect())
    }

    pub async fn update(&self, id: &str, patch: Map<String, Value>) -> Result<Option<T>> {
        self.store
            .update_by_id(T::COLLECTION, id, patch)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn update_many(&self, query: &Query, patch: Map<String, Value>) -> Result<u64> {
        self.store.update_many(T::COLLECTION, query, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<T>> {
        self.store
            .delete_by_id(T::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }
}
