use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::store::{Collection, Direction, DocumentStore, Query};

/// Process-local store. Documents are kept per collection in insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn document_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

fn merge(doc: &mut Value, patch: &Map<String, Value>) {
    if let Value::Object(fields) = doc {
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
    }
}

/// Orders JSON scalars. RFC 3339 strings are compared as instants so that
/// timestamps with different fractional precision still sort chronologically.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, collection: Collection, mut doc: Value) -> Result<Value> {
        let fields = doc
            .as_object_mut()
            .ok_or_else(|| anyhow!("Documents in {} must be JSON objects", collection))?;

        if !fields.get("id").map(Value::is_string).unwrap_or(false) {
            fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if let Some(id) = document_id(&doc) {
            if docs.iter().any(|existing| document_id(existing) == Some(id)) {
                return Err(anyhow!("Duplicate id {} in {}", id, collection));
            }
        }

        docs.push(doc.clone());
        debug!("Inserted document into {} ({} total)", collection, docs.len());
        Ok(doc)
    }

    async fn find(&self, collection: Collection, query: &Query) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        let docs = match collections.get(&collection) {
            Some(docs) => docs,
            None => return Ok(Vec::new()),
        };

        let mut matched: Vec<Value> = match query.order.as_ref().map(|order| order.direction) {
            // Reverse insertion order first, so ties keep newest-first.
            Some(Direction::Desc) => docs.iter().rev().filter(|doc| query.matches(doc)).cloned().collect(),
            _ => docs.iter().filter(|doc| query.matches(doc)).cloned().collect(),
        };

        if let Some(order) = &query.order {
            matched.sort_by(|a, b| {
                let a = a.get(&order.field).unwrap_or(&Value::Null);
                let b = b.get(&order.field).unwrap_or(&Value::Null);
                match order.direction {
                    Direction::Asc => compare_values(a, b),
                    Direction::Desc => compare_values(b, a),
                }
            });
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        Ok(matched)
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| document_id(doc) == Some(id)))
            .cloned())
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<Value>> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| document_id(doc) == Some(id)));

        Ok(doc.map(|doc| {
            merge(doc, &patch);
            doc.clone()
        }))
    }

    async fn update_many(
        &self,
        collection: Collection,
        query: &Query,
        patch: Map<String, Value>,
    ) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let mut touched = 0;
        if let Some(docs) = collections.get_mut(&collection) {
            for doc in docs.iter_mut().filter(|doc| query.matches(doc)) {
                merge(doc, &patch);
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn delete_by_id(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let mut collections = self.collections.write().await;
        let docs = match collections.get_mut(&collection) {
            Some(docs) => docs,
            None => return Ok(None),
        };

        Ok(docs
            .iter()
            .position(|doc| document_id(doc) == Some(id))
            .map(|index| docs.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_an_id_when_missing() {
        let store = InMemoryStore::new();
        let doc = store.insert(Collection::Users, json!({"name": "Asha"})).await.unwrap();

        let id = doc["id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(store.find_by_id(Collection::Users, id).await.unwrap(), Some(doc.clone()));
    }

    #[tokio::test]
    async fn insert_rejects_non_objects() {
        let store = InMemoryStore::new();
        assert!(store.insert(Collection::Users, json!(["not", "an", "object"])).await.is_err());
    }

    #[tokio::test]
    async fn descending_order_keeps_newest_first_on_ties() {
        let store = InMemoryStore::new();
        for name in ["a", "b", "c"] {
            store
                .insert(Collection::Notifications, json!({"name": name, "createdAt": "2025-01-01T00:00:00Z"}))
                .await
                .unwrap();
        }

        let docs = store
            .find(Collection::Notifications, &Query::new().newest_first())
            .await
            .unwrap();
        let names: Vec<_> = docs.iter().map(|doc| doc["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn timestamps_sort_chronologically_across_precisions() {
        let store = InMemoryStore::new();
        store
            .insert(Collection::Vitals, json!({"name": "later", "createdAt": "2025-01-01T00:00:01Z"}))
            .await
            .unwrap();
        store
            .insert(Collection::Vitals, json!({"name": "earlier", "createdAt": "2025-01-01T00:00:00.900Z"}))
            .await
            .unwrap();

        let docs = store
            .find(Collection::Vitals, &Query::new().order_by("createdAt", Direction::Asc))
            .await
            .unwrap();
        assert_eq!(docs[0]["name"], "earlier");
        assert_eq!(docs[1]["name"], "later");
    }

    #[tokio::test]
    async fn filters_limit_and_update_many() {
        let store = InMemoryStore::new();
        for (user, unread) in [("u1", true), ("u1", true), ("u2", true)] {
            store
                .insert(Collection::Notifications, json!({"userId": user, "unread": unread}))
                .await
                .unwrap();
        }

        let query = Query::new().eq("userId", "u1");
        let mut patch = Map::new();
        patch.insert("unread".to_string(), json!(false));
        assert_eq!(store.update_many(Collection::Notifications, &query, patch).await.unwrap(), 2);

        let still_unread = store
            .find(Collection::Notifications, &Query::new().eq("unread", true))
            .await
            .unwrap();
        assert_eq!(still_unread.len(), 1);
        assert_eq!(still_unread[0]["userId"], "u2");

        let limited = store
            .find(Collection::Notifications, &Query::new().any_of("userId", ["u1", "u2"]).limit(2))
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn delete_returns_the_removed_document() {
        let store = InMemoryStore::new();
        let doc = store.insert(Collection::Documents, json!({"name": "X-Ray"})).await.unwrap();
        let id = doc["id"].as_str().unwrap().to_string();

        assert_eq!(store.delete_by_id(Collection::Documents, &id).await.unwrap(), Some(doc));
        assert_eq!(store.delete_by_id(Collection::Documents, &id).await.unwrap(), None);
        assert_eq!(store.count(Collection::Documents).await, 0);
    }
}
