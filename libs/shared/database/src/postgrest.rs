use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Method,
};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;

use crate::store::{Collection, Condition, Direction, DocumentStore, Query};
use crate::supabase::SupabaseClient;

/// `DocumentStore` over Supabase's PostgREST interface. One table per
/// collection, one column per top-level document field.
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    fn representation_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }
}

fn filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Double-quotes a list item, backslash-escaping `"` and `\`.
fn quoted(item: &str) -> String {
    let mut out = String::with_capacity(item.len() + 2);
    out.push('"');
    for c in item.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Builds the PostgREST query string for `query`, e.g.
/// `?doctorId=eq.42&status=in.("today","upcoming")&order=createdAt.desc`.
pub fn query_string(query: &Query) -> String {
    let mut parts = Vec::new();

    for condition in &query.conditions {
        match condition {
            Condition::Eq(field, Value::Null) => parts.push(format!("{}=is.null", field)),
            Condition::Eq(field, value) => parts.push(format!(
                "{}=eq.{}",
                field,
                urlencoding::encode(&filter_value(value))
            )),
            Condition::In(field, values) => {
                let list = values
                    .iter()
                    .map(|value| quoted(&filter_value(value)))
                    .collect::<Vec<_>>()
                    .join(",");
                parts.push(format!("{}=in.({})", field, urlencoding::encode(&list)));
            }
        }
    }

    if let Some(order) = &query.order {
        let direction = match order.direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };
        parts.push(format!("order={}.{}", order.field, direction));
    }

    if let Some(limit) = query.limit {
        parts.push(format!("limit={}", limit));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}

fn by_id(id: &str) -> Query {
    Query::new().eq("id", id)
}

#[async_trait]
impl DocumentStore for SupabaseStore {
    async fn insert(&self, collection: Collection, mut doc: Value) -> Result<Value> {
        let fields = doc
            .as_object_mut()
            .ok_or_else(|| anyhow!("Documents in {} must be JSON objects", collection))?;
        if !fields.get("id").map(Value::is_string).unwrap_or(false) {
            fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }

        let path = format!("/rest/v1/{}", collection.table());
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            &path,
            None,
            Some(doc),
            Some(Self::representation_headers()),
        ).await?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert into {} returned no rows", collection))
    }

    async fn find(&self, collection: Collection, query: &Query) -> Result<Vec<Value>> {
        let path = format!("/rest/v1/{}{}", collection.table(), query_string(query));
        debug!("Querying {}", path);

        self.supabase.request(Method::GET, &path, None, None).await
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let rows = self.find(collection, &by_id(id).limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<Value>> {
        let path = format!("/rest/v1/{}{}", collection.table(), query_string(&by_id(id)));
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            None,
            Some(Value::Object(patch)),
            Some(Self::representation_headers()),
        ).await?;

        Ok(result.into_iter().next())
    }

    async fn update_many(
        &self,
        collection: Collection,
        query: &Query,
        patch: Map<String, Value>,
    ) -> Result<u64> {
        let path = format!("/rest/v1/{}{}", collection.table(), query_string(query));
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            None,
            Some(Value::Object(patch)),
            Some(Self::representation_headers()),
        ).await?;

        Ok(result.len() as u64)
    }

    async fn delete_by_id(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let path = format!("/rest/v1/{}{}", collection.table(), query_string(&by_id(id)));
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            None,
            None,
            Some(Self::representation_headers()),
        ).await?;

        Ok(result.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_filters_order_and_limit() {
        let query = Query::new()
            .eq("doctorId", "d-1")
            .any_of("status", ["today", "upcoming"])
            .order_by("scheduledAt", Direction::Asc)
            .limit(1);

        assert_eq!(
            query_string(&query),
            "?doctorId=eq.d-1&status=in.(%22today%22%2C%22upcoming%22)&order=scheduledAt.asc&limit=1"
        );
    }

    #[test]
    fn list_items_escape_quotes_and_backslashes() {
        let query = Query::new().any_of("name", [r#"Dr. "Amit""#, r"a\b"]);

        assert_eq!(
            query_string(&query),
            "?name=in.(%22Dr.%20%5C%22Amit%5C%22%22%2C%22a%5C%5Cb%22)"
        );
    }

    #[test]
    fn empty_query_has_no_query_string() {
        assert_eq!(query_string(&Query::new()), "");
    }

    #[test]
    fn booleans_and_nulls_use_postgrest_literals() {
        let query = Query::new().eq("unread", true).eq("doctorId", Value::Null);
        assert_eq!(query_string(&query), "?unread=eq.true&doctorId=is.null");
    }
}
