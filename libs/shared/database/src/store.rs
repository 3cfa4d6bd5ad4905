use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Top-level groups of documents. Each maps to one PostgREST table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Appointments,
    Payments,
    Notifications,
    Vitals,
    Documents,
    Prescriptions,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Appointments => "appointments",
            Collection::Payments => "payments",
            Collection::Notifications => "notifications",
            Collection::Vitals => "vitals",
            Collection::Documents => "documents",
            Collection::Prescriptions => "prescriptions",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    In(String, Vec<Value>),
}

impl Condition {
    pub fn field(&self) -> &str {
        match self {
            Condition::Eq(field, _) | Condition::In(field, _) => field,
        }
    }

    pub fn matches(&self, doc: &Value) -> bool {
        let actual = doc.get(self.field()).unwrap_or(&Value::Null);
        match self {
            Condition::Eq(_, expected) => actual == expected,
            Condition::In(_, options) => options.iter().any(|option| option == actual),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

/// Conjunctive filter with optional ordering and limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub conditions: Vec<Condition>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(field.to_string(), value.into()));
        self
    }

    pub fn any_of<V: Into<Value>>(mut self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push(Condition::In(field.to_string(), values));
        self
    }

    pub fn newest_first(self) -> Self {
        self.order_by("createdAt", Direction::Desc)
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order = Some(Order { field: field.to_string(), direction });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.conditions.iter().all(|condition| condition.matches(doc))
    }
}

/// Persistence seam for every entity. Documents are JSON objects with a
/// string `id`; writes touch one document unless stated otherwise and are not
/// transactional.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning it as stored. An `id` is generated when
    /// the document does not carry one.
    async fn insert(&self, collection: Collection, doc: Value) -> Result<Value>;

    async fn find(&self, collection: Collection, query: &Query) -> Result<Vec<Value>>;

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Value>>;

    /// Merge `patch` into the top-level fields of one document.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<Value>>;

    /// Merge `patch` into every document matching `query`, returning the
    /// number of documents touched.
    async fn update_many(
        &self,
        collection: Collection,
        query: &Query,
        patch: Map<String, Value>,
    ) -> Result<u64>;

    async fn delete_by_id(&self, collection: Collection, id: &str) -> Result<Option<Value>>;
}
