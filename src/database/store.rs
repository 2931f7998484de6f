use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::DatabaseError;

/// A stored document: a JSON object carrying the system fields below.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

const SYSTEM_FIELDS: [&str; 3] = [ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD];

/// Named document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Media,
    UiMedia,
    MediaTbyt,
    PartyLiterasi,
    Visitors,
    Books,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Users,
        Collection::Media,
        Collection::UiMedia,
        Collection::MediaTbyt,
        Collection::PartyLiterasi,
        Collection::Visitors,
        Collection::Books,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Media => "media",
            Collection::UiMedia => "ui_media",
            Collection::MediaTbyt => "media_tbyt",
            Collection::PartyLiterasi => "party_literasi",
            Collection::Visitors => "visitors",
            Collection::Books => "books",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sort {
    /// Creation time descending
    #[default]
    Newest,
    Oldest,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FindOptions {
    pub sort: Sort,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn newest() -> Self {
        Self::default()
    }

    pub fn first() -> Self {
        Self {
            limit: Some(1),
            ..Self::default()
        }
    }
}

/// Document store seam shared by all three services.
///
/// Filters use containment: a document matches when every field of the
/// filter is contained in it. Scalars compare by value, objects recurse,
/// and a filter array matches when each of its elements appears in the
/// document's array. An empty filter matches everything.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(
        &self,
        collection: Collection,
        filter: &Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, DatabaseError>;

    async fn find_one(&self, collection: Collection, filter: &Document) -> Result<Option<Document>, DatabaseError> {
        Ok(self.find(collection, filter, FindOptions::first()).await?.into_iter().next())
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, DatabaseError>;

    /// Documents whose id is in `ids`, in no particular order. Unknown ids are skipped.
    async fn find_by_ids(&self, collection: Collection, ids: &[String]) -> Result<Vec<Document>, DatabaseError>;

    /// Persists `body` with a fresh id and timestamps; system fields in `body` are ignored.
    async fn insert(&self, collection: Collection, body: Document) -> Result<Document, DatabaseError>;

    /// Replaces every non-system field of the document and bumps `updatedAt`.
    /// Returns `None` when the id is unknown.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        body: Document,
    ) -> Result<Option<Document>, DatabaseError>;

    /// Removes the document and returns it, or `None` when the id is unknown.
    async fn delete_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, DatabaseError>;

    async fn count(&self, collection: Collection, filter: &Document) -> Result<u64, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn is_system_field(name: &str) -> bool {
    SYSTEM_FIELDS.contains(&name)
}

pub fn strip_system_fields(mut body: Document) -> Document {
    for field in SYSTEM_FIELDS {
        body.remove(field);
    }
    body
}

/// Id of a stored document, if it has one.
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

/// Containment check shared by the in-memory store; mirrors JSONB `@>`.
pub fn matches(doc: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| doc.get(key).is_some_and(|actual| contains(actual, expected)))
}

fn contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => matches(actual, expected),
        (Value::Array(actual), Value::Array(expected)) => expected
            .iter()
            .all(|wanted| actual.iter().any(|candidate| contains(candidate, wanted))),
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => actual == expected,
    }
}
