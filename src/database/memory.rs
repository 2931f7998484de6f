use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::store::{
    document_id, matches, new_id, strip_system_fields, timestamp, Collection, Document, DocumentStore, FindOptions,
    Sort, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD,
};
use super::DatabaseError;

/// In-process document store backing `memory://` and the test suite.
/// Collections keep insertion order so ties on `createdAt` stay stable.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn created_at(doc: &Document) -> &str {
    doc.get(CREATED_AT_FIELD).and_then(Value::as_str).unwrap_or_default()
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<Document> = match options.sort {
            Sort::Newest => docs.iter().rev().filter(|doc| matches(doc, filter)).cloned().collect(),
            Sort::Oldest => docs.iter().filter(|doc| matches(doc, filter)).cloned().collect(),
        };

        // Stable sort keeps the insertion-order tie break from above
        match options.sort {
            Sort::Newest => found.sort_by(|a, b| created_at(b).cmp(created_at(a))),
            Sort::Oldest => found.sort_by(|a, b| created_at(a).cmp(created_at(b))),
        }

        if let Some(limit) = options.limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| document_id(doc) == Some(id)))
            .cloned())
    }

    async fn find_by_ids(&self, collection: Collection, ids: &[String]) -> Result<Vec<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| document_id(doc).is_some_and(|id| ids.iter().any(|wanted| wanted == id)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, collection: Collection, body: Document) -> Result<Document, DatabaseError> {
        let now = timestamp();
        let mut doc = strip_system_fields(body);
        doc.insert(ID_FIELD.to_string(), Value::String(new_id()));
        doc.insert(CREATED_AT_FIELD.to_string(), Value::String(now.clone()));
        doc.insert(UPDATED_AT_FIELD.to_string(), Value::String(now));

        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push(doc.clone());
        Ok(doc)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        body: Document,
    ) -> Result<Option<Document>, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(existing) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| document_id(doc) == Some(id)))
        else {
            return Ok(None);
        };

        let mut doc = strip_system_fields(body);
        for field in [ID_FIELD, CREATED_AT_FIELD] {
            if let Some(value) = existing.get(field) {
                doc.insert(field.to_string(), value.clone());
            }
        }
        doc.insert(UPDATED_AT_FIELD.to_string(), Value::String(timestamp()));

        *existing = doc.clone();
        Ok(Some(doc))
    }

    async fn delete_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(None);
        };
        Ok(docs
            .iter()
            .position(|doc| document_id(doc) == Some(id))
            .map(|position| docs.remove(position)))
    }

    async fn count(&self, collection: Collection, filter: &Document) -> Result<u64, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|doc| matches(doc, filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
