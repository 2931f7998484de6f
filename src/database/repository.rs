use futures::future::try_join_all;
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::database::manager::DatabaseError;
use crate::database::models::{Model, ValidationError};
use crate::database::store::{
    document_id, is_system_field, Collection, Document, DocumentStore, FindOptions,
};

/// Typed access to one collection: validation on write, expansion on read.
pub struct Repository<M> {
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<M>,
}

impl<M: Model> Repository<M> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// All matching documents, newest first
    pub async fn list(&self, filter: &Document) -> Result<Vec<Document>, DatabaseError> {
        self.store.find(M::COLLECTION, filter, FindOptions::newest()).await
    }

    /// Like `list`, with references expanded
    pub async fn list_expanded(&self, filter: &Document) -> Result<Vec<Document>, DatabaseError> {
        let mut docs = self.list(filter).await?;
        self.expand(&mut docs).await?;
        Ok(docs)
    }

    pub async fn find_one(&self, filter: &Document) -> Result<Option<Document>, DatabaseError> {
        self.store.find_one(M::COLLECTION, filter).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Document>, DatabaseError> {
        self.store.find_by_id(M::COLLECTION, id).await
    }

    pub async fn get_expanded(&self, id: &str) -> Result<Option<Document>, DatabaseError> {
        self.get_expanded_where(id, everything).await
    }

    pub async fn get_expanded_where<F>(&self, id: &str, visible: F) -> Result<Option<Document>, DatabaseError>
    where
        F: Fn(Collection, &Document) -> bool,
    {
        let Some(doc) = self.get(id).await? else {
            return Ok(None);
        };
        let mut docs = [doc];
        self.expand_where(&mut docs, visible).await?;
        let [doc] = docs;
        Ok(Some(doc))
    }

    /// Coerce `body` into the model (applying defaults), validate and persist it
    pub async fn create(&self, body: Value) -> Result<Document, DatabaseError> {
        let model = Self::parse(body)?;
        self.store.insert(M::COLLECTION, model.to_document()?).await
    }

    /// Persist an already-built model
    pub async fn insert(&self, model: &M) -> Result<Document, DatabaseError> {
        model.validate()?;
        self.store.insert(M::COLLECTION, model.to_document()?).await
    }

    /// Apply a partial field set on top of the stored document.
    /// Returns `None` when the id is unknown.
    pub async fn update(&self, id: &str, patch: Value) -> Result<Option<Document>, DatabaseError> {
        let Value::Object(patch) = patch else {
            return Err(ValidationError::Malformed("update body must be a JSON object".to_string()).into());
        };

        let Some(mut merged) = self.get(id).await? else {
            return Ok(None);
        };
        for (field, value) in patch {
            if !is_system_field(&field) {
                merged.insert(field, value);
            }
        }

        let model = Self::parse(Value::Object(merged))?;
        self.store.update_by_id(M::COLLECTION, id, model.to_document()?).await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Document>, DatabaseError> {
        self.store.delete_by_id(M::COLLECTION, id).await
    }

    pub async fn count(&self, filter: &Document) -> Result<u64, DatabaseError> {
        self.store.count(M::COLLECTION, filter).await
    }

    /// Replace each reference array declared by the model with the documents it names
    pub async fn expand(&self, docs: &mut [Document]) -> Result<(), DatabaseError> {
        self.expand_where(docs, everything).await
    }

    /// Like `expand`, dropping referenced documents `visible` rejects
    pub async fn expand_where<F>(&self, docs: &mut [Document], visible: F) -> Result<(), DatabaseError>
    where
        F: Fn(Collection, &Document) -> bool,
    {
        if docs.is_empty() || M::REFERENCES.is_empty() {
            return Ok(());
        }

        let lookups = M::REFERENCES
            .iter()
            .map(|(field, target)| lookup(self.store.as_ref(), docs, field, *target));
        let resolved = try_join_all(lookups).await?;

        for ((field, target), by_id) in M::REFERENCES.iter().zip(resolved) {
            for doc in docs.iter_mut() {
                let expanded: Vec<Value> = reference_ids(doc, field)
                    .filter_map(|id| by_id.get(id))
                    .filter(|found| visible(*target, found))
                    .map(|found| Value::Object(found.clone()))
                    .collect();
                doc.insert(field.to_string(), Value::Array(expanded));
            }
        }
        Ok(())
    }

    pub async fn expand_one(&self, doc: Document) -> Result<Document, DatabaseError> {
        let mut docs = [doc];
        self.expand(&mut docs).await?;
        let [doc] = docs;
        Ok(doc)
    }

    /// Coerce and validate `body` without persisting it
    pub fn parse(body: Value) -> Result<M, DatabaseError> {
        let model: M = serde_json::from_value(body).map_err(ValidationError::from)?;
        model.validate()?;
        Ok(model)
    }
}

fn everything(_: Collection, _: &Document) -> bool {
    true
}

fn reference_ids<'a>(doc: &'a Document, field: &str) -> impl Iterator<Item = &'a str> {
    doc.get(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

/// Fetch every document referenced through `field` across `docs` in one query
async fn lookup(
    store: &dyn DocumentStore,
    docs: &[Document],
    field: &str,
    target: Collection,
) -> Result<HashMap<String, Document>, DatabaseError> {
    let mut ids: Vec<String> = docs.iter().flat_map(|doc| reference_ids(doc, field)).map(str::to_string).collect();
    ids.sort();
    ids.dedup();

    let found = store.find_by_ids(target, &ids).await?;
    Ok(found
        .into_iter()
        .filter_map(|doc| document_id(&doc).map(str::to_string).map(|id| (id, doc)))
        .collect())
}
