use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::document_store::{DocumentStore, Filter, StoreError, StoreResult};

/// An aggregate that persists as a single JSON document
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the collection the document lives in
    const COLLECTION: &'static str;

    /// The document's identifier
    fn id(&self) -> Uuid;
}

/// Typed repository over one collection of a [`DocumentStore`]
///
/// Handles (de)serialization so callers work with aggregates only.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Insert a new document
    pub async fn insert(&self, doc: &T) -> StoreResult<()> {
        let body = serde_json::to_value(doc)?;
        self.store.insert(T::COLLECTION, doc.id(), body).await
    }

    /// Save a document (insert or update)
    pub async fn save(&self, doc: &T) -> StoreResult<()> {
        let body = serde_json::to_value(doc)?;
        self.store.upsert(T::COLLECTION, doc.id(), body).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(body) => Ok(Some(serde_json::from_value(body)?)),
            None => Ok(None),
        }
    }

    pub async fn find(&self, filter: Filter) -> StoreResult<Vec<T>> {
        self.store
            .find(T::COLLECTION, &filter)
            .await?
            .into_iter()
            .map(|body| serde_json::from_value(body).map_err(StoreError::from))
            .collect()
    }

    /// First document matching the filter, if any
    pub async fn find_one(&self, filter: Filter) -> StoreResult<Option<T>> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    pub async fn all(&self) -> StoreResult<Vec<T>> {
        self.find(Filter::new()).await
    }

    pub async fn count(&self, filter: Filter) -> StoreResult<u64> {
        self.store.count(T::COLLECTION, &filter).await
    }

    pub async fn exists(&self, filter: Filter) -> StoreResult<bool> {
        Ok(self.count(filter).await? > 0)
    }

    /// Delete a document by id; fails with `NotFound` if absent
    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        if self.store.delete(T::COLLECTION, id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                collection: T::COLLECTION.to_string(),
                id,
            })
        }
    }

    pub async fn delete_many(&self, filter: Filter) -> StoreResult<u64> {
        self.store.delete_many(T::COLLECTION, &filter).await
    }
}
