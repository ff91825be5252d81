//! Storage backends used by the demos.
//!
//! [`Datastore`] holds JSON documents keyed by kind and numeric id;
//! [`BlobStore`] holds named byte objects in buckets. Both ship with an
//! in-memory implementation suitable for tests and local runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use serde_json::Value;
use switchyard::BoxFuture;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Rewrites a stored entity in place; see [`Datastore::update`].
pub type UpdateFn<'a> = Box<dyn FnOnce(Value) -> Result<Value, StoreError> + Send + 'a>;

/// A document store keyed by `(kind, id)`.
pub trait Datastore: Send + Sync {
    /// Stores `entity`, allocating a fresh id when `id` is `None`.
    ///
    /// Returns the id the entity was stored under.
    fn put<'a>(
        &'a self,
        kind: &'a str,
        id: Option<i64>,
        entity: Value,
    ) -> BoxFuture<'a, Result<i64, StoreError>>;

    fn get<'a>(&'a self, kind: &'a str, id: i64) -> BoxFuture<'a, Result<Value, StoreError>>;

    /// Replaces an existing entity with `apply(current)` as one operation.
    ///
    /// Fails with [`StoreError::NotFound`] if the entity is absent; nothing
    /// is written when `apply` fails. Returns the stored value.
    fn update<'a>(
        &'a self,
        kind: &'a str,
        id: i64,
        apply: UpdateFn<'a>,
    ) -> BoxFuture<'a, Result<Value, StoreError>>;

    /// All entities of `kind` in id order.
    fn get_all<'a>(&'a self, kind: &'a str) -> BoxFuture<'a, Result<Vec<(i64, Value)>, StoreError>>;

    fn delete<'a>(&'a self, kind: &'a str, id: i64) -> BoxFuture<'a, Result<(), StoreError>>;
}

/// [`Datastore`] kept in process memory.
#[derive(Debug)]
pub struct MemoryDatastore {
    kinds: RwLock<HashMap<String, BTreeMap<i64, Value>>>,
    next_id: AtomicI64,
    available: AtomicBool,
}

impl Default for MemoryDatastore {
    fn default() -> Self {
        Self {
            kinds: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail with [`StoreError::Backend`]
    /// while `available` is false.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Backend("datastore offline".to_string()))
        }
    }

    fn not_found(kind: &str, id: i64) -> StoreError {
        StoreError::NotFound {
            kind: kind.to_string(),
            id,
        }
    }
}

impl Datastore for MemoryDatastore {
    fn put<'a>(
        &'a self,
        kind: &'a str,
        id: Option<i64>,
        entity: Value,
    ) -> BoxFuture<'a, Result<i64, StoreError>> {
        Box::pin(async move {
            self.check_available()?;
            let id = id.unwrap_or_else(|| self.next_id.fetch_add(1, Ordering::SeqCst));
            self.kinds
                .write()
                .await
                .entry(kind.to_string())
                .or_default()
                .insert(id, entity);
            Ok(id)
        })
    }

    fn get<'a>(&'a self, kind: &'a str, id: i64) -> BoxFuture<'a, Result<Value, StoreError>> {
        Box::pin(async move {
            self.check_available()?;
            self.kinds
                .read()
                .await
                .get(kind)
                .and_then(|entities| entities.get(&id))
                .cloned()
                .ok_or_else(|| Self::not_found(kind, id))
        })
    }

    fn update<'a>(
        &'a self,
        kind: &'a str,
        id: i64,
        apply: UpdateFn<'a>,
    ) -> BoxFuture<'a, Result<Value, StoreError>> {
        Box::pin(async move {
            self.check_available()?;
            let mut kinds = self.kinds.write().await;
            let entity = kinds
                .get_mut(kind)
                .and_then(|entities| entities.get_mut(&id))
                .ok_or_else(|| Self::not_found(kind, id))?;
            let updated = apply(entity.clone())?;
            *entity = updated.clone();
            Ok(updated)
        })
    }

    fn get_all<'a>(&'a self, kind: &'a str) -> BoxFuture<'a, Result<Vec<(i64, Value)>, StoreError>> {
        Box::pin(async move {
            self.check_available()?;
            Ok(self
                .kinds
                .read()
                .await
                .get(kind)
                .map(|entities| entities.iter().map(|(id, v)| (*id, v.clone())).collect())
                .unwrap_or_default())
        })
    }

    fn delete<'a>(&'a self, kind: &'a str, id: i64) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.check_available()?;
            self.kinds
                .write()
                .await
                .get_mut(kind)
                .and_then(|entities| entities.remove(&id))
                .map(|_| ())
                .ok_or_else(|| Self::not_found(kind, id))
        })
    }
}

/// Attributes stored alongside a blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectAttrs {
    pub content_type: String,
    pub metadata: HashMap<String, String>,
}

/// A bucketed object store.
pub trait BlobStore: Send + Sync {
    fn write<'a>(
        &'a self,
        bucket: &'a str,
        name: &'a str,
        attrs: ObjectAttrs,
        data: Vec<u8>,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    fn read<'a>(&'a self, bucket: &'a str, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>, StoreError>>;

    fn attrs<'a>(
        &'a self,
        bucket: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<ObjectAttrs, StoreError>>;

    fn delete<'a>(&'a self, bucket: &'a str, name: &'a str) -> BoxFuture<'a, Result<(), StoreError>>;
}

type ObjectKey = (String, String);

/// [`BlobStore`] kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<ObjectKey, (ObjectAttrs, Vec<u8>)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects across all buckets.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    fn key(bucket: &str, name: &str) -> ObjectKey {
        (bucket.to_string(), name.to_string())
    }

    fn not_found(bucket: &str, name: &str) -> StoreError {
        StoreError::ObjectNotFound {
            bucket: bucket.to_string(),
            name: name.to_string(),
        }
    }
}

impl BlobStore for MemoryBlobStore {
    fn write<'a>(
        &'a self,
        bucket: &'a str,
        name: &'a str,
        attrs: ObjectAttrs,
        data: Vec<u8>,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.objects
                .write()
                .await
                .insert(Self::key(bucket, name), (attrs, data));
            Ok(())
        })
    }

    fn read<'a>(&'a self, bucket: &'a str, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>, StoreError>> {
        Box::pin(async move {
            self.objects
                .read()
                .await
                .get(&Self::key(bucket, name))
                .map(|(_, data)| data.clone())
                .ok_or_else(|| Self::not_found(bucket, name))
        })
    }

    fn attrs<'a>(
        &'a self,
        bucket: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<ObjectAttrs, StoreError>> {
        Box::pin(async move {
            self.objects
                .read()
                .await
                .get(&Self::key(bucket, name))
                .map(|(attrs, _)| attrs.clone())
                .ok_or_else(|| Self::not_found(bucket, name))
        })
    }

    fn delete<'a>(&'a self, bucket: &'a str, name: &'a str) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.objects
                .write()
                .await
                .remove(&Self::key(bucket, name))
                .map(|_| ())
                .ok_or_else(|| Self::not_found(bucket, name))
        })
    }
}
