//! In-memory image store.
//!
//! A complete `ImageStore` backend kept in a single mutex-guarded map, so
//! every move is trivially atomic. Used for deterministic tests of the
//! rotation and ingest services; creation times can be set per insert and
//! failures can be injected per bucket.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use weddingwall_types::bucket::Bucket;
use weddingwall_types::error::StorageError;
use weddingwall_types::image::{oldest_of, ImageName, StoredImage};

use super::image_store::ImageStore;

#[derive(Debug, Clone)]
struct Entry {
    data: Vec<u8>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<(Bucket, ImageName), Entry>,
    last_created: Option<DateTime<Utc>>,
    mutations: u64,
    failing_moves_into: HashSet<Bucket>,
    failing_reads: HashSet<Bucket>,
    failing_lists: HashSet<Bucket>,
    failing_writes: bool,
}

impl Inner {
    /// Strictly increasing creation clock so insertion order is observable.
    fn next_created(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let created = match self.last_created {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created = Some(created);
        created
    }

    fn record(&self, bucket: Bucket, name: &ImageName) -> Option<StoredImage> {
        self.entries
            .get(&(bucket, name.clone()))
            .map(|entry| StoredImage {
                name: name.clone(),
                bucket,
                created_at: entry.created_at,
                size_bytes: entry.data.len() as u64,
            })
    }
}

/// In-memory `ImageStore`.
#[derive(Debug, Default)]
pub struct InMemoryImageStore {
    inner: Mutex<Inner>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed an image with an explicit creation time. Not counted as a mutation.
    pub fn insert_at(
        &self,
        bucket: Bucket,
        name: &ImageName,
        data: &[u8],
        created_at: DateTime<Utc>,
    ) {
        self.lock().entries.insert(
            (bucket, name.clone()),
            Entry {
                data: data.to_vec(),
                created_at,
            },
        );
    }

    /// Names currently held in a bucket, sorted.
    pub fn names_in(&self, bucket: Bucket) -> Vec<ImageName> {
        self.lock()
            .entries
            .keys()
            .filter(|(b, _)| *b == bucket)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Number of moves and writes performed through the trait.
    pub fn mutation_count(&self) -> u64 {
        self.lock().mutations
    }

    /// Make every move whose destination is `bucket` fail with an I/O error.
    pub fn fail_moves_into(&self, bucket: Bucket) {
        self.lock().failing_moves_into.insert(bucket);
    }

    /// Make every read from `bucket` fail with an I/O error.
    pub fn fail_reads_from(&self, bucket: Bucket) {
        self.lock().failing_reads.insert(bucket);
    }

    /// Make listing `bucket` fail with an I/O error.
    pub fn fail_lists_of(&self, bucket: Bucket) {
        self.lock().failing_lists.insert(bucket);
    }

    /// Make every `write_new` fail with an I/O error.
    pub fn fail_writes(&self) {
        self.lock().failing_writes = true;
    }
}

impl ImageStore for InMemoryImageStore {
    async fn list(&self, bucket: Bucket) -> Result<Vec<StoredImage>, StorageError> {
        let inner = self.lock();
        if inner.failing_lists.contains(&bucket) {
            return Err(StorageError::Io(format!("injected list failure in {bucket}")));
        }
        Ok(inner
            .entries
            .keys()
            .filter(|(b, _)| *b == bucket)
            .filter_map(|(b, name)| inner.record(*b, name))
            .collect())
    }

    async fn list_oldest(&self, bucket: Bucket) -> Result<Option<StoredImage>, StorageError> {
        Ok(oldest_of(self.list(bucket).await?))
    }

    async fn move_atomic(
        &self,
        name: &ImageName,
        from: Bucket,
        to: Bucket,
    ) -> Result<StoredImage, StorageError> {
        let mut inner = self.lock();
        if inner.failing_moves_into.contains(&to) {
            return Err(StorageError::Io(format!(
                "injected move failure for '{name}' into {to}"
            )));
        }
        let entry = inner
            .entries
            .remove(&(from, name.clone()))
            .ok_or_else(|| StorageError::NotFound {
                name: name.to_string(),
                bucket: from,
            })?;
        inner.entries.insert((to, name.clone()), entry);
        inner.mutations += 1;
        inner.record(to, name).ok_or_else(|| StorageError::NotFound {
            name: name.to_string(),
            bucket: to,
        })
    }

    async fn read_bytes(&self, name: &ImageName, bucket: Bucket) -> Result<Vec<u8>, StorageError> {
        let inner = self.lock();
        if inner.failing_reads.contains(&bucket) {
            return Err(StorageError::Io(format!(
                "injected read failure for '{name}' in {bucket}"
            )));
        }
        inner
            .entries
            .get(&(bucket, name.clone()))
            .map(|entry| entry.data.clone())
            .ok_or_else(|| StorageError::NotFound {
                name: name.to_string(),
                bucket,
            })
    }

    async fn write_new(
        &self,
        bucket: Bucket,
        name: &ImageName,
        data: &[u8],
    ) -> Result<StoredImage, StorageError> {
        let mut inner = self.lock();
        if inner.failing_writes {
            return Err(StorageError::Io(format!("injected write failure for '{name}'")));
        }
        let created_at = inner.next_created();
        inner.entries.insert(
            (bucket, name.clone()),
            Entry {
                data: data.to_vec(),
                created_at,
            },
        );
        inner.mutations += 1;
        inner.record(bucket, name).ok_or_else(|| StorageError::NotFound {
            name: name.to_string(),
            bucket,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn name(s: &str) -> ImageName {
        ImageName::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_empty_bucket_lists_empty() {
        let store = InMemoryImageStore::new();
        assert!(store.list(Bucket::Pending).await.unwrap().is_empty());
        assert!(store.list_oldest(Bucket::Displaying).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = InMemoryImageStore::new();
        let stored = store
            .write_new(Bucket::Pending, &name("a.jpg"), b"jpeg-bytes")
            .await
            .unwrap();
        assert_eq!(stored.bucket, Bucket::Pending);
        assert_eq!(stored.size_bytes, 10);
        let bytes = store.read_bytes(&name("a.jpg"), Bucket::Pending).await.unwrap();
        assert_eq!(bytes, b"jpeg-bytes");
        assert_eq!(store.mutation_count(), 1);
    }

    #[tokio::test]
    async fn test_writes_get_increasing_creation_times() {
        let store = InMemoryImageStore::new();
        let first = store.write_new(Bucket::Pending, &name("z.jpg"), b"1").await.unwrap();
        let second = store.write_new(Bucket::Pending, &name("a.jpg"), b"2").await.unwrap();
        assert!(first.created_at < second.created_at);
        let oldest = store.list_oldest(Bucket::Pending).await.unwrap().unwrap();
        assert_eq!(oldest.name, name("z.jpg"));
    }

    #[tokio::test]
    async fn test_move_relocates_exactly_once() {
        let store = InMemoryImageStore::new();
        let at = Utc.timestamp_opt(100, 0).unwrap();
        store.insert_at(Bucket::Pending, &name("a.jpg"), b"abc", at);

        let moved = store
            .move_atomic(&name("a.jpg"), Bucket::Pending, Bucket::Displaying)
            .await
            .unwrap();
        assert_eq!(moved.bucket, Bucket::Displaying);
        assert_eq!(moved.created_at, at);
        assert!(store.names_in(Bucket::Pending).is_empty());
        assert_eq!(store.names_in(Bucket::Displaying), vec![name("a.jpg")]);
    }

    #[tokio::test]
    async fn test_move_missing_is_not_found() {
        let store = InMemoryImageStore::new();
        let err = store
            .move_atomic(&name("a.jpg"), Bucket::Pending, Bucket::Displaying)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_injected_move_failure_leaves_image_in_place() {
        let store = InMemoryImageStore::new();
        store.insert_at(Bucket::Pending, &name("a.jpg"), b"abc", Utc::now());
        store.fail_moves_into(Bucket::Displaying);

        assert!(store
            .move_atomic(&name("a.jpg"), Bucket::Pending, Bucket::Displaying)
            .await
            .is_err());
        assert_eq!(store.names_in(Bucket::Pending), vec![name("a.jpg")]);
        assert_eq!(store.mutation_count(), 0);
    }
}
