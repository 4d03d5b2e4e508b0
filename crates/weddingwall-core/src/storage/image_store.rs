//! Image store trait.
//!
//! Defines the interface for the three-bucket image queue.
//! Implementations live in weddingwall-infra (filesystem) and in
//! [`super::memory`] (in-memory, for tests).

use weddingwall_types::bucket::Bucket;
use weddingwall_types::error::StorageError;
use weddingwall_types::image::{ImageName, StoredImage};

/// Trait for bucketed image storage.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
///
/// Contract shared by every backend:
/// - A bucket that has never been written to reads as empty, not as an error.
/// - `move_atomic` either relocates the image completely or leaves it where
///   it was; an image is never visible in two buckets at once.
/// - `write_new` never exposes a partially written image under its final name.
pub trait ImageStore: Send + Sync {
    /// List every image in a bucket, in no particular order.
    fn list(
        &self,
        bucket: Bucket,
    ) -> impl std::future::Future<Output = Result<Vec<StoredImage>, StorageError>> + Send;

    /// The image with the earliest creation time, ties broken by name.
    fn list_oldest(
        &self,
        bucket: Bucket,
    ) -> impl std::future::Future<Output = Result<Option<StoredImage>, StorageError>> + Send;

    /// Move an image between buckets, returning its new record.
    fn move_atomic(
        &self,
        name: &ImageName,
        from: Bucket,
        to: Bucket,
    ) -> impl std::future::Future<Output = Result<StoredImage, StorageError>> + Send;

    /// Read an image's bytes.
    fn read_bytes(
        &self,
        name: &ImageName,
        bucket: Bucket,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, StorageError>> + Send;

    /// Store a new image.
    fn write_new(
        &self,
        bucket: Bucket,
        name: &ImageName,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<StoredImage, StorageError>> + Send;
}

/// Shared stores: the ingest and rotation services can hold the same backend.
impl<S: ImageStore> ImageStore for std::sync::Arc<S> {
    async fn list(&self, bucket: Bucket) -> Result<Vec<StoredImage>, StorageError> {
        (**self).list(bucket).await
    }

    async fn list_oldest(&self, bucket: Bucket) -> Result<Option<StoredImage>, StorageError> {
        (**self).list_oldest(bucket).await
    }

    async fn move_atomic(
        &self,
        name: &ImageName,
        from: Bucket,
        to: Bucket,
    ) -> Result<StoredImage, StorageError> {
        (**self).move_atomic(name, from, to).await
    }

    async fn read_bytes(&self, name: &ImageName, bucket: Bucket) -> Result<Vec<u8>, StorageError> {
        (**self).read_bytes(name, bucket).await
    }

    async fn write_new(
        &self,
        bucket: Bucket,
        name: &ImageName,
        data: &[u8],
    ) -> Result<StoredImage, StorageError> {
        (**self).write_new(bucket, name, data).await
    }
}
