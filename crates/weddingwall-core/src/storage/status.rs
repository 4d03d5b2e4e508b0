//! Bucket summary for status reporting.

use serde::Serialize;
use weddingwall_types::bucket::Bucket;
use weddingwall_types::error::StorageError;
use weddingwall_types::image::{oldest_of, StoredImage};

use super::image_store::ImageStore;

/// Per-bucket image counts plus the image currently on screen.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub pending: usize,
    pub displaying: usize,
    pub done: usize,
    /// Next image the conveyor will promote.
    pub next_up: Option<StoredImage>,
    pub current: Option<StoredImage>,
}

impl StoreStatus {
    pub fn count(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Pending => self.pending,
            Bucket::Displaying => self.displaying,
            Bucket::Done => self.done,
        }
    }
}

/// Read every bucket once and summarize it.
pub async fn summarize<S: ImageStore>(store: &S) -> Result<StoreStatus, StorageError> {
    let pending = store.list(Bucket::Pending).await?;
    let displaying = store.list(Bucket::Displaying).await?;
    let done = store.list(Bucket::Done).await?;

    Ok(StoreStatus {
        pending: pending.len(),
        displaying: displaying.len(),
        done: done.len(),
        next_up: oldest_of(pending),
        current: oldest_of(displaying),
    })
}
