//! Rotation service: one conveyor step per poll.
//!
//! Each `poll()` either promotes the oldest pending image (archiving what was
//! on screen) and returns it, or re-serves the current image untouched.
//!
//! Error policy:
//! - Reading Displaying and archiving its contents are best effort; failures
//!   are logged and the step continues.
//! - Moving the candidate into Displaying, and reading it back, are the hard
//!   failure path: the poll returns an error rather than stale content.
//!
//! Concurrent polls are not serialized. Two pollers racing on the same
//! candidate can both attempt the move; the loser gets a `CriticalMove`
//! error and any stray Displaying entries are archived on the next advance.

use weddingwall_types::bucket::{Bucket, BucketTransition};
use weddingwall_types::error::RotationError;
use weddingwall_types::image::{ImageName, StoredImage, JPEG_CONTENT_TYPE};

use super::plan::{plan_rotation, RotationPlan};
use crate::storage::image_store::ImageStore;

/// Bytes of the image to show, ready to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideImage {
    pub name: ImageName,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Result of a successful poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A new image was promoted into Displaying.
    Rotated(SlideImage),
    /// Pending was empty; the current image is served again.
    Reserved(SlideImage),
    /// Nothing to show.
    Empty,
}

impl PollOutcome {
    pub fn image(&self) -> Option<&SlideImage> {
        match self {
            PollOutcome::Rotated(img) | PollOutcome::Reserved(img) => Some(img),
            PollOutcome::Empty => None,
        }
    }

    pub fn into_image(self) -> Option<SlideImage> {
        match self {
            PollOutcome::Rotated(img) | PollOutcome::Reserved(img) => Some(img),
            PollOutcome::Empty => None,
        }
    }
}

/// Drives the Pending -> Displaying -> Done conveyor.
pub struct RotationService<S: ImageStore> {
    store: S,
}

impl<S: ImageStore> RotationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Advance the conveyor by at most one step and return what to show.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn poll(&self) -> Result<PollOutcome, RotationError> {
        let candidate = self.store.list_oldest(Bucket::Pending).await?;

        let displaying = match &candidate {
            // About to advance: an unreadable Displaying bucket is treated as empty.
            Some(_) => match self.store.list(Bucket::Displaying).await {
                Ok(images) => images,
                Err(e) => {
                    tracing::warn!(error = %e, "could not read displaying bucket, assuming empty");
                    Vec::new()
                }
            },
            // Pure read path: a broken Displaying bucket is a structural failure.
            None => self.store.list(Bucket::Displaying).await?,
        };

        match plan_rotation(candidate, displaying) {
            RotationPlan::Advance { candidate, archive } => {
                self.advance(candidate, archive).await.map(PollOutcome::Rotated)
            }
            RotationPlan::Reserve { current } => {
                let bytes = self
                    .store
                    .read_bytes(&current.name, Bucket::Displaying)
                    .await
                    .map_err(|source| {
                        tracing::error!(image = %current.name, error = %source, "failed to read image from displaying");
                        RotationError::ReadFailed {
                            name: current.name.to_string(),
                            source,
                        }
                    })?;
                tracing::debug!(image = %current.name, "no new images, serving current one");
                Ok(PollOutcome::Reserved(SlideImage {
                    name: current.name,
                    content_type: JPEG_CONTENT_TYPE,
                    bytes,
                }))
            }
            RotationPlan::Idle => {
                tracing::debug!("pending and displaying are both empty");
                Ok(PollOutcome::Empty)
            }
        }
    }

    async fn advance(
        &self,
        candidate: StoredImage,
        archive: Vec<StoredImage>,
    ) -> Result<SlideImage, RotationError> {
        for current in archive {
            let t = BucketTransition::Archive;
            match self
                .store
                .move_atomic(&current.name, t.source(), t.target())
                .await
            {
                Ok(_) => tracing::info!(image = %current.name, "moved from displaying to done"),
                Err(e) => tracing::error!(
                    image = %current.name,
                    error = %e,
                    "failed to archive displayed image, continuing"
                ),
            }
        }

        let t = BucketTransition::Promote;
        let promoted = self
            .store
            .move_atomic(&candidate.name, t.source(), t.target())
            .await
            .map_err(|source| {
                tracing::error!(
                    image = %candidate.name,
                    error = %source,
                    "CRITICAL: failed to move candidate into displaying"
                );
                RotationError::CriticalMove {
                    name: candidate.name.to_string(),
                    source,
                }
            })?;
        tracing::info!(image = %promoted.name, "moved from before to displaying");

        let bytes = self
            .store
            .read_bytes(&promoted.name, Bucket::Displaying)
            .await
            .map_err(|source| RotationError::ReadFailed {
                name: promoted.name.to_string(),
                source,
            })?;

        Ok(SlideImage {
            name: promoted.name,
            content_type: JPEG_CONTENT_TYPE,
            bytes,
        })
    }
}
