//! Pure rotation planning.
//!
//! Given the oldest pending image and whatever currently sits in Displaying,
//! decide what one poll should do. The plan is expressed as bucket
//! transitions so it can be checked against the state machine in
//! `weddingwall_types::bucket` without touching any storage backend.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use weddingwall_types::bucket::{Bucket, BucketTransition};
use weddingwall_types::error::TransitionError;
use weddingwall_types::image::{oldest_of, ImageName, StoredImage};

/// What a single poll does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationPlan {
    /// Archive everything on screen, then promote `candidate`.
    Advance {
        candidate: StoredImage,
        archive: Vec<StoredImage>,
    },
    /// Nothing new: serve `current` again without moving anything.
    Reserve { current: StoredImage },
    /// Nothing pending and nothing on screen.
    Idle,
}

impl RotationPlan {
    /// Transitions in execution order: archivals first, promotion last.
    pub fn transitions(&self) -> Vec<(ImageName, BucketTransition)> {
        match self {
            RotationPlan::Advance { candidate, archive } => archive
                .iter()
                .map(|img| (img.name.clone(), BucketTransition::Archive))
                .chain(std::iter::once((
                    candidate.name.clone(),
                    BucketTransition::Promote,
                )))
                .collect(),
            RotationPlan::Reserve { .. } | RotationPlan::Idle => Vec::new(),
        }
    }

    /// Whether executing the plan changes any bucket.
    pub fn mutates(&self) -> bool {
        matches!(self, RotationPlan::Advance { .. })
    }
}

/// Plan one poll.
///
/// When several images are found in Displaying (only possible after a
/// concurrent-poll race), all of them are archived on advance, and the
/// oldest is served on re-serve.
pub fn plan_rotation(oldest_pending: Option<StoredImage>, displaying: Vec<StoredImage>) -> RotationPlan {
    match oldest_pending {
        Some(candidate) => RotationPlan::Advance {
            candidate,
            archive: displaying,
        },
        None => match oldest_of(displaying) {
            Some(current) => RotationPlan::Reserve { current },
            None => RotationPlan::Idle,
        },
    }
}

/// Backend-free model of the conveyor: image name -> (bucket, created_at).
///
/// Applies plans through `Bucket::apply`, so any plan that would break the
/// state machine surfaces as a `TransitionError`.
#[derive(Debug, Clone, Default)]
pub struct ConveyorModel {
    images: BTreeMap<ImageName, (Bucket, DateTime<Utc>)>,
}

impl ConveyorModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new arrival lands in Pending.
    pub fn arrive(&mut self, name: ImageName, created_at: DateTime<Utc>) {
        self.images.insert(name, (Bucket::Pending, created_at));
    }

    fn in_bucket(&self, bucket: Bucket) -> Vec<StoredImage> {
        self.images
            .iter()
            .filter(|(_, (b, _))| *b == bucket)
            .map(|(name, (b, created_at))| StoredImage {
                name: name.clone(),
                bucket: *b,
                created_at: *created_at,
                size_bytes: 0,
            })
            .collect()
    }

    /// Plan and apply one poll, returning the plan that ran.
    pub fn poll(&mut self) -> Result<RotationPlan, TransitionError> {
        let plan = plan_rotation(
            oldest_of(self.in_bucket(Bucket::Pending)),
            self.in_bucket(Bucket::Displaying),
        );
        for (name, transition) in plan.transitions() {
            if let Some((bucket, _)) = self.images.get_mut(&name) {
                *bucket = bucket.apply(transition)?;
            }
        }
        Ok(plan)
    }

    pub fn bucket_of(&self, name: &ImageName) -> Option<Bucket> {
        self.images.get(name).map(|(b, _)| *b)
    }

    pub fn count(&self, bucket: Bucket) -> usize {
        self.images.values().filter(|(b, _)| *b == bucket).count()
    }
}
