//! Storage buckets and the per-image state machine.
//!
//! Every stored image lives in exactly one bucket. The only legal moves are
//! `Pending -> Displaying` (promotion) and `Displaying -> Done` (archival);
//! `Done` is terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TransitionError;

/// One of the three storage areas an image can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Newly arrived, waiting to be shown (`before/`).
    #[serde(rename = "before")]
    Pending,
    /// Currently shown on the kiosk (`displaying/`). Holds at most one image.
    Displaying,
    /// Archived after being superseded (`done/`).
    Done,
}

impl Bucket {
    /// All buckets in conveyor order.
    pub const ALL: [Bucket; 3] = [Bucket::Pending, Bucket::Displaying, Bucket::Done];

    /// Directory name of this bucket under the storage base path.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Bucket::Pending => "before",
            Bucket::Displaying => "displaying",
            Bucket::Done => "done",
        }
    }

    /// Apply a transition, returning the bucket the image ends up in.
    pub fn apply(self, transition: BucketTransition) -> Result<Bucket, TransitionError> {
        match (self, transition) {
            (Bucket::Pending, BucketTransition::Promote) => Ok(Bucket::Displaying),
            (Bucket::Displaying, BucketTransition::Archive) => Ok(Bucket::Done),
            (from, transition) => Err(TransitionError { from, transition }),
        }
    }

    /// Whether an image can still leave this bucket.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Bucket::Done)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" | "pending" => Ok(Bucket::Pending),
            "displaying" => Ok(Bucket::Displaying),
            "done" => Ok(Bucket::Done),
            other => Err(format!("unknown bucket: {other}")),
        }
    }
}

/// A move between buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketTransition {
    /// Pending -> Displaying.
    Promote,
    /// Displaying -> Done.
    Archive,
}

impl BucketTransition {
    /// The bucket this transition starts from.
    pub fn source(&self) -> Bucket {
        match self {
            BucketTransition::Promote => Bucket::Pending,
            BucketTransition::Archive => Bucket::Displaying,
        }
    }

    /// The bucket this transition ends in.
    pub fn target(&self) -> Bucket {
        match self {
            BucketTransition::Promote => Bucket::Displaying,
            BucketTransition::Archive => Bucket::Done,
        }
    }
}

impl fmt::Display for BucketTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketTransition::Promote => write!(f, "promote"),
            BucketTransition::Archive => write!(f, "archive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_names() {
        assert_eq!(Bucket::Pending.dir_name(), "before");
        assert_eq!(Bucket::Displaying.dir_name(), "displaying");
        assert_eq!(Bucket::Done.dir_name(), "done");
    }

    #[test]
    fn test_from_str_accepts_dir_names() {
        for bucket in Bucket::ALL {
            assert_eq!(bucket.dir_name().parse::<Bucket>().unwrap(), bucket);
        }
        assert_eq!("pending".parse::<Bucket>().unwrap(), Bucket::Pending);
        assert!("archive".parse::<Bucket>().is_err());
    }

    #[test]
    fn test_serde_uses_dir_names() {
        let json = serde_json::to_string(&Bucket::Pending).unwrap();
        assert_eq!(json, "\"before\"");
        let parsed: Bucket = serde_json::from_str("\"displaying\"").unwrap();
        assert_eq!(parsed, Bucket::Displaying);
    }

    #[test]
    fn test_legal_transitions() {
        assert_eq!(
            Bucket::Pending.apply(BucketTransition::Promote).unwrap(),
            Bucket::Displaying
        );
        assert_eq!(
            Bucket::Displaying.apply(BucketTransition::Archive).unwrap(),
            Bucket::Done
        );
    }

    #[test]
    fn test_done_is_terminal() {
        assert!(Bucket::Done.is_terminal());
        assert!(Bucket::Done.apply(BucketTransition::Promote).is_err());
        assert!(Bucket::Done.apply(BucketTransition::Archive).is_err());
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        // Pending cannot jump straight to Done.
        let err = Bucket::Pending.apply(BucketTransition::Archive).unwrap_err();
        assert_eq!(err.from, Bucket::Pending);
        // Displaying cannot be promoted again.
        assert!(Bucket::Displaying.apply(BucketTransition::Promote).is_err());
    }

    #[test]
    fn test_transition_endpoints_agree_with_apply() {
        for t in [BucketTransition::Promote, BucketTransition::Archive] {
            assert_eq!(t.source().apply(t).unwrap(), t.target());
        }
    }
}
