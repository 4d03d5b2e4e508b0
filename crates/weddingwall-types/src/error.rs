use thiserror::Error;

use crate::bucket::{Bucket, BucketTransition};

/// Errors from image storage backends (used by the `ImageStore` trait in core).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("image '{name}' not found in {bucket}")]
    NotFound { name: String, bucket: Bucket },

    #[error("invalid image name: {0}")]
    InvalidName(String),

    #[error("storage I/O error: {0}")]
    Io(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// An illegal bucket move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {transition} an image in {from}")]
pub struct TransitionError {
    pub from: Bucket,
    pub transition: BucketTransition,
}

/// Errors from the messaging platform client.
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("messaging API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Errors that reject or abort a webhook call.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing signature header")]
    MissingSignature,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),

    /// Structural failure while dispatching events (e.g. a reply could not be sent).
    #[error("event dispatch failed: {0}")]
    Dispatch(String),
}

/// Errors from a rotation poll.
#[derive(Debug, Error)]
pub enum RotationError {
    /// The selected candidate could not be moved into Displaying.
    #[error("failed to move '{name}' into displaying: {source}")]
    CriticalMove {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to read '{name}' from displaying: {source}")]
    ReadFailed {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::NotFound {
            name: "a.jpg".to_string(),
            bucket: Bucket::Displaying,
        };
        assert_eq!(err.to_string(), "image 'a.jpg' not found in displaying");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_transition_error_display() {
        let err = TransitionError {
            from: Bucket::Done,
            transition: BucketTransition::Promote,
        };
        assert_eq!(err.to_string(), "cannot promote an image in done");
    }

    #[test]
    fn test_rotation_error_keeps_source() {
        let err = RotationError::CriticalMove {
            name: "a.jpg".to_string(),
            source: StorageError::Io("disk full".to_string()),
        };
        assert!(err.to_string().contains("disk full"));
    }
}
