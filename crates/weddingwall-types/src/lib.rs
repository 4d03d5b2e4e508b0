//! Shared domain types for the wedding photo wall.
//!
//! This crate contains the types passed between the ingest webhook, the
//! rotation poller, and the storage backends: buckets, stored images, chat
//! events, the LINE webhook wire format, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, chrono, thiserror.

pub mod bucket;
pub mod config;
pub mod error;
pub mod event;
pub mod image;
pub mod line;
