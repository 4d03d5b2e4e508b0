//! Storage abstractions for the photo wall.
//!
//! Defines the bucketed image store trait, an in-memory backend, and a
//! bucket summary used by the CLI. The filesystem backend lives in
//! weddingwall-infra.

pub mod image_store;
pub mod memory;
pub mod status;
