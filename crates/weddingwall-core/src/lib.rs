//! Business logic and port traits for the wedding photo wall.
//!
//! This crate defines the traits the infrastructure layer implements
//! (`ImageStore`, `MessagingClient`, `SignatureVerifier`) and the two
//! request-driven services built on them: the webhook ingest pipeline and the
//! slideshow rotation conveyor. It depends only on `weddingwall-types`,
//! not on `weddingwall-infra` or any HTTP/filesystem crate.

pub mod ingest;
pub mod naming;
pub mod rotation;
pub mod storage;
