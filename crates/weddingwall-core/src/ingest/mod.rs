//! Webhook ingest pipeline.
//!
//! Verifies the LINE signature over the raw body, parses events, saves
//! eligible images into the Pending bucket, and answers each event with a
//! canned reply according to the multi-image reply policy.

pub mod client;
pub mod policy;
pub mod replies;
pub mod service;
pub mod signature;
