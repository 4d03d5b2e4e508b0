//! Infrastructure layer for the wedding photo wall.
//!
//! Contains implementations of the port traits defined in `weddingwall-core`:
//! the bucketed filesystem image store, the LINE Messaging API client and
//! signature verifier, plus configuration and credential loading.

pub mod config;
pub mod line;
pub mod storage;
