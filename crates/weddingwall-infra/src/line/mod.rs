//! LINE Messaging API adapters.
//!
//! `LineSignatureVerifier` checks the `x-line-signature` header and
//! `LineMessagingClient` downloads message content and sends replies.

pub mod client;
pub mod signature;

pub use client::LineMessagingClient;
pub use signature::LineSignatureVerifier;
