//! Webhook signature verification trait.
//!
//! The ingest service checks the signature before it looks at the body at
//! all; the HMAC implementation lives in weddingwall-infra.

/// Verifies that a raw webhook body was signed with the channel secret.
pub trait SignatureVerifier: Send + Sync {
    /// `signature` is the header value exactly as received.
    fn verify(&self, body: &[u8], signature: &str) -> bool;
}
