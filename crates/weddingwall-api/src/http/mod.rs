//! HTTP layer: the LINE webhook endpoint and the slideshow polling endpoint.

pub mod error;
pub mod handlers;
pub mod router;
