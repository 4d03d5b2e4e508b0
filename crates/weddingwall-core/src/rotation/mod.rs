//! Slideshow rotation.
//!
//! `plan` holds the pure decision logic and a backend-free model of the
//! conveyor; `service` executes plans against an `ImageStore`.

pub mod plan;
pub mod service;
