//! Observability setup: tracing subscriber and optional OpenTelemetry export.

pub mod tracing_setup;

pub use tracing_setup::{LogSettings, init_tracing, shutdown_tracing};
