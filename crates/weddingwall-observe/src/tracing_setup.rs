//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! use weddingwall_observe::tracing_setup::{init_tracing, LogSettings};
//!
//! // Human-readable logs at the default level
//! init_tracing(&LogSettings::default()).unwrap();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::OnceLock;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// How the subscriber should be built.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Filter used when `RUST_LOG` is not set.
    pub default_filter: String,
    /// One JSON object per line instead of human-readable output.
    pub json: bool,
    /// Bridge spans to OpenTelemetry with a stdout exporter.
    pub otel: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            default_filter: filter_for_verbosity(0, false).to_string(),
            json: false,
            otel: false,
        }
    }
}

/// Map CLI verbosity flags to a filter directive.
pub fn filter_for_verbosity(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "info,weddingwall_core=debug,weddingwall_infra=debug,weddingwall_api=debug",
        _ => "trace",
    }
}

/// Initialize the global tracing subscriber.
///
/// - `RUST_LOG`, when set, takes precedence over `settings.default_filter`.
/// - With `settings.otel`, spans are also exported through OpenTelemetry
///   to stdout (swap the exporter for OTLP in production).
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(settings: &LogSettings) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.default_filter));

    let text_layer = (!settings.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE)
    });
    let json_layer = settings.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
    });

    let otel_layer = if settings.otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("weddingwall");

        // Store the provider for shutdown and register it globally.
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// No-op when OTel was not enabled.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}
