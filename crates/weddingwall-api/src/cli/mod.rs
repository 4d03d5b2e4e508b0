//! CLI command definitions for the `wwall` binary.

pub mod rotate;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Wedding photo wall: LINE webhook ingest and projector slideshow.
#[derive(Parser)]
#[command(name = "wwall", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "WEDDINGWALL_LOG_JSON")]
    pub log_json: bool,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Show bucket counts and the image on screen.
    Status,

    /// Advance the slideshow by one step, as a poll from the kiosk would.
    Rotate {
        /// Write the served image to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
