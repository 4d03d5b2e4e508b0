//! Wedding photo wall entry point.
//!
//! Binary name: `wwall`
//!
//! Parses CLI arguments, sets up tracing, wires services, then either starts
//! the HTTP server or runs a one-off command against the upload directory.

mod cli;
mod http;
mod state;

use clap::Parser;
use weddingwall_observe::tracing_setup::{LogSettings, filter_for_verbosity, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = LogSettings {
        default_filter: filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        json: cli.log_json,
        otel: cli.otel,
    };
    init_tracing(&settings).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init().await?;

    let result = run(cli, state).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Rotate { output } => {
            cli::rotate::rotate(&state, output.as_deref(), cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(
                addr = %addr,
                upload_dir = %state.store.base_dir().display(),
                "server listening"
            );
            if !cli.quiet {
                println!(
                    "  {} Wedding wall listening on {}",
                    console::style("📷").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("server stopped");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
