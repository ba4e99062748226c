//! Parley CLI and REST API entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over these when set
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,parley=debug",
        _ => "trace",
    };

    parley_observe::tracing_setup::init_tracing(cli.otel, filter)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    let result = run(cli, state).await;
    parley_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Session { action } => {
            cli::session::handle_session_command(action, &state, cli.json).await?;
        }

        Commands::Stats { action } => {
            cli::stats::handle_stats_command(action, &state, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(
                %addr,
                missing_counter = %state.config.statistics.missing_counter,
                "Parley API listening"
            );
            if !cli.quiet {
                println!(
                    "  {} Parley API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// A signal handler that fails to install never fires; the other one still
/// can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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

    tracing::info!("Shutdown signal received");
}
