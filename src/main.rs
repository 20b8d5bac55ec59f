//! eclipse-dashboard terminal entry point.
//!
//! Polls the backend, prints the dashboard on every render and reads
//! commands from stdin until `quit` or Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, watch};
use tracing_subscriber::EnvFilter;

use eclipse_dashboard::config::DashboardConfig;
use eclipse_dashboard::console::{Command, HELP};
use eclipse_dashboard::domain::{UiEvent, UiEventBus};
use eclipse_dashboard::service::{Dashboard, Poller};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = DashboardConfig::from_env().context("loading configuration")?;
    tracing::info!(backend = %config.backend_url, mode = ?config.poll_mode, "starting eclipse-dashboard");

    // Build the session
    let bus = UiEventBus::new(config.ui_bus_capacity);
    let dashboard = Arc::new(
        Dashboard::new(&config, bus.clone()).context("building dashboard client")?,
    );

    // Front-end subscription
    let printer = tokio::spawn(print_events(
        bus.subscribe(),
        Arc::clone(&dashboard),
        config.print_document,
    ));

    // Poll loop
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = Poller::new(Arc::clone(&dashboard), config.poll_interval()).spawn(shutdown_rx);

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                let command = match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => command,
                    Err(err) => {
                        eprintln!("{err}");
                        continue;
                    }
                };
                match command.execute(&dashboard).await {
                    Ok(reply) if !reply.is_empty() => println!("{reply}"),
                    Ok(_) => {}
                    // Transport failures were already shown as notices.
                    Err(err) if err.is_transport() => {}
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
    }

    let _ = shutdown_tx.send(true);
    let stats = poller.await.context("poll loop panicked")?;
    printer.abort();
    tracing::info!(applied = stats.applied, failed = stats.failed, "eclipse-dashboard stopped");
    Ok(())
}

async fn print_events(
    mut rx: broadcast::Receiver<UiEvent>,
    dashboard: Arc<Dashboard>,
    print_document: bool,
) {
    loop {
        match rx.recv().await {
            Ok(UiEvent::Notice(notice)) => eprintln!("[{}] {}", notice.timestamp.format("%H:%M:%S"), notice.message),
            Ok(UiEvent::Rendered { .. }) if print_document => {
                // Clear screen, cursor home.
                print!("\x1b[2J\x1b[H{}", dashboard.render_text().await);
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(lagged = n, "terminal lagged behind ui bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
