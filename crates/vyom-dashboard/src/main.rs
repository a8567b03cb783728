//! VyomGarud dashboard - live telemetry for a single drone

use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vyom_dashboard::{app, Args, DashboardConfig, Mode};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let mut config = DashboardConfig::from_env();
    args.apply(&mut config);
    tracing::info!(url = %config.stream_url, protocol = %config.protocol, "starting dashboard");

    let mode = if args.plain { Mode::Plain } else { Mode::Terminal };
    app::run(config, mode).await
}

/// Logs go to stderr in plain mode, to `--log-file` under the terminal UI,
/// and nowhere otherwise so they cannot corrupt the screen.
fn init_tracing(args: &Args) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("vyom_dashboard=info".parse()?)
        .add_directive("vyom_link=info".parse()?);

    if args.plain {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
            .with(filter)
            .init();
    }
    Ok(())
}
