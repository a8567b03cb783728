//! VyomGarud simulator - serves a circling drone's telemetry

use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vyom_sim::{routes, run_emitter, AppState, Args, CircularPath, SimConfig, TelemetrySim};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vyom_sim=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let mut config = SimConfig::from_env();
    args.apply(&mut config);

    let path = CircularPath::new(
        config.center_lat,
        config.center_lon,
        config.radius_m,
        config.altitude_m,
        config.speed_mps,
    )
    .with_wave(config.wave_m);

    tracing::info!(
        lat = config.center_lat,
        lon = config.center_lon,
        radius_m = config.radius_m,
        rate_hz = config.rate_hz,
        "starting telemetry simulator"
    );

    let state = AppState::new();
    tokio::spawn(run_emitter(state.clone(), TelemetrySim::new(path), config.rate_hz));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes(state)).await?;

    Ok(())
}
