use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use netsentry::api::routes;
use netsentry::dashboard::{DashboardService, TelemetryController};
use netsentry::generator::RngSource;
use netsentry::models::config::AppConfig;
use netsentry::utils::logging;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Synthetic network telemetry with a live dashboard API")]
struct Args {
    /// Port for the dashboard API server
    #[clap(short, long, default_value = "3000")]
    port: u16,

    /// Packet timer period in milliseconds
    #[clap(long, default_value = "1000")]
    tick_ms: u64,

    /// Snapshot refresh period in seconds
    #[clap(long, default_value = "30")]
    refresh_secs: u64,

    /// Live packet buffer size
    #[clap(long, default_value = "100")]
    buffer_size: usize,

    /// Traffic chart lookback in minutes
    #[clap(long, default_value = "30")]
    window_minutes: u32,

    /// Seed for a reproducible session
    #[clap(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error, off)
    #[clap(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            port: args.port,
            tick_interval_ms: args.tick_ms,
            refresh_interval_secs: args.refresh_secs,
            buffer_size: args.buffer_size,
            window_minutes: args.window_minutes,
            seed: args.seed,
        }
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger with specified level
    logging::init_logger(logging::get_log_level(&args.log_level));

    info!("Starting netsentry v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from(args);
    config.validate().context("invalid configuration")?;

    let source = match config.seed {
        Some(seed) => {
            info!("Using seeded session {}", seed);
            RngSource::seeded(seed)
        }
        None => RngSource::from_entropy(),
    };

    let controller = TelemetryController::new(config.clone(), source)?;
    let dashboard = DashboardService::spawn(controller)?;

    let app_state = web::Data::new(dashboard.clone());

    info!("Starting dashboard API server on port {}", config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind(("127.0.0.1", config.port))?
    .run()
    .await?;

    // Server is down; stop the timers before exiting
    dashboard.shutdown().await;
    info!("netsentry stopped");

    Ok(())
}
