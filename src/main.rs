//! Overtime Engine entrypoint.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overtime_engine::api::{AppState, create_router};
use overtime_engine::config::{AppConfig, ConfigLoader};
use overtime_engine::provider::{AccessProvider, DeviceProvider, StaticProvider};
use overtime_engine::service::{OvertimeService, RunSummary, run_scheduled};

/// Weekly overtime reconciliation for access-control badge events
#[derive(Parser)]
#[command(name = "overtime-engine", version = env!("CARGO_PKG_VERSION"), long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(global = true, long = "config", default_value = "config/overtime.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the report browsing API and run the report on the configured schedule
    Serve,

    /// Run the weekly report once against the device
    Run {
        /// Date the run executes on (YYYY-MM-DD); the report covers the seven days before it
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Run the weekly report once against a JSON fixture
    Replay {
        /// Fixture file with employees, events and windows
        #[arg(long)]
        fixture: PathBuf,

        /// Date the run executes on (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

fn print_summary(summary: &RunSummary) {
    println!("Period: {}", summary.range);
    println!("Employees: {}", summary.employees);
    println!("Accesses: {}", summary.total_events);
    if let Some(log) = &summary.narrative_log {
        println!("Log: {}", log.display());
    }
    for report in &summary.reports {
        println!("Report: {}", report.display());
    }
    for failure in &summary.failures {
        println!(
            "Skipped: {} - {} ({})",
            failure.employee.id, failure.employee.name, failure.error
        );
    }
}

async fn run_once(
    config: &AppConfig,
    provider: Arc<dyn AccessProvider>,
    today: Option<NaiveDate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = OvertimeService::from_config(config, provider);
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let summary = service.run_once(today).await?;
    print_summary(&summary);
    Ok(())
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let trigger = config.schedule.trigger()?;
    let provider = Arc::new(DeviceProvider::new(config.device.clone())?);
    let service = Arc::new(OvertimeService::from_config(&config, provider));

    info!(cron = %trigger, "Overtime runs scheduled");
    tokio::spawn(run_scheduled(service, trigger));

    let app = create_router(AppState::from_output(&config.output));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "Report API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::load(&cli.config)?.into_config();

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Run { today } => {
            let provider = Arc::new(DeviceProvider::new(config.device.clone())?);
            run_once(&config, provider, today).await
        }
        Commands::Replay { fixture, today } => {
            let provider = Arc::new(StaticProvider::from_json_file(&fixture)?);
            run_once(&config, provider, today).await
        }
    }
}
