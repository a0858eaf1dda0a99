//! DexFlow CLI and server binary
//!
//! Entry point for the DexFlow service. Provides commands for
//! initializing and validating configuration, applying database
//! migrations, and starting the execution service.

mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use config::{
    generate_default_config, load_config, save_config, validate_config, AppConfig, PostgresConfig,
    QueueBackend, StorageBackend,
};
use engine::{OrderPipeline, StatusBroadcaster};
use observability::{init_logging, metrics::init_metrics, LogFormat};
use oms::store::postgres::run_migrations;
use oms::{InMemoryOrderStore, OrderStore, PostgresOrderStore};
use queue::{InMemoryJobQueue, JobQueue, QueueConsumer, QueuePolicy, RedisJobQueue};
use server::{create_router, AppState, HttpServer, ShutdownController};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{error, info, warn};
use venues::{SimulatedVenue, VenueAdapter, VenueRouter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start { config, port } => start_service(&config, port).await,
        Commands::Validate { config } => {
            init_logging("dexflow", LogFormat::Pretty)?;
            validate_command(&config).await
        }
        Commands::Init { output } => {
            init_logging("dexflow", LogFormat::Pretty)?;
            init_command(&output).await
        }
        Commands::Migrate { config } => {
            init_logging("dexflow", LogFormat::Pretty)?;
            migrate_command(&config).await
        }
    }
}

async fn start_service(config_path: &Path, port_override: Option<u16>) -> Result<()> {
    let config = load_config(config_path)?;

    let format = LogFormat::parse(&config.logging.format).unwrap_or_default();
    init_logging(&config.service.name, format)?;

    let report = validate_config(&config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    if !report.is_valid() {
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start service due to configuration errors");
    }

    if let Some(metrics_port) = config.logging.metrics_port {
        init_metrics(metrics_port)?;
    }

    let store = build_store(&config).await?;
    let queue = build_queue(&config).await?;
    let venue_router = build_venue_router(&config)?;
    let broadcaster = Arc::new(StatusBroadcaster::new());

    let pipeline = Arc::new(OrderPipeline::new(
        store.clone(),
        venue_router,
        broadcaster.clone(),
        config.queue.max_attempts,
    ));

    let policy = QueuePolicy {
        max_attempts: config.queue.max_attempts,
        concurrency: config.queue.concurrency,
        retry_backoff: Duration::from_millis(config.queue.retry_backoff_ms),
    };
    let consumer = QueueConsumer::new(queue.clone(), pipeline, policy);

    let state = Arc::new(AppState::new(
        store,
        queue,
        broadcaster,
        config.service.name.clone(),
    ));
    let http_port = port_override.unwrap_or(config.service.port);
    let http = HttpServer::new(config.service.host.clone(), http_port, create_router(state));

    let shutdown = ShutdownController::with_ctrl_c();

    let consumer_token = shutdown.child_token();
    let consumer_handle = tokio::spawn(async move { consumer.run(consumer_token).await });

    info!(
        service = %config.service.name,
        host = %config.service.host,
        port = http_port,
        "Starting DexFlow"
    );

    http.run(shutdown.child_token()).await?;

    // The server has stopped; make sure the consumer drains too.
    shutdown.shutdown();
    match consumer_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(%e, "Queue consumer exited with error"),
        Err(e) => error!(%e, "Queue consumer task panicked"),
    }

    info!("DexFlow shutdown complete");
    Ok(())
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn OrderStore>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory order store");
            Ok(Arc::new(InMemoryOrderStore::new()))
        }
        StorageBackend::Postgres => {
            let pg = config
                .storage
                .postgres
                .as_ref()
                .context("storage.postgres must be set when backend is postgres")?;
            let pool = connect_postgres(pg).await?;
            run_migrations(&pool).await?;
            info!("Using Postgres order store");
            Ok(Arc::new(PostgresOrderStore::new(pool)))
        }
    }
}

async fn connect_postgres(pg: &PostgresConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(pg.max_connections)
        .acquire_timeout(Duration::from_secs(pg.connect_timeout_seconds))
        .connect(&pg.url)
        .await
        .context("Failed to connect to Postgres")
}

async fn build_queue(config: &AppConfig) -> Result<Arc<dyn JobQueue>> {
    match config.queue.backend {
        QueueBackend::Memory => {
            info!("Using in-memory job queue");
            Ok(Arc::new(InMemoryJobQueue::new()))
        }
        QueueBackend::Redis => {
            let redis = config
                .queue
                .redis
                .as_ref()
                .context("queue.redis must be set when backend is redis")?;
            let queue = RedisJobQueue::connect(&redis.url, redis.queue_key.clone()).await?;
            info!("Using Redis job queue");
            Ok(Arc::new(queue))
        }
    }
}

fn build_venue_router(config: &AppConfig) -> Result<Arc<VenueRouter>> {
    let venues: Vec<Arc<dyn VenueAdapter>> = config
        .venues
        .iter()
        .filter(|v| v.enabled)
        .map(|v| {
            Arc::new(SimulatedVenue::new(
                &v.name,
                v.price_band[0],
                v.price_band[1],
                v.fee,
            )) as Arc<dyn VenueAdapter>
        })
        .collect();

    anyhow::ensure!(!venues.is_empty(), "At least one venue must be enabled");
    info!(venue_count = venues.len(), "Venue router configured");
    Ok(Arc::new(VenueRouter::new(venues)))
}

async fn validate_command(config_path: &Path) -> Result<()> {
    info!(path = ?config_path, "Validating configuration");

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {}", config.service.name);
    println!("Listen: {}:{}", config.service.host, config.service.port);
    println!("Storage backend: {:?}", config.storage.backend);
    println!("Queue backend: {:?}", config.queue.backend);
    println!(
        "Venues: {} ({} enabled)",
        config.venues.len(),
        config.venues.iter().filter(|v| v.enabled).count()
    );

    Ok(())
}

async fn init_command(output_path: &Path) -> Result<()> {
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("This configuration includes:");
    println!("  - In-memory storage and queue backends (no external services needed)");
    println!("  - 2 simulated venues (raydium, meteora)");
    println!("  - Retry policy: 3 attempts, 10 concurrent orders");
    println!();
    println!("Next steps:");
    println!("  1. Edit the configuration file to customize settings");
    println!(
        "  2. Run 'dexflow validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'dexflow start --config {:?}' to start the service",
        output_path
    );

    Ok(())
}

async fn migrate_command(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    let pg = config
        .storage
        .postgres
        .as_ref()
        .context("storage.postgres must be configured to run migrations")?;

    let pool = connect_postgres(pg).await?;
    run_migrations(&pool).await?;

    println!("[ok] Migrations applied");
    Ok(())
}
