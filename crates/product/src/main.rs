use anyhow::{Context, Result};
use product::{handler::AppRouter, state::AppState};
use shared::{
    config::{Config, ConnectionManager},
    utils::{Telemetry, init_logger},
};
use sqlx::{Pool, Postgres};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    let mut telemetry = Telemetry::new("product-service", config.otel_endpoint.clone());
    let logger_provider = telemetry.init_logger()?;
    let _meter_provider = telemetry.init_meter()?;
    let _tracer_provider = telemetry.init_tracer()?;

    init_logger(logger_provider, "product-service");

    let db_pool = ConnectionManager::new_pool(
        &config.database_url,
        config.db_min_conn,
        config.db_max_conn,
    )
    .await
    .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("failed to migrate database")?;
    }

    let state = AppState::new(db_pool).context("Failed to create AppState")?;

    info!("✅ Application setup completed successfully.");

    AppRouter::serve(config.product_port, state).await?;

    if let Err(e) = telemetry.shutdown() {
        error!("Failed to shutdown telemetry: {}", e);
    }

    info!("✅ Product service shutdown complete.");

    Ok(())
}

pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
