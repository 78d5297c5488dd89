use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub product_port: u16,
    pub order_port: u16,
    pub otel_endpoint: String,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;

        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let product_port = std::env::var("PRODUCT_PORT")
            .context("Missing environment variable: PRODUCT_PORT")?
            .parse::<u16>()
            .context("PRODUCT_PORT must be a valid u16 integer")?;

        let order_port = std::env::var("ORDER_PORT")
            .context("Missing environment variable: ORDER_PORT")?
            .parse::<u16>()
            .context("ORDER_PORT must be a valid u16 integer")?;

        let otel_endpoint = std::env::var("OTEL_ENDPOINT")
            .unwrap_or_else(|_| "http://otel-collector:4317".to_string());

        let db_max_conn: u32 = std::env::var("DB_MAX_CONNECTION")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MAX_CONNECTION as u32")?;

        let db_min_conn: u32 = std::env::var("DB_MIN_CONNECTION")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MIN_CONNECTION as u32")?;

        Ok(Self {
            database_url,
            run_migrations,
            product_port,
            order_port,
            otel_endpoint,
            db_max_conn,
            db_min_conn,
        })
    }
}
