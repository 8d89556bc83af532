use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

/// Creates a PostgreSQL connection pool without connecting.
///
/// Connections are opened on first use, so an unreachable database surfaces as
/// per-request store errors instead of keeping the service (and generation) down.
pub fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(database_url)?;

    info!("PostgreSQL connection pool configured");
    Ok(pool)
}

/// Applies embedded migrations. Failure is logged, not fatal.
pub async fn run_migrations(pool: &PgPool) {
    match sqlx::migrate!().run(pool).await {
        Ok(()) => info!("Database migrations applied"),
        Err(e) => warn!("Could not apply database migrations, report storage may fail: {e}"),
    }
}
