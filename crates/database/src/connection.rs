use crate::error::DbError;
use dotenvy::dotenv;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// Reads `DATABASE_URL` from the environment (or a `.env` file) and
/// returns a pool that can be shared across the whole application.
pub async fn connect() -> Result<PgPool, DbError> {
    // A missing .env file is fine in deployed environments where the URL
    // comes from the real environment.
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await?;

    Ok(pool)
}

/// Applies any pending database migrations.
///
/// Run at startup so the schema is always current before the first query.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
