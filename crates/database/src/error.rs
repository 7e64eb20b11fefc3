use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database operation failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to decode a database row: {0}")]
    Decode(#[from] core_types::CoreError),

    #[error("The requested data was not found in the database.")]
    NotFound,
}
