//! Persistence for the pitch-page studio.
//!
//! - [`models`]: row structs and DTOs, one module per table.
//! - [`repositories`]: zero-sized repositories with `async fn x(pool, ..)` queries.
//! - [`store`]: the injected [`PitchStore`] storage client, with a Postgres
//!   implementation and an in-memory one for tests and local runs.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod storage;
pub mod store;

pub use store::memory::MemoryStore;
pub use store::pg::PgStore;
pub use store::{
    AnalyticsStore, LibraryStore, PitchStore, ProjectStore, SectionStore, ShareStore, StoreError,
    StoreResult,
};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
