//! Schema introspection used for startup capability detection.

use sqlx::PgPool;

/// Queries against `information_schema`.
pub struct SchemaRepo;

impl SchemaRepo {
    /// Whether `table.column` exists in the current schema.
    pub async fn has_column(pool: &PgPool, table: &str, column: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.columns
                WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2
             )",
        )
        .bind(table)
        .bind(column)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }
}
