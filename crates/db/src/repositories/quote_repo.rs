//! Repository for the `quotes` and `contracts` tables.

use pitch_core::types::DbId;
use sqlx::PgPool;

use crate::models::quote::{AcceptQuote, Contract, Quote};
use crate::models::status::SignatureStatus;

const QUOTE_COLUMNS: &str =
    "id, project_id, pricing, sheet_reference, accepted_by_name, accepted_by_email, created_at";
const CONTRACT_COLUMNS: &str =
    "id, quote_id, signature_status_id, contract_pdf_path, quote_pdf_path, created_at, updated_at";

/// Accepted quotes and the contracts generated from them.
pub struct QuoteRepo;

impl QuoteRepo {
    pub async fn create_quote(pool: &PgPool, project_id: DbId, input: &AcceptQuote) -> Result<Quote, sqlx::Error> {
        let query = format!(
            "INSERT INTO quotes (project_id, pricing, sheet_reference, accepted_by_name, accepted_by_email)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {QUOTE_COLUMNS}"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(project_id)
            .bind(&input.pricing)
            .bind(&input.sheet_reference)
            .bind(&input.accepted_by_name)
            .bind(&input.accepted_by_email)
            .fetch_one(pool)
            .await
    }

    pub async fn find_quote(pool: &PgPool, id: DbId) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1");
        sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_quote_by_project(pool: &PgPool, project_id: DbId) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE project_id = $1");
        sqlx::query_as::<_, Quote>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Create a contract for `quote_id` awaiting signature.
    pub async fn create_contract(pool: &PgPool, quote_id: DbId) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts (quote_id, signature_status_id) VALUES ($1, $2)
             RETURNING {CONTRACT_COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(quote_id)
            .bind(SignatureStatus::Pending.id())
            .fetch_one(pool)
            .await
    }
}
