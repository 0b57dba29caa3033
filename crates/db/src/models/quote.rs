//! Accepted quotes and their contracts.

use pitch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::StatusId;

/// A `quotes` row: snapshot of the pricing a viewer accepted.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Quote {
    pub id: DbId,
    pub project_id: DbId,
    pub pricing: serde_json::Value,
    /// Reference to the external pricing sheet.
    pub sheet_reference: Option<String>,
    pub accepted_by_name: String,
    pub accepted_by_email: Option<String>,
    pub created_at: Timestamp,
}

/// Request body for accepting a quote on a published page.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AcceptQuote {
    pub pricing: serde_json::Value,
    pub sheet_reference: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub accepted_by_name: String,
    #[validate(email)]
    pub accepted_by_email: Option<String>,
}

/// A `contracts` row. PDF paths are filled in by the document service.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub quote_id: DbId,
    pub signature_status_id: StatusId,
    pub contract_pdf_path: Option<String>,
    pub quote_pdf_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
