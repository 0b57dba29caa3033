//! Handlers for the `/customers` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pitch_core::error::CoreError;
use pitch_core::types::DbId;
use pitch_db::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Customer",
        id,
    })
}

/// POST /api/v1/customers
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomer>,
) -> AppResult<(StatusCode, Json<DataResponse<Customer>>)> {
    input.validate()?;
    let customer = state.store.create_customer(&input).await?;
    tracing::info!(customer_id = customer.id, "Customer created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: customer })))
}

/// GET /api/v1/customers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Customer>>>> {
    let customers = state.store.list_customers().await?;
    Ok(Json(DataResponse { data: customers }))
}

/// GET /api/v1/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Customer>>> {
    let customer = state.store.get_customer(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: customer }))
}

/// PUT /api/v1/customers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCustomer>,
) -> AppResult<Json<DataResponse<Customer>>> {
    input.validate()?;
    let customer = state
        .store
        .update_customer(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: customer }))
}

/// DELETE /api/v1/customers/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.store.delete_customer(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
