//! Customer CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use cadastro_core::CustomerId;

use crate::error::Result;
use crate::models::{Customer, NewCustomer};
use crate::state::AppState;

/// List every registered customer.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Customer>>> {
    let customers = state.customers().list().await?;
    Ok(Json(customers))
}

/// Register a new customer.
///
/// # Errors
///
/// Returns an error if the CPF is invalid, the customer is already
/// registered, or the CEP cannot be resolved.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>)> {
    let customer = state.customers().create(body).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Fetch a customer by id.
///
/// # Errors
///
/// Returns an error if no customer has this id.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Customer>> {
    let customer = state.customers().get(id).await?;
    Ok(Json(customer))
}

/// Replace an existing customer.
///
/// The id in the path names the customer to replace.
///
/// # Errors
///
/// Returns an error if no customer has this id, the CPF is invalid, or
/// the CEP cannot be resolved.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(body): Json<NewCustomer>,
) -> Result<Json<Customer>> {
    let customer = state.customers().update(id, body).await?;
    Ok(Json(customer))
}

/// Remove a customer.
///
/// # Errors
///
/// Returns an error if no customer has this id.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<StatusCode> {
    state.customers().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
