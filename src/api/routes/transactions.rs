//! Transaction endpoints for both route groups.
//!
//! Admins record sales and purchases for anyone. Cashiers only record sales, and only
//! see and delete the transactions they recorded themselves.

use crate::{
    api::{AppState, error::ApiResult, extract::ValidJson, session::Session},
    core::{
        customer, product,
        stock::LineItem,
        transaction::{self, TransactionInput, TransactionWithDetails, receipt_label},
    },
    entities::TransactionType,
    errors::Error,
};
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

/// Body of a cashier sale. The type is always `sale`.
#[derive(Debug, Deserialize)]
struct SaleInput {
    customer_id: i64,
    #[serde(deserialize_with = "crate::core::validation::deserialize_date_time")]
    created_at: DateTime<Utc>,
    items: Vec<LineItem>,
}

impl From<SaleInput> for TransactionInput {
    fn from(sale: SaleInput) -> Self {
        Self {
            customer_id: sale.customer_id,
            transaction_type: TransactionType::Sale,
            created_at: sale.created_at,
            items: sale.items,
        }
    }
}

/// Full transaction management for admins.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/:id",
            get(show_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

/// Cashier sales, scoped to the caller.
pub fn user_router() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_own_transactions).post(create_sale))
        .route(
            "/transactions/:id",
            get(show_own_transaction).delete(delete_own_transaction),
        )
        .route("/transaction-history", get(transaction_history))
}

fn with_receipt(transaction: &TransactionWithDetails) -> Value {
    json!({
        "transaction": transaction,
        "receipt": receipt_label(transaction.transaction.id),
    })
}

async fn list_transactions(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let transactions = transaction::get_all_transactions(&state.db).await?;
    let customers = customer::get_all_customers(&state.db).await?;
    let products = product::get_all_active_products(&state.db).await?;
    Ok(Json(json!({
        "transactions": transactions,
        "customers": customers,
        "products": products,
    })))
}

async fn create_transaction(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidJson(input): ValidJson<TransactionInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let created = transaction::create_transaction(&state.db, session.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(with_receipt(&created))))
}

async fn show_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let found = transaction::get_transaction_with_details(&state.db, id)
        .await?
        .ok_or(Error::NotFound {
            entity: "transaction",
            id,
        })?;
    Ok(Json(with_receipt(&found)))
}

async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<TransactionInput>,
) -> ApiResult<Json<Value>> {
    let updated = transaction::update_transaction(&state.db, id, input).await?;
    Ok(Json(with_receipt(&updated)))
}

async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    transaction::delete_transaction(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_own_transactions(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<Value>> {
    let transactions = transaction::get_transactions_for_user(&state.db, session.user_id).await?;
    let customers = customer::get_all_customers(&state.db).await?;
    let products = product::get_all_active_products(&state.db).await?;
    Ok(Json(json!({
        "transactions": transactions,
        "customers": customers,
        "products": products,
    })))
}

async fn create_sale(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidJson(sale): ValidJson<SaleInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let created = transaction::create_transaction(&state.db, session.user_id, sale.into()).await?;
    Ok((StatusCode::CREATED, Json(with_receipt(&created))))
}

async fn show_own_transaction(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let found = transaction::get_transaction_for_user(&state.db, id, session.user_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "transaction",
            id,
        })?;
    Ok(Json(with_receipt(&found)))
}

async fn delete_own_transaction(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    transaction::delete_transaction_for_user(&state.db, id, session.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn transaction_history(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<Value>> {
    let transactions = transaction::get_transactions_for_user(&state.db, session.user_id).await?;
    Ok(Json(json!({ "transactions": transactions })))
}
