use crate::{
    api::{AppState, error::ApiResult, extract::ValidJson, session::Session},
    core::{
        product,
        purchase_order::{self, PurchaseOrderInput},
        supplier,
    },
    entities::PurchaseOrderStatus,
    errors::Error,
};
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: PurchaseOrderStatus,
}

/// Purchase order endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/purchase-orders",
            get(list_purchase_orders).post(create_purchase_order),
        )
        .route(
            "/purchase-orders/:id",
            get(show_purchase_order)
                .put(update_purchase_order)
                .delete(delete_purchase_order),
        )
}

async fn list_purchase_orders(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let orders = purchase_order::get_all_purchase_orders(&state.db).await?;
    let suppliers = supplier::get_all_suppliers(&state.db).await?;
    let products = product::get_all_active_products(&state.db).await?;
    Ok(Json(json!({
        "purchase_orders": orders,
        "suppliers": suppliers,
        "products": products,
    })))
}

async fn create_purchase_order(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidJson(input): ValidJson<PurchaseOrderInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let order = purchase_order::create_purchase_order(&state.db, session.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(json!(order))))
}

async fn show_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let order = purchase_order::get_purchase_order(&state.db, id)
        .await?
        .ok_or(Error::NotFound {
            entity: "purchase order",
            id,
        })?;
    Ok(Json(json!(order)))
}

async fn update_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<StatusBody>,
) -> ApiResult<Json<Value>> {
    let order = purchase_order::update_purchase_order_status(&state.db, id, body.status).await?;
    Ok(Json(json!(order)))
}

async fn delete_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    purchase_order::delete_purchase_order(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
