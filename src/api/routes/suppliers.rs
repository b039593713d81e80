use crate::{
    api::{AppState, error::ApiResult, extract::ValidJson},
    core::supplier::{self, SupplierInput},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde_json::{Value, json};

/// Supplier endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route(
            "/suppliers/:id",
            put(update_supplier).delete(delete_supplier),
        )
}

async fn list_suppliers(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let suppliers = supplier::get_all_suppliers(&state.db).await?;
    Ok(Json(json!({ "suppliers": suppliers })))
}

async fn create_supplier(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<SupplierInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let supplier = supplier::create_supplier(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(json!(supplier))))
}

async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<SupplierInput>,
) -> ApiResult<Json<Value>> {
    let supplier = supplier::update_supplier(&state.db, id, input).await?;
    Ok(Json(json!(supplier)))
}

async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    supplier::delete_supplier(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
