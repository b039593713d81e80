use crate::{
    api::{AppState, error::ApiResult, extract::ValidJson},
    core::customer::{self, CustomerInput},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde_json::{Value, json};

/// Customer endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:id",
            put(update_customer).delete(delete_customer),
        )
}

async fn list_customers(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let customers = customer::get_all_customers(&state.db).await?;
    Ok(Json(json!({ "customers": customers })))
}

async fn create_customer(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CustomerInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let customer = customer::create_customer(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(json!(customer))))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<CustomerInput>,
) -> ApiResult<Json<Value>> {
    let customer = customer::update_customer(&state.db, id, input).await?;
    Ok(Json(json!(customer)))
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    customer::delete_customer(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
