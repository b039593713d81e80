//! Catalog endpoints: products, categories and direct stock edits.

use crate::{
    api::{AppState, error::ApiResult, extract::ValidJson},
    core::{
        category,
        product::{self, ProductFilter, ProductInput},
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
struct CategoryBody {
    name: String,
}

#[derive(Debug, Deserialize)]
struct StockBody {
    stock: i64,
}

/// Catalog management: products, categories and stock edits.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/categories", post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
        .route("/stock", get(list_stock))
        .route("/stock/:id", put(update_stock))
}

/// Read-only product listing for cashiers.
pub fn user_router() -> Router<AppState> {
    Router::new().route("/products", get(list_products))
}

async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<Value>> {
    let products = product::get_products_with_category(&state.db, &filter).await?;
    let categories = category::get_all_categories(&state.db).await?;
    Ok(Json(json!({
        "products": products,
        "categories": categories,
    })))
}

async fn create_product(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ProductInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let product = product::create_product(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(json!(product))))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<ProductInput>,
) -> ApiResult<Json<Value>> {
    let product = product::update_product(&state.db, id, input).await?;
    Ok(Json(json!(product)))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    product::delete_product(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_category(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CategoryBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let category = category::create_category(&state.db, body.name).await?;
    Ok((StatusCode::CREATED, Json(json!(category))))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<CategoryBody>,
) -> ApiResult<Json<Value>> {
    let category = category::update_category(&state.db, id, body.name).await?;
    Ok(Json(json!(category)))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    category::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_stock(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let products = product::get_all_active_products(&state.db).await?;
    let low_stock = product::get_low_stock_products(&state.db).await?;
    Ok(Json(json!({
        "products": products,
        "low_stock": low_stock,
    })))
}

async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<StockBody>,
) -> ApiResult<Json<Value>> {
    let product = product::set_stock(&state.db, id, body.stock).await?;
    Ok(Json(json!({
        "message": "Stock updated",
        "product": product,
    })))
}
