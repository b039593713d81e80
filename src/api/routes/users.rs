use crate::{
    api::{AppState, error::ApiResult, extract::ValidJson},
    core::user::{self, UserInput},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde_json::{Value, json};

/// User management endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
}

async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let users = user::get_all_users(&state.db).await?;
    Ok(Json(json!({ "users": users })))
}

async fn create_user(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<UserInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = user::create_user(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(json!(user))))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<UserInput>,
) -> ApiResult<Json<Value>> {
    let user = user::update_user(&state.db, id, input).await?;
    Ok(Json(json!(user)))
}

async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    user::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
