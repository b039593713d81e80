use crate::{
    api::{AppState, error::ApiResult},
    core::dashboard::{self, Dashboard},
};
use axum::{Json, Router, extract::State, routing::get};

/// Dashboard summary endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(show_dashboard))
}

async fn show_dashboard(State(state): State<AppState>) -> ApiResult<Json<Dashboard>> {
    Ok(Json(dashboard::generate_dashboard(&state.db).await?))
}
