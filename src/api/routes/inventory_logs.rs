use crate::{
    api::{AppState, error::ApiResult},
    core::{
        inventory_log::{self, LogFilter},
        product,
    },
    entities::LogType,
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Query string of the log listing. `type` is `in`, `out`, `all` or absent.
#[derive(Debug, Default, Deserialize)]
struct LogQuery {
    search: Option<String>,
    #[serde(rename = "type")]
    log_type: Option<String>,
}

impl LogQuery {
    fn into_filter(self) -> Result<LogFilter, Error> {
        let log_type = match self.log_type.as_deref().map(str::trim) {
            None | Some("" | "all") => None,
            Some("in") => Some(LogType::In),
            Some("out") => Some(LogType::Out),
            Some(_) => return Err(Error::invalid("type", "The selected type is invalid.")),
        };
        Ok(LogFilter {
            search: self.search,
            log_type,
        })
    }
}

/// Inventory log listing.
pub fn router() -> Router<AppState> {
    Router::new().route("/inventory-logs", get(list_logs))
}

async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> ApiResult<Json<Value>> {
    let filters = json!({ "search": query.search, "type": query.log_type });
    let filter = query.into_filter()?;

    let logs = inventory_log::get_logs(&state.db, &filter).await?;
    let products = product::get_all_active_products(&state.db).await?;
    Ok(Json(json!({
        "logs": logs,
        "products": products,
        "filters": filters,
    })))
}
