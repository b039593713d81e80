//! Route groups.

use crate::api::AppState;
use axum::Router;

pub mod customers;
pub mod dashboard;
pub mod inventory_logs;
pub mod products;
pub mod purchase_orders;
pub mod suppliers;
pub mod transactions;
pub mod users;

/// Back-office endpoints, mounted under `/admin`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(products::admin_router())
        .merge(suppliers::router())
        .merge(purchase_orders::router())
        .merge(transactions::admin_router())
        .merge(inventory_logs::router())
        .merge(users::router())
}

/// Cashier endpoints, mounted under `/user`.
pub fn user_router() -> Router<AppState> {
    Router::new()
        .merge(products::user_router())
        .merge(transactions::user_router())
        .merge(customers::router())
}
