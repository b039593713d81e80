//! Core business logic - framework-agnostic catalog, transaction, purchasing and reporting
//! operations. The request layer only translates between HTTP and these functions.

/// Product categories
pub mod category;
/// Customers
pub mod customer;
/// Back-office dashboard figures
pub mod dashboard;
/// Inventory log queries
pub mod inventory_log;
/// Products and direct stock edits
pub mod product;
/// Purchase orders and their status lifecycle
pub mod purchase_order;
/// The two-phase stock-adjustment procedure shared by transaction writes
pub mod stock;
/// Suppliers
pub mod supplier;
/// Sale and purchase transactions
pub mod transaction;
/// Users and roles
pub mod user;
/// Shared input checks
pub mod validation;
