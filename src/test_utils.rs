//! Shared test utilities for `stock-ledger`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        category,
        customer::{self, CustomerInput},
        product::{self, ProductInput},
        supplier::{self, SupplierInput},
        user::{self, UserInput},
    },
    entities::{self, InventoryLog, Role, TransactionDetail, TransactionType, User},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A database holding one of everything a transaction needs.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub category: entities::category::Model,
    /// "Test Product", stock 10, price 10.0, minimum level 5
    pub product: entities::product::Model,
    pub customer: entities::customer::Model,
    pub admin: entities::user::Model,
    /// A `user`-role operator
    pub cashier: entities::user::Model,
}

/// Sets up a complete test environment for stock tests.
pub async fn setup_fixture() -> Result<Fixture> {
    let db = setup_test_db().await?;
    let category = create_test_category(&db, "Test Category").await?;
    let product = create_custom_product(&db, "Test Product", category.id, 10).await?;
    let customer = create_test_customer(&db, "Test Customer").await?;
    let admin = create_test_user(&db, Role::Admin).await?;
    let cashier = create_test_user(&db, Role::User).await?;

    Ok(Fixture {
        db,
        category,
        product,
        customer,
        admin,
        cashier,
    })
}

/// Creates a test category.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(db, name.to_string()).await
}

/// Creates a test product with a custom starting stock.
///
/// # Defaults
/// * price: 10.0
/// * `minimum_stock_level`: 5
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    category_id: i64,
    stock: i64,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        ProductInput {
            name: name.to_string(),
            stock,
            price: 10.0,
            category_id,
            minimum_stock_level: 5,
        },
    )
    .await
}

/// Creates a test customer with no phone or address.
pub async fn create_test_customer(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::customer::Model> {
    customer::create_customer(
        db,
        CustomerInput {
            name: name.to_string(),
            phone: None,
            address: None,
        },
    )
    .await
}

/// Creates a test supplier.
pub async fn create_test_supplier(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::supplier::Model> {
    supplier::create_supplier(
        db,
        SupplierInput {
            name: name.to_string(),
            phone: "555-0100".to_string(),
            address: "1 Warehouse Lane".to_string(),
        },
    )
    .await
}

/// Creates a test user with the given role and a unique email.
pub async fn create_test_user(
    db: &DatabaseConnection,
    role: Role,
) -> Result<entities::user::Model> {
    let existing = User::find().count(db).await?;
    user::create_user(
        db,
        UserInput {
            name: format!("Test {}", role.as_str()),
            email: format!("{}{existing}@example.com", role.as_str()),
            role,
        },
    )
    .await
}

/// Inserts a transaction header with no lines and no stock effects.
pub async fn insert_bare_transaction(
    fixture: &Fixture,
    transaction_type: TransactionType,
) -> Result<entities::transaction::Model> {
    entities::transaction::ActiveModel {
        transaction_type: Set(transaction_type),
        customer_id: Set(fixture.customer.id),
        user_id: Set(fixture.admin.id),
        total_price: Set(0.0),
        created_at: Set(chrono::Utc::now()),
        is_deleted: Set(false),
        ..Default::default()
    }
    .insert(&fixture.db)
    .await
    .map_err(Into::into)
}

/// Current stock of a product.
pub async fn stock_of(db: &DatabaseConnection, product_id: i64) -> Result<i64> {
    product::get_product_by_id(db, product_id)
        .await?
        .map(|p| p.stock)
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })
}

/// Inventory log rows carrying `reference`, oldest first.
pub async fn logs_for(
    db: &DatabaseConnection,
    reference: &str,
) -> Result<Vec<entities::inventory_log::Model>> {
    InventoryLog::find()
        .filter(entities::inventory_log::Column::Reference.eq(reference))
        .order_by_asc(entities::inventory_log::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Detail rows stored for a transaction.
pub async fn details_for(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Vec<entities::transaction_detail::Model>> {
    TransactionDetail::find()
        .filter(entities::transaction_detail::Column::TransactionId.eq(transaction_id))
        .order_by_asc(entities::transaction_detail::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

