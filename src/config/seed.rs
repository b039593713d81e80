//! Seed data loading from config.toml
//!
//! This module loads reference data (categories, products, suppliers, customers and
//! users) from a TOML file and inserts whatever is missing. Seeding is idempotent:
//! rows are matched by name, or by email for users, and existing rows are left alone.

use crate::{
    core::{
        category,
        customer::{self, CustomerInput},
        product::{self, ProductInput},
        supplier::{self, SupplierInput},
        user::{self, UserInput},
    },
    entities::{Customer, Role, Supplier, customer as customer_entity, supplier as supplier_entity},
    errors::{Error, Result},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    /// Category names
    #[serde(default)]
    pub categories: Vec<String>,
    /// Products, each naming an existing or seeded category
    #[serde(default)]
    pub products: Vec<ProductSeed>,
    /// Suppliers, matched by name
    #[serde(default)]
    pub suppliers: Vec<SupplierSeed>,
    /// Customers, matched by name
    #[serde(default)]
    pub customers: Vec<CustomerSeed>,
    /// Users, matched by email
    #[serde(default)]
    pub users: Vec<UserSeed>,
}

/// A product to seed
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Unique product name
    pub name: String,
    /// Name of the category the product belongs to
    pub category: String,
    /// Unit price
    pub price: f64,
    /// Opening stock, written without a log entry
    #[serde(default)]
    pub stock: i64,
    /// Low-stock threshold
    #[serde(default)]
    pub minimum_stock_level: i64,
}

/// A supplier to seed
#[derive(Debug, Deserialize, Clone)]
pub struct SupplierSeed {
    /// Supplier name
    pub name: String,
    /// Contact phone, at most 20 characters
    pub phone: String,
    /// Postal address
    pub address: String,
}

/// A customer to seed
#[derive(Debug, Deserialize, Clone)]
pub struct CustomerSeed {
    /// Customer name
    pub name: String,
    /// Optional phone
    pub phone: Option<String>,
    /// Optional address
    pub address: Option<String>,
}

/// A user to seed
#[derive(Debug, Deserialize, Clone)]
pub struct UserSeed {
    /// Display name
    pub name: String,
    /// Login email, unique
    pub email: String,
    /// `admin` or `user`
    pub role: Role,
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses seed configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<SeedConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads seed configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<SeedConfig> {
    load_config("config.toml")
}

/// Inserts every configured row that does not exist yet. Returns how many rows were added.
///
/// # Errors
/// Fails on database errors, on seed rows that do not validate, and on products naming
/// an unknown category.
pub async fn seed_database(db: &DatabaseConnection, config: &SeedConfig) -> Result<usize> {
    info!(
        "Seeding from config: {} categories, {} products, {} suppliers, {} customers, {} users",
        config.categories.len(),
        config.products.len(),
        config.suppliers.len(),
        config.customers.len(),
        config.users.len()
    );
    let mut inserted = 0;

    for name in &config.categories {
        if category::get_category_by_name(db, name).await?.is_none() {
            category::create_category(db, name.clone()).await?;
            inserted += 1;
        }
    }

    for seed in &config.products {
        if product::get_product_by_name(db, &seed.name).await?.is_some() {
            debug!("Product '{}' already present", seed.name);
            continue;
        }
        let category = category::get_category_by_name(db, &seed.category)
            .await?
            .ok_or_else(|| Error::Config {
                message: format!(
                    "Product '{}' names unknown category '{}'",
                    seed.name, seed.category
                ),
            })?;
        product::create_product(
            db,
            ProductInput {
                name: seed.name.clone(),
                stock: seed.stock,
                price: seed.price,
                category_id: category.id,
                minimum_stock_level: seed.minimum_stock_level,
            },
        )
        .await?;
        inserted += 1;
    }

    for seed in &config.suppliers {
        let exists = Supplier::find()
            .filter(supplier_entity::Column::Name.eq(seed.name.trim()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            supplier::create_supplier(
                db,
                SupplierInput {
                    name: seed.name.clone(),
                    phone: seed.phone.clone(),
                    address: seed.address.clone(),
                },
            )
            .await?;
            inserted += 1;
        }
    }

    for seed in &config.customers {
        let exists = Customer::find()
            .filter(customer_entity::Column::Name.eq(seed.name.trim()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            customer::create_customer(
                db,
                CustomerInput {
                    name: seed.name.clone(),
                    phone: seed.phone.clone(),
                    address: seed.address.clone(),
                },
            )
            .await?;
            inserted += 1;
        }
    }

    for seed in &config.users {
        if user::get_user_by_email(db, &seed.email).await?.is_none() {
            user::create_user(
                db,
                UserInput {
                    name: seed.name.clone(),
                    email: seed.email.clone(),
                    role: seed.role,
                },
            )
            .await?;
            inserted += 1;
        }
    }

    info!("Seeding finished, {} rows added", inserted);
    Ok(inserted)
}
