//! Product business logic - Handles all product-related operations.
//!
//! This module provides catalog management for products plus the two ways stock can
//! change outside of reporting: the atomic delta used by the stock-adjustment procedure
//! ([`adjust_stock_atomic`]) and the absolute overwrite used by stock management
//! ([`set_stock`]). Neither clamps at zero.

use crate::{
    core::validation,
    entities::{Category, Product, category, product},
    errors::{Error, FieldErrors, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    /// Product name
    pub name: String,
    /// On-hand quantity
    pub stock: i64,
    /// Unit price
    pub price: f64,
    /// Category the product belongs to
    pub category_id: i64,
    /// Low-stock threshold
    pub minimum_stock_level: i64,
}

/// Optional filters for product listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Only products in this category
    pub category_id: Option<i64>,
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
}

/// A product together with its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithCategory {
    /// The product row
    #[serde(flatten)]
    pub product: product::Model,
    /// Its category, if the category row still exists
    pub category: Option<category::Model>,
}

/// Retrieves all active (non-deleted) products, ordered alphabetically by name.
pub async fn get_all_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    search_products(db, &ProductFilter::default()).await
}

/// Retrieves active products matching the filter, ordered alphabetically by name.
pub async fn search_products(
    db: &DatabaseConnection,
    filter: &ProductFilter,
) -> Result<Vec<product::Model>> {
    let mut query = Product::find().filter(product::Column::IsDeleted.eq(false));

    if let Some(category_id) = filter.category_id {
        query = query.filter(product::Column::CategoryId.eq(category_id));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(product::Column::Name.contains(search));
    }

    query
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves active products together with their category.
pub async fn get_products_with_category(
    db: &DatabaseConnection,
    filter: &ProductFilter,
) -> Result<Vec<ProductWithCategory>> {
    let products = search_products(db, filter).await?;
    let categories = Category::find().all(db).await?;

    Ok(products
        .into_iter()
        .map(|product| {
            let category = categories
                .iter()
                .find(|c| c.id == product.category_id)
                .cloned();
            ProductWithCategory { product, category }
        })
        .collect())
}

/// Retrieves active products whose stock is at or below their minimum stock level.
pub async fn get_low_stock_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .filter(
            Expr::col(product::Column::Stock)
                .lte(Expr::col(product::Column::MinimumStockLevel)),
        )
        .order_by_asc(product::Column::Stock)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID, deleted or not.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an active product by its exact name.
pub async fn get_product_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Name.eq(name.trim()))
        .filter(product::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn validate_product_input(db: &DatabaseConnection, input: &ProductInput) -> Result<()> {
    let mut errors = FieldErrors::new();
    validation::require_text(&mut errors, "name", &input.name, None);
    validation::require_min(&mut errors, "stock", input.stock, 0);
    validation::require_amount(&mut errors, "price", input.price);
    validation::require_min(
        &mut errors,
        "minimum_stock_level",
        input.minimum_stock_level,
        0,
    );

    if Category::find_by_id(input.category_id).one(db).await?.is_none() {
        errors.add("category_id", validation::missing_reference("category_id"));
    }

    errors.into_result()
}

/// Creates a new product after validating every field.
///
/// The initial stock is taken as given and is not recorded in the inventory log.
#[instrument(skip(db))]
pub async fn create_product(
    db: &DatabaseConnection,
    input: ProductInput,
) -> Result<product::Model> {
    validate_product_input(db, &input).await?;

    let now = chrono::Utc::now().naive_utc();
    let product = product::ActiveModel {
        name: Set(input.name.trim().to_string()),
        stock: Set(input.stock),
        price: Set(input.price),
        minimum_stock_level: Set(input.minimum_stock_level),
        category_id: Set(input.category_id),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = product.insert(db).await?;
    info!("Created product '{}' (ID: {})", created.name, created.id);
    Ok(created)
}

/// Updates every editable field of an active product.
#[instrument(skip(db))]
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    validate_product_input(db, &input).await?;

    let mut product: product::ActiveModel = find_active(db, product_id).await?.into();

    product.name = Set(input.name.trim().to_string());
    product.stock = Set(input.stock);
    product.price = Set(input.price);
    product.category_id = Set(input.category_id);
    product.minimum_stock_level = Set(input.minimum_stock_level);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    product.update(db).await.map_err(Into::into)
}

/// Overwrites the stock of an active product with an absolute, non-negative value.
///
/// Direct edits bypass the stock-adjustment procedure and write no inventory log entry.
#[instrument(skip(db))]
pub async fn set_stock(
    db: &DatabaseConnection,
    product_id: i64,
    stock: i64,
) -> Result<product::Model> {
    let mut errors = FieldErrors::new();
    validation::require_min(&mut errors, "stock", stock, 0);
    errors.into_result()?;

    let mut product: product::ActiveModel = find_active(db, product_id).await?.into();
    product.stock = Set(stock);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = product.update(db).await?;
    info!("Stock of product {} set to {}", updated.id, updated.stock);
    Ok(updated)
}

/// Soft deletes a product, preserving its transaction and log history.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let mut product: product::ActiveModel = find_active(db, product_id).await?.into();

    product.is_deleted = Set(true);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    product.update(db).await.map_err(Into::into)
}

async fn find_active(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    get_product_by_id(db, product_id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })
}

/// Adds a signed delta to a product's stock in a single SQL statement.
///
/// Rather than reading the stock, modifying it and writing it back (which can lose updates
/// under concurrency), this issues `UPDATE products SET stock = stock + delta WHERE id = ?`.
/// Soft-deleted products are still adjusted so that reversing an old transaction restores
/// their stock too. The result may be negative.
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `product_id` - ID of the product to update
/// * `delta` - Units to add (negative to remove)
///
/// # Returns
/// The updated product model
pub async fn adjust_stock_atomic<C>(db: &C, product_id: i64, delta: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    let result = Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).add(delta),
        )
        .filter(product::Column::Id.eq(product_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "product",
            id: product_id,
        });
    }

    let updated = get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })?;
    debug!(
        "Adjusted stock of product {} by {} to {}",
        product_id, delta, updated.stock
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_product(
            &db,
            ProductInput {
                name: "  ".to_string(),
                stock: -1,
                price: f64::NAN,
                category_id: 999,
                minimum_stock_level: -5,
            },
        )
        .await;

        let Err(Error::Validation { errors }) = result else {
            panic!("expected validation error");
        };
        for field in ["name", "stock", "price", "category_id", "minimum_stock_level"] {
            assert!(errors.contains(field), "missing error for {field}");
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Drinks").await?;

        let product = create_product(
            &db,
            ProductInput {
                name: " Cola ".to_string(),
                stock: 24,
                price: 1.5,
                category_id: category.id,
                minimum_stock_level: 6,
            },
        )
        .await?;

        assert_eq!(product.name, "Cola");
        assert_eq!(product.stock, 24);
        assert_eq!(product.price, 1.5);
        assert_eq!(product.category_id, category.id);
        assert!(!product.is_deleted);

        Ok(())
    }

    #[tokio::test]
    async fn test_search_products_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let drinks = create_test_category(&db, "Drinks").await?;
        let snacks = create_test_category(&db, "Snacks").await?;
        create_custom_product(&db, "Orange Juice", drinks.id, 10).await?;
        create_custom_product(&db, "Apple Juice", drinks.id, 10).await?;
        create_custom_product(&db, "Crisps", snacks.id, 10).await?;

        let juices = search_products(
            &db,
            &ProductFilter {
                category_id: None,
                search: Some("juice".to_string()),
            },
        )
        .await?;
        let names: Vec<&str> = juices.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Apple Juice", "Orange Juice"]);

        let in_snacks = search_products(
            &db,
            &ProductFilter {
                category_id: Some(snacks.id),
                search: None,
            },
        )
        .await?;
        assert_eq!(in_snacks.len(), 1);
        assert_eq!(in_snacks[0].name, "Crisps");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Drinks").await?;
        let product = create_custom_product(&db, "Water", category.id, 5).await?;

        let updated = update_product(
            &db,
            product.id,
            ProductInput {
                name: "Sparkling Water".to_string(),
                stock: 12,
                price: 0.9,
                category_id: category.id,
                minimum_stock_level: 3,
            },
        )
        .await?;

        assert_eq!(updated.name, "Sparkling Water");
        assert_eq!(updated.stock, 12);
        assert_eq!(updated.minimum_stock_level, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_stock() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Drinks").await?;
        let product = create_custom_product(&db, "Tea", category.id, 5).await?;

        let updated = set_stock(&db, product.id, 40).await?;
        assert_eq!(updated.stock, 40);

        let negative = set_stock(&db, product.id, -1).await;
        assert!(matches!(negative, Err(Error::Validation { errors }) if errors.contains("stock")));

        let missing = set_stock(&db, 999, 1).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_hides_it() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Drinks").await?;
        let product = create_custom_product(&db, "Lemonade", category.id, 5).await?;

        let deleted = delete_product(&db, product.id).await?;
        assert!(deleted.is_deleted);
        assert!(get_all_active_products(&db).await?.is_empty());

        let again = delete_product(&db, product.id).await;
        assert!(matches!(again, Err(Error::NotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_low_stock_products() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Drinks").await?;
        let low = create_custom_product(&db, "Low", category.id, 2).await?;
        create_custom_product(&db, "Plenty", category.id, 100).await?;

        let result = get_low_stock_products(&db).await?;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, low.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_adjust_stock_atomic_allows_negative() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Drinks").await?;
        let product = create_custom_product(&db, "Milk", category.id, 3).await?;

        let updated = adjust_stock_atomic(&db, product.id, -5).await?;
        assert_eq!(updated.stock, -2);

        let restored = adjust_stock_atomic(&db, product.id, 5).await?;
        assert_eq!(restored.stock, 3);

        let missing = adjust_stock_atomic(&db, 999, 1).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        Ok(())
    }
}
