//! Category business logic - Handles product category management.
//!
//! Category names are unique. The uniqueness check runs before the write so a clash is
//! reported as a field error rather than a constraint violation.

use crate::{
    core::validation,
    entities::{Category, Product, category, product},
    errors::{Error, FieldErrors, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Retrieves all categories, ordered alphabetically by name.
pub async fn get_all_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a category by its unique ID.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its exact name.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn validate_name(db: &DatabaseConnection, name: &str, except_id: Option<i64>) -> Result<()> {
    let mut errors = FieldErrors::new();
    validation::require_text(&mut errors, "name", name, None);

    if errors.is_empty() {
        if let Some(existing) = get_category_by_name(db, name).await? {
            if Some(existing.id) != except_id {
                errors.add("name", "The name has already been taken.");
            }
        }
    }

    errors.into_result()
}

/// Creates a new category with a unique, non-blank name.
#[instrument(skip(db))]
pub async fn create_category(db: &DatabaseConnection, name: String) -> Result<category::Model> {
    validate_name(db, &name, None).await?;

    let now = chrono::Utc::now().naive_utc();
    let category = category::ActiveModel {
        name: Set(name.trim().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = category.insert(db).await?;
    info!("Created category '{}' (ID: {})", created.name, created.id);
    Ok(created)
}

/// Renames an existing category, keeping names unique.
#[instrument(skip(db))]
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i64,
    name: String,
) -> Result<category::Model> {
    validate_name(db, &name, Some(category_id)).await?;

    let mut category: category::ActiveModel = get_category_by_id(db, category_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "category",
            id: category_id,
        })?
        .into();

    category.name = Set(name.trim().to_string());
    category.updated_at = Set(chrono::Utc::now().naive_utc());

    category.update(db).await.map_err(Into::into)
}

/// Permanently deletes a category that no product row refers to.
#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let products = Product::find()
        .filter(product::Column::CategoryId.eq(category_id))
        .count(db)
        .await?;
    if products > 0 {
        return Err(Error::InUse {
            entity: "category",
            id: category_id,
            dependents: "products",
        });
    }

    let result = Category::delete_by_id(category_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "category",
            id: category_id,
        });
    }
    info!("Deleted category {}", category_id);
    Ok(())
}
