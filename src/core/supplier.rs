//! Supplier business logic.

use crate::{
    core::validation,
    entities::{PurchaseOrder, Supplier, purchase_order, supplier},
    errors::{Error, FieldErrors, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields accepted when creating or updating a supplier.
#[derive(Debug, Clone, Deserialize)]
pub struct SupplierInput {
    /// Required, at most 255 characters
    pub name: String,
    /// Required, at most 20 characters
    pub phone: String,
    /// Required
    pub address: String,
}

impl SupplierInput {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        validation::require_text(&mut errors, "name", &self.name, Some(255));
        validation::require_text(&mut errors, "phone", &self.phone, Some(20));
        validation::require_text(&mut errors, "address", &self.address, None);
        errors.into_result()
    }
}

/// Retrieves all suppliers, ordered by name.
pub async fn get_all_suppliers(db: &DatabaseConnection) -> Result<Vec<supplier::Model>> {
    Supplier::find()
        .order_by_asc(supplier::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a supplier by its unique ID.
pub async fn get_supplier_by_id(
    db: &DatabaseConnection,
    supplier_id: i64,
) -> Result<Option<supplier::Model>> {
    Supplier::find_by_id(supplier_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a supplier.
#[instrument(skip(db))]
pub async fn create_supplier(
    db: &DatabaseConnection,
    input: SupplierInput,
) -> Result<supplier::Model> {
    input.validate()?;

    let now = chrono::Utc::now().naive_utc();
    let created = supplier::ActiveModel {
        name: Set(input.name.trim().to_string()),
        phone: Set(input.phone.trim().to_string()),
        address: Set(input.address.trim().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created supplier '{}' (ID: {})", created.name, created.id);
    Ok(created)
}

/// Replaces a supplier's details.
#[instrument(skip(db))]
pub async fn update_supplier(
    db: &DatabaseConnection,
    supplier_id: i64,
    input: SupplierInput,
) -> Result<supplier::Model> {
    input.validate()?;

    let mut supplier: supplier::ActiveModel = get_supplier_by_id(db, supplier_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "supplier",
            id: supplier_id,
        })?
        .into();

    supplier.name = Set(input.name.trim().to_string());
    supplier.phone = Set(input.phone.trim().to_string());
    supplier.address = Set(input.address.trim().to_string());
    supplier.updated_at = Set(chrono::Utc::now().naive_utc());

    supplier.update(db).await.map_err(Into::into)
}

/// Permanently deletes a supplier no purchase order refers to.
#[instrument(skip(db))]
pub async fn delete_supplier(db: &DatabaseConnection, supplier_id: i64) -> Result<()> {
    let orders = PurchaseOrder::find()
        .filter(purchase_order::Column::SupplierId.eq(supplier_id))
        .count(db)
        .await?;
    if orders > 0 {
        return Err(Error::InUse {
            entity: "supplier",
            id: supplier_id,
            dependents: "purchase orders",
        });
    }

    let result = Supplier::delete_by_id(supplier_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "supplier",
            id: supplier_id,
        });
    }
    info!("Deleted supplier {}", supplier_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn input(name: &str, phone: &str, address: &str) -> SupplierInput {
        SupplierInput {
            name: name.to_string(),
            phone: phone.to_string(),
            address: address.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_supplier_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_supplier(&db, input("", "012345678901234567890", " ")).await;
        let Err(Error::Validation { errors }) = result else {
            panic!("expected validation error");
        };
        assert!(errors.contains("name"));
        assert!(errors.contains("phone"));
        assert!(errors.contains("address"));

        Ok(())
    }

    #[tokio::test]
    async fn test_supplier_crud() -> Result<()> {
        let db = setup_test_db().await?;
        create_supplier(&db, input("Zenith Foods", "555-0101", "1 Dock Road")).await?;
        let acme = create_supplier(&db, input("Acme", "555-0100", "2 Dock Road")).await?;

        let names: Vec<String> = get_all_suppliers(&db)
            .await?
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Acme".to_string(), "Zenith Foods".to_string()]);

        let updated =
            update_supplier(&db, acme.id, input("Acme Wholesale", "555-0199", "3 Pier")).await?;
        assert_eq!(updated.name, "Acme Wholesale");
        assert_eq!(updated.phone, "555-0199");

        delete_supplier(&db, acme.id).await?;
        assert!(get_supplier_by_id(&db, acme.id).await?.is_none());
        assert!(matches!(
            update_supplier(&db, acme.id, input("X", "1", "Y")).await,
            Err(Error::NotFound { .. })
        ));

        Ok(())
    }
}
