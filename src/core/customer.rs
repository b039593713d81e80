//! Customer business logic - Handles the counterparties of transactions.
//!
//! Both admins and cashiers manage customers. Phone and address are optional; blanks are
//! stored as NULL.

use crate::{
    core::validation,
    entities::{Customer, Transaction, customer, transaction},
    errors::{Error, FieldErrors, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields accepted when creating or updating a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    /// Required, at most 255 characters
    pub name: String,
    /// Optional, at most 20 characters
    #[serde(default)]
    pub phone: Option<String>,
    /// Optional, free text
    #[serde(default)]
    pub address: Option<String>,
}

impl CustomerInput {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        validation::require_text(&mut errors, "name", &self.name, Some(255));
        validation::optional_text(&mut errors, "phone", self.phone.as_deref(), Some(20));
        errors.into_result()
    }
}

/// Retrieves all customers, newest first.
pub async fn get_all_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>> {
    Customer::find()
        .order_by_desc(customer::Column::CreatedAt)
        .order_by_desc(customer::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a customer by its unique ID.
pub async fn get_customer_by_id(
    db: &DatabaseConnection,
    customer_id: i64,
) -> Result<Option<customer::Model>> {
    Customer::find_by_id(customer_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a customer.
#[instrument(skip(db))]
pub async fn create_customer(
    db: &DatabaseConnection,
    input: CustomerInput,
) -> Result<customer::Model> {
    input.validate()?;

    let now = chrono::Utc::now().naive_utc();
    let created = customer::ActiveModel {
        name: Set(input.name.trim().to_string()),
        phone: Set(validation::normalize_optional(input.phone)),
        address: Set(validation::normalize_optional(input.address)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created customer '{}' (ID: {})", created.name, created.id);
    Ok(created)
}

/// Replaces a customer's details.
#[instrument(skip(db))]
pub async fn update_customer(
    db: &DatabaseConnection,
    customer_id: i64,
    input: CustomerInput,
) -> Result<customer::Model> {
    input.validate()?;

    let mut customer: customer::ActiveModel = get_customer_by_id(db, customer_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "customer",
            id: customer_id,
        })?
        .into();

    customer.name = Set(input.name.trim().to_string());
    customer.phone = Set(validation::normalize_optional(input.phone));
    customer.address = Set(validation::normalize_optional(input.address));
    customer.updated_at = Set(chrono::Utc::now().naive_utc());

    customer.update(db).await.map_err(Into::into)
}

/// Permanently deletes a customer with no recorded transactions.
///
/// Soft-deleted transactions still count, since their headers keep the customer id.
#[instrument(skip(db))]
pub async fn delete_customer(db: &DatabaseConnection, customer_id: i64) -> Result<()> {
    let transactions = Transaction::find()
        .filter(transaction::Column::CustomerId.eq(customer_id))
        .count(db)
        .await?;
    if transactions > 0 {
        return Err(Error::InUse {
            entity: "customer",
            id: customer_id,
            dependents: "transactions",
        });
    }

    let result = Customer::delete_by_id(customer_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "customer",
            id: customer_id,
        });
    }
    info!("Deleted customer {}", customer_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_customer_normalizes_optional_fields() -> Result<()> {
        let db = setup_test_db().await?;

        let customer = create_customer(
            &db,
            CustomerInput {
                name: " Dana ".to_string(),
                phone: Some("   ".to_string()),
                address: None,
            },
        )
        .await?;

        assert_eq!(customer.name, "Dana");
        assert_eq!(customer.phone, None);
        assert_eq!(customer.address, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_customer_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_customer(
            &db,
            CustomerInput {
                name: String::new(),
                phone: Some("1".repeat(21)),
                address: None,
            },
        )
        .await;

        let Err(Error::Validation { errors }) = result else {
            panic!("expected validation error");
        };
        assert!(errors.contains("name"));
        assert!(errors.contains("phone"));
        Ok(())
    }

    #[tokio::test]
    async fn test_customer_update_and_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_customer(&db, "First").await?;
        let second = create_test_customer(&db, "Second").await?;

        let listed = get_all_customers(&db).await?;
        assert_eq!(listed[0].id, second.id);

        let updated = update_customer(
            &db,
            first.id,
            CustomerInput {
                name: "First Renamed".to_string(),
                phone: Some("555-0111".to_string()),
                address: Some("4 Elm".to_string()),
            },
        )
        .await?;
        assert_eq!(updated.phone.as_deref(), Some("555-0111"));

        delete_customer(&db, first.id).await?;
        assert!(get_customer_by_id(&db, first.id).await?.is_none());
        assert!(matches!(
            delete_customer(&db, first.id).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_customer_with_transactions_is_refused() -> Result<()> {
        let fixture = setup_fixture().await?;
        insert_bare_transaction(&fixture, crate::entities::TransactionType::Sale).await?;

        let result = delete_customer(&fixture.db, fixture.customer.id).await;
        assert!(matches!(result, Err(Error::InUse { .. })));
        assert!(get_customer_by_id(&fixture.db, fixture.customer.id).await?.is_some());
        Ok(())
    }
}
