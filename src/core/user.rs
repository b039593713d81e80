//! User business logic - Handles operator accounts and their roles.

use crate::{
    core::validation,
    entities::{PurchaseOrder, Role, Transaction, User, purchase_order, transaction, user},
    errors::{Error, FieldErrors, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields accepted when creating or updating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    /// Required, at most 100 characters
    pub name: String,
    /// Required, unique, must contain `@`
    pub email: String,
    /// `admin` or `user`
    pub role: Role,
}

async fn validate(
    db: &DatabaseConnection,
    input: &UserInput,
    except_id: Option<i64>,
) -> Result<()> {
    let mut errors = FieldErrors::new();
    validation::require_text(&mut errors, "name", &input.name, Some(100));
    validation::require_text(&mut errors, "email", &input.email, Some(255));

    if !errors.contains("email") {
        if input.email.contains('@') {
            if let Some(existing) = get_user_by_email(db, &input.email).await? {
                if Some(existing.id) != except_id {
                    errors.add("email", "The email has already been taken.");
                }
            }
        } else {
            errors.add("email", "The email field must be a valid email address.");
        }
    }

    errors.into_result()
}

/// Retrieves all users, ordered by name.
pub async fn get_all_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a user by its unique ID.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by email, ignoring surrounding whitespace.
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a user with a unique email.
#[instrument(skip(db))]
pub async fn create_user(db: &DatabaseConnection, input: UserInput) -> Result<user::Model> {
    validate(db, &input, None).await?;

    let now = chrono::Utc::now().naive_utc();
    let created = user::ActiveModel {
        name: Set(input.name.trim().to_string()),
        email: Set(input.email.trim().to_string()),
        role: Set(input.role),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Created {} user '{}' (ID: {})",
        created.role.as_str(),
        created.name,
        created.id
    );
    Ok(created)
}

/// Replaces a user's details, including the role.
#[instrument(skip(db))]
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i64,
    input: UserInput,
) -> Result<user::Model> {
    validate(db, &input, Some(user_id)).await?;

    let mut user: user::ActiveModel = get_user_by_id(db, user_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "user",
            id: user_id,
        })?
        .into();

    user.name = Set(input.name.trim().to_string());
    user.email = Set(input.email.trim().to_string());
    user.role = Set(input.role);
    user.updated_at = Set(chrono::Utc::now().naive_utc());

    user.update(db).await.map_err(Into::into)
}

/// Permanently deletes a user who has recorded nothing.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let transactions = Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    let orders = PurchaseOrder::find()
        .filter(purchase_order::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    if transactions + orders > 0 {
        return Err(Error::InUse {
            entity: "user",
            id: user_id,
            dependents: "transactions or purchase orders",
        });
    }

    let result = User::delete_by_id(user_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "user",
            id: user_id,
        });
    }
    info!("Deleted user {}", user_id);
    Ok(())
}
