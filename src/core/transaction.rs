//! Transaction business logic - Handles sale and purchase transactions.
//!
//! Every write runs inside one database transaction and goes through the two-phase
//! procedure in [`crate::core::stock`]: create applies, update reverses then applies, and
//! delete reverses. Input is validated before anything is written, and any failure
//! afterwards rolls the whole unit back, so stock, lines and logs never disagree.
//!
//! Stock is allowed to go negative; there is no insufficient-stock check.

use crate::{
    core::stock::{self, LineItem},
    entities::{
        Customer, Transaction, TransactionDetail, TransactionType, customer, transaction,
        transaction_detail,
    },
    errors::{Error, FieldErrors, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Fields accepted when recording or editing a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInput {
    /// Customer on the other side of the transaction
    pub customer_id: i64,
    /// Sale or purchase
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Business date of the transaction; a bare date means midnight UTC
    #[serde(deserialize_with = "crate::core::validation::deserialize_date_time")]
    pub created_at: DateTime<Utc>,
    /// Lines; at least one
    pub items: Vec<LineItem>,
}

/// A transaction header together with its lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionWithDetails {
    /// The header row
    #[serde(flatten)]
    pub transaction: transaction::Model,
    /// The line rows
    pub details: Vec<transaction_detail::Model>,
}

/// A transaction header with its customer, for listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    /// The header row
    #[serde(flatten)]
    pub transaction: transaction::Model,
    /// Customer, if it still exists
    pub customer: Option<customer::Model>,
}

/// Display receipt label for a transaction, e.g. `TRX-000042`. Not persisted.
#[must_use]
pub fn receipt_label(transaction_id: i64) -> String {
    format!("TRX-{transaction_id:06}")
}

async fn validate_transaction_input<C>(db: &C, input: &TransactionInput) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut errors = FieldErrors::new();

    if Customer::find_by_id(input.customer_id).one(db).await?.is_none() {
        errors.add(
            "customer_id",
            crate::core::validation::missing_reference("customer_id"),
        );
    }
    stock::validate_line_items(db, &input.items, &mut errors).await?;

    errors.into_result()
}

/// Loads an active transaction, optionally requiring it to be recorded by `owner`.
async fn find_active<C>(
    db: &C,
    transaction_id: i64,
    owner: Option<i64>,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await?
        .filter(|t| !t.is_deleted && owner.is_none_or(|id| t.user_id == id))
        .ok_or(Error::NotFound {
            entity: "transaction",
            id: transaction_id,
        })
}

/// Records a new transaction and applies its stock effects atomically.
///
/// # Arguments
/// * `db` - Database connection
/// * `user_id` - User recording the transaction
/// * `input` - Customer, type, date and lines
///
/// # Errors
/// Returns [`Error::Validation`] when the customer or a product does not exist or a line
/// is malformed; nothing is written in that case. Any database failure rolls back the
/// whole unit.
#[instrument(skip(db, input), fields(customer_id = input.customer_id, lines = input.items.len()))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    input: TransactionInput,
) -> Result<TransactionWithDetails> {
    let txn = db.begin().await?;
    validate_transaction_input(&txn, &input).await?;

    let header = transaction::ActiveModel {
        transaction_type: Set(input.transaction_type),
        customer_id: Set(input.customer_id),
        user_id: Set(user_id),
        total_price: Set(stock::total_price(&input.items)),
        created_at: Set(input.created_at),
        is_deleted: Set(false),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let details = stock::apply_effects(&txn, &header, &input.items).await?;
    txn.commit().await?;

    info!(
        "Recorded {:?} transaction {} with {} lines, total {:.2}",
        header.transaction_type,
        header.id,
        details.len(),
        header.total_price
    );
    Ok(TransactionWithDetails {
        transaction: header,
        details,
    })
}

/// Replaces the contents of a transaction.
///
/// The old lines are reversed first (restoring stock and removing their details and
/// logs), then the header is rewritten and the new lines applied. The resulting stock
/// reflects the new lines only.
#[instrument(skip(db, input), fields(customer_id = input.customer_id, lines = input.items.len()))]
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    input: TransactionInput,
) -> Result<TransactionWithDetails> {
    let txn = db.begin().await?;
    let existing = find_active(&txn, transaction_id, None).await?;
    validate_transaction_input(&txn, &input).await?;

    let reversed = stock::reverse_effects(&txn, &existing).await?;

    let mut header: transaction::ActiveModel = existing.into();
    header.customer_id = Set(input.customer_id);
    header.transaction_type = Set(input.transaction_type);
    header.total_price = Set(stock::total_price(&input.items));
    header.created_at = Set(input.created_at);
    let header = header.update(&txn).await?;

    let details = stock::apply_effects(&txn, &header, &input.items).await?;
    txn.commit().await?;

    info!(
        "Updated transaction {}: reversed {} lines, applied {}",
        header.id,
        reversed,
        details.len()
    );
    Ok(TransactionWithDetails {
        transaction: header,
        details,
    })
}

/// Deletes a transaction, restoring stock and removing its lines and logs.
///
/// The header itself is soft deleted.
#[instrument(skip(db))]
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    remove_transaction(db, transaction_id, None).await
}

/// Deletes a transaction only if it was recorded by `user_id`.
///
/// A transaction owned by someone else is reported as not found.
#[instrument(skip(db))]
pub async fn delete_transaction_for_user(
    db: &DatabaseConnection,
    transaction_id: i64,
    user_id: i64,
) -> Result<()> {
    remove_transaction(db, transaction_id, Some(user_id)).await
}

async fn remove_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    owner: Option<i64>,
) -> Result<()> {
    let txn = db.begin().await?;
    let existing = find_active(&txn, transaction_id, owner).await?;

    let reversed = stock::reverse_effects(&txn, &existing).await?;

    let mut header: transaction::ActiveModel = existing.into();
    header.is_deleted = Set(true);
    header.update(&txn).await?;

    txn.commit().await?;
    info!(
        "Deleted transaction {} and reversed {} lines",
        transaction_id, reversed
    );
    Ok(())
}

/// Retrieves an active transaction by ID.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Ok(Transaction::find_by_id(transaction_id)
        .one(db)
        .await?
        .filter(|t| !t.is_deleted))
}

/// Retrieves an active transaction with its lines.
pub async fn get_transaction_with_details(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<TransactionWithDetails>> {
    let Some(transaction) = get_transaction_by_id(db, transaction_id).await? else {
        return Ok(None);
    };

    let details = TransactionDetail::find()
        .filter(transaction_detail::Column::TransactionId.eq(transaction.id))
        .order_by_asc(transaction_detail::Column::Id)
        .all(db)
        .await?;

    Ok(Some(TransactionWithDetails {
        transaction,
        details,
    }))
}

/// Retrieves an active transaction with its lines, only if recorded by `user_id`.
pub async fn get_transaction_for_user(
    db: &DatabaseConnection,
    transaction_id: i64,
    user_id: i64,
) -> Result<Option<TransactionWithDetails>> {
    Ok(get_transaction_with_details(db, transaction_id)
        .await?
        .filter(|t| t.transaction.user_id == user_id))
}

/// Retrieves all active transactions with their customer, newest first.
pub async fn get_all_transactions(db: &DatabaseConnection) -> Result<Vec<TransactionSummary>> {
    list_transactions(db, None).await
}

/// Retrieves the active transactions recorded by one user, newest first.
pub async fn get_transactions_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<TransactionSummary>> {
    list_transactions(db, Some(user_id)).await
}

async fn list_transactions(
    db: &DatabaseConnection,
    user_id: Option<i64>,
) -> Result<Vec<TransactionSummary>> {
    let mut query = Transaction::find().filter(transaction::Column::IsDeleted.eq(false));
    if let Some(user_id) = user_id {
        query = query.filter(transaction::Column::UserId.eq(user_id));
    }

    let rows = query
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .find_also_related(Customer)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(transaction, customer)| TransactionSummary {
            transaction,
            customer,
        })
        .collect())
}
