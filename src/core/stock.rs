//! Stock-adjustment procedure - keeps product stock, transaction lines and the inventory
//! log consistent with each other.
//!
//! Every transaction write is expressed as two phases run on the same database
//! transaction:
//!
//! * [`reverse_effects`] undoes everything a stored transaction did: each line's stock
//!   delta is applied with the opposite sign, then the line rows and every inventory log
//!   row tagged with the transaction's reference are removed.
//! * [`apply_effects`] does the forward work for a set of line items: one atomic stock
//!   increment, one detail row and one inventory log row per line.
//!
//! Create is `apply`, update is `reverse` then `apply`, delete is `reverse`. Callers own
//! the surrounding database transaction; nothing here commits.

use crate::{
    core::{product, validation},
    entities::{
        InventoryLog, LogType, Product, TransactionDetail, TransactionType, inventory_log,
        transaction, transaction_detail,
    },
    errors::{FieldErrors, Result},
};
use sea_orm::{Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One requested line: a product, a quantity and a unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product moved by the line
    pub product_id: i64,
    /// Units, at least 1
    pub qty: i64,
    /// Unit price, non-negative
    pub price: f64,
}

impl LineItem {
    /// `qty * price`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn subtotal(&self) -> f64 {
        self.qty as f64 * self.price
    }
}

/// Sum of the subtotals of all lines.
#[must_use]
pub fn total_price(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::subtotal).sum()
}

/// The inventory log reference that ties log rows to a transaction.
#[must_use]
pub fn transaction_reference(transaction_id: i64) -> String {
    format!("TX-{transaction_id}")
}

/// Checks a list of line items, recording problems under `items.<index>.<field>`.
///
/// Quantities must be at least 1, prices finite and non-negative, and every product must
/// exist and not be deleted.
pub async fn validate_line_items<C>(
    db: &C,
    items: &[LineItem],
    errors: &mut FieldErrors,
) -> Result<()>
where
    C: ConnectionTrait,
{
    if items.is_empty() {
        errors.add("items", "The items field must have at least 1 items.");
        return Ok(());
    }

    for (index, item) in items.iter().enumerate() {
        validation::require_min(errors, &format!("items.{index}.qty"), item.qty, 1);
        validation::require_amount(errors, &format!("items.{index}.price"), item.price);

        let exists = Product::find_by_id(item.product_id)
            .one(db)
            .await?
            .is_some_and(|p| !p.is_deleted);
        if !exists {
            let field = format!("items.{index}.product_id");
            let message = validation::missing_reference(&field);
            errors.add(field, message);
        }
    }

    Ok(())
}

/// Applies the forward effects of `items` for a stored transaction header.
///
/// For each line the product stock moves by `-qty` for a sale or `+qty` for a purchase,
/// and one detail row plus one inventory log row (reference `TX-<id>`) are written.
/// Stock is not checked against zero.
pub async fn apply_effects<C>(
    db: &C,
    transaction: &transaction::Model,
    items: &[LineItem],
) -> Result<Vec<transaction_detail::Model>>
where
    C: ConnectionTrait,
{
    let reference = transaction_reference(transaction.id);
    let now = chrono::Utc::now();
    let mut details = Vec::with_capacity(items.len());

    for item in items {
        let detail = transaction_detail::ActiveModel {
            transaction_id: Set(transaction.id),
            product_id: Set(item.product_id),
            qty: Set(item.qty),
            subtotal: Set(item.subtotal()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let change = transaction.transaction_type.stock_delta(item.qty);
        product::adjust_stock_atomic(db, item.product_id, change).await?;

        inventory_log::ActiveModel {
            product_id: Set(item.product_id),
            change: Set(change),
            log_type: Set(LogType::for_change(change)),
            reference: Set(reference.clone()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        debug!(
            "{}: product {} moved by {}",
            reference, item.product_id, change
        );
        details.push(detail);
    }

    Ok(details)
}

/// Undoes every effect of a stored transaction and returns the number of lines reversed.
///
/// The opposite delta is computed from the transaction's stored type, so this must run
/// before the header is changed.
pub async fn reverse_effects<C>(db: &C, transaction: &transaction::Model) -> Result<usize>
where
    C: ConnectionTrait,
{
    let reference = transaction_reference(transaction.id);
    let details = TransactionDetail::find()
        .filter(transaction_detail::Column::TransactionId.eq(transaction.id))
        .all(db)
        .await?;

    for detail in &details {
        let restore = -transaction.transaction_type.stock_delta(detail.qty);
        product::adjust_stock_atomic(db, detail.product_id, restore).await?;
    }

    TransactionDetail::delete_many()
        .filter(transaction_detail::Column::TransactionId.eq(transaction.id))
        .exec(db)
        .await?;

    let logs = InventoryLog::delete_many()
        .filter(inventory_log::Column::Reference.eq(reference.as_str()))
        .exec(db)
        .await?;

    debug!(
        "{}: reversed {} lines, removed {} log rows",
        reference,
        details.len(),
        logs.rows_affected
    );
    Ok(details.len())
}

/// Net stock delta a set of lines would apply for the given transaction type.
#[must_use]
pub fn net_delta(transaction_type: TransactionType, items: &[LineItem]) -> i64 {
    items
        .iter()
        .map(|item| transaction_type.stock_delta(item.qty))
        .sum()
}
