//! Purchase order business logic.
//!
//! Purchase orders record what was ordered from a supplier and at what price. They are
//! decoupled from inventory: creating one, or moving it to any status including
//! `received`, never changes product stock. Stock only moves through transactions.

use crate::{
    core::{
        stock::{self, LineItem},
        validation,
    },
    entities::{
        PurchaseOrder, PurchaseOrderDetail, PurchaseOrderStatus, Supplier, purchase_order,
        purchase_order_detail, supplier,
    },
    errors::{Error, FieldErrors, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Fields accepted when raising a purchase order.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseOrderInput {
    /// Supplier the order is placed with
    pub supplier_id: i64,
    /// Date the order was placed
    pub order_date: NaiveDate,
    /// Initial status
    pub status: PurchaseOrderStatus,
    /// Ordered lines; at least one
    pub items: Vec<LineItem>,
}

/// A purchase order with its supplier and lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOrderWithDetails {
    /// The header row
    #[serde(flatten)]
    pub order: purchase_order::Model,
    /// Supplier, if it still exists
    pub supplier: Option<supplier::Model>,
    /// The line rows
    pub details: Vec<purchase_order_detail::Model>,
    /// Display invoice label, e.g. `PO-000007`
    pub invoice: String,
    /// Sum of `qty * price` over the lines
    pub total: f64,
}

/// Display invoice label for a purchase order, e.g. `PO-000007`. Not persisted.
#[must_use]
pub fn invoice_label(order_id: i64) -> String {
    format!("PO-{order_id:06}")
}

/// Sum of `qty * price` over purchase order lines.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn order_total(details: &[purchase_order_detail::Model]) -> f64 {
    details.iter().map(|d| d.qty as f64 * d.price).sum()
}

/// Raises a purchase order with its lines in one atomic write.
///
/// Product stock is not touched, whatever the initial status.
#[instrument(skip(db, input), fields(supplier_id = input.supplier_id, lines = input.items.len()))]
pub async fn create_purchase_order(
    db: &DatabaseConnection,
    user_id: i64,
    input: PurchaseOrderInput,
) -> Result<PurchaseOrderWithDetails> {
    let txn = db.begin().await?;

    let mut errors = FieldErrors::new();
    if Supplier::find_by_id(input.supplier_id).one(&txn).await?.is_none() {
        errors.add(
            "supplier_id",
            validation::missing_reference("supplier_id"),
        );
    }
    stock::validate_line_items(&txn, &input.items, &mut errors).await?;
    errors.into_result()?;

    let now = chrono::Utc::now().naive_utc();
    let order = purchase_order::ActiveModel {
        supplier_id: Set(input.supplier_id),
        user_id: Set(user_id),
        order_date: Set(input.order_date),
        status: Set(input.status),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut details = Vec::with_capacity(input.items.len());
    for item in &input.items {
        let detail = purchase_order_detail::ActiveModel {
            purchase_order_id: Set(order.id),
            product_id: Set(item.product_id),
            qty: Set(item.qty),
            price: Set(item.price),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        details.push(detail);
    }

    let supplier = Supplier::find_by_id(order.supplier_id).one(&txn).await?;
    txn.commit().await?;

    info!(
        "Raised purchase order {} with {} lines ({:?})",
        invoice_label(order.id),
        details.len(),
        order.status
    );
    Ok(with_details(order, supplier, details))
}

/// Moves a purchase order to a new status. Every transition is allowed.
#[instrument(skip(db))]
pub async fn update_purchase_order_status(
    db: &DatabaseConnection,
    order_id: i64,
    status: PurchaseOrderStatus,
) -> Result<purchase_order::Model> {
    let mut order: purchase_order::ActiveModel = find_active(db, order_id).await?.into();
    order.status = Set(status);
    order.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = order.update(db).await?;
    info!(
        "Purchase order {} is now {:?}",
        invoice_label(updated.id),
        updated.status
    );
    Ok(updated)
}

/// Soft deletes a purchase order.
#[instrument(skip(db))]
pub async fn delete_purchase_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let mut order: purchase_order::ActiveModel = find_active(db, order_id).await?.into();
    order.is_deleted = Set(true);
    order.updated_at = Set(chrono::Utc::now().naive_utc());
    order.update(db).await?;
    Ok(())
}

async fn find_active(db: &DatabaseConnection, order_id: i64) -> Result<purchase_order::Model> {
    PurchaseOrder::find_by_id(order_id)
        .one(db)
        .await?
        .filter(|o| !o.is_deleted)
        .ok_or(Error::NotFound {
            entity: "purchase order",
            id: order_id,
        })
}

fn with_details(
    order: purchase_order::Model,
    supplier: Option<supplier::Model>,
    details: Vec<purchase_order_detail::Model>,
) -> PurchaseOrderWithDetails {
    PurchaseOrderWithDetails {
        invoice: invoice_label(order.id),
        total: order_total(&details),
        order,
        supplier,
        details,
    }
}

/// Retrieves an active purchase order with its supplier and lines.
pub async fn get_purchase_order(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<PurchaseOrderWithDetails>> {
    let Some(order) = PurchaseOrder::find_by_id(order_id)
        .one(db)
        .await?
        .filter(|o| !o.is_deleted)
    else {
        return Ok(None);
    };

    let supplier = Supplier::find_by_id(order.supplier_id).one(db).await?;
    let details = PurchaseOrderDetail::find()
        .filter(purchase_order_detail::Column::PurchaseOrderId.eq(order.id))
        .order_by_asc(purchase_order_detail::Column::Id)
        .all(db)
        .await?;

    Ok(Some(with_details(order, supplier, details)))
}

/// Retrieves active purchase orders with supplier and lines, most recent order date first.
///
/// `limit` caps the number of orders returned.
pub async fn get_recent_purchase_orders(
    db: &DatabaseConnection,
    limit: Option<u64>,
) -> Result<Vec<PurchaseOrderWithDetails>> {
    let orders = PurchaseOrder::find()
        .filter(purchase_order::Column::IsDeleted.eq(false))
        .order_by_desc(purchase_order::Column::OrderDate)
        .order_by_desc(purchase_order::Column::Id)
        .limit(limit)
        .find_also_related(Supplier)
        .all(db)
        .await?;

    let ids: Vec<i64> = orders.iter().map(|(o, _)| o.id).collect();
    let all_details = PurchaseOrderDetail::find()
        .filter(purchase_order_detail::Column::PurchaseOrderId.is_in(ids))
        .order_by_asc(purchase_order_detail::Column::Id)
        .all(db)
        .await?;

    Ok(orders
        .into_iter()
        .map(|(order, supplier)| {
            let details = all_details
                .iter()
                .filter(|d| d.purchase_order_id == order.id)
                .cloned()
                .collect();
            with_details(order, supplier, details)
        })
        .collect())
}

/// Retrieves every active purchase order, most recent order date first.
pub async fn get_all_purchase_orders(
    db: &DatabaseConnection,
) -> Result<Vec<PurchaseOrderWithDetails>> {
    get_recent_purchase_orders(db, None).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn order_input(
        supplier_id: i64,
        product_id: i64,
        status: PurchaseOrderStatus,
    ) -> PurchaseOrderInput {
        PurchaseOrderInput {
            supplier_id,
            order_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            status,
            items: vec![
                LineItem {
                    product_id,
                    qty: 20,
                    price: 1.25,
                },
                LineItem {
                    product_id,
                    qty: 4,
                    price: 10.0,
                },
            ],
        }
    }

    #[test]
    fn test_invoice_label() {
        assert_eq!(invoice_label(7), "PO-000007");
        assert_eq!(invoice_label(123_456), "PO-123456");
    }

    #[tokio::test]
    async fn test_create_purchase_order_leaves_stock_alone() -> Result<()> {
        let fixture = setup_fixture().await?;
        let supplier = create_test_supplier(&fixture.db, "Acme Wholesale").await?;

        for status in [
            PurchaseOrderStatus::Draft,
            PurchaseOrderStatus::Received,
            PurchaseOrderStatus::Cancelled,
        ] {
            let order = create_purchase_order(
                &fixture.db,
                fixture.admin.id,
                order_input(supplier.id, fixture.product.id, status),
            )
            .await?;
            assert_eq!(order.order.status, status);
            assert_eq!(order.details.len(), 2);
            assert_eq!(order.total, 65.0);
            assert_eq!(order.supplier.as_ref().map(|s| s.id), Some(supplier.id));
        }

        assert_eq!(stock_of(&fixture.db, fixture.product.id).await?, 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_status_transitions_are_unrestricted() -> Result<()> {
        let fixture = setup_fixture().await?;
        let supplier = create_test_supplier(&fixture.db, "Acme Wholesale").await?;
        let order = create_purchase_order(
            &fixture.db,
            fixture.admin.id,
            order_input(supplier.id, fixture.product.id, PurchaseOrderStatus::Cancelled),
        )
        .await?;

        for status in [
            PurchaseOrderStatus::Received,
            PurchaseOrderStatus::Draft,
            PurchaseOrderStatus::Cancelled,
            PurchaseOrderStatus::Received,
        ] {
            let updated = update_purchase_order_status(&fixture.db, order.order.id, status).await?;
            assert_eq!(updated.status, status);
        }

        assert_eq!(stock_of(&fixture.db, fixture.product.id).await?, 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_purchase_order_validation() -> Result<()> {
        let fixture = setup_fixture().await?;

        let mut input = order_input(999, fixture.product.id, PurchaseOrderStatus::Draft);
        input.items[1].qty = 0;
        let result = create_purchase_order(&fixture.db, fixture.admin.id, input).await;

        let Err(Error::Validation { errors }) = result else {
            panic!("expected validation error");
        };
        assert!(errors.contains("supplier_id"));
        assert!(errors.contains("items.1.qty"));
        assert!(get_all_purchase_orders(&fixture.db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_and_listing() -> Result<()> {
        let fixture = setup_fixture().await?;
        let supplier = create_test_supplier(&fixture.db, "Acme Wholesale").await?;
        let mut early = order_input(supplier.id, fixture.product.id, PurchaseOrderStatus::Draft);
        early.order_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let first = create_purchase_order(&fixture.db, fixture.admin.id, early).await?;
        let second = create_purchase_order(
            &fixture.db,
            fixture.admin.id,
            order_input(supplier.id, fixture.product.id, PurchaseOrderStatus::Draft),
        )
        .await?;

        let all = get_all_purchase_orders(&fixture.db).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].order.id, second.order.id);
        assert_eq!(all[0].details.len(), 2);

        let recent = get_recent_purchase_orders(&fixture.db, Some(1)).await?;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].order.id, second.order.id);
        assert_eq!(recent[0].details.len(), 2);
        assert_eq!(recent[0].total, 65.0);

        delete_purchase_order(&fixture.db, first.order.id).await?;
        assert!(get_purchase_order(&fixture.db, first.order.id).await?.is_none());
        assert_eq!(get_all_purchase_orders(&fixture.db).await?.len(), 1);

        let again = delete_purchase_order(&fixture.db, first.order.id).await;
        assert!(matches!(again, Err(Error::NotFound { .. })));

        Ok(())
    }
}
