//! Inventory log queries.
//!
//! Log rows are written only by the stock procedure; this module just reads them.

use crate::{
    entities::{InventoryLog, LogType, Product, inventory_log, product},
    errors::Result,
};
use sea_orm::{Condition, QueryOrder, QuerySelect, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};

/// Filters for the log listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogFilter {
    /// Substring matched against the product name
    pub search: Option<String>,
    /// Restrict to one direction
    #[serde(rename = "type")]
    pub log_type: Option<LogType>,
}

/// A log row with its product, if the product row still exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// The log row
    #[serde(flatten)]
    pub log: inventory_log::Model,
    /// Product the row refers to
    pub product: Option<product::Model>,
}

/// Lists log rows matching `filter`, newest first.
pub async fn get_logs(db: &DatabaseConnection, filter: &LogFilter) -> Result<Vec<LogEntry>> {
    let mut condition = Condition::all();
    if let Some(log_type) = filter.log_type {
        condition = condition.add(inventory_log::Column::LogType.eq(log_type));
    }
    if let Some(search) = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        condition = condition.add(product::Column::Name.contains(search));
    }

    let rows = InventoryLog::find()
        .find_also_related(Product)
        .filter(condition)
        .order_by_desc(inventory_log::Column::CreatedAt)
        .order_by_desc(inventory_log::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(log, product)| LogEntry { log, product })
        .collect())
}

/// Log rows carrying `reference`, oldest first.
pub async fn get_logs_for_reference(
    db: &DatabaseConnection,
    reference: &str,
) -> Result<Vec<inventory_log::Model>> {
    InventoryLog::find()
        .filter(inventory_log::Column::Reference.eq(reference))
        .order_by_asc(inventory_log::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sum of all logged changes for a product.
///
/// Once every stock movement goes through transactions this equals the product's
/// current stock minus its stock before the first logged movement.
pub async fn net_change_for_product(db: &DatabaseConnection, product_id: i64) -> Result<i64> {
    let sum: Option<Option<i64>> = InventoryLog::find()
        .select_only()
        .column_as(Expr::col(inventory_log::Column::Change).sum(), "total")
        .filter(inventory_log::Column::ProductId.eq(product_id))
        .into_tuple()
        .one(db)
        .await?;
    Ok(sum.flatten().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{
            stock::{LineItem, transaction_reference},
            transaction::{TransactionInput, create_transaction},
        },
        entities::TransactionType,
        test_utils::*,
    };

    fn movement(
        customer_id: i64,
        product_id: i64,
        qty: i64,
        kind: TransactionType,
    ) -> TransactionInput {
        TransactionInput {
            customer_id,
            transaction_type: kind,
            created_at: chrono::Utc::now(),
            items: vec![LineItem {
                product_id,
                qty,
                price: 2.0,
            }],
        }
    }

    #[tokio::test]
    async fn test_filters_and_net_change() -> Result<()> {
        let fixture = setup_fixture().await?;
        let other =
            create_custom_product(&fixture.db, "Sparkling Water", fixture.category.id, 5).await?;

        let first = create_transaction(
            &fixture.db,
            fixture.admin.id,
            movement(fixture.customer.id, fixture.product.id, 3, TransactionType::Sale),
        )
        .await?;
        create_transaction(
            &fixture.db,
            fixture.admin.id,
            movement(fixture.customer.id, other.id, 7, TransactionType::Purchase),
        )
        .await?;

        let all = get_logs(&fixture.db, &LogFilter::default()).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].log.product_id, other.id);
        assert_eq!(all[0].product.as_ref().map(|p| p.name.as_str()), Some("Sparkling Water"));

        let outbound = get_logs(
            &fixture.db,
            &LogFilter {
                log_type: Some(LogType::Out),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound[0].log.change, -3);

        let searched = get_logs(
            &fixture.db,
            &LogFilter {
                search: Some("Sparkling".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].log.log_type, LogType::In);

        let reference = transaction_reference(first.transaction.id);
        let tagged = get_logs_for_reference(&fixture.db, &reference).await?;
        assert_eq!(tagged.len(), 1);

        assert_eq!(net_change_for_product(&fixture.db, fixture.product.id).await?, -3);
        assert_eq!(net_change_for_product(&fixture.db, other.id).await?, 7);
        assert_eq!(net_change_for_product(&fixture.db, 999).await?, 0);
        Ok(())
    }
}
