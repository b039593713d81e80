//! Dashboard business logic.
//!
//! This module assembles the back-office overview: entity counts, the newest products
//! and customers, recent purchase orders and sales with their display labels, and a
//! monthly sales series. All functions return structured data; formatting is left to the
//! caller.

use crate::{
    core::{product::ProductWithCategory, purchase_order, transaction::receipt_label},
    entities::{
        Category, Customer, Product, Supplier, Transaction, TransactionType, customer, product,
        supplier, transaction,
    },
    errors::Result,
};
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, prelude::*};
use serde::Serialize;
use std::collections::BTreeMap;

/// How many of the newest products the overview shows.
const LATEST_PRODUCTS: u64 = 3;
/// How many of the newest customers the overview shows.
const LATEST_CUSTOMERS: u64 = 2;
/// How many recent purchase orders and sales the overview shows.
const RECENT_ACTIVITY: u64 = 5;
/// How many months the sales series covers.
const SALES_MONTHS: usize = 6;

/// Row counts shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    /// Products that are not soft deleted
    pub products: u64,
    /// All categories
    pub categories: u64,
    /// All suppliers
    pub suppliers: u64,
    /// All customers
    pub customers: u64,
}

/// One line of the recent purchase orders panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseActivity {
    /// Purchase order id
    pub id: i64,
    /// Supplier name, `-` when the supplier is gone
    pub supplier: String,
    /// `PO-000001` style label
    pub invoice: String,
    /// Sum of the order's lines
    pub total: f64,
    /// `YYYY-MM-DD`
    pub date: String,
}

/// One line of the recent sales panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleActivity {
    /// Transaction id
    pub id: i64,
    /// Customer name, `-` when the customer is gone
    pub customer: String,
    /// `TRX-000001` style label
    pub receipt: String,
    /// Stored total price
    pub total: f64,
    /// `YYYY-MM-DD`
    pub date: String,
}

/// Sales total for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    /// Sum of the month's sale totals
    pub total: f64,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Headline counts
    pub counts: DashboardCounts,
    /// Newest products first
    pub latest_products: Vec<ProductWithCategory>,
    /// Newest customers first
    pub latest_customers: Vec<customer::Model>,
    /// Every supplier, by name
    pub suppliers: Vec<supplier::Model>,
    /// Most recent purchase orders by order date
    pub recent_purchases: Vec<PurchaseActivity>,
    /// Most recent sales
    pub recent_sales: Vec<SaleActivity>,
    /// Monthly sale totals, oldest month first
    pub sales_per_month: Vec<MonthlySales>,
}

/// Generates the full dashboard.
pub async fn generate_dashboard(db: &DatabaseConnection) -> Result<Dashboard> {
    Ok(Dashboard {
        counts: get_counts(db).await?,
        latest_products: get_latest_products(db).await?,
        latest_customers: get_latest_customers(db).await?,
        suppliers: crate::core::supplier::get_all_suppliers(db).await?,
        recent_purchases: get_recent_purchases(db).await?,
        recent_sales: get_recent_sales(db).await?,
        sales_per_month: get_sales_per_month(db).await?,
    })
}

/// Counts products, categories, suppliers and customers.
pub async fn get_counts(db: &DatabaseConnection) -> Result<DashboardCounts> {
    Ok(DashboardCounts {
        products: Product::find()
            .filter(product::Column::IsDeleted.eq(false))
            .count(db)
            .await?,
        categories: Category::find().count(db).await?,
        suppliers: Supplier::find().count(db).await?,
        customers: Customer::find().count(db).await?,
    })
}

async fn get_latest_products(db: &DatabaseConnection) -> Result<Vec<ProductWithCategory>> {
    let rows = Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .order_by_desc(product::Column::CreatedAt)
        .order_by_desc(product::Column::Id)
        .limit(LATEST_PRODUCTS)
        .find_also_related(Category)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(product, category)| ProductWithCategory { product, category })
        .collect())
}

async fn get_latest_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>> {
    Customer::find()
        .order_by_desc(customer::Column::CreatedAt)
        .order_by_desc(customer::Column::Id)
        .limit(LATEST_CUSTOMERS)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn get_recent_purchases(db: &DatabaseConnection) -> Result<Vec<PurchaseActivity>> {
    let orders = purchase_order::get_recent_purchase_orders(db, Some(RECENT_ACTIVITY)).await?;

    Ok(orders
        .into_iter()
        .map(|po| PurchaseActivity {
            id: po.order.id,
            supplier: po.supplier.map_or_else(|| "-".to_string(), |s| s.name),
            invoice: po.invoice,
            total: po.total,
            date: po.order.order_date.format("%Y-%m-%d").to_string(),
        })
        .collect())
}

async fn get_recent_sales(db: &DatabaseConnection) -> Result<Vec<SaleActivity>> {
    let rows = Transaction::find()
        .filter(transaction::Column::TransactionType.eq(TransactionType::Sale))
        .filter(transaction::Column::IsDeleted.eq(false))
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .limit(RECENT_ACTIVITY)
        .find_also_related(Customer)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(tx, customer)| SaleActivity {
            id: tx.id,
            customer: customer.map_or_else(|| "-".to_string(), |c| c.name),
            receipt: receipt_label(tx.id),
            total: tx.total_price,
            date: tx.created_at.format("%Y-%m-%d").to_string(),
        })
        .collect())
}

/// Sums sale totals per `YYYY-MM`, returning the earliest six months in ascending order.
pub async fn get_sales_per_month(db: &DatabaseConnection) -> Result<Vec<MonthlySales>> {
    let sales = Transaction::find()
        .filter(transaction::Column::TransactionType.eq(TransactionType::Sale))
        .filter(transaction::Column::IsDeleted.eq(false))
        .all(db)
        .await?;

    Ok(group_by_month(&sales))
}

fn group_by_month(sales: &[transaction::Model]) -> Vec<MonthlySales> {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for sale in sales {
        *months
            .entry(sale.created_at.format("%Y-%m").to_string())
            .or_default() += sale.total_price;
    }

    months
        .into_iter()
        .take(SALES_MONTHS)
        .map(|(month, total)| MonthlySales { month, total })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{
            purchase_order::{PurchaseOrderInput, create_purchase_order},
            stock::LineItem,
            transaction::{TransactionInput, create_transaction},
        },
        entities::PurchaseOrderStatus,
        test_utils::*,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sale_model(id: i64, year: i32, month: u32, total: f64) -> transaction::Model {
        transaction::Model {
            id,
            transaction_type: TransactionType::Sale,
            customer_id: 1,
            user_id: 1,
            total_price: total,
            created_at: Utc.with_ymd_and_hms(year, month, 3, 12, 0, 0).unwrap(),
            is_deleted: false,
        }
    }

    #[test]
    fn test_group_by_month_keeps_first_six_ascending() {
        let mut sales = Vec::new();
        for month in 1..=8 {
            sales.push(sale_model(i64::from(month), 2024, month, 10.0));
        }
        sales.push(sale_model(99, 2024, 1, 5.5));

        let grouped = group_by_month(&sales);
        assert_eq!(grouped.len(), 6);
        assert_eq!(grouped[0].month, "2024-01");
        assert_eq!(grouped[0].total, 15.5);
        assert_eq!(grouped[5].month, "2024-06");
    }

    #[tokio::test]
    async fn test_generate_dashboard() -> Result<()> {
        let fixture = setup_fixture().await?;
        let supplier = create_test_supplier(&fixture.db, "Acme Wholesale").await?;

        create_purchase_order(
            &fixture.db,
            fixture.admin.id,
            PurchaseOrderInput {
                supplier_id: supplier.id,
                order_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                status: PurchaseOrderStatus::Received,
                items: vec![LineItem {
                    product_id: fixture.product.id,
                    qty: 2,
                    price: 4.5,
                }],
            },
        )
        .await?;

        for kind in [TransactionType::Sale, TransactionType::Purchase] {
            create_transaction(
                &fixture.db,
                fixture.admin.id,
                TransactionInput {
                    customer_id: fixture.customer.id,
                    transaction_type: kind,
                    created_at: Utc.with_ymd_and_hms(2025, 2, 10, 9, 0, 0).unwrap(),
                    items: vec![LineItem {
                        product_id: fixture.product.id,
                        qty: 1,
                        price: 12.0,
                    }],
                },
            )
            .await?;
        }

        let dashboard = generate_dashboard(&fixture.db).await?;
        assert_eq!(
            dashboard.counts,
            DashboardCounts {
                products: 1,
                categories: 1,
                suppliers: 1,
                customers: 1,
            }
        );
        assert_eq!(dashboard.latest_products.len(), 1);
        assert!(dashboard.latest_products[0].category.is_some());

        assert_eq!(dashboard.recent_purchases.len(), 1);
        let purchase = &dashboard.recent_purchases[0];
        assert_eq!(purchase.supplier, "Acme Wholesale");
        assert_eq!(purchase.total, 9.0);
        assert_eq!(purchase.date, "2025-02-01");
        assert!(purchase.invoice.starts_with("PO-"));

        assert_eq!(dashboard.recent_sales.len(), 1);
        assert!(dashboard.recent_sales[0].receipt.starts_with("TRX-"));
        assert_eq!(dashboard.recent_sales[0].date, "2025-02-10");

        assert_eq!(
            dashboard.sales_per_month,
            vec![MonthlySales {
                month: "2025-02".to_string(),
                total: 12.0,
            }]
        );
        Ok(())
    }
}
