//! Product entity - Represents a stocked item.
//!
//! `stock` is the on-hand quantity. It is moved by sale and purchase transactions through
//! the stock-adjustment procedure, and can be overwritten directly from stock management.
//! Nothing clamps it at zero, so an oversold product carries a negative stock.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product
    pub name: String,
    /// Current on-hand quantity (may be negative after an oversell)
    pub stock: i64,
    /// Unit price
    pub price: f64,
    /// Stock level at or below which the product counts as low on stock
    pub minimum_stock_level: i64,
    /// ID of the category this product belongs to
    pub category_id: i64,
    /// Soft delete flag - if true, product is hidden but history is preserved
    pub is_deleted: bool,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One product has many inventory log entries
    #[sea_orm(has_many = "super::inventory_log::Entity")]
    InventoryLogs,
    /// One product appears on many transaction lines
    #[sea_orm(has_many = "super::transaction_detail::Entity")]
    TransactionDetails,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::inventory_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryLogs.def()
    }
}

impl Related<super::transaction_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
