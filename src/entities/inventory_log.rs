//! Inventory log entity - Append-only audit trail of stock movements.
//!
//! Each row records one signed change to one product and the reference of the
//! transaction that caused it (`TX-<id>`). Rows only disappear when that transaction is
//! edited or deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a logged stock movement
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    /// Stock increased
    #[sea_orm(string_value = "in")]
    In,
    /// Stock decreased
    #[sea_orm(string_value = "out")]
    Out,
}

impl LogType {
    /// Direction matching a signed stock delta. Zero counts as inbound.
    #[must_use]
    pub const fn for_change(change: i64) -> Self {
        if change < 0 { Self::Out } else { Self::In }
    }
}

/// Inventory log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_logs")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product whose stock moved
    pub product_id: i64,
    /// Signed stock delta
    pub change: i64,
    /// `in` or `out`, matching the sign of `change`
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub log_type: LogType,
    /// Cause of the movement, e.g. `TX-42`
    pub reference: String,
    /// When the movement was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `InventoryLog` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry concerns one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
