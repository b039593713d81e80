//! Purchase order entity - A supplier order with its own status lifecycle.
//!
//! Purchase orders are financial records only. No status, `received` included, moves
//! product stock; stock changes come exclusively from transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a purchase order. Any status may move to any other.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    /// Being prepared
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Goods arrived at the warehouse
    #[sea_orm(string_value = "received")]
    Received,
    /// Order withdrawn
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Purchase order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    /// Unique identifier for the purchase order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Supplier the order is placed with
    pub supplier_id: i64,
    /// User who raised the order
    pub user_id: i64,
    /// Date the order was placed
    pub order_date: Date,
    /// Current lifecycle status
    pub status: PurchaseOrderStatus,
    /// Soft delete flag
    pub is_deleted: bool,
    /// When the order was created
    pub created_at: DateTime,
    /// When the order was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between `PurchaseOrder` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order is placed with one supplier
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    /// Each order is raised by one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One order has many lines
    #[sea_orm(has_many = "super::purchase_order_detail::Entity")]
    Details,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::purchase_order_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Details.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
