//! Transaction entity - A sale or purchase event whose lines move stock.
//!
//! `total_price` is derived from the lines at write time. Deleting a transaction is a
//! soft delete of the header; its detail rows and inventory log rows are removed outright.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a transaction
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Goods leave: stock goes down
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Goods arrive: stock goes up
    #[sea_orm(string_value = "purchase")]
    Purchase,
}

impl TransactionType {
    /// Signed stock delta for a line of `qty` units.
    #[must_use]
    pub const fn stock_delta(self, qty: i64) -> i64 {
        match self {
            Self::Sale => -qty,
            Self::Purchase => qty,
        }
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Sale or purchase
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// ID of the customer on the other side of the transaction
    pub customer_id: i64,
    /// ID of the user who recorded the transaction
    pub user_id: i64,
    /// Sum of `qty * price` over all lines
    pub total_price: f64,
    /// Business date of the transaction, as entered
    pub created_at: DateTimeUtc,
    /// Soft delete flag
    pub is_deleted: bool,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    /// Each transaction is recorded by one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One transaction has many lines
    #[sea_orm(has_many = "super::transaction_detail::Entity")]
    Details,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transaction_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Details.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
