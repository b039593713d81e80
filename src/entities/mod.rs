//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod customer;
pub mod inventory_log;
pub mod product;
pub mod purchase_order;
pub mod purchase_order_detail;
pub mod supplier;
pub mod transaction;
pub mod transaction_detail;
pub mod user;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use customer::{Column as CustomerColumn, Entity as Customer, Model as CustomerModel};
pub use inventory_log::{
    Column as InventoryLogColumn, Entity as InventoryLog, LogType, Model as InventoryLogModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use purchase_order::{
    Column as PurchaseOrderColumn, Entity as PurchaseOrder, Model as PurchaseOrderModel,
    PurchaseOrderStatus,
};
pub use purchase_order_detail::{
    Column as PurchaseOrderDetailColumn, Entity as PurchaseOrderDetail,
    Model as PurchaseOrderDetailModel,
};
pub use supplier::{Column as SupplierColumn, Entity as Supplier, Model as SupplierModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
    TransactionType,
};
pub use transaction_detail::{
    Column as TransactionDetailColumn, Entity as TransactionDetail,
    Model as TransactionDetailModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, Role};
