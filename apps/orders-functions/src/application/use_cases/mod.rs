//! Use Cases
//!
//! One use case per order operation. Each acquires a session for the
//! duration of a single statement and releases it before returning.

mod create_order;
mod delete_order;
mod list_orders;
mod update_order;

pub use create_order::{CreateOrderUseCase, INSERT_ORDER};
pub use delete_order::{DELETE_ORDER, DeleteOrderUseCase};
pub use list_orders::ListOrdersUseCase;
pub use update_order::{UPDATE_ORDER, UpdateOrderUseCase};
