//! Create Order Use Case

use std::sync::Arc;

use crate::application::errors::OrderError;
use crate::application::ports::{Session, SessionProvider, Statement};
use crate::application::services::with_session;
use crate::domain::order::ID_COLUMN;
use crate::domain::{ColumnSpec, ColumnType, Order, OrderId, TypedValue};

/// Insert a new row; the store assigns the id.
pub const INSERT_ORDER: &str =
    "INSERT INTO orders (name, created_at) VALUES ($name, $created_at) RETURNING id";

/// Use case for inserting an order.
pub struct CreateOrderUseCase<P: SessionProvider> {
    provider: Arc<P>,
}

impl<P: SessionProvider> CreateOrderUseCase<P> {
    /// Create a new `CreateOrderUseCase`.
    pub const fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Insert `order` and return it with the id the store assigned.
    pub async fn execute(&self, order: Order) -> Result<Order, OrderError> {
        let statement = Statement::new(INSERT_ORDER)
            .bind("name", order.name_value())
            .bind("created_at", order.created_at_value())
            .returning(&[ColumnSpec::new(ID_COLUMN, ColumnType::Uint64)]);

        let result = with_session(self.provider.as_ref(), move |session| {
            Box::pin(async move { session.execute(&statement).await })
        })
        .await?;

        let raw_id = result
            .rows()
            .first()
            .and_then(|row| row.get(ID_COLUMN))
            .and_then(TypedValue::as_uint64)
            .ok_or(OrderError::MissingGeneratedId)?;
        let id = OrderId::new(raw_id).map_err(OrderError::InvalidRow)?;

        tracing::info!(order_id = %id, name = order.name(), "Order created");
        Ok(order.with_id(id))
    }
}
