//! Delete Order Use Case

use std::sync::Arc;

use crate::application::errors::OrderError;
use crate::application::ports::{Session, SessionProvider, Statement};
use crate::application::services::with_session;
use crate::domain::{OrderId, TypedValue};

/// Remove a row by id. Matching nothing is not an error.
pub const DELETE_ORDER: &str = "DELETE FROM orders WHERE id = $id";

/// Use case for removing an order.
pub struct DeleteOrderUseCase<P: SessionProvider> {
    provider: Arc<P>,
}

impl<P: SessionProvider> DeleteOrderUseCase<P> {
    /// Create a new `DeleteOrderUseCase`.
    pub const fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Delete order `id`, returning how many rows were removed.
    pub async fn execute(&self, id: OrderId) -> Result<u64, OrderError> {
        if !id.fits_store_key() {
            tracing::debug!(order_id = %id, "Id beyond store key range, nothing to delete");
            return Ok(0);
        }

        let statement = Statement::new(DELETE_ORDER).bind("id", TypedValue::uint64(id.get()));

        let removed = with_session(self.provider.as_ref(), move |session| {
            Box::pin(async move {
                let result = session.execute(&statement).await?;
                Ok(result.rows_affected())
            })
        })
        .await?;

        tracing::info!(order_id = %id, removed, "Order deleted");
        Ok(removed)
    }
}
