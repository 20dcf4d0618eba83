//! Update Order Use Case

use std::sync::Arc;

use crate::application::errors::OrderError;
use crate::application::ports::{Session, SessionProvider, Statement};
use crate::application::services::with_session;
use crate::domain::{Order, OrderId, TypedValue, ValidationError};

/// Rename an existing row and hand back what is stored.
pub const UPDATE_ORDER: &str =
    "UPDATE orders SET name = $name WHERE id = $id RETURNING id, name, created_at";

/// Use case for renaming an order.
pub struct UpdateOrderUseCase<P: SessionProvider> {
    provider: Arc<P>,
}

impl<P: SessionProvider> UpdateOrderUseCase<P> {
    /// Create a new `UpdateOrderUseCase`.
    pub const fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Set the name of order `id` and return the stored row.
    ///
    /// Only the name is written; the creation timestamp of the stored row
    /// is kept.
    pub async fn execute(&self, id: OrderId, name: &str) -> Result<Order, OrderError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if !id.fits_store_key() {
            tracing::info!(order_id = %id, "Update matched no order");
            return Err(OrderError::NotFound(id));
        }

        let statement = Statement::new(UPDATE_ORDER)
            .bind("id", TypedValue::uint64(id.get()))
            .bind("name", TypedValue::utf8(name))
            .returning(&Order::COLUMNS);

        let result = with_session(self.provider.as_ref(), move |session| {
            Box::pin(async move { session.execute(&statement).await })
        })
        .await?;

        let Some(row) = result.rows().first() else {
            tracing::info!(order_id = %id, "Update matched no order");
            return Err(OrderError::NotFound(id));
        };
        let order = Order::from_row(row).map_err(OrderError::InvalidRow)?;

        tracing::info!(order_id = %id, name = order.name(), "Order updated");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ResultSet, StoreError};
    use crate::application::testing::ScriptedProvider;
    use crate::domain::order::{CREATED_AT_COLUMN, ID_COLUMN, NAME_COLUMN};
    use crate::domain::Row;
    use chrono::{TimeZone, Utc};

    fn id(value: u64) -> OrderId {
        OrderId::new(value).unwrap()
    }

    #[tokio::test]
    async fn returns_stored_row() {
        let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_result(Ok(ResultSet::new(
            vec![
                Row::default()
                    .with(ID_COLUMN, TypedValue::uint64(5))
                    .with(NAME_COLUMN, TypedValue::utf8("B"))
                    .with(CREATED_AT_COLUMN, TypedValue::timestamp(created_at)),
            ],
            1,
        )));
        let use_case = UpdateOrderUseCase::new(Arc::clone(&provider));

        let order = use_case.execute(id(5), "B").await.unwrap();

        assert_eq!(order.id(), Some(id(5)));
        assert_eq!(order.name(), "B");
        assert_eq!(order.created_at(), created_at);
        let executed = provider.executed();
        assert_eq!(executed[0].param("id"), Some(&TypedValue::uint64(5)));
        assert_eq!(executed[0].param("name"), Some(&TypedValue::utf8("B")));
    }

    #[tokio::test]
    async fn no_matching_row_is_not_found() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_result(Ok(ResultSet::default()));
        let use_case = UpdateOrderUseCase::new(Arc::clone(&provider));

        let err = use_case.execute(id(999), "X").await.unwrap_err();
        assert_eq!(err, OrderError::NotFound(id(999)));
        assert_eq!(provider.closed(), 1);
    }

    #[tokio::test]
    async fn id_beyond_store_keys_is_not_found() {
        let provider = Arc::new(ScriptedProvider::new());
        let use_case = UpdateOrderUseCase::new(Arc::clone(&provider));

        let err = use_case.execute(id(u64::MAX), "X").await.unwrap_err();

        assert_eq!(err, OrderError::NotFound(id(u64::MAX)));
        assert_eq!(provider.acquired(), 0);
    }

    #[tokio::test]
    async fn blank_name_never_reaches_store() {
        let provider = Arc::new(ScriptedProvider::new());
        let use_case = UpdateOrderUseCase::new(Arc::clone(&provider));

        let err = use_case.execute(id(1), "  ").await.unwrap_err();
        assert_eq!(err, OrderError::Invalid(ValidationError::EmptyName));
        assert_eq!(provider.acquired(), 0);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.failing_acquire(StoreError::connection("refused"));
        let use_case = UpdateOrderUseCase::new(Arc::clone(&provider));

        let err = use_case.execute(id(1), "A").await.unwrap_err();
        assert!(err.is_internal());
    }
}
