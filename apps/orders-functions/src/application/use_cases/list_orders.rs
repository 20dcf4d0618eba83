//! List Orders Use Case

use std::sync::Arc;

use crate::application::errors::OrderError;
use crate::application::ports::{Session, SessionProvider};
use crate::application::services::with_session;
use crate::domain::{ORDERS_TABLE, Order};

/// Use case for reading the whole `orders` table.
pub struct ListOrdersUseCase<P: SessionProvider> {
    provider: Arc<P>,
}

impl<P: SessionProvider> ListOrdersUseCase<P> {
    /// Create a new `ListOrdersUseCase`.
    pub const fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Every stored order, in store order.
    pub async fn execute(&self) -> Result<Vec<Order>, OrderError> {
        let rows = with_session(self.provider.as_ref(), |session| {
            Box::pin(async move {
                session
                    .stream_read_table(ORDERS_TABLE, &Order::COLUMNS)
                    .await
            })
        })
        .await?;

        let orders = rows
            .iter()
            .map(Order::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(OrderError::InvalidRow)?;

        tracing::debug!(count = orders.len(), "Orders listed");
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::StoreError;
    use crate::application::testing::ScriptedProvider;
    use crate::domain::order::{CREATED_AT_COLUMN, ID_COLUMN, NAME_COLUMN};
    use crate::domain::{Row, TypedValue};
    use chrono::{TimeZone, Utc};

    fn row(id: u64, name: &str) -> Row {
        Row::default()
            .with(ID_COLUMN, TypedValue::uint64(id))
            .with(NAME_COLUMN, TypedValue::utf8(name))
            .with(
                CREATED_AT_COLUMN,
                TypedValue::timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            )
    }

    #[tokio::test]
    async fn keeps_store_order() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.with_table(vec![row(3, "C"), row(1, "A"), row(2, "B")]);
        let use_case = ListOrdersUseCase::new(Arc::clone(&provider));

        let orders = use_case.execute().await.unwrap();

        let names: Vec<&str> = orders.iter().map(Order::name).collect();
        assert_eq!(names, ["C", "A", "B"]);
        assert_eq!(provider.tables_read(), ["orders"]);
        assert_eq!(provider.closed(), 1);
    }

    #[tokio::test]
    async fn empty_table() {
        let provider = Arc::new(ScriptedProvider::new());
        let use_case = ListOrdersUseCase::new(Arc::clone(&provider));
        assert!(use_case.execute().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_stored_name_is_listed() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.with_table(vec![row(1, "A"), row(2, "")]);
        let use_case = ListOrdersUseCase::new(Arc::clone(&provider));

        let orders = use_case.execute().await.unwrap();

        let names: Vec<&str> = orders.iter().map(Order::name).collect();
        assert_eq!(names, ["A", ""]);
    }

    #[tokio::test]
    async fn invalid_row_is_reported() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.with_table(vec![row(0, "A")]);
        let use_case = ListOrdersUseCase::new(Arc::clone(&provider));

        let err = use_case.execute().await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidRow(_)));
        assert!(err.is_internal());
    }

    #[tokio::test]
    async fn read_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.failing_table(StoreError::query("table missing"));
        let use_case = ListOrdersUseCase::new(Arc::clone(&provider));

        assert!(matches!(
            use_case.execute().await,
            Err(OrderError::Store(StoreError::Query(_)))
        ));
        assert_eq!(provider.closed(), 1);
    }
}
