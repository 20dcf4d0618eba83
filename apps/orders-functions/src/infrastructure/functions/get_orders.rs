//! `get-orders` function.

use std::sync::Arc;

use async_trait::async_trait;

use super::OrderFunction;
use crate::application::ports::SessionProvider;
use crate::application::use_cases::ListOrdersUseCase;
use crate::error::ApiError;
use crate::infrastructure::http::{HttpEvent, HttpMethod, HttpResponse};

/// Accepts `GET`; answers 200 with every stored order.
pub struct GetOrdersFunction<P: SessionProvider> {
    use_case: ListOrdersUseCase<P>,
}

impl<P: SessionProvider> GetOrdersFunction<P> {
    async fn list(&self, event: &HttpEvent) -> Result<HttpResponse, ApiError> {
        let method = event.method();
        if method != HttpMethod::Get {
            return Err(ApiError::MethodNotAllowed {
                method: method.to_string(),
            });
        }

        let orders = self.use_case.execute().await?;
        Ok(HttpResponse::orders(orders))
    }
}

#[async_trait]
impl<P: SessionProvider + 'static> OrderFunction<P> for GetOrdersFunction<P> {
    const NAME: &'static str = "get-orders";

    fn new(provider: Arc<P>) -> Self {
        Self {
            use_case: ListOrdersUseCase::new(provider),
        }
    }

    async fn handle(&self, event: HttpEvent) -> HttpResponse {
        self.list(&event)
            .await
            .unwrap_or_else(ApiError::into_response)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use test_case::test_case;

    use super::*;
    use crate::application::ports::StoreError;
    use crate::application::testing::ScriptedProvider;
    use crate::domain::{Row, TypedValue};

    #[test_case("POST"; "post")]
    #[test_case("DELETE"; "delete")]
    #[test_case("PATCH"; "patch")]
    #[tokio::test]
    async fn rejects_other_methods(method: &str) {
        let provider = Arc::new(ScriptedProvider::new());
        let function = GetOrdersFunction::new(Arc::clone(&provider));

        assert_eq!(function.handle(HttpEvent::new(method)).await.status_code, 405);
        assert_eq!(provider.acquired(), 0);
    }

    #[tokio::test]
    async fn lists_as_bare_array() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.with_table(vec![
            Row::default()
                .with("id", TypedValue::uint64(1))
                .with("name", TypedValue::utf8("Widget"))
                .with(
                    "created_at",
                    TypedValue::timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                ),
        ]);
        let function = GetOrdersFunction::new(Arc::clone(&provider));

        let response = function.handle(HttpEvent::new("GET")).await;

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "statusCode": 200,
                "body": [{"id": 1, "name": "Widget", "createdAt": "2024-01-01T00:00:00Z"}]
            })
        );
    }

    #[tokio::test]
    async fn read_failure_is_500() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.failing_table(StoreError::connection("reset by peer"));
        let function = GetOrdersFunction::new(Arc::clone(&provider));

        assert_eq!(function.handle(HttpEvent::new("GET")).await.status_code, 500);
        assert_eq!(provider.closed(), 1);
    }
}
