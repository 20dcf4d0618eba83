//! `delete-order` function.

use std::sync::Arc;

use async_trait::async_trait;

use super::OrderFunction;
use crate::application::ports::SessionProvider;
use crate::application::use_cases::DeleteOrderUseCase;
use crate::domain::OrderId;
use crate::error::ApiError;
use crate::infrastructure::http::{HttpEvent, HttpMethod, HttpResponse};

/// Accepts `DELETE` with an `id` query parameter; answers 200 whether or
/// not the order existed.
pub struct DeleteOrderFunction<P: SessionProvider> {
    use_case: DeleteOrderUseCase<P>,
}

impl<P: SessionProvider> DeleteOrderFunction<P> {
    async fn delete(&self, event: &HttpEvent) -> Result<HttpResponse, ApiError> {
        let method = event.method();
        if method != HttpMethod::Delete {
            return Err(ApiError::MethodNotAllowed {
                method: method.to_string(),
            });
        }

        let raw = event
            .query_param("id")
            .ok_or_else(|| ApiError::BadRequest("missing id query parameter".to_string()))?;
        let id = OrderId::parse(raw).map_err(|e| ApiError::BadRequest(e.to_string()))?;

        self.use_case.execute(id).await?;
        Ok(HttpResponse::ok_message())
    }
}

#[async_trait]
impl<P: SessionProvider + 'static> OrderFunction<P> for DeleteOrderFunction<P> {
    const NAME: &'static str = "delete-order";

    fn new(provider: Arc<P>) -> Self {
        Self {
            use_case: DeleteOrderUseCase::new(provider),
        }
    }

    async fn handle(&self, event: HttpEvent) -> HttpResponse {
        self.delete(&event)
            .await
            .unwrap_or_else(ApiError::into_response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;
    use crate::application::ports::{ResultSet, StoreError};
    use crate::application::testing::ScriptedProvider;
    use crate::domain::TypedValue;

    fn function() -> (Arc<ScriptedProvider>, DeleteOrderFunction<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::new());
        (Arc::clone(&provider), DeleteOrderFunction::new(provider))
    }

    #[test_case(Some("0"); "zero")]
    #[test_case(None; "absent")]
    #[test_case(Some(""); "empty")]
    #[test_case(Some("abc"); "not a number")]
    #[test_case(Some("-1"); "negative")]
    #[test_case(Some("18446744073709551616"); "overflow")]
    #[tokio::test]
    async fn unusable_id_is_400(id: Option<&str>) {
        let (provider, function) = function();
        let mut event = HttpEvent::new("DELETE");
        if let Some(id) = id {
            event = event.with_query("id", id);
        }

        let response = function.handle(event).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(
            serde_json::to_value(&response.body).unwrap(),
            json!({"error": "Bad request"})
        );
        assert_eq!(provider.acquired(), 0);
    }

    #[tokio::test]
    async fn rejects_other_methods() {
        let (provider, function) = function();
        let response = function
            .handle(HttpEvent::new("GET").with_query("id", "1"))
            .await;
        assert_eq!(response.status_code, 405);
        assert_eq!(provider.acquired(), 0);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (provider, function) = function();
        provider.push_result(Ok(ResultSet::new(Vec::new(), 1)));
        provider.push_result(Ok(ResultSet::new(Vec::new(), 0)));

        for _ in 0..2 {
            let response = function
                .handle(HttpEvent::new("delete").with_query("id", " 5 "))
                .await;
            assert_eq!(response.status_code, 200);
            assert_eq!(
                serde_json::to_value(&response.body).unwrap(),
                json!({"message": "OK"})
            );
        }

        let executed = provider.executed();
        assert_eq!(executed.len(), 2);
        assert_eq!(executed[1].param("id"), Some(&TypedValue::uint64(5)));
    }

    #[test_case("9223372036854775808"; "one past signed range")]
    #[test_case("18446744073709551615"; "u64 max")]
    #[tokio::test]
    async fn id_beyond_store_keys_is_ok(id: &str) {
        let (provider, function) = function();

        let response = function
            .handle(HttpEvent::new("DELETE").with_query("id", id))
            .await;

        assert_eq!(response.status_code, 200);
        assert_eq!(
            serde_json::to_value(&response.body).unwrap(),
            json!({"message": "OK"})
        );
        assert!(provider.executed().is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_500() {
        let (provider, function) = function();
        provider.push_result(Err(StoreError::query("database is locked")));

        let response = function
            .handle(HttpEvent::new("DELETE").with_query("id", "5"))
            .await;

        assert_eq!(response.status_code, 500);
    }
}
