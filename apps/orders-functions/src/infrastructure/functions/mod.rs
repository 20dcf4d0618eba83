//! Order Functions (Driver Adapters)
//!
//! One function per operation. Each checks the method, validates the event,
//! runs its use case and maps the outcome to the response envelope. Method
//! and validation failures are answered before any session is acquired.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::SessionProvider;
use crate::infrastructure::http::{HttpEvent, HttpMethod, HttpResponse};

mod create_order;
mod delete_order;
mod get_orders;
mod update_order;

pub use create_order::CreateOrderFunction;
pub use delete_order::DeleteOrderFunction;
pub use get_orders::GetOrdersFunction;
pub use update_order::UpdateOrderFunction;

/// A deployable function handler.
#[async_trait]
pub trait OrderFunction<P: SessionProvider>: Send + Sync + Sized {
    /// Function name used in logs and deployment.
    const NAME: &'static str;

    /// Build the handler over a shared provider.
    fn new(provider: Arc<P>) -> Self;

    /// Handle one invocation.
    async fn handle(&self, event: HttpEvent) -> HttpResponse;
}

/// All four functions over one provider, routed by method.
pub struct OrderFunctions<P: SessionProvider> {
    create: CreateOrderFunction<P>,
    read: GetOrdersFunction<P>,
    update: UpdateOrderFunction<P>,
    delete: DeleteOrderFunction<P>,
}

impl<P: SessionProvider + 'static> OrderFunctions<P> {
    /// Build every function over `provider`.
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            create: CreateOrderFunction::new(Arc::clone(&provider)),
            read: GetOrdersFunction::new(Arc::clone(&provider)),
            update: UpdateOrderFunction::new(Arc::clone(&provider)),
            delete: DeleteOrderFunction::new(provider),
        }
    }

    /// Name of the function serving `method`, if any.
    #[must_use]
    pub fn function_for(method: &HttpMethod) -> Option<&'static str> {
        match method {
            HttpMethod::Post => Some(<CreateOrderFunction<P> as OrderFunction<P>>::NAME),
            HttpMethod::Get => Some(<GetOrdersFunction<P> as OrderFunction<P>>::NAME),
            HttpMethod::Delete => Some(<DeleteOrderFunction<P> as OrderFunction<P>>::NAME),
            m if m.is_update() => Some(<UpdateOrderFunction<P> as OrderFunction<P>>::NAME),
            _ => None,
        }
    }

    /// Hand `event` to the function serving its method.
    pub async fn route(&self, event: HttpEvent) -> HttpResponse {
        match event.method() {
            HttpMethod::Post => self.create.handle(event).await,
            HttpMethod::Get => self.read.handle(event).await,
            HttpMethod::Delete => self.delete.handle(event).await,
            m if m.is_update() => self.update.handle(event).await,
            _ => HttpResponse::method_not_allowed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;
    use crate::application::testing::ScriptedProvider;
    use crate::infrastructure::http::METHOD_NOT_ALLOWED;

    #[test_case("POST", Some("create-order"); "post creates")]
    #[test_case("get", Some("get-orders"); "get reads")]
    #[test_case("PUT", Some("update-order"); "put updates")]
    #[test_case("UPDATE", Some("update-order"); "legacy update verb")]
    #[test_case("DELETE", Some("delete-order"); "delete deletes")]
    #[test_case("HEAD", None; "head is unrouted")]
    fn routes_by_method(method: &str, expected: Option<&str>) {
        assert_eq!(
            OrderFunctions::<ScriptedProvider>::function_for(&HttpMethod::parse(method)),
            expected
        );
    }

    #[tokio::test]
    async fn unrouted_method_never_acquires() {
        let provider = Arc::new(ScriptedProvider::new());
        let functions = OrderFunctions::new(Arc::clone(&provider));

        let response = functions
            .route(HttpEvent::new("OPTIONS").with_body(json!({"name": "A"})))
            .await;

        assert_eq!(response.status_code, METHOD_NOT_ALLOWED);
        assert_eq!(provider.acquired(), 0);
    }

    #[tokio::test]
    async fn routes_reads() {
        let provider = Arc::new(ScriptedProvider::new());
        let functions = OrderFunctions::new(Arc::clone(&provider));

        let response = functions.route(HttpEvent::new("GET")).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(provider.tables_read(), ["orders"]);
    }
}
