//! `create-order` function.

use std::sync::Arc;

use async_trait::async_trait;

use super::OrderFunction;
use crate::application::ports::SessionProvider;
use crate::application::use_cases::CreateOrderUseCase;
use crate::domain::{IdPolicy, Order};
use crate::error::ApiError;
use crate::infrastructure::http::{HttpEvent, HttpMethod, HttpResponse};

/// Accepts `POST` with an order body; answers 201 with the stored order.
pub struct CreateOrderFunction<P: SessionProvider> {
    use_case: CreateOrderUseCase<P>,
}

impl<P: SessionProvider> CreateOrderFunction<P> {
    async fn create(&self, event: HttpEvent) -> Result<HttpResponse, ApiError> {
        let method = event.method();
        if method != HttpMethod::Post {
            return Err(ApiError::MethodNotAllowed {
                method: method.to_string(),
            });
        }

        let payload = event.json_body()?;
        let order = Order::from_payload(&payload, IdPolicy::Ignored)?;
        let created = self.use_case.execute(order).await?;
        Ok(HttpResponse::created(created))
    }
}

#[async_trait]
impl<P: SessionProvider + 'static> OrderFunction<P> for CreateOrderFunction<P> {
    const NAME: &'static str = "create-order";

    fn new(provider: Arc<P>) -> Self {
        Self {
            use_case: CreateOrderUseCase::new(provider),
        }
    }

    async fn handle(&self, event: HttpEvent) -> HttpResponse {
        self.create(event)
            .await
            .unwrap_or_else(ApiError::into_response)
    }
}
