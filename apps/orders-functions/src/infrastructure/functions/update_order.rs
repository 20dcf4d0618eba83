//! `update-order` function.

use std::sync::Arc;

use async_trait::async_trait;

use super::OrderFunction;
use crate::application::ports::SessionProvider;
use crate::application::use_cases::UpdateOrderUseCase;
use crate::domain::{IdPolicy, Order, ValidationError};
use crate::error::ApiError;
use crate::infrastructure::http::{HttpEvent, HttpResponse};

/// Accepts `PUT`, `PATCH` or `UPDATE` with an order body carrying `id`;
/// answers 200 with the stored order or 404 when no order has that id.
pub struct UpdateOrderFunction<P: SessionProvider> {
    use_case: UpdateOrderUseCase<P>,
}

impl<P: SessionProvider> UpdateOrderFunction<P> {
    async fn update(&self, event: HttpEvent) -> Result<HttpResponse, ApiError> {
        let method = event.method();
        if !method.is_update() {
            return Err(ApiError::MethodNotAllowed {
                method: method.to_string(),
            });
        }

        let payload = event.json_body()?;
        let order = Order::from_payload(&payload, IdPolicy::Required)?;
        let id = order.id().ok_or(ValidationError::MissingField("id"))?;
        let updated = self.use_case.execute(id, order.name()).await?;
        Ok(HttpResponse::ok_order(updated))
    }
}

#[async_trait]
impl<P: SessionProvider + 'static> OrderFunction<P> for UpdateOrderFunction<P> {
    const NAME: &'static str = "update-order";

    fn new(provider: Arc<P>) -> Self {
        Self {
            use_case: UpdateOrderUseCase::new(provider),
        }
    }

    async fn handle(&self, event: HttpEvent) -> HttpResponse {
        self.update(event)
            .await
            .unwrap_or_else(ApiError::into_response)
    }
}
