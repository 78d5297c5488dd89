use crate::domain::{
    requests::order::{CheckoutRequest, UpdateOrderStatusRequest},
    response::order::OrderResponse,
};
use async_trait::async_trait;
use shared::{domain::responses::ApiResponse, errors::ServiceError};
use std::sync::Arc;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandServiceTrait {
    /// Composes the submitted cart into per-vendor orders and persists them.
    /// Either every sibling order lands or none do.
    async fn checkout(
        &self,
        req: &CheckoutRequest,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError>;

    async fn update_order_status(
        &self,
        req: &UpdateOrderStatusRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
