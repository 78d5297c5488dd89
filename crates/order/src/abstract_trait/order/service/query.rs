use crate::domain::{
    requests::order::FindAllOrders,
    response::order::{OrderDetailResponse, OrderResponse},
};
use async_trait::async_trait;
use shared::{
    domain::responses::{ApiResponse, ApiResponsePagination},
    errors::ServiceError,
};
use std::sync::Arc;

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_by_id(&self, order_id: i32)
    -> Result<ApiResponse<OrderDetailResponse>, ServiceError>;
    async fn find_by_buyer(
        &self,
        buyer_id: i32,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError>;
    async fn find_by_store(
        &self,
        store_id: i32,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError>;
}
