use crate::domain::{
    requests::product::{CreateProductRequest, RestockProductRequest, UpdateProductRequest},
    response::product::ProductResponse,
};
use async_trait::async_trait;
use shared::{domain::responses::ApiResponse, errors::ServiceError};
use std::sync::Arc;

pub type DynProductCommandService = Arc<dyn ProductCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandServiceTrait {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn update_product(
        &self,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn deactivate_product(
        &self,
        product_id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn activate_product(
        &self,
        product_id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn restock_product(
        &self,
        product_id: i32,
        req: &RestockProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
}
