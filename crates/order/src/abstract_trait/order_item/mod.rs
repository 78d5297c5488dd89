use crate::model::order_item::OrderItem as OrderItemModel;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderItemQueryRepository = Arc<dyn OrderItemQueryRepositoryTrait + Send + Sync>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderItemQueryRepositoryTrait {
    async fn find_by_order(&self, order_id: i32) -> Result<Vec<OrderItemModel>, RepositoryError>;
}
