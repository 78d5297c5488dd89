use crate::{
    abstract_trait::order_item::OrderItemQueryRepositoryTrait,
    model::order_item::OrderItem as OrderItemModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;

#[derive(Clone)]
pub struct OrderItemQueryRepository {
    db: ConnectionPool,
}

impl OrderItemQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderItemQueryRepositoryTrait for OrderItemQueryRepository {
    async fn find_by_order(&self, order_id: i32) -> Result<Vec<OrderItemModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let items = sqlx::query_as::<_, OrderItemModel>(
            "SELECT order_item_id, order_id, product_id, product_name, quantity, unit_price, \
             selected_options, line_total, created_at \
             FROM order_items WHERE order_id = $1 \
             ORDER BY order_item_id",
        )
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch items for order {}: {:?}", order_id, e);
            RepositoryError::from(e)
        })?;

        Ok(items)
    }
}
