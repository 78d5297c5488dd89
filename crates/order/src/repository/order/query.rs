use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait,
    domain::requests::order::FindAllOrders, model::order::Order as OrderModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

const ORDER_COLUMNS: &str = "order_id, buyer_id, store_id, status, payment_method, \
     recipient_name, phone, street, city, notes, shipping_option_id, subtotal, shipping_cost, \
     total_price, created_at, updated_at";

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn find_page(
        &self,
        column: &str,
        owner_id: i32,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let limit = req.page_size as i64;
        let offset = ((req.page - 1).max(0) * req.page_size) as i64;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM orders WHERE {column} = $1"))
                .bind(owner_id)
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| {
                    error!("❌ Failed to count orders: {:?}", e);
                    RepositoryError::from(e)
                })?;

        let orders = sqlx::query_as::<_, OrderModel>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE {column} = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch orders: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok((orders, total))
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_by_id(&self, order_id: i32) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, OrderModel>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch order {}: {:?}", order_id, e);
            RepositoryError::from(e)
        })?;

        Ok(order)
    }

    async fn find_by_buyer(
        &self,
        buyer_id: i32,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!("🔍 Fetching orders for buyer {buyer_id}");
        self.find_page("buyer_id", buyer_id, req).await
    }

    async fn find_by_store(
        &self,
        store_id: i32,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!("🔍 Fetching orders for store {store_id}");
        self.find_page("store_id", store_id, req).await
    }
}
