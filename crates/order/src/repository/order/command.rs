use crate::{
    abstract_trait::order::repository::OrderCommandRepositoryTrait,
    domain::requests::order::CreateOrderRecordRequest, model::order::Order as OrderModel,
};
use async_trait::async_trait;
use checkout::OrderStatus;
use serde_json::json;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

const ORDER_RETURNING: &str = "RETURNING order_id, buyer_id, store_id, status, payment_method, \
     recipient_name, phone, street, city, notes, shipping_option_id, subtotal, shipping_cost, \
     total_price, created_at, updated_at";

#[derive(Clone)]
pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_orders(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<Vec<OrderModel>, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let mut orders = Vec::with_capacity(req.intents.len());

        for intent in &req.intents {
            let order = sqlx::query_as::<_, OrderModel>(&format!(
                "INSERT INTO orders \
                 (buyer_id, store_id, status, payment_method, recipient_name, phone, street, \
                  city, notes, shipping_option_id, subtotal, shipping_cost, total_price, \
                  created_at, updated_at) \
                 VALUES ($1, $2, $3, 'cod', $4, $5, $6, $7, $8, $9, $10, $11, $12, \
                         current_timestamp, current_timestamp) \
                 {ORDER_RETURNING}"
            ))
            .bind(req.buyer_id)
            .bind(intent.store_id)
            .bind(OrderStatus::Pending.as_str())
            .bind(&req.recipient_name)
            .bind(&req.phone)
            .bind(&req.street)
            .bind(&req.city)
            .bind(&req.notes)
            .bind(&intent.shipping_option.option_id)
            .bind(intent.subtotal)
            .bind(intent.shipping_cost)
            .bind(intent.total)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to create order for store {}: {:?}",
                    intent.store_id, err
                );
                RepositoryError::from(err)
            })?;

            for line in &intent.lines {
                // stock claim and item insert live in the same transaction
                // as the order row, so a failed claim rolls everything back
                let claimed = sqlx::query(
                    "UPDATE products \
                     SET stock = stock - $2, updated_at = current_timestamp \
                     WHERE product_id = $1 AND stock >= $2",
                )
                .bind(line.product_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::from)?;

                if claimed.rows_affected() == 0 {
                    error!(
                        "❌ Insufficient stock for product {} during checkout",
                        line.product_id
                    );
                    return Err(RepositoryError::Conflict(format!(
                        "insufficient stock for product {}",
                        line.product_id
                    )));
                }

                sqlx::query(
                    "INSERT INTO order_items \
                     (order_id, product_id, product_name, quantity, unit_price, \
                      selected_options, line_total, created_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, current_timestamp)",
                )
                .bind(order.order_id)
                .bind(line.product_id)
                .bind(&line.product_name)
                .bind(line.quantity)
                .bind(line.unit_price)
                .bind(json!(line.selected_options))
                .bind(line.line_total)
                .execute(&mut *tx)
                .await
                .map_err(|err| {
                    error!(
                        "❌ Failed to create order item for order {}: {:?}",
                        order.order_id, err
                    );
                    RepositoryError::from(err)
                })?;
            }

            orders.push(order);
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "✅ Created {} order(s) for buyer {}",
            orders.len(),
            req.buyer_id
        );
        Ok(orders)
    }

    async fn update_status(
        &self,
        order_id: i32,
        from_status: &str,
        to_status: &str,
    ) -> Result<OrderModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, OrderModel>(&format!(
            "UPDATE orders \
             SET status = $3, updated_at = current_timestamp \
             WHERE order_id = $1 AND status = $2 \
             {ORDER_RETURNING}"
        ))
        .bind(order_id)
        .bind(from_status)
        .bind(to_status)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to update status of order {}: {:?}", order_id, e);
            RepositoryError::from(e)
        })?
        .ok_or_else(|| {
            RepositoryError::Conflict(format!("order {order_id} is no longer '{from_status}'"))
        })?;

        info!("🔄 Order {} moved {} -> {}", order_id, from_status, to_status);
        Ok(order)
    }

    async fn cancel_order(
        &self,
        order_id: i32,
        from_status: &str,
    ) -> Result<OrderModel, RepositoryError> {
        info!("🗑️ Cancelling order {}", order_id);

        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, OrderModel>(&format!(
            "UPDATE orders \
             SET status = $3, updated_at = current_timestamp \
             WHERE order_id = $1 AND status = $2 \
             {ORDER_RETURNING}"
        ))
        .bind(order_id)
        .bind(from_status)
        .bind(OrderStatus::Cancelled.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Failed to cancel order {}: {:?}", order_id, e);
            RepositoryError::from(e)
        })?
        .ok_or_else(|| {
            RepositoryError::Conflict(format!("order {order_id} is no longer '{from_status}'"))
        })?;

        // hand the claimed stock back to the catalog
        sqlx::query(
            "UPDATE products p \
             SET stock = p.stock + oi.quantity, updated_at = current_timestamp \
             FROM order_items oi \
             WHERE oi.order_id = $1 AND oi.product_id = p.product_id",
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Failed to restore stock for order {}: {:?}", order_id, e);
            RepositoryError::from(e)
        })?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!("✅ Order {} cancelled, stock restored", order_id);
        Ok(order)
    }
}
