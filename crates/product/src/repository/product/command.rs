use crate::{
    abstract_trait::product::repository::ProductCommandRepositoryTrait,
    domain::requests::product::{CreateProductRequest, UpdateProductRequest},
    model::product::Product as ProductModel,
};
use async_trait::async_trait;
use serde_json::json;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

const RETURNING: &str = "RETURNING product_id, store_id, name, description, price, \
     discount_price, stock, image_urls, variant_axes, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(&format!(
            "INSERT INTO products \
             (store_id, name, description, price, discount_price, stock, image_urls, \
              variant_axes, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, current_timestamp, current_timestamp) \
             {RETURNING}"
        ))
        .bind(req.store_id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.discount_price)
        .bind(req.stock)
        .bind(json!(req.image_urls))
        .bind(json!(req.variant_axes))
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to create product for store {}: {:?}",
                req.store_id, err
            );
            RepositoryError::from(err)
        })?;

        info!(
            "✅ Created product ID {} for store {}",
            result.product_id, result.store_id
        );
        Ok(result)
    }

    async fn update_product(
        &self,
        req: &UpdateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(&format!(
            "UPDATE products \
             SET name = $2, description = $3, price = $4, discount_price = $5, stock = $6, \
                 image_urls = $7, variant_axes = $8, updated_at = current_timestamp \
             WHERE product_id = $1 \
             {RETURNING}"
        ))
        .bind(req.product_id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.discount_price)
        .bind(req.stock)
        .bind(json!(req.image_urls))
        .bind(json!(req.variant_axes))
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to update product {}: {:?}", req.product_id, err);
            RepositoryError::from(err)
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!("🔄 Updated product ID {}", result.product_id);
        Ok(result)
    }

    async fn set_active(
        &self,
        product_id: i32,
        is_active: bool,
    ) -> Result<ProductModel, RepositoryError> {
        info!("🗂️ Setting product {} active={}", product_id, is_active);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let product = sqlx::query_as::<_, ProductModel>(&format!(
            "UPDATE products \
             SET is_active = $2, updated_at = current_timestamp \
             WHERE product_id = $1 \
             {RETURNING}"
        ))
        .bind(product_id)
        .bind(is_active)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to flag product {}: {:?}", product_id, e);
            RepositoryError::from(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        Ok(product)
    }

    async fn restock(&self, product_id: i32, amount: i32) -> Result<ProductModel, RepositoryError> {
        info!("📦 Restocking product {} by {}", product_id, amount);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let product = sqlx::query_as::<_, ProductModel>(&format!(
            "UPDATE products \
             SET stock = stock + $2, updated_at = current_timestamp \
             WHERE product_id = $1 AND stock + $2 >= 0 \
             {RETURNING}"
        ))
        .bind(product_id)
        .bind(amount)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to restock product {}: {:?}", product_id, e);
            RepositoryError::from(e)
        })?
        .ok_or_else(|| {
            RepositoryError::Conflict(format!(
                "product {product_id} missing or stock would go negative"
            ))
        })?;

        Ok(product)
    }
}
