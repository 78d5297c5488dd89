use crate::{
    abstract_trait::catalog::ProductCatalogRepositoryTrait, model::catalog::CatalogProduct,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;

/// Reads product rows for checkout straight from the shared database; the
/// product service owns their lifecycle.
#[derive(Clone)]
pub struct ProductCatalogRepository {
    db: ConnectionPool,
}

impl ProductCatalogRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCatalogRepositoryTrait for ProductCatalogRepository {
    async fn find_for_checkout(
        &self,
        product_ids: &[i32],
    ) -> Result<Vec<CatalogProduct>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let products = sqlx::query_as::<_, CatalogProduct>(
            "SELECT product_id, store_id, name, price, discount_price, stock, variant_axes, \
             is_active \
             FROM products WHERE product_id = ANY($1)",
        )
        .bind(product_ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch checkout products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }
}
