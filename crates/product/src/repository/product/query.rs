use crate::{
    abstract_trait::product::repository::ProductQueryRepositoryTrait,
    domain::requests::product::FindAllProducts, model::product::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

const PRODUCT_COLUMNS: &str = "product_id, store_id, name, description, price, discount_price, \
     stock, image_urls, variant_axes, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    fn search_pattern(req: &FindAllProducts) -> Option<String> {
        let trimmed = req.search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(format!("%{trimmed}%"))
        }
    }

    async fn find_page(
        &self,
        req: &FindAllProducts,
        active_only: bool,
        store_id: Option<i32>,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let pattern = Self::search_pattern(req);
        let limit = req.page_size as i64;
        let offset = ((req.page - 1).max(0) * req.page_size) as i64;

        let filter = "($1::TEXT IS NULL OR name ILIKE $1) \
             AND ($2::BOOL IS FALSE OR is_active) \
             AND ($3::INT4 IS NULL OR store_id = $3)";

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products WHERE {filter}"))
                .bind(pattern.as_deref())
                .bind(active_only)
                .bind(store_id)
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| {
                    error!("❌ Failed to count products: {:?}", e);
                    RepositoryError::from(e)
                })?;

        let products = sqlx::query_as::<_, ProductModel>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {filter} \
             ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        ))
        .bind(pattern.as_deref())
        .bind(active_only)
        .bind(store_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok((products, total))
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        info!("🔍 Fetching all products with search: {:?}", req.search);
        self.find_page(req, false, None).await
    }

    async fn find_active(
        &self,
        req: &FindAllProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        info!("🔍 Fetching active products with search: {:?}", req.search);
        self.find_page(req, true, None).await
    }

    async fn find_by_store(
        &self,
        store_id: i32,
        req: &FindAllProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        info!("🔍 Fetching products for store {store_id}");
        self.find_page(req, false, Some(store_id)).await
    }

    async fn find_by_id(&self, product_id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let product = sqlx::query_as::<_, ProductModel>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch product {}: {:?}", product_id, e);
            RepositoryError::from(e)
        })?;

        Ok(product)
    }
}
