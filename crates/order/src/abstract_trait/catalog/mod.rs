use crate::model::catalog::CatalogProduct;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductCatalogRepository = Arc<dyn ProductCatalogRepositoryTrait + Send + Sync>;

/// Read access to the product catalog the checkout core prices against.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalogRepositoryTrait {
    async fn find_for_checkout(
        &self,
        product_ids: &[i32],
    ) -> Result<Vec<CatalogProduct>, RepositoryError>;
}
