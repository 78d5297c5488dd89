use crate::{
    abstract_trait::product::{
        repository::{DynProductCommandRepository, DynProductQueryRepository},
        service::{DynProductCommandService, DynProductQueryService},
    },
    repository::product::{ProductCommandRepository, ProductQueryRepository},
    service::product::{ProductCommandService, ProductQueryService},
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub product_query: DynProductQueryService,
    pub product_command: DynProductCommandService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("product_query", &"ProductQueryService")
            .field("product_command", &"ProductCommandService")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(pool: ConnectionPool, registry: &mut Registry) -> Self {
        let query_repo: DynProductQueryRepository =
            Arc::new(ProductQueryRepository::new(pool.clone()));
        let command_repo: DynProductCommandRepository =
            Arc::new(ProductCommandRepository::new(pool));

        let product_query: DynProductQueryService =
            Arc::new(ProductQueryService::new(query_repo, registry));
        let product_command: DynProductCommandService =
            Arc::new(ProductCommandService::new(command_repo, registry));

        Self {
            product_query,
            product_command,
        }
    }
}
