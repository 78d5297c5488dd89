use crate::{
    abstract_trait::{
        catalog::DynProductCatalogRepository,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::{DynOrderCommandService, DynOrderQueryService},
        },
        order_item::DynOrderItemQueryRepository,
    },
    repository::{
        catalog::ProductCatalogRepository,
        order::{OrderCommandRepository, OrderQueryRepository},
        order_item::OrderItemQueryRepository,
    },
    service::order::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService},
};
use checkout::ShippingCalculator;
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub order_query: DynOrderQueryService,
    pub order_command: DynOrderCommandService,
    pub shipping: Arc<ShippingCalculator>,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("order_query", &"OrderQueryService")
            .field("order_command", &"OrderCommandService")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(pool: ConnectionPool, registry: &mut Registry) -> Self {
        let order_query_repo: DynOrderQueryRepository =
            Arc::new(OrderQueryRepository::new(pool.clone()));
        let order_command_repo: DynOrderCommandRepository =
            Arc::new(OrderCommandRepository::new(pool.clone()));
        let order_item_query_repo: DynOrderItemQueryRepository =
            Arc::new(OrderItemQueryRepository::new(pool.clone()));
        let catalog_repo: DynProductCatalogRepository =
            Arc::new(ProductCatalogRepository::new(pool));

        let shipping = Arc::new(ShippingCalculator::with_default_catalog());

        let order_query: DynOrderQueryService = Arc::new(OrderQueryService::new(
            order_query_repo.clone(),
            order_item_query_repo,
            registry,
        ));

        let order_command: DynOrderCommandService = Arc::new(OrderCommandService::new(
            OrderCommandServiceDeps {
                catalog: catalog_repo,
                command: order_command_repo,
                query: order_query_repo,
                shipping: shipping.clone(),
            },
            registry,
        ));

        Self {
            order_query,
            order_command,
            shipping,
        }
    }
}
