use crate::{domain::requests::order::CreateOrderRecordRequest, model::order::Order as OrderModel};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Persists every sibling order of one checkout submission, with its
    /// items and the matching stock decrements, in a single transaction.
    async fn create_orders(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<Vec<OrderModel>, RepositoryError>;

    /// Moves an order from `from_status` to `to_status`; the guard on the
    /// current status turns a concurrent transition into a conflict instead
    /// of a silent overwrite.
    async fn update_status(
        &self,
        order_id: i32,
        from_status: &str,
        to_status: &str,
    ) -> Result<OrderModel, RepositoryError>;

    /// Cancels an order still at `from_status` and restores the stock its
    /// items had claimed, in a single transaction.
    async fn cancel_order(
        &self,
        order_id: i32,
        from_status: &str,
    ) -> Result<OrderModel, RepositoryError>;
}
