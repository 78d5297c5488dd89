use crate::{
    abstract_trait::{
        order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
        order_item::DynOrderItemQueryRepository,
    },
    domain::{
        requests::order::FindAllOrders,
        response::order::{OrderDetailResponse, OrderItemResponse, OrderResponse},
    },
};
use async_trait::async_trait;
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use prometheus_client::registry::Registry;
use shared::{
    domain::responses::{ApiResponse, ApiResponsePagination, Pagination},
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, Status as StatusUtils, TracingContext},
};
use tokio::time::Instant;
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    order_item_query: DynOrderItemQueryRepository,
    metrics: Metrics,
}

impl OrderQueryService {
    pub fn new(
        query: DynOrderQueryRepository,
        order_item_query: DynOrderItemQueryRepository,
        registry: &mut Registry,
    ) -> Self {
        let metrics = Metrics::new();

        registry.register(
            "order_query_service_request_counter",
            "Total number of requests to the OrderQueryService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "order_query_service_request_duration",
            "Histogram of request durations for the OrderQueryService",
            metrics.request_duration.clone(),
        );

        Self {
            query,
            order_item_query,
            metrics,
        }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("order-query-service")
    }

    fn start_tracing(&self, operation_name: &str, attributes: Vec<KeyValue>) -> TracingContext {
        let start_time = Instant::now();
        let tracer = self.get_tracer();
        let mut span = tracer
            .span_builder(operation_name.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation_name}");

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation_name.to_string())],
        );

        let cx = Context::current_with_span(span);
        TracingContext { cx, start_time }
    }

    async fn complete_tracing(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        is_success: bool,
        message: &str,
    ) {
        let status = if is_success {
            StatusUtils::Success
        } else {
            StatusUtils::Error
        };
        let elapsed = tracing_ctx.start_time.elapsed().as_secs_f64();

        tracing_ctx.cx.span().add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", if is_success { "SUCCESS" } else { "ERROR" }),
                KeyValue::new("duration_secs", elapsed.to_string()),
                KeyValue::new("message", message.to_string()),
            ],
        );

        if is_success {
            info!("✅ Operation completed successfully: {message}");
        } else {
            error!("❌ Operation failed: {message}");
        }

        self.metrics.record(method, status, elapsed);

        tracing_ctx.cx.span().end();
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_by_id(
        &self,
        order_id: i32,
    ) -> Result<ApiResponse<OrderDetailResponse>, ServiceError> {
        info!("🔍 Fetching order ID={order_id}");

        let tracing_ctx = self.start_tracing(
            "find_order_by_id",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.id", order_id.to_string()),
            ],
        );

        let order = match self.query.find_by_id(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                self.complete_tracing(&tracing_ctx, Method::Get, false, "Order not found")
                    .await;
                return Err(ServiceError::Repo(RepositoryError::NotFound));
            }
            Err(e) => {
                error!("❌ Failed to fetch order ID={order_id}: {e:?}");
                self.complete_tracing(&tracing_ctx, Method::Get, false, "Failed to fetch order")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        let items = match self.order_item_query.find_by_order(order_id).await {
            Ok(items) => items,
            Err(e) => {
                error!("❌ Failed to fetch items of order ID={order_id}: {e:?}");
                self.complete_tracing(&tracing_ctx, Method::Get, false, "Failed to fetch items")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        self.complete_tracing(&tracing_ctx, Method::Get, true, "Order fetched")
            .await;

        Ok(ApiResponse::success(
            "Order fetched successfully",
            OrderDetailResponse {
                order: OrderResponse::from(order),
                items: items.into_iter().map(OrderItemResponse::from).collect(),
            },
        ))
    }

    async fn find_by_buyer(
        &self,
        buyer_id: i32,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        let tracing_ctx = self.start_tracing(
            "find_orders_by_buyer",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.buyer_id", buyer_id.to_string()),
            ],
        );

        match self.query.find_by_buyer(buyer_id, req).await {
            Ok((orders, total)) => {
                self.complete_tracing(&tracing_ctx, Method::Get, true, "Orders fetched")
                    .await;
                Ok(ApiResponsePagination::success(
                    "Orders fetched successfully",
                    orders.into_iter().map(OrderResponse::from).collect(),
                    Pagination::new(req.page, req.page_size, total),
                ))
            }
            Err(e) => {
                self.complete_tracing(&tracing_ctx, Method::Get, false, "Failed to fetch orders")
                    .await;
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn find_by_store(
        &self,
        store_id: i32,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        let tracing_ctx = self.start_tracing(
            "find_orders_by_store",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.store_id", store_id.to_string()),
            ],
        );

        match self.query.find_by_store(store_id, req).await {
            Ok((orders, total)) => {
                self.complete_tracing(&tracing_ctx, Method::Get, true, "Orders fetched")
                    .await;
                Ok(ApiResponsePagination::success(
                    "Orders fetched successfully",
                    orders.into_iter().map(OrderResponse::from).collect(),
                    Pagination::new(req.page, req.page_size, total),
                ))
            }
            Err(e) => {
                self.complete_tracing(&tracing_ctx, Method::Get, false, "Failed to fetch orders")
                    .await;
                Err(ServiceError::Repo(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::{
        order::repository::MockOrderQueryRepositoryTrait,
        order_item::MockOrderItemQueryRepositoryTrait,
    };
    use crate::model::{order::Order as OrderModel, order_item::OrderItem as OrderItemModel};
    use sqlx::types::Json;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn stored_order(order_id: i32) -> OrderModel {
        OrderModel {
            order_id,
            buyer_id: 1,
            store_id: 10,
            status: "pending".into(),
            payment_method: "cod".into(),
            recipient_name: "Siti".into(),
            phone: "0812".into(),
            street: "Jl. Merdeka 1".into(),
            city: "Banda Aceh".into(),
            notes: None,
            shipping_option_id: "same_day".into(),
            subtotal: 150_000,
            shipping_cost: 15_000,
            total_price: 165_000,
            created_at: None,
            updated_at: None,
        }
    }

    fn stored_item(order_id: i32) -> OrderItemModel {
        OrderItemModel {
            order_item_id: 1,
            order_id,
            product_id: 3,
            product_name: "Kopi Gayo 250g".into(),
            quantity: 2,
            unit_price: 75_000,
            selected_options: Json(BTreeMap::new()),
            line_total: 150_000,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn find_by_id_returns_order_with_items() {
        let mut query = MockOrderQueryRepositoryTrait::new();
        query
            .expect_find_by_id()
            .returning(|order_id| Ok(Some(stored_order(order_id))));

        let mut items = MockOrderItemQueryRepositoryTrait::new();
        items
            .expect_find_by_order()
            .returning(|order_id| Ok(vec![stored_item(order_id)]));

        let service =
            OrderQueryService::new(Arc::new(query), Arc::new(items), &mut Registry::default());

        let response = service.find_by_id(42).await.unwrap();

        assert_eq!(response.data.order.id, 42);
        assert_eq!(response.data.items.len(), 1);
        assert_eq!(response.data.items[0].line_total, 150_000);
    }

    #[tokio::test]
    async fn find_by_id_surfaces_not_found() {
        let mut query = MockOrderQueryRepositoryTrait::new();
        query.expect_find_by_id().returning(|_| Ok(None));

        let mut items = MockOrderItemQueryRepositoryTrait::new();
        items.expect_find_by_order().times(0);

        let service =
            OrderQueryService::new(Arc::new(query), Arc::new(items), &mut Registry::default());

        let result = service.find_by_id(42).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::NotFound))
        ));
    }
}
