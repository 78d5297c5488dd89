use crate::{
    abstract_trait::{
        catalog::DynProductCatalogRepository,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::OrderCommandServiceTrait,
        },
    },
    domain::{
        requests::order::{
            CheckoutRequest, CreateOrderRecordRequest, OrderActor, UpdateOrderStatusRequest,
        },
        response::order::OrderResponse,
    },
    model::catalog::CatalogProduct,
};
use async_trait::async_trait;
use checkout::{CartAggregate, OrderComposer, OrderStatus, OrderStatusMachine, ShippingCalculator};
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use prometheus_client::registry::Registry;
use shared::{
    domain::responses::ApiResponse,
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, Status as StatusUtils, TracingContext},
};
use std::{collections::HashMap, sync::Arc};
use tokio::time::Instant;
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderCommandService {
    catalog: DynProductCatalogRepository,
    command: DynOrderCommandRepository,
    query: DynOrderQueryRepository,
    shipping: Arc<ShippingCalculator>,
    metrics: Metrics,
}

pub struct OrderCommandServiceDeps {
    pub catalog: DynProductCatalogRepository,
    pub command: DynOrderCommandRepository,
    pub query: DynOrderQueryRepository,
    pub shipping: Arc<ShippingCalculator>,
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        let OrderCommandServiceDeps {
            catalog,
            command,
            query,
            shipping,
        } = deps;

        let metrics = Metrics::new();

        registry.register(
            "order_command_service_request_counter",
            "Total number of requests to the OrderCommandService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "order_command_service_request_duration",
            "Histogram of request durations for the OrderCommandService",
            metrics.request_duration.clone(),
        );

        Self {
            catalog,
            command,
            query,
            shipping,
            metrics,
        }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("order-command-service")
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

    /// In-cart quantity handling clamps, but a submitted checkout is a
    /// commitment: anything the catalog can no longer honor is rejected
    /// outright.
    fn admit_for_checkout(
        product: &CatalogProduct,
        requested_quantity: i32,
    ) -> Result<(), ServiceError> {
        if !product.is_active {
            return Err(ServiceError::Conflict(format!(
                "product {} is no longer available",
                product.product_id
            )));
        }

        if requested_quantity > product.stock {
            return Err(ServiceError::Conflict(format!(
                "insufficient stock for product {}: requested={}, available={}",
                product.product_id, requested_quantity, product.stock
            )));
        }

        Ok(())
    }

    fn authorize_transition(
        order_buyer_id: i32,
        order_store_id: i32,
        target: OrderStatus,
        actor: OrderActor,
        actor_id: i32,
    ) -> Result<(), ServiceError> {
        match actor {
            OrderActor::Vendor => {
                if order_store_id != actor_id {
                    return Err(ServiceError::Forbidden(
                        "order belongs to another store".into(),
                    ));
                }
            }
            OrderActor::Buyer => {
                if order_buyer_id != actor_id {
                    return Err(ServiceError::Forbidden(
                        "order belongs to another buyer".into(),
                    ));
                }
                if target != OrderStatus::Cancelled {
                    return Err(ServiceError::Forbidden(
                        "buyers may only cancel an order".into(),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn checkout(
        &self,
        req: &CheckoutRequest,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        info!("🏗️ Checkout for buyer_id={}", req.buyer_id);

        let tracing_ctx = self.start_tracing(
            "checkout",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "checkout"),
                KeyValue::new("order.buyer_id", req.buyer_id.to_string()),
            ],
        );

        let product_ids: Vec<i32> = req.items.iter().map(|item| item.product_id).collect();

        let products = match self.catalog.find_for_checkout(&product_ids).await {
            Ok(products) => products,
            Err(e) => {
                error!("❌ Failed to fetch checkout products: {e:?}");
                self.complete_tracing(&tracing_ctx, Method::Post, false, "Product lookup failed")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        let by_id: HashMap<i32, &CatalogProduct> = products
            .iter()
            .map(|product| (product.product_id, product))
            .collect();

        let mut cart = CartAggregate::new();

        for item in &req.items {
            let product = by_id.get(&item.product_id).ok_or_else(|| {
                error!("❌ Product {} not found during checkout", item.product_id);
                ServiceError::Repo(RepositoryError::NotFound)
            })?;

            Self::admit_for_checkout(product, item.quantity)?;

            cart.add_line(
                product.to_checkout(),
                item.quantity,
                item.selected_options.clone(),
            )?;
        }

        let choices: HashMap<i32, String> = req
            .shipping_choices
            .iter()
            .map(|choice| (choice.store_id, choice.option_id.clone()))
            .collect();

        let intents = OrderComposer::new(&self.shipping).compose(&cart, &choices)?;

        info!(
            "🧾 Composed {} order intent(s) for buyer {}",
            intents.len(),
            req.buyer_id
        );

        let record = CreateOrderRecordRequest {
            buyer_id: req.buyer_id,
            recipient_name: req.recipient_name.clone(),
            phone: req.phone.clone(),
            street: req.street.clone(),
            city: req.city.clone(),
            notes: req.notes.clone(),
            intents,
        };

        let orders = match self.command.create_orders(&record).await {
            Ok(orders) => {
                self.complete_tracing(&tracing_ctx, Method::Post, true, "Checkout persisted")
                    .await;
                orders
            }
            Err(e) => {
                error!("❌ Failed to persist checkout: {e:?}");
                self.complete_tracing(&tracing_ctx, Method::Post, false, "Checkout failed")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        let data = orders.into_iter().map(OrderResponse::from).collect();

        Ok(ApiResponse::success("Checkout completed successfully", data))
    }

    async fn update_order_status(
        &self,
        req: &UpdateOrderStatusRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!(
            "✏️ Updating status of order ID={} to '{}'",
            req.order_id, req.status
        );

        let tracing_ctx = self.start_tracing(
            "update_order_status",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "update_status"),
                KeyValue::new("order.id", req.order_id.to_string()),
                KeyValue::new("order.target_status", req.status.clone()),
            ],
        );

        let target = OrderStatus::parse(&req.status).ok_or_else(|| {
            ServiceError::Validation(vec![format!("unknown order status '{}'", req.status)])
        })?;

        let order = match self.query.find_by_id(req.order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                self.complete_tracing(&tracing_ctx, Method::Put, false, "Order not found")
                    .await;
                return Err(ServiceError::Repo(RepositoryError::NotFound));
            }
            Err(e) => {
                self.complete_tracing(&tracing_ctx, Method::Put, false, "Failed to fetch order")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        let current = OrderStatus::parse(&order.status).ok_or_else(|| {
            ServiceError::Internal(format!(
                "order {} carries unknown status '{}'",
                order.order_id, order.status
            ))
        })?;

        Self::authorize_transition(order.buyer_id, order.store_id, target, req.actor, req.actor_id)?;

        let next = OrderStatusMachine::transition(current, target)?;

        let result = if next == OrderStatus::Cancelled {
            self.command
                .cancel_order(order.order_id, current.as_str())
                .await
        } else {
            self.command
                .update_status(order.order_id, current.as_str(), next.as_str())
                .await
        };

        let updated = match result {
            Ok(updated) => {
                self.complete_tracing(&tracing_ctx, Method::Put, true, "Order status updated")
                    .await;
                updated
            }
            Err(e) => {
                error!("❌ Failed to persist status of order {}: {e:?}", req.order_id);
                self.complete_tracing(&tracing_ctx, Method::Put, false, "Status update failed")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        Ok(ApiResponse::success(
            "Order status updated successfully",
            OrderResponse::from(updated),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::{
        catalog::MockProductCatalogRepositoryTrait,
        order::repository::{MockOrderCommandRepositoryTrait, MockOrderQueryRepositoryTrait},
    };
    use crate::domain::requests::order::CheckoutItemRequest;
    use checkout::CheckoutError;
    use sqlx::types::Json;
    use std::collections::BTreeMap;

    fn catalog_product(product_id: i32, store_id: i32, price: i64, stock: i32) -> CatalogProduct {
        CatalogProduct {
            product_id,
            store_id,
            name: format!("Product {product_id}"),
            price,
            discount_price: None,
            stock,
            variant_axes: Json(Vec::new()),
            is_active: true,
        }
    }

    fn checkout_request(items: Vec<CheckoutItemRequest>) -> CheckoutRequest {
        CheckoutRequest {
            buyer_id: 1,
            recipient_name: "Siti".into(),
            phone: "0812".into(),
            street: "Jl. Merdeka 1".into(),
            city: "Banda Aceh".into(),
            notes: None,
            items,
            shipping_choices: Vec::new(),
        }
    }

    fn item(product_id: i32, quantity: i32) -> CheckoutItemRequest {
        CheckoutItemRequest {
            product_id,
            quantity,
            selected_options: BTreeMap::new(),
        }
    }

    fn stored_order(order_id: i32, store_id: i32, status: &str) -> crate::model::order::Order {
        crate::model::order::Order {
            order_id,
            buyer_id: 1,
            store_id,
            status: status.to_string(),
            payment_method: "cod".into(),
            recipient_name: "Siti".into(),
            phone: "0812".into(),
            street: "Jl. Merdeka 1".into(),
            city: "Banda Aceh".into(),
            notes: None,
            shipping_option_id: "same_day".into(),
            subtotal: 50_000,
            shipping_cost: 15_000,
            total_price: 65_000,
            created_at: None,
            updated_at: None,
        }
    }

    fn service(
        catalog: MockProductCatalogRepositoryTrait,
        command: MockOrderCommandRepositoryTrait,
        query: MockOrderQueryRepositoryTrait,
    ) -> OrderCommandService {
        OrderCommandService::new(
            OrderCommandServiceDeps {
                catalog: Arc::new(catalog),
                command: Arc::new(command),
                query: Arc::new(query),
                shipping: Arc::new(ShippingCalculator::with_default_catalog()),
            },
            &mut Registry::default(),
        )
    }

    #[tokio::test]
    async fn checkout_persists_one_order_per_vendor() {
        let mut catalog = MockProductCatalogRepositoryTrait::new();
        catalog.expect_find_for_checkout().returning(|_| {
            Ok(vec![
                catalog_product(1, 10, 50_000, 5),
                catalog_product(2, 20, 30_000, 5),
            ])
        });

        let mut command = MockOrderCommandRepositoryTrait::new();
        command
            .expect_create_orders()
            .times(1)
            .returning(|req| {
                assert_eq!(req.intents.len(), 2);
                for intent in &req.intents {
                    assert_eq!(intent.total, intent.subtotal + intent.shipping_cost);
                    // no choice was sent, the default same-day courier applies
                    assert_eq!(intent.shipping_option.option_id, "same_day");
                }
                Ok(req
                    .intents
                    .iter()
                    .enumerate()
                    .map(|(i, intent)| stored_order(i as i32 + 1, intent.store_id, "pending"))
                    .collect())
            });

        let service = service(catalog, command, MockOrderQueryRepositoryTrait::new());
        let response = service
            .checkout(&checkout_request(vec![item(1, 1), item(2, 1)]))
            .await
            .unwrap();

        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].status, "pending");
    }

    #[tokio::test]
    async fn checkout_rejects_unknown_products() {
        let mut catalog = MockProductCatalogRepositoryTrait::new();
        catalog
            .expect_find_for_checkout()
            .returning(|_| Ok(Vec::new()));

        let mut command = MockOrderCommandRepositoryTrait::new();
        command.expect_create_orders().times(0);

        let service = service(catalog, command, MockOrderQueryRepositoryTrait::new());
        let result = service.checkout(&checkout_request(vec![item(99, 1)])).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::NotFound))
        ));
    }

    #[tokio::test]
    async fn checkout_rejects_inactive_products() {
        let mut catalog = MockProductCatalogRepositoryTrait::new();
        catalog.expect_find_for_checkout().returning(|_| {
            let mut product = catalog_product(1, 10, 50_000, 5);
            product.is_active = false;
            Ok(vec![product])
        });

        let mut command = MockOrderCommandRepositoryTrait::new();
        command.expect_create_orders().times(0);

        let service = service(catalog, command, MockOrderQueryRepositoryTrait::new());
        let result = service.checkout(&checkout_request(vec![item(1, 1)])).await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn checkout_rejects_rather_than_clamps_excess_quantity() {
        let mut catalog = MockProductCatalogRepositoryTrait::new();
        catalog
            .expect_find_for_checkout()
            .returning(|_| Ok(vec![catalog_product(1, 10, 50_000, 5)]));

        let mut command = MockOrderCommandRepositoryTrait::new();
        command.expect_create_orders().times(0);

        let service = service(catalog, command, MockOrderQueryRepositoryTrait::new());
        let result = service.checkout(&checkout_request(vec![item(1, 10)])).await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn checkout_with_no_items_fails_with_empty_cart() {
        let mut catalog = MockProductCatalogRepositoryTrait::new();
        catalog
            .expect_find_for_checkout()
            .returning(|_| Ok(Vec::new()));

        let service = service(
            catalog,
            MockOrderCommandRepositoryTrait::new(),
            MockOrderQueryRepositoryTrait::new(),
        );
        let result = service.checkout(&checkout_request(Vec::new())).await;

        assert!(matches!(
            result,
            Err(ServiceError::Checkout(CheckoutError::EmptyCart))
        ));
    }

    #[tokio::test]
    async fn vendor_confirms_a_pending_order() {
        let mut query = MockOrderQueryRepositoryTrait::new();
        query
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_order(1, 10, "pending"))));

        let mut command = MockOrderCommandRepositoryTrait::new();
        command
            .expect_update_status()
            .times(1)
            .returning(|order_id, from, to| {
                assert_eq!(from, "pending");
                assert_eq!(to, "confirmed");
                Ok(stored_order(order_id, 10, to))
            });

        let service = service(MockProductCatalogRepositoryTrait::new(), command, query);
        let response = service
            .update_order_status(&UpdateOrderStatusRequest {
                order_id: 1,
                status: "confirmed".into(),
                actor: OrderActor::Vendor,
                actor_id: 10,
            })
            .await
            .unwrap();

        assert_eq!(response.data.status, "confirmed");
    }

    #[tokio::test]
    async fn skipping_states_is_an_illegal_transition() {
        let mut query = MockOrderQueryRepositoryTrait::new();
        query
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_order(1, 10, "pending"))));

        let mut command = MockOrderCommandRepositoryTrait::new();
        command.expect_update_status().times(0);

        let service = service(MockProductCatalogRepositoryTrait::new(), command, query);
        let result = service
            .update_order_status(&UpdateOrderStatusRequest {
                order_id: 1,
                status: "shipping".into(),
                actor: OrderActor::Vendor,
                actor_id: 10,
            })
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Checkout(
                CheckoutError::IllegalTransition { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn buyer_may_cancel_but_not_confirm() {
        let mut query = MockOrderQueryRepositoryTrait::new();
        query
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_order(1, 10, "pending"))));

        let mut command = MockOrderCommandRepositoryTrait::new();
        command
            .expect_cancel_order()
            .times(1)
            .returning(|order_id, from| {
                assert_eq!(from, "pending");
                Ok(stored_order(order_id, 10, "cancelled"))
            });

        let service = service(MockProductCatalogRepositoryTrait::new(), command, query);

        let forbidden = service
            .update_order_status(&UpdateOrderStatusRequest {
                order_id: 1,
                status: "confirmed".into(),
                actor: OrderActor::Buyer,
                actor_id: 1,
            })
            .await;
        assert!(matches!(forbidden, Err(ServiceError::Forbidden(_))));

        let cancelled = service
            .update_order_status(&UpdateOrderStatusRequest {
                order_id: 1,
                status: "cancelled".into(),
                actor: OrderActor::Buyer,
                actor_id: 1,
            })
            .await
            .unwrap();
        assert_eq!(cancelled.data.status, "cancelled");
    }

    #[tokio::test]
    async fn another_store_cannot_drive_the_order() {
        let mut query = MockOrderQueryRepositoryTrait::new();
        query
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_order(1, 10, "pending"))));

        let mut command = MockOrderCommandRepositoryTrait::new();
        command.expect_update_status().times(0);

        let service = service(MockProductCatalogRepositoryTrait::new(), command, query);
        let result = service
            .update_order_status(&UpdateOrderStatusRequest {
                order_id: 1,
                status: "confirmed".into(),
                actor: OrderActor::Vendor,
                actor_id: 99,
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn cancelling_a_processing_order_is_rejected() {
        let mut query = MockOrderQueryRepositoryTrait::new();
        query
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_order(1, 10, "processing"))));

        let mut command = MockOrderCommandRepositoryTrait::new();
        command.expect_cancel_order().times(0);

        let service = service(MockProductCatalogRepositoryTrait::new(), command, query);
        let result = service
            .update_order_status(&UpdateOrderStatusRequest {
                order_id: 1,
                status: "cancelled".into(),
                actor: OrderActor::Buyer,
                actor_id: 1,
            })
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Checkout(
                CheckoutError::IllegalTransition { .. }
            ))
        ));
    }
}
