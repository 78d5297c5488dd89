use crate::{
    abstract_trait::product::{
        repository::DynProductCommandRepository, service::ProductCommandServiceTrait,
    },
    domain::{
        requests::product::{CreateProductRequest, RestockProductRequest, UpdateProductRequest},
        response::product::ProductResponse,
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
    domain::responses::ApiResponse,
    errors::ServiceError,
    utils::{Method, Metrics, Status as StatusUtils, TracingContext},
};
use tokio::time::Instant;
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductCommandService {
    command: DynProductCommandRepository,
    metrics: Metrics,
}

impl ProductCommandService {
    pub fn new(command: DynProductCommandRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();

        registry.register(
            "product_command_service_request_counter",
            "Total number of requests to the ProductCommandService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "product_command_service_request_duration",
            "Histogram of request durations for the ProductCommandService",
            metrics.request_duration.clone(),
        );

        Self { command, metrics }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("product-command-service")
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

    /// A stored discount must undercut the list price; anything else would
    /// poison every price resolution downstream.
    fn validate_discount(price: i64, discount_price: Option<i64>) -> Result<(), ServiceError> {
        if let Some(discount) = discount_price {
            if discount <= 0 || discount >= price {
                return Err(ServiceError::Validation(vec![format!(
                    "discount_price {discount} must be strictly between 0 and price {price}"
                )]));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🏗️ Creating new product for store_id={}", req.store_id);

        let tracing_ctx = self.start_tracing(
            "create_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "create"),
                KeyValue::new("product.store_id", req.store_id.to_string()),
            ],
        );

        Self::validate_discount(req.price, req.discount_price)?;

        let product = match self.command.create_product(req).await {
            Ok(product) => {
                self.complete_tracing(&tracing_ctx, Method::Post, true, "Product created")
                    .await;
                product
            }
            Err(e) => {
                error!("❌ Failed to create product: {e:?}");
                self.complete_tracing(&tracing_ctx, Method::Post, false, "Failed to create product")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        Ok(ApiResponse::success(
            "Product created successfully",
            ProductResponse::from(product),
        ))
    }

    async fn update_product(
        &self,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("✏️ Updating product ID={}", req.product_id);

        let tracing_ctx = self.start_tracing(
            "update_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "update"),
                KeyValue::new("product.id", req.product_id.to_string()),
            ],
        );

        Self::validate_discount(req.price, req.discount_price)?;

        let product = match self.command.update_product(req).await {
            Ok(product) => {
                self.complete_tracing(&tracing_ctx, Method::Put, true, "Product updated")
                    .await;
                product
            }
            Err(e) => {
                error!("❌ Failed to update product ID={}: {e:?}", req.product_id);
                self.complete_tracing(&tracing_ctx, Method::Put, false, "Failed to update product")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        Ok(ApiResponse::success(
            "Product updated successfully",
            ProductResponse::from(product),
        ))
    }

    async fn deactivate_product(
        &self,
        product_id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🗑️ Deactivating product ID={product_id}");

        let tracing_ctx = self.start_tracing(
            "deactivate_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "deactivate"),
                KeyValue::new("product.id", product_id.to_string()),
            ],
        );

        let product = match self.command.set_active(product_id, false).await {
            Ok(product) => {
                self.complete_tracing(&tracing_ctx, Method::Put, true, "Product deactivated")
                    .await;
                product
            }
            Err(e) => {
                error!("❌ Failed to deactivate product ID={product_id}: {e:?}");
                self.complete_tracing(
                    &tracing_ctx,
                    Method::Put,
                    false,
                    "Failed to deactivate product",
                )
                .await;
                return Err(ServiceError::Repo(e));
            }
        };

        Ok(ApiResponse::success(
            "Product deactivated successfully",
            ProductResponse::from(product),
        ))
    }

    async fn activate_product(
        &self,
        product_id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🔄 Reactivating product ID={product_id}");

        let tracing_ctx = self.start_tracing(
            "activate_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "activate"),
                KeyValue::new("product.id", product_id.to_string()),
            ],
        );

        let product = match self.command.set_active(product_id, true).await {
            Ok(product) => {
                self.complete_tracing(&tracing_ctx, Method::Put, true, "Product activated")
                    .await;
                product
            }
            Err(e) => {
                error!("❌ Failed to activate product ID={product_id}: {e:?}");
                self.complete_tracing(
                    &tracing_ctx,
                    Method::Put,
                    false,
                    "Failed to activate product",
                )
                .await;
                return Err(ServiceError::Repo(e));
            }
        };

        Ok(ApiResponse::success(
            "Product activated successfully",
            ProductResponse::from(product),
        ))
    }

    async fn restock_product(
        &self,
        product_id: i32,
        req: &RestockProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("📦 Restocking product ID={product_id} by {}", req.amount);

        let tracing_ctx = self.start_tracing(
            "restock_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "restock"),
                KeyValue::new("product.id", product_id.to_string()),
            ],
        );

        let product = match self.command.restock(product_id, req.amount).await {
            Ok(product) => {
                self.complete_tracing(&tracing_ctx, Method::Put, true, "Product restocked")
                    .await;
                product
            }
            Err(e) => {
                error!("❌ Failed to restock product ID={product_id}: {e:?}");
                self.complete_tracing(&tracing_ctx, Method::Put, false, "Failed to restock product")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        Ok(ApiResponse::success(
            "Product restocked successfully",
            ProductResponse::from(product),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::product::repository::MockProductCommandRepositoryTrait;
    use crate::model::product::Product as ProductModel;
    use sqlx::types::Json;
    use std::sync::Arc;

    fn request(price: i64, discount_price: Option<i64>) -> CreateProductRequest {
        CreateProductRequest {
            store_id: 7,
            name: "Kopi Gayo 250g".into(),
            description: None,
            price,
            discount_price,
            stock: 10,
            image_urls: Vec::new(),
            variant_axes: Vec::new(),
        }
    }

    fn stored(req: &CreateProductRequest) -> ProductModel {
        ProductModel {
            product_id: 1,
            store_id: req.store_id,
            name: req.name.clone(),
            description: req.description.clone(),
            price: req.price,
            discount_price: req.discount_price,
            stock: req.stock,
            image_urls: Json(req.image_urls.clone()),
            variant_axes: Json(Vec::new()),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn create_product_persists_and_echoes_pricing() {
        let req = request(100_000, Some(75_000));

        let mut repo = MockProductCommandRepositoryTrait::new();
        repo.expect_create_product()
            .times(1)
            .returning(|req| Ok(stored(req)));

        let service = ProductCommandService::new(Arc::new(repo), &mut Registry::default());
        let response = service.create_product(&req).await.unwrap();

        assert_eq!(response.status, "success");
        assert_eq!(response.data.final_price, 75_000);
        assert_eq!(response.data.discount_percent, 25);
    }

    #[tokio::test]
    async fn discount_at_list_price_is_rejected_before_the_repository() {
        let mut repo = MockProductCommandRepositoryTrait::new();
        repo.expect_create_product().times(0);

        let service = ProductCommandService::new(Arc::new(repo), &mut Registry::default());
        let result = service.create_product(&request(100_000, Some(100_000))).await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn negative_discount_is_rejected() {
        let mut repo = MockProductCommandRepositoryTrait::new();
        repo.expect_create_product().times(0);

        let service = ProductCommandService::new(Arc::new(repo), &mut Registry::default());
        let result = service.create_product(&request(100_000, Some(-1))).await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
