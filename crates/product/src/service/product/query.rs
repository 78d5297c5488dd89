use crate::{
    abstract_trait::product::{
        repository::DynProductQueryRepository, service::ProductQueryServiceTrait,
    },
    domain::{requests::product::FindAllProducts, response::product::ProductResponse},
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
    errors::ServiceError,
    utils::{Method, Metrics, Status as StatusUtils, TracingContext},
};
use tokio::time::Instant;
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductQueryService {
    query: DynProductQueryRepository,
    metrics: Metrics,
}

impl ProductQueryService {
    pub fn new(query: DynProductQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();

        registry.register(
            "product_query_service_request_counter",
            "Total number of requests to the ProductQueryService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "product_query_service_request_duration",
            "Histogram of request durations for the ProductQueryService",
            metrics.request_duration.clone(),
        );

        Self { query, metrics }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("product-query-service")
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

    async fn find_page(
        &self,
        operation: &str,
        req: &FindAllProducts,
        fetch: impl std::future::Future<
            Output = Result<(Vec<crate::model::product::Product>, i64), shared::errors::RepositoryError>,
        >,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        let tracing_ctx = self.start_tracing(
            operation,
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", operation.to_string()),
                KeyValue::new("page", req.page.to_string()),
            ],
        );

        match fetch.await {
            Ok((products, total)) => {
                self.complete_tracing(&tracing_ctx, Method::Get, true, "Products fetched")
                    .await;

                let data = products.into_iter().map(ProductResponse::from).collect();

                Ok(ApiResponsePagination::success(
                    "Products fetched successfully",
                    data,
                    Pagination::new(req.page, req.page_size, total),
                ))
            }
            Err(e) => {
                self.complete_tracing(&tracing_ctx, Method::Get, false, "Failed to fetch products")
                    .await;
                Err(ServiceError::Repo(e))
            }
        }
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        self.find_page("find_all_products", req, self.query.find_all(req))
            .await
    }

    async fn find_active(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        self.find_page("find_active_products", req, self.query.find_active(req))
            .await
    }

    async fn find_by_store(
        &self,
        store_id: i32,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        self.find_page(
            "find_products_by_store",
            req,
            self.query.find_by_store(store_id, req),
        )
        .await
    }

    async fn find_by_id(
        &self,
        product_id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🔍 Fetching product ID={product_id}");

        let tracing_ctx = self.start_tracing(
            "find_product_by_id",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product.id", product_id.to_string()),
            ],
        );

        let product = match self.query.find_by_id(product_id).await {
            Ok(Some(product)) => {
                self.complete_tracing(&tracing_ctx, Method::Get, true, "Product found")
                    .await;
                product
            }
            Ok(None) => {
                self.complete_tracing(&tracing_ctx, Method::Get, false, "Product not found")
                    .await;
                return Err(ServiceError::Repo(
                    shared::errors::RepositoryError::NotFound,
                ));
            }
            Err(e) => {
                error!("❌ Failed to fetch product ID={product_id}: {e:?}");
                self.complete_tracing(&tracing_ctx, Method::Get, false, "Failed to fetch product")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        Ok(ApiResponse::success(
            "Product fetched successfully",
            ProductResponse::from(product),
        ))
    }
}
