use crate::{
    abstract_trait::order::service::{DynOrderCommandService, DynOrderQueryService},
    domain::{
        requests::order::{CheckoutRequest, FindAllOrders, UpdateOrderStatusRequest},
        response::order::{OrderDetailResponse, OrderResponse},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use shared::{
    domain::responses::{ApiResponse, ApiResponsePagination},
    errors::HttpError,
    middleware::SimpleValidatedJson,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/checkout",
    tag = "Order",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "One order created per vendor in the cart", body = ApiResponse<Vec<OrderResponse>>),
        (status = 400, description = "Validation or checkout error"),
        (status = 409, description = "Product inactive or out of stock")
    )
)]
pub async fn checkout_handler(
    Extension(service): Extension<DynOrderCommandService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CheckoutRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.checkout(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with its items", body = ApiResponse<OrderDetailResponse>),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(service): Extension<DynOrderQueryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders/buyer/{buyer_id}",
    tag = "Order",
    params(
        ("buyer_id" = i32, Path, description = "Buyer ID"),
        FindAllOrders
    ),
    responses(
        (status = 200, description = "Orders placed by the buyer", body = ApiResponsePagination<Vec<OrderResponse>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_buyer_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Path(buyer_id): Path<i32>,
    Query(params): Query<FindAllOrders>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_buyer(buyer_id, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/store/{store_id}",
    tag = "Order",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        FindAllOrders
    ),
    responses(
        (status = 200, description = "Orders received by the store", body = ApiResponsePagination<Vec<OrderResponse>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_store_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Path(store_id): Path<i32>,
    Query(params): Query<FindAllOrders>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_store(store_id, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/orders/status/{id}",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<OrderResponse>),
        (status = 403, description = "Caller may not drive this transition"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn update_order_status_handler(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(mut body): SimpleValidatedJson<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, HttpError> {
    body.order_id = id;
    let response = service.update_order_status(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/checkout", post(checkout_handler))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/buyer/{buyer_id}", get(get_buyer_orders))
        .route("/api/orders/store/{store_id}", get(get_store_orders))
        .route("/api/orders/status/{id}", put(update_order_status_handler))
        .layer(Extension(app_state.di_container.order_query.clone()))
        .layer(Extension(app_state.di_container.order_command.clone()))
}
