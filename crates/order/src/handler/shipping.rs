use crate::{domain::response::shipping::ShippingOptionResponse, state::AppState};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use shared::{domain::responses::ApiResponse, errors::HttpError};
use std::sync::Arc;
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ShippingOptionsParams {
    /// Store the options are being requested for. The catalog is shared
    /// today, so this only shapes future per-vendor behavior.
    #[serde(default, rename = "store_id")]
    pub store_id: i32,
}

#[utoipa::path(
    get,
    path = "/api/shipping-options",
    tag = "Shipping",
    params(ShippingOptionsParams),
    responses(
        (status = 200, description = "Static shipping catalog", body = ApiResponse<Vec<ShippingOptionResponse>>)
    )
)]
pub async fn get_shipping_options(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShippingOptionsParams>,
) -> Result<impl IntoResponse, HttpError> {
    let options: Vec<ShippingOptionResponse> = state
        .di_container
        .shipping
        .options_for(params.store_id)
        .iter()
        .map(ShippingOptionResponse::from)
        .collect();

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Shipping options fetched successfully",
            options,
        )),
    ))
}

pub fn shipping_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/shipping-options", get(get_shipping_options))
        .with_state(app_state)
}
