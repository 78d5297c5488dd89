use checkout::{ShippingMethod, ShippingOption};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ShippingOptionResponse {
    pub id: String,
    pub name: String,
    pub method: String,
    #[serde(rename = "eta_label")]
    pub eta_label: String,
    pub price: i64,
    #[serde(rename = "is_default")]
    pub is_default: bool,
}

impl From<&ShippingOption> for ShippingOptionResponse {
    fn from(value: &ShippingOption) -> Self {
        let method = match value.method {
            ShippingMethod::LocalCourier => "local_courier",
            ShippingMethod::Pickup => "pickup",
            ShippingMethod::ThirdParty => "third_party",
        };

        ShippingOptionResponse {
            id: value.option_id.clone(),
            name: value.name.clone(),
            method: method.to_string(),
            eta_label: value.eta_label.clone(),
            price: value.price,
            is_default: value.is_default,
        }
    }
}
