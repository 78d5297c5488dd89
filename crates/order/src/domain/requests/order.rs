use checkout::OrderIntent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, IntoParams)]
pub struct FindAllOrders {
    #[validate(range(min = 1))]
    pub page: i32,

    #[validate(range(min = 1, max = 100))]
    #[serde(rename = "page_size")]
    pub page_size: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CheckoutItemRequest {
    #[validate(range(min = 1))]
    #[serde(rename = "product_id")]
    pub product_id: i32,

    #[validate(range(min = 1))]
    pub quantity: i32,

    #[serde(default, rename = "selected_options")]
    pub selected_options: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct ShippingChoiceRequest {
    #[validate(range(min = 1))]
    #[serde(rename = "store_id")]
    pub store_id: i32,

    #[validate(length(min = 1))]
    #[serde(rename = "option_id")]
    pub option_id: String,
}

/// The cart as submitted for checkout: the buyer's address snapshot, every
/// line the session holds, and one shipping choice per store (stores without
/// a choice fall back to the catalog default).
#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CheckoutRequest {
    #[validate(range(min = 1))]
    #[serde(rename = "buyer_id")]
    pub buyer_id: i32,

    #[validate(length(min = 1))]
    #[serde(rename = "recipient_name")]
    pub recipient_name: String,

    #[validate(length(min = 1))]
    pub phone: String,

    #[validate(length(min = 1))]
    pub street: String,

    #[validate(length(min = 1))]
    pub city: String,

    pub notes: Option<String>,

    #[validate(length(min = 1), nested)]
    pub items: Vec<CheckoutItemRequest>,

    #[validate(nested)]
    #[serde(default, rename = "shipping_choices")]
    pub shipping_choices: Vec<ShippingChoiceRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderActor {
    Buyer,
    Vendor,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[serde(skip_deserializing)]
    pub order_id: i32,

    #[validate(length(min = 1))]
    pub status: String,

    pub actor: OrderActor,

    /// Buyer id or store id, depending on `actor`.
    #[validate(range(min = 1))]
    #[serde(rename = "actor_id")]
    pub actor_id: i32,
}

/// Everything the command repository needs to persist one checkout
/// submission: the address snapshot plus the composed per-vendor intents.
#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
    pub buyer_id: i32,
    pub recipient_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub notes: Option<String>,
    pub intents: Vec<OrderIntent>,
}
