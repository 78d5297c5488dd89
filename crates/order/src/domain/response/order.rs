use crate::model::{order::Order as OrderModel, order_item::OrderItem as OrderItemModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderResponse {
    pub id: i32,
    #[serde(rename = "buyer_id")]
    pub buyer_id: i32,
    #[serde(rename = "store_id")]
    pub store_id: i32,
    pub status: String,
    #[serde(rename = "payment_method")]
    pub payment_method: String,
    #[serde(rename = "recipient_name")]
    pub recipient_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub notes: Option<String>,
    #[serde(rename = "shipping_option_id")]
    pub shipping_option_id: String,
    pub subtotal: i64,
    #[serde(rename = "shipping_cost")]
    pub shipping_cost: i64,
    #[serde(rename = "total_price")]
    pub total_price: i64,
    #[serde(rename = "created_at")]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at")]
    pub updated_at: Option<String>,
}

// model to response
impl From<OrderModel> for OrderResponse {
    fn from(value: OrderModel) -> Self {
        OrderResponse {
            id: value.order_id,
            buyer_id: value.buyer_id,
            store_id: value.store_id,
            status: value.status,
            payment_method: value.payment_method,
            recipient_name: value.recipient_name,
            phone: value.phone,
            street: value.street,
            city: value.city,
            notes: value.notes,
            shipping_option_id: value.shipping_option_id,
            subtotal: value.subtotal,
            shipping_cost: value.shipping_cost,
            total_price: value.total_price,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderItemResponse {
    pub id: i32,
    #[serde(rename = "order_id")]
    pub order_id: i32,
    #[serde(rename = "product_id")]
    pub product_id: i32,
    #[serde(rename = "product_name")]
    pub product_name: String,
    pub quantity: i32,
    #[serde(rename = "unit_price")]
    pub unit_price: i64,
    #[serde(rename = "selected_options")]
    pub selected_options: BTreeMap<String, String>,
    #[serde(rename = "line_total")]
    pub line_total: i64,
}

// model to response
impl From<OrderItemModel> for OrderItemResponse {
    fn from(value: OrderItemModel) -> Self {
        OrderItemResponse {
            id: value.order_item_id,
            order_id: value.order_id,
            product_id: value.product_id,
            product_name: value.product_name,
            quantity: value.quantity,
            unit_price: value.unit_price,
            selected_options: value.selected_options.0,
            line_total: value.line_total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderDetailResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
}
