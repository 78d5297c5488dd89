use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use std::collections::BTreeMap;

/// Created atomically with its parent order and never mutated afterwards.
/// `unit_price` is the price frozen at order time, independent of later
/// product price changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_item_id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub selected_options: Json<BTreeMap<String, String>>,
    pub line_total: i64,
    pub created_at: Option<NaiveDateTime>,
}
