use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One persisted order. A multi-vendor checkout produces one row per vendor;
/// the rows are siblings of the same submission but live independently.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: i32,
    pub buyer_id: i32,
    pub store_id: i32,
    pub status: String,
    pub payment_method: String,
    pub recipient_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub notes: Option<String>,
    pub shipping_option_id: String,
    pub subtotal: i64,
    pub shipping_cost: i64,
    pub total_price: i64,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
