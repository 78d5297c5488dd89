use checkout::{CheckoutProduct, VariantAxis};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: i32,
    pub store_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub discount_price: Option<i64>,
    pub stock: i32,
    pub image_urls: Json<Vec<String>>,
    pub variant_axes: Json<Vec<VariantAxis>>,
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Product {
    /// Narrows the row down to the slice the checkout core works with.
    pub fn checkout_view(&self) -> CheckoutProduct {
        CheckoutProduct {
            product_id: self.product_id,
            store_id: self.store_id,
            name: self.name.clone(),
            price: self.price,
            discount_price: self.discount_price,
            stock: self.stock,
            variant_axes: self.variant_axes.0.clone(),
        }
    }
}
