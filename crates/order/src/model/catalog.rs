use checkout::{CheckoutProduct, VariantAxis};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

/// The product columns checkout needs, read straight from the shared
/// products table. The order service never mutates these rows outside the
/// stock adjustments baked into its own transactions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CatalogProduct {
    pub product_id: i32,
    pub store_id: i32,
    pub name: String,
    pub price: i64,
    pub discount_price: Option<i64>,
    pub stock: i32,
    pub variant_axes: Json<Vec<VariantAxis>>,
    pub is_active: bool,
}

impl CatalogProduct {
    pub fn to_checkout(&self) -> CheckoutProduct {
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
