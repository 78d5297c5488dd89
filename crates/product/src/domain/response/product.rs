use crate::model::product::Product as ProductModel;
use checkout::{PricingResolver, VariantAxis};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductResponse {
    pub id: i32,
    #[serde(rename = "store_id")]
    pub store_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    #[serde(rename = "discount_price")]
    pub discount_price: Option<i64>,
    /// Effective storefront price after a valid discount.
    #[serde(rename = "final_price")]
    pub final_price: i64,
    #[serde(rename = "discount_percent")]
    pub discount_percent: u32,
    pub stock: i32,
    #[serde(rename = "image_urls")]
    pub image_urls: Vec<String>,
    #[serde(rename = "variant_axes")]
    #[schema(value_type = Vec<Object>)]
    pub variant_axes: Vec<VariantAxis>,
    #[serde(rename = "is_active")]
    pub is_active: bool,
    #[serde(rename = "created_at")]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at")]
    pub updated_at: Option<String>,
}

// model to response
impl From<ProductModel> for ProductResponse {
    fn from(value: ProductModel) -> Self {
        let view = value.checkout_view();
        // rows that predate the pricing guard may carry a bad discount;
        // the storefront falls back to the list price for display
        let final_price = PricingResolver::unit_price(&view).unwrap_or(value.price);
        let discount_percent = PricingResolver::discount_percent(&view).unwrap_or(0);

        ProductResponse {
            id: value.product_id,
            store_id: value.store_id,
            name: value.name,
            description: value.description,
            price: value.price,
            discount_price: value.discount_price,
            final_price,
            discount_percent,
            stock: value.stock,
            image_urls: value.image_urls.0,
            variant_axes: value.variant_axes.0,
            is_active: value.is_active,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
        }
    }
}
