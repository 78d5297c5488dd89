use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, IntoParams)]
pub struct FindAllProducts {
    #[serde(default)]
    pub search: String,

    #[validate(range(min = 1))]
    pub page: i32,

    #[validate(range(min = 1, max = 100))]
    #[serde(rename = "page_size")]
    pub page_size: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct VariantAxisRequest {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1))]
    pub values: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateProductRequest {
    #[validate(range(min = 1))]
    #[serde(rename = "store_id")]
    pub store_id: i32,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 1))]
    pub price: i64,

    #[serde(rename = "discount_price")]
    pub discount_price: Option<i64>,

    #[validate(range(min = 0))]
    pub stock: i32,

    #[serde(default, rename = "image_urls")]
    pub image_urls: Vec<String>,

    #[validate(nested)]
    #[serde(default, rename = "variant_axes")]
    pub variant_axes: Vec<VariantAxisRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(skip_deserializing)]
    pub product_id: i32,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 1))]
    pub price: i64,

    #[serde(rename = "discount_price")]
    pub discount_price: Option<i64>,

    #[validate(range(min = 0))]
    pub stock: i32,

    #[serde(default, rename = "image_urls")]
    pub image_urls: Vec<String>,

    #[validate(nested)]
    #[serde(default, rename = "variant_axes")]
    pub variant_axes: Vec<VariantAxisRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct RestockProductRequest {
    #[validate(range(min = 1))]
    pub amount: i32,
}
