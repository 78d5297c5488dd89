use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One value per variant axis name. A `BTreeMap` keeps the option set
/// ordered, so two maps with the same entries always compare equal and a
/// cart line's identity is deterministic.
pub type SelectedOptions = BTreeMap<String, String>;

/// A single variant dimension of a product, e.g. "Size" with
/// `["S", "M", "L"]`. The value order is the vendor's display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantAxis {
    pub name: String,
    pub values: Vec<String>,
}

/// The slice of a product record the checkout core needs. The surrounding
/// application fetches the full row and narrows it down to this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutProduct {
    pub product_id: i32,
    pub store_id: i32,
    pub name: String,
    pub price: i64,
    pub discount_price: Option<i64>,
    pub stock: i32,
    pub variant_axes: Vec<VariantAxis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    LocalCourier,
    Pickup,
    ThirdParty,
}

/// Static reference data, not user-owned. The same catalog applies to every
/// vendor today; `ShippingCalculator::options_for` still takes a store id so
/// per-vendor catalogs can land without breaking callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub option_id: String,
    pub name: String,
    pub method: ShippingMethod,
    pub eta_label: String,
    pub price: i64,
    pub is_default: bool,
}

/// A resolved cart line inside an [`OrderIntent`], with the unit price
/// frozen at composition time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentLine {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub selected_options: SelectedOptions,
    pub line_total: i64,
}

/// The computed, pre-persistence summary of what one vendor's order would
/// cost. A multi-vendor cart composes into one intent per vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub store_id: i32,
    pub lines: Vec<IntentLine>,
    pub shipping_option: ShippingOption,
    pub subtotal: i64,
    pub shipping_cost: i64,
    pub total: i64,
}
