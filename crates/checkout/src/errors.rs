use crate::status::OrderStatus;
use thiserror::Error;

/// Validation and precondition failures raised by the checkout core. None of
/// these are transient: the core performs no I/O, so every error points at a
/// logic or state problem in the caller and must surface to the user rather
/// than be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("invalid quantity {requested} for product {product_id} (stock: {stock})")]
    InvalidQuantity {
        product_id: i32,
        requested: i32,
        stock: i32,
    },

    #[error("invalid options for product {product_id}: {reason}")]
    InvalidOptions { product_id: i32, reason: String },

    #[error(
        "invalid pricing for product {product_id}: discount {discount_price} is not below list price {price}"
    )]
    InvalidPricing {
        product_id: i32,
        discount_price: i64,
        price: i64,
    },

    #[error("unknown shipping option: {0}")]
    UnknownShippingOption(String),

    #[error("no shipping option chosen for store {store_id} and the catalog has no default")]
    MissingShippingChoice { store_id: i32 },

    #[error("cart is empty")]
    EmptyCart,

    #[error("illegal order status transition: {from} -> {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },
}
