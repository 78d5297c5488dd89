//! Pure cart and checkout domain logic for the marketplace.
//!
//! Everything in this crate is synchronous and side-effect free: callers
//! fetch product and shipping data themselves, hand it in, and persist
//! whatever comes back out. The services build on top of these types; the
//! web layer never touches them directly.

pub mod cart;
pub mod composer;
pub mod errors;
pub mod model;
pub mod pricing;
pub mod shipping;
pub mod status;

pub use self::cart::{CartAggregate, CartLine, VendorBucket};
pub use self::composer::OrderComposer;
pub use self::errors::CheckoutError;
pub use self::model::{
    CheckoutProduct, IntentLine, OrderIntent, SelectedOptions, ShippingMethod, ShippingOption,
    VariantAxis,
};
pub use self::pricing::PricingResolver;
pub use self::shipping::ShippingCalculator;
pub use self::status::{OrderStatus, OrderStatusMachine};
