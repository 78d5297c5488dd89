use crate::cart::CartAggregate;
use crate::errors::CheckoutError;
use crate::model::{IntentLine, OrderIntent};
use crate::pricing::PricingResolver;
use crate::shipping::ShippingCalculator;
use std::collections::HashMap;

/// Turns a cart plus per-vendor shipping choices into one [`OrderIntent`]
/// per vendor, in vendor insertion order, with unit prices frozen at
/// composition time.
///
/// The function is pure: nothing is persisted, and on any error no intents
/// are produced at all. Submission of the returned intents belongs to the
/// order service.
#[derive(Debug, Clone)]
pub struct OrderComposer<'a> {
    shipping: &'a ShippingCalculator,
}

impl<'a> OrderComposer<'a> {
    pub fn new(shipping: &'a ShippingCalculator) -> Self {
        Self { shipping }
    }

    pub fn compose(
        &self,
        cart: &CartAggregate,
        shipping_choice_per_vendor: &HashMap<i32, String>,
    ) -> Result<Vec<OrderIntent>, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut intents = Vec::with_capacity(cart.vendor_count());

        for bucket in cart.buckets() {
            let mut lines = Vec::with_capacity(bucket.lines.len());
            let mut subtotal = 0i64;

            for line in &bucket.lines {
                let unit_price = PricingResolver::unit_price(&line.product)?;
                let line_total = unit_price * line.quantity as i64;
                subtotal += line_total;
                lines.push(IntentLine {
                    product_id: line.product.product_id,
                    product_name: line.product.name.clone(),
                    quantity: line.quantity,
                    unit_price,
                    selected_options: line.selected_options.clone(),
                    line_total,
                });
            }

            let shipping_option = self
                .shipping
                .resolve_choice(
                    bucket.store_id,
                    shipping_choice_per_vendor
                        .get(&bucket.store_id)
                        .map(String::as_str),
                )?
                .clone();

            let shipping_cost = shipping_option.price;
            intents.push(OrderIntent {
                store_id: bucket.store_id,
                lines,
                subtotal,
                shipping_cost,
                total: subtotal + shipping_cost,
                shipping_option,
            });
        }

        Ok(intents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CheckoutProduct;
    use std::collections::BTreeMap;

    fn product(
        product_id: i32,
        store_id: i32,
        price: i64,
        discount_price: Option<i64>,
    ) -> CheckoutProduct {
        CheckoutProduct {
            product_id,
            store_id,
            name: format!("Product {product_id}"),
            price,
            discount_price,
            stock: 50,
            variant_axes: Vec::new(),
        }
    }

    #[test]
    fn empty_cart_never_composes() {
        let shipping = ShippingCalculator::with_default_catalog();
        let composer = OrderComposer::new(&shipping);
        let result = composer.compose(&CartAggregate::new(), &HashMap::new());
        assert_eq!(result, Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn one_intent_per_vendor_with_total_equal_subtotal_plus_shipping() {
        let shipping = ShippingCalculator::with_default_catalog();
        let composer = OrderComposer::new(&shipping);

        let mut cart = CartAggregate::new();
        cart.add_line(product(1, 10, 50_000, None), 1, BTreeMap::new())
            .unwrap();
        cart.add_line(product(2, 20, 30_000, None), 1, BTreeMap::new())
            .unwrap();

        let choices = HashMap::from([
            (10, "next_day".to_string()),
            (20, "next_day".to_string()),
        ]);
        let intents = composer.compose(&cart, &choices).unwrap();

        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].store_id, 10);
        assert_eq!(intents[0].total, 58_000);
        assert_eq!(intents[1].store_id, 20);
        assert_eq!(intents[1].total, 38_000);
        for intent in &intents {
            assert_eq!(intent.total, intent.subtotal + intent.shipping_cost);
        }
    }

    #[test]
    fn discount_prices_are_frozen_into_the_intent() {
        let shipping = ShippingCalculator::with_default_catalog();
        let composer = OrderComposer::new(&shipping);

        let mut cart = CartAggregate::new();
        cart.add_line(product(1, 10, 100_000, Some(75_000)), 2, BTreeMap::new())
            .unwrap();

        let intents = composer
            .compose(&cart, &HashMap::from([(10, "pickup".to_string())]))
            .unwrap();

        assert_eq!(intents[0].lines[0].unit_price, 75_000);
        assert_eq!(intents[0].lines[0].line_total, 150_000);
        assert_eq!(intents[0].subtotal, 150_000);
        assert_eq!(intents[0].total, 150_000);
    }

    #[test]
    fn missing_choice_uses_the_default_option() {
        let shipping = ShippingCalculator::with_default_catalog();
        let composer = OrderComposer::new(&shipping);

        let mut cart = CartAggregate::new();
        cart.add_line(product(1, 10, 40_000, None), 1, BTreeMap::new())
            .unwrap();

        let intents = composer.compose(&cart, &HashMap::new()).unwrap();
        assert_eq!(intents[0].shipping_option.option_id, "same_day");
        assert_eq!(intents[0].total, 40_000 + 15_000);
    }

    #[test]
    fn unknown_choice_fails_the_whole_compose() {
        let shipping = ShippingCalculator::with_default_catalog();
        let composer = OrderComposer::new(&shipping);

        let mut cart = CartAggregate::new();
        cart.add_line(product(1, 10, 40_000, None), 1, BTreeMap::new())
            .unwrap();
        cart.add_line(product(2, 20, 40_000, None), 1, BTreeMap::new())
            .unwrap();

        let result = composer.compose(
            &cart,
            &HashMap::from([(20, "carrier_pigeon".to_string())]),
        );
        assert_eq!(
            result,
            Err(CheckoutError::UnknownShippingOption("carrier_pigeon".into()))
        );
    }

    #[test]
    fn bad_pricing_on_any_line_yields_no_partial_intents() {
        let shipping = ShippingCalculator::with_default_catalog();
        let composer = OrderComposer::new(&shipping);

        let mut cart = CartAggregate::new();
        cart.add_line(product(1, 10, 40_000, None), 1, BTreeMap::new())
            .unwrap();
        // discount at list price: must fail compose, not fall back
        cart.add_line(product(2, 20, 40_000, Some(40_000)), 1, BTreeMap::new())
            .unwrap();

        let result = composer.compose(&cart, &HashMap::new());
        assert!(matches!(result, Err(CheckoutError::InvalidPricing { .. })));
    }

    #[test]
    fn vendor_order_follows_first_added_line() {
        let shipping = ShippingCalculator::with_default_catalog();
        let composer = OrderComposer::new(&shipping);

        let mut cart = CartAggregate::new();
        cart.add_line(product(1, 30, 10_000, None), 1, BTreeMap::new())
            .unwrap();
        cart.add_line(product(2, 10, 10_000, None), 1, BTreeMap::new())
            .unwrap();
        cart.add_line(product(3, 30, 10_000, None), 1, BTreeMap::new())
            .unwrap();

        let intents = composer.compose(&cart, &HashMap::new()).unwrap();
        let stores: Vec<i32> = intents.iter().map(|intent| intent.store_id).collect();
        assert_eq!(stores, vec![30, 10]);
    }
}
