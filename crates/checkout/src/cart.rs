use crate::errors::CheckoutError;
use crate::model::{CheckoutProduct, SelectedOptions};
use crate::pricing::PricingResolver;
use serde::{Deserialize, Serialize};

/// One product+options+quantity entry in the cart. Identity within the cart
/// is the pair (product id, selected options): the same product with a
/// different option set is a distinct line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: CheckoutProduct,
    pub quantity: i32,
    pub selected_options: SelectedOptions,
}

/// All lines belonging to one vendor, in the order they were first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorBucket {
    pub store_id: i32,
    pub lines: Vec<CartLine>,
}

/// The active shopping session's cart, bucketed per vendor.
///
/// Invariants: no line has quantity below 1 (removal, never a zero-quantity
/// entry), every line under a bucket belongs to that bucket's vendor, and an
/// empty bucket is dropped immediately so the vendor count stays meaningful
/// for the UI and for order composition. Bucket order is the order in which
/// each vendor first entered the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartAggregate {
    buckets: Vec<VendorBucket>,
}

impl CartAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buckets(&self) -> &[VendorBucket] {
        &self.buckets
    }

    pub fn vendor_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Adds a line, merging quantities when a line with the same
    /// (product id, options) identity already exists under the vendor.
    /// Quantities above stock clamp to stock; a non-positive quantity or a
    /// product with no stock at all is rejected.
    pub fn add_line(
        &mut self,
        product: CheckoutProduct,
        quantity: i32,
        selected_options: SelectedOptions,
    ) -> Result<(), CheckoutError> {
        validate_options(&product, &selected_options)?;
        let quantity = clamp_quantity(&product, quantity)?;

        let store_id = product.store_id;
        let bucket_index = self
            .buckets
            .iter()
            .position(|b| b.store_id == store_id)
            .unwrap_or_else(|| {
                self.buckets.push(VendorBucket {
                    store_id,
                    lines: Vec::new(),
                });
                self.buckets.len() - 1
            });
        let bucket = &mut self.buckets[bucket_index];

        if let Some(line) = bucket.lines.iter_mut().find(|line| {
            line.product.product_id == product.product_id
                && line.selected_options == selected_options
        }) {
            line.quantity = clamp_quantity(&product, line.quantity.saturating_add(quantity))?;
            line.product = product;
        } else {
            bucket.lines.push(CartLine {
                product,
                quantity,
                selected_options,
            });
        }

        Ok(())
    }

    /// Re-clamps the line to `[1, stock]`. Setting a quantity of zero or
    /// less is the same as removing the line. Unknown lines are left alone.
    pub fn update_quantity(
        &mut self,
        store_id: i32,
        product_id: i32,
        new_quantity: i32,
        selected_options: &SelectedOptions,
    ) -> Result<(), CheckoutError> {
        if new_quantity <= 0 {
            self.remove_line(store_id, product_id, selected_options);
            return Ok(());
        }

        if let Some(bucket) = self.buckets.iter_mut().find(|b| b.store_id == store_id) {
            if let Some(line) = bucket.lines.iter_mut().find(|line| {
                line.product.product_id == product_id
                    && &line.selected_options == selected_options
            }) {
                line.quantity = clamp_quantity(&line.product, new_quantity)?;
            }
        }

        Ok(())
    }

    /// Removes the matching line; dropping the last line of a vendor drops
    /// the whole bucket.
    pub fn remove_line(
        &mut self,
        store_id: i32,
        product_id: i32,
        selected_options: &SelectedOptions,
    ) {
        if let Some(bucket) = self.buckets.iter_mut().find(|b| b.store_id == store_id) {
            bucket.lines.retain(|line| {
                !(line.product.product_id == product_id
                    && &line.selected_options == selected_options)
            });
        }
        self.buckets.retain(|bucket| !bucket.lines.is_empty());
    }

    /// Sum of quantities across all lines, all vendors.
    pub fn total_item_count(&self) -> i64 {
        self.buckets
            .iter()
            .flat_map(|bucket| &bucket.lines)
            .map(|line| line.quantity as i64)
            .sum()
    }

    /// Cart value at current effective unit prices.
    pub fn total_value(&self) -> Result<i64, CheckoutError> {
        let mut total = 0i64;
        for line in self.buckets.iter().flat_map(|bucket| &bucket.lines) {
            total += PricingResolver::unit_price(&line.product)? * line.quantity as i64;
        }
        Ok(total)
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

fn clamp_quantity(product: &CheckoutProduct, requested: i32) -> Result<i32, CheckoutError> {
    if requested <= 0 || product.stock <= 0 {
        return Err(CheckoutError::InvalidQuantity {
            product_id: product.product_id,
            requested,
            stock: product.stock,
        });
    }
    Ok(requested.min(product.stock))
}

fn validate_options(
    product: &CheckoutProduct,
    selected: &SelectedOptions,
) -> Result<(), CheckoutError> {
    for axis in &product.variant_axes {
        match selected.get(&axis.name) {
            None => {
                return Err(CheckoutError::InvalidOptions {
                    product_id: product.product_id,
                    reason: format!("missing a value for axis '{}'", axis.name),
                });
            }
            Some(value) if !axis.values.contains(value) => {
                return Err(CheckoutError::InvalidOptions {
                    product_id: product.product_id,
                    reason: format!("'{value}' is not a value of axis '{}'", axis.name),
                });
            }
            Some(_) => {}
        }
    }

    if let Some(unknown) = selected
        .keys()
        .find(|&name| !product.variant_axes.iter().any(|axis| &axis.name == name))
    {
        return Err(CheckoutError::InvalidOptions {
            product_id: product.product_id,
            reason: format!("product has no axis named '{unknown}'"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VariantAxis;
    use std::collections::BTreeMap;

    fn plain_product(product_id: i32, store_id: i32, price: i64, stock: i32) -> CheckoutProduct {
        CheckoutProduct {
            product_id,
            store_id,
            name: format!("Product {product_id}"),
            price,
            discount_price: None,
            stock,
            variant_axes: Vec::new(),
        }
    }

    fn shirt(product_id: i32, store_id: i32) -> CheckoutProduct {
        CheckoutProduct {
            product_id,
            store_id,
            name: "Batik Shirt".into(),
            price: 120_000,
            discount_price: None,
            stock: 20,
            variant_axes: vec![VariantAxis {
                name: "Size".into(),
                values: vec!["S".into(), "M".into(), "L".into()],
            }],
        }
    }

    fn size(value: &str) -> SelectedOptions {
        BTreeMap::from([("Size".to_string(), value.to_string())])
    }

    #[test]
    fn add_line_groups_by_vendor_in_insertion_order() {
        let mut cart = CartAggregate::new();
        cart.add_line(plain_product(1, 7, 50_000, 10), 1, BTreeMap::new())
            .unwrap();
        cart.add_line(plain_product(2, 3, 30_000, 10), 1, BTreeMap::new())
            .unwrap();
        cart.add_line(plain_product(3, 7, 20_000, 10), 1, BTreeMap::new())
            .unwrap();

        assert_eq!(cart.vendor_count(), 2);
        assert_eq!(cart.buckets()[0].store_id, 7);
        assert_eq!(cart.buckets()[1].store_id, 3);
        assert_eq!(cart.buckets()[0].lines.len(), 2);
    }

    #[test]
    fn same_identity_merges_instead_of_duplicating() {
        let mut cart = CartAggregate::new();
        cart.add_line(shirt(1, 7), 2, size("M")).unwrap();
        cart.add_line(shirt(1, 7), 3, size("M")).unwrap();

        assert_eq!(cart.buckets()[0].lines.len(), 1);
        assert_eq!(cart.buckets()[0].lines[0].quantity, 5);
    }

    #[test]
    fn different_options_are_distinct_lines() {
        let mut cart = CartAggregate::new();
        cart.add_line(shirt(1, 7), 1, size("M")).unwrap();
        cart.add_line(shirt(1, 7), 1, size("L")).unwrap();

        assert_eq!(cart.buckets()[0].lines.len(), 2);
        assert_eq!(cart.total_item_count(), 2);
    }

    #[test]
    fn quantity_above_stock_clamps_without_error() {
        let mut cart = CartAggregate::new();
        cart.add_line(plain_product(1, 7, 50_000, 5), 10, BTreeMap::new())
            .unwrap();
        assert_eq!(cart.buckets()[0].lines[0].quantity, 5);
    }

    #[test]
    fn merged_quantity_also_clamps_to_stock() {
        let mut cart = CartAggregate::new();
        cart.add_line(plain_product(1, 7, 50_000, 5), 4, BTreeMap::new())
            .unwrap();
        cart.add_line(plain_product(1, 7, 50_000, 5), 4, BTreeMap::new())
            .unwrap();
        assert_eq!(cart.buckets()[0].lines[0].quantity, 5);
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let mut cart = CartAggregate::new();
        let result = cart.add_line(plain_product(1, 7, 50_000, 5), 0, BTreeMap::new());
        assert_eq!(
            result,
            Err(CheckoutError::InvalidQuantity {
                product_id: 1,
                requested: 0,
                stock: 5,
            })
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn out_of_stock_product_cannot_be_added() {
        let mut cart = CartAggregate::new();
        let result = cart.add_line(plain_product(1, 7, 50_000, 0), 1, BTreeMap::new());
        assert!(matches!(
            result,
            Err(CheckoutError::InvalidQuantity { stock: 0, .. })
        ));
    }

    #[test]
    fn missing_axis_is_invalid() {
        let mut cart = CartAggregate::new();
        let result = cart.add_line(shirt(1, 7), 1, BTreeMap::new());
        assert!(matches!(result, Err(CheckoutError::InvalidOptions { .. })));
    }

    #[test]
    fn unknown_axis_is_invalid() {
        let mut cart = CartAggregate::new();
        let result = cart.add_line(
            plain_product(1, 7, 50_000, 5),
            1,
            BTreeMap::from([("Color".to_string(), "Red".to_string())]),
        );
        assert!(matches!(result, Err(CheckoutError::InvalidOptions { .. })));
    }

    #[test]
    fn unknown_axis_value_is_invalid() {
        let mut cart = CartAggregate::new();
        let result = cart.add_line(shirt(1, 7), 1, size("XXL"));
        assert!(matches!(result, Err(CheckoutError::InvalidOptions { .. })));
    }

    #[test]
    fn add_then_remove_round_trips_to_prior_state() {
        let mut cart = CartAggregate::new();
        cart.add_line(plain_product(1, 7, 50_000, 10), 2, BTreeMap::new())
            .unwrap();
        let before = cart.clone();

        cart.add_line(shirt(2, 3), 1, size("M")).unwrap();
        cart.remove_line(3, 2, &size("M"));

        assert_eq!(cart, before);
    }

    #[test]
    fn removing_last_line_drops_the_vendor_bucket() {
        let mut cart = CartAggregate::new();
        cart.add_line(plain_product(1, 7, 50_000, 10), 1, BTreeMap::new())
            .unwrap();
        cart.remove_line(7, 1, &BTreeMap::new());

        assert!(cart.is_empty());
        assert_eq!(cart.vendor_count(), 0);
    }

    #[test]
    fn update_quantity_zero_equals_remove() {
        let mut a = CartAggregate::new();
        let mut b = CartAggregate::new();
        for cart in [&mut a, &mut b] {
            cart.add_line(plain_product(1, 7, 50_000, 10), 2, BTreeMap::new())
                .unwrap();
            cart.add_line(plain_product(2, 7, 10_000, 10), 1, BTreeMap::new())
                .unwrap();
        }

        a.update_quantity(7, 1, 0, &BTreeMap::new()).unwrap();
        b.remove_line(7, 1, &BTreeMap::new());

        assert_eq!(a, b);
    }

    #[test]
    fn update_quantity_reclamps_to_stock() {
        let mut cart = CartAggregate::new();
        cart.add_line(plain_product(1, 7, 50_000, 5), 2, BTreeMap::new())
            .unwrap();
        cart.update_quantity(7, 1, 99, &BTreeMap::new()).unwrap();
        assert_eq!(cart.buckets()[0].lines[0].quantity, 5);
    }

    #[test]
    fn total_item_count_sums_every_line() {
        let mut cart = CartAggregate::new();
        cart.add_line(plain_product(1, 7, 50_000, 10), 2, BTreeMap::new())
            .unwrap();
        cart.add_line(shirt(2, 3), 3, size("S")).unwrap();
        cart.add_line(shirt(2, 3), 1, size("L")).unwrap();

        assert_eq!(cart.total_item_count(), 6);
        // idempotent, no side effects
        assert_eq!(cart.total_item_count(), 6);
    }

    #[test]
    fn total_value_uses_effective_unit_prices() {
        let mut discounted = plain_product(1, 7, 100_000, 10);
        discounted.discount_price = Some(75_000);

        let mut cart = CartAggregate::new();
        cart.add_line(discounted, 2, BTreeMap::new()).unwrap();
        cart.add_line(plain_product(2, 7, 10_000, 10), 1, BTreeMap::new())
            .unwrap();

        assert_eq!(cart.total_value().unwrap(), 2 * 75_000 + 10_000);
    }

    #[test]
    fn clear_empties_every_bucket() {
        let mut cart = CartAggregate::new();
        cart.add_line(plain_product(1, 7, 50_000, 10), 2, BTreeMap::new())
            .unwrap();
        cart.add_line(plain_product(2, 3, 30_000, 10), 1, BTreeMap::new())
            .unwrap();

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_item_count(), 0);
    }
}
