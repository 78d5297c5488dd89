use crate::errors::CheckoutError;
use crate::model::CheckoutProduct;

/// Resolves the effective unit price of a product: the discount price when
/// one is present and strictly below the list price, the list price
/// otherwise. A stored discount at or above the list price is a data error
/// and is never silently treated as a regular price.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingResolver;

impl PricingResolver {
    pub fn unit_price(product: &CheckoutProduct) -> Result<i64, CheckoutError> {
        match product.discount_price {
            Some(discount) if discount >= product.price => Err(CheckoutError::InvalidPricing {
                product_id: product.product_id,
                discount_price: discount,
                price: product.price,
            }),
            Some(discount) if discount > 0 => Ok(discount),
            _ => Ok(product.price),
        }
    }

    /// Rounded percentage knocked off the list price, `0` when no valid
    /// discount applies. Always in `[0, 100)` since a valid discount is
    /// strictly positive and strictly below the list price.
    pub fn discount_percent(product: &CheckoutProduct) -> Result<u32, CheckoutError> {
        let unit_price = Self::unit_price(product)?;
        if unit_price == product.price || product.price <= 0 {
            return Ok(0);
        }
        let off = (product.price - unit_price) as f64 / product.price as f64;
        // a deep discount like 1 of 100_000 would round up to 100; the
        // figure is advertised as strictly below 100 percent
        Ok(((off * 100.0).round() as u32).min(99))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, discount_price: Option<i64>) -> CheckoutProduct {
        CheckoutProduct {
            product_id: 1,
            store_id: 1,
            name: "Kopi Gayo 250g".into(),
            price,
            discount_price,
            stock: 10,
            variant_axes: Vec::new(),
        }
    }

    #[test]
    fn valid_discount_wins_over_list_price() {
        let p = product(100_000, Some(75_000));
        assert_eq!(PricingResolver::unit_price(&p).unwrap(), 75_000);
    }

    #[test]
    fn no_discount_falls_back_to_list_price() {
        let p = product(100_000, None);
        assert_eq!(PricingResolver::unit_price(&p).unwrap(), 100_000);
    }

    #[test]
    fn zero_or_negative_discount_is_ignored() {
        assert_eq!(
            PricingResolver::unit_price(&product(100_000, Some(0))).unwrap(),
            100_000
        );
        assert_eq!(
            PricingResolver::unit_price(&product(100_000, Some(-5))).unwrap(),
            100_000
        );
    }

    #[test]
    fn discount_at_or_above_list_price_is_rejected() {
        let equal = PricingResolver::unit_price(&product(100_000, Some(100_000)));
        assert_eq!(
            equal,
            Err(CheckoutError::InvalidPricing {
                product_id: 1,
                discount_price: 100_000,
                price: 100_000,
            })
        );
        assert!(PricingResolver::unit_price(&product(100_000, Some(120_000))).is_err());
    }

    #[test]
    fn discount_percent_rounds_and_stays_below_hundred() {
        assert_eq!(
            PricingResolver::discount_percent(&product(100_000, Some(75_000))).unwrap(),
            25
        );
        assert_eq!(
            PricingResolver::discount_percent(&product(30_000, Some(20_000))).unwrap(),
            33
        );
        assert_eq!(
            PricingResolver::discount_percent(&product(100_000, None)).unwrap(),
            0
        );
        assert_eq!(
            PricingResolver::discount_percent(&product(100_000, Some(1))).unwrap(),
            99
        );
    }
}
