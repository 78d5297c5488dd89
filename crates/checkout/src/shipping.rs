use crate::errors::CheckoutError;
use crate::model::{ShippingMethod, ShippingOption};

/// Resolves shipping costs and ETA labels from a static option table. Every
/// vendor shares one catalog today, so `options_for` ignores the store id it
/// is handed; callers still pass one so a per-vendor catalog can be
/// introduced without touching them.
#[derive(Debug, Clone)]
pub struct ShippingCalculator {
    options: Vec<ShippingOption>,
}

impl ShippingCalculator {
    pub fn new(options: Vec<ShippingOption>) -> Self {
        Self { options }
    }

    pub fn with_default_catalog() -> Self {
        Self::new(default_catalog())
    }

    pub fn options_for(&self, _store_id: i32) -> &[ShippingOption] {
        &self.options
    }

    pub fn resolve(&self, option_id: &str) -> Result<&ShippingOption, CheckoutError> {
        self.options
            .iter()
            .find(|option| option.option_id == option_id)
            .ok_or_else(|| CheckoutError::UnknownShippingOption(option_id.to_string()))
    }

    pub fn default_option(&self) -> Option<&ShippingOption> {
        self.options.iter().find(|option| option.is_default)
    }

    /// Resolves the caller's choice, falling back to the catalog default
    /// when no choice was made for this vendor.
    pub fn resolve_choice(
        &self,
        store_id: i32,
        choice: Option<&str>,
    ) -> Result<&ShippingOption, CheckoutError> {
        match choice {
            Some(option_id) => self.resolve(option_id),
            None => self
                .default_option()
                .ok_or(CheckoutError::MissingShippingChoice { store_id }),
        }
    }
}

impl Default for ShippingCalculator {
    fn default() -> Self {
        Self::with_default_catalog()
    }
}

/// The static shipping table for this marketplace. Same-day local courier is
/// the default selection at checkout.
pub fn default_catalog() -> Vec<ShippingOption> {
    vec![
        ShippingOption {
            option_id: "same_day".into(),
            name: "Same-Day Courier".into(),
            method: ShippingMethod::LocalCourier,
            eta_label: "Delivered today".into(),
            price: 15_000,
            is_default: true,
        },
        ShippingOption {
            option_id: "next_day".into(),
            name: "Next-Day Courier".into(),
            method: ShippingMethod::LocalCourier,
            eta_label: "1-2 days".into(),
            price: 8_000,
            is_default: false,
        },
        ShippingOption {
            option_id: "pickup".into(),
            name: "Store Pickup".into(),
            method: ShippingMethod::Pickup,
            eta_label: "Ready in 2 hours".into(),
            price: 0,
            is_default: false,
        },
        ShippingOption {
            option_id: "regular".into(),
            name: "Third-Party Courier".into(),
            method: ShippingMethod::ThirdParty,
            eta_label: "2-4 days".into(),
            price: 20_000,
            is_default: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_identical_for_every_vendor() {
        let calculator = ShippingCalculator::with_default_catalog();
        assert_eq!(calculator.options_for(1), calculator.options_for(999));
        assert!(!calculator.options_for(1).is_empty());
    }

    #[test]
    fn resolve_finds_options_by_id() {
        let calculator = ShippingCalculator::with_default_catalog();
        let pickup = calculator.resolve("pickup").unwrap();
        assert_eq!(pickup.method, ShippingMethod::Pickup);
        assert_eq!(pickup.price, 0);
    }

    #[test]
    fn resolve_rejects_unknown_ids() {
        let calculator = ShippingCalculator::with_default_catalog();
        assert_eq!(
            calculator.resolve("drone").unwrap_err(),
            CheckoutError::UnknownShippingOption("drone".into())
        );
    }

    #[test]
    fn default_is_the_same_day_courier() {
        let calculator = ShippingCalculator::with_default_catalog();
        let default = calculator.default_option().unwrap();
        assert_eq!(default.option_id, "same_day");
        assert_eq!(default.method, ShippingMethod::LocalCourier);
    }

    #[test]
    fn no_choice_falls_back_to_default() {
        let calculator = ShippingCalculator::with_default_catalog();
        let resolved = calculator.resolve_choice(7, None).unwrap();
        assert_eq!(resolved.option_id, "same_day");
    }

    #[test]
    fn no_choice_without_default_is_an_error() {
        let mut catalog = default_catalog();
        for option in &mut catalog {
            option.is_default = false;
        }
        let calculator = ShippingCalculator::new(catalog);
        assert_eq!(
            calculator.resolve_choice(7, None).unwrap_err(),
            CheckoutError::MissingShippingChoice { store_id: 7 }
        );
    }
}
