use super::{PricingRequest, PricingStrategy};
use crate::error::Result;
use crate::types::Money;

/// Flat fare: the base price adjusted only for passenger type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StandardPricing {
    base_price: Money,
}

impl StandardPricing {
    /// Creates the strategy around `base_price`
    #[must_use]
    pub const fn new(base_price: Money) -> Self {
        Self { base_price }
    }
}

impl PricingStrategy for StandardPricing {
    fn calculate_price(&self, request: &PricingRequest) -> Result<Money> {
        request.validate()?;
        Ok(self.base_price.scale(request.passenger_type.price_multiplier()))
    }

    fn name(&self) -> &'static str {
        "STANDARD"
    }

    fn description(&self) -> &'static str {
        "Standard flat-rate pricing with passenger type discounts"
    }
}
