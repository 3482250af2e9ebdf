use super::{PricingRequest, PricingStrategy};
use crate::error::Result;
use crate::types::Money;

/// Frequent-flyer fare: the passenger-adjusted base price minus the tier
/// discount. Requests without a tier are priced as `BRONZE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoyaltyPricing {
    base_price: Money,
}

impl LoyaltyPricing {
    /// Creates the strategy around `base_price`
    #[must_use]
    pub const fn new(base_price: Money) -> Self {
        Self { base_price }
    }
}

impl PricingStrategy for LoyaltyPricing {
    fn calculate_price(&self, request: &PricingRequest) -> Result<Money> {
        request.validate()?;
        let discount = request.loyalty_tier.unwrap_or_default().discount();
        let factor = request.passenger_type.price_multiplier() * (1.0 - discount);
        Ok(self.base_price.scale(factor))
    }

    fn name(&self) -> &'static str {
        "LOYALTY"
    }

    fn description(&self) -> &'static str {
        "Loyalty-based pricing with tier-dependent discounts"
    }
}
