use super::{PricingRequest, PricingStrategy};
use crate::error::Result;
use crate::types::Money;

/// Demand-driven fare that rises with occupancy and as departure nears.
///
/// - occupancy multiplier: `1 + occupancy / 100 × 0.5` (1.0 empty, 1.5 full)
/// - time multiplier: `1 + 100 / (days + 1) × 0.25`, same-day counted as one day
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DynamicPricing {
    base_price: Money,
}

impl DynamicPricing {
    const OCCUPANCY_FACTOR: f64 = 0.5;
    const TIME_FACTOR: f64 = 0.25;

    /// Creates the strategy around `base_price`
    #[must_use]
    pub const fn new(base_price: Money) -> Self {
        Self { base_price }
    }

    fn occupancy_multiplier(occupancy_rate: f64) -> f64 {
        1.0 + (occupancy_rate / 100.0) * Self::OCCUPANCY_FACTOR
    }

    #[allow(clippy::cast_precision_loss)] // validated day counts are small
    fn time_multiplier(days_until_departure: i64) -> f64 {
        let days = days_until_departure.max(1) as f64;
        1.0 + (100.0 / (days + 1.0)) * Self::TIME_FACTOR
    }
}

impl PricingStrategy for DynamicPricing {
    fn calculate_price(&self, request: &PricingRequest) -> Result<Money> {
        request.validate()?;
        let factor = Self::occupancy_multiplier(request.occupancy_rate)
            * Self::time_multiplier(request.days_until_departure)
            * request.passenger_type.price_multiplier();
        Ok(self.base_price.scale(factor))
    }

    fn name(&self) -> &'static str {
        "DYNAMIC"
    }

    fn description(&self) -> &'static str {
        "Dynamic pricing based on occupancy and time to departure"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_price() {
        let strategy = DynamicPricing::new(Money::from_dollars(100));
        let price = strategy.calculate_price(&PricingRequest::new(1, 75.0, 10)).unwrap();
        assert_eq!(price, Money::from_dollars(450));
    }

    #[test]
    fn test_same_day_counts_as_one_day() {
        let strategy = DynamicPricing::new(Money::from_dollars(100));
        let today = strategy.calculate_price(&PricingRequest::new(1, 0.0, 0)).unwrap();
        let tomorrow = strategy.calculate_price(&PricingRequest::new(1, 0.0, 1)).unwrap();
        assert_eq!(today, tomorrow);
        assert_eq!(today, Money::from_dollars(1350));
    }

    #[test]
    fn test_price_falls_with_lead_time() {
        let strategy = DynamicPricing::new(Money::from_dollars(100));
        let soon = strategy.calculate_price(&PricingRequest::new(1, 50.0, 3)).unwrap();
        let later = strategy.calculate_price(&PricingRequest::new(1, 50.0, 90)).unwrap();
        assert!(soon > later);
    }
}
