use super::{PricingRequest, PricingStrategy};
use crate::error::{BookingError, Result};
use crate::types::Money;

/// Month-dependent fare.
///
/// Peak (Jan, Jul, Aug, Dec) 1.3×, high (Mar-Jun, Sep, Oct) 1.15×,
/// low (Feb) 0.85×, November at the base price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeasonalPricing {
    base_price: Money,
}

impl SeasonalPricing {
    /// Creates the strategy around `base_price`
    #[must_use]
    pub const fn new(base_price: Money) -> Self {
        Self { base_price }
    }

    /// Multiplier for a month in `1..=12`
    #[must_use]
    pub const fn seasonal_multiplier(month: u32) -> Option<f64> {
        match month {
            1 | 7 | 8 | 12 => Some(1.3),
            3..=6 | 9 | 10 => Some(1.15),
            2 => Some(0.85),
            11 => Some(1.0),
            _ => None,
        }
    }
}

impl PricingStrategy for SeasonalPricing {
    fn calculate_price(&self, request: &PricingRequest) -> Result<Money> {
        request.validate()?;
        let month = request.departure_month.ok_or_else(|| BookingError::RequiredParameter {
            name: "departure_month",
            reason: "seasonal pricing needs the month of departure (1-12)".to_string(),
        })?;
        let seasonal = Self::seasonal_multiplier(month).ok_or_else(|| BookingError::RequiredParameter {
            name: "departure_month",
            reason: format!("{month} is not a month (1-12)"),
        })?;
        Ok(self
            .base_price
            .scale(seasonal * request.passenger_type.price_multiplier()))
    }

    fn name(&self) -> &'static str {
        "SEASONAL"
    }

    fn description(&self) -> &'static str {
        "Seasonal pricing with peak, high, and low season rates"
    }
}
