//! Pricing strategies.
//!
//! A [`PricingStrategy`] turns a [`PricingRequest`] into a per-passenger
//! fare. Strategies are interchangeable behind `Box<dyn PricingStrategy>`;
//! adding one means adding a type, not editing the services that use it.
//!
//! | Strategy | Formula |
//! |----------|---------|
//! | [`StandardPricing`] | base × passenger multiplier |
//! | [`DynamicPricing`]  | base × occupancy × time-to-departure × passenger |
//! | [`SeasonalPricing`] | base × month multiplier × passenger |
//! | [`LoyaltyPricing`]  | base × passenger × (1 − tier discount) |

use crate::config::PricingConfig;
use crate::entities::Flight;
use crate::error::{BookingError, Result};
use crate::types::{LoyaltyTier, Money, PassengerType};
use chrono::{DateTime, Utc};

mod dynamic;
mod loyalty;
mod seasonal;
mod standard;

pub use dynamic::DynamicPricing;
pub use loyalty::LoyaltyPricing;
pub use seasonal::SeasonalPricing;
pub use standard::StandardPricing;

/// Inputs to a price calculation.
#[derive(Clone, Debug, PartialEq)]
pub struct PricingRequest {
    /// Passengers on the booking (must be positive)
    pub num_passengers: u32,
    /// Seats sold, in percent (0-100)
    pub occupancy_rate: f64,
    /// Days until departure (non-negative)
    pub days_until_departure: i64,
    /// Age category the fare is for
    pub passenger_type: PassengerType,
    /// Month of departure (1-12), needed by seasonal pricing
    pub departure_month: Option<u32>,
    /// Frequent-flyer tier, used by loyalty pricing
    pub loyalty_tier: Option<LoyaltyTier>,
}

impl PricingRequest {
    /// Creates a request for adult fares
    #[must_use]
    pub const fn new(num_passengers: u32, occupancy_rate: f64, days_until_departure: i64) -> Self {
        Self {
            num_passengers,
            occupancy_rate,
            days_until_departure,
            passenger_type: PassengerType::Adult,
            departure_month: None,
            loyalty_tier: None,
        }
    }

    /// Request using the configured default occupancy and lead time.
    #[must_use]
    pub const fn with_defaults(num_passengers: u32, config: &PricingConfig) -> Self {
        Self::new(
            num_passengers,
            config.default_occupancy_rate,
            config.default_days_until_departure,
        )
    }

    /// Request derived from the current state of `flight` as seen at `now`.
    ///
    /// Departed flights count as zero days away.
    #[must_use]
    pub fn for_flight(flight: &Flight, num_passengers: u32, now: DateTime<Utc>) -> Self {
        Self::new(
            num_passengers,
            flight.occupancy_rate(),
            flight.days_until_departure(now).max(0),
        )
        .with_departure_month(flight.departure_month())
    }

    /// Sets the passenger type
    #[must_use]
    pub const fn with_passenger_type(mut self, passenger_type: PassengerType) -> Self {
        self.passenger_type = passenger_type;
        self
    }

    /// Sets the departure month
    #[must_use]
    pub const fn with_departure_month(mut self, month: u32) -> Self {
        self.departure_month = Some(month);
        self
    }

    /// Sets the loyalty tier
    #[must_use]
    pub const fn with_loyalty_tier(mut self, tier: LoyaltyTier) -> Self {
        self.loyalty_tier = Some(tier);
        self
    }

    /// Checks the inputs every strategy shares.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if there are no passengers, the
    /// occupancy is outside `0..=100` (or NaN), or the lead time is negative.
    pub fn validate(&self) -> Result<()> {
        if self.num_passengers == 0 {
            return Err(BookingError::validation("Number of passengers must be positive"));
        }
        if !(0.0..=100.0).contains(&self.occupancy_rate) {
            return Err(BookingError::validation(format!(
                "Occupancy rate must be between 0 and 100, got {}",
                self.occupancy_rate
            )));
        }
        if self.days_until_departure < 0 {
            return Err(BookingError::validation("Days until departure cannot be negative"));
        }
        Ok(())
    }
}

/// Computes a per-passenger fare.
pub trait PricingStrategy: Send + Sync {
    /// Price for one passenger described by `request`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] when [`PricingRequest::validate`]
    /// fails, or [`BookingError::RequiredParameter`] when a strategy-specific
    /// input is missing.
    fn calculate_price(&self, request: &PricingRequest) -> Result<Money>;

    /// Upper-case identifier, e.g. `DYNAMIC`
    fn name(&self) -> &'static str;

    /// One-line human readable description
    fn description(&self) -> &'static str;
}
