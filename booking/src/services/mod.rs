//! Orchestration services.
//!
//! Services own no entities. They load copies from a [`Repository`], drive
//! the entity operations, and write the result back with `update`. Every
//! collaborator is injected at construction:
//!
//! - [`BookingService`]: booking lifecycle, pricing and seat allocation
//! - [`FlightService`]: flight inventory and search
//! - [`PaymentService`]: charging, refunding and payment notifications
//!
//! [`Repository`]: flight_booking_core::repository::Repository

use crate::config::Config;
use flight_booking_core::environment::{Clock, IdGenerator, PrefixedIdGenerator, SystemClock};
use std::sync::Arc;

mod booking;
mod flight;
mod payment;

pub use booking::{BookingService, NewBooking};
pub use flight::{FlightSearch, FlightService, OccupancyReport};
pub use payment::PaymentService;

/// Environment dependencies for the booking services
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock for timestamps and lead-time calculations
    pub clock: Arc<dyn Clock>,
    /// Source of booking IDs
    pub ids: Arc<dyn IdGenerator>,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System clock and random IDs with the configured prefix
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(SystemClock),
            Arc::new(PrefixedIdGenerator::new(config.booking.id_prefix.clone())),
        )
    }
}
