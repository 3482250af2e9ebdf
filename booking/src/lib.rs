//! Flight Booking - airline reservations with pluggable pricing and seating
//!
//! This crate models the booking side of an airline: flights and their seat
//! inventory, passengers, bookings with a strict lifecycle, and the services
//! that orchestrate them over a keyed repository. It showcases:
//!
//! - **Entities with invariants**: validated construction, guarded state transitions
//! - **Strategy pattern**: interchangeable pricing and seat allocation behind trait objects
//! - **Injected collaborators**: repositories, clock, ID source, payment gateway and notifier
//! - **Substitutable aircraft**: passenger and cargo aircraft behind one trait
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐  ┌───────────────┐  ┌───────────────┐
//! │ FlightService │  │BookingService │  │PaymentService │
//! └───────────────┘  └───────────────┘  └───────────────┘
//!         │            │     │     │        │        │
//!         ▼            ▼     ▼     ▼        ▼        ▼
//!   Repository<    Repository< Pricing  Seating  Payment  Notifier
//!   Flight>        Booking>   Strategy Strategy  Gateway
//! ```
//!
//! # Booking Lifecycle
//!
//! ```text
//! PENDING ──confirm──▶ CONFIRMED ──pay (in full)──▶ PAID ──check in──▶ CHECKED_IN ──complete──▶ COMPLETED
//!    │                     │                          │                    │
//!    └─────────────────────┴──────────cancel──────────┴────────────────────┴──────▶ CANCELLED
//! ```
//!
//! COMPLETED and CANCELLED are terminal. Partial payments keep a booking
//! CONFIRMED until the balance reaches zero.
//!
//! # Usage
//!
//! ```
//! use flight_booking::pricing::{DynamicPricing, PricingRequest, PricingStrategy};
//! use flight_booking::Money;
//!
//! let pricing = DynamicPricing::new(Money::from_dollars(100));
//! let fare = pricing.calculate_price(&PricingRequest::new(2, 75.0, 10)).unwrap();
//! assert_eq!(fare, Money::from_dollars(450));
//! ```
//!
//! See `src/bin/demo.rs` for a complete run through the lifecycle.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod notification;
pub mod payment_gateway;
pub mod pricing;
pub mod seating;
pub mod services;
pub mod types;

pub use config::Config;
pub use entities::{Aircraft, Booking, BookingStatus, Flight, FlightStatus, Passenger};
pub use error::{BookingError, Result};
pub use pricing::{PricingRequest, PricingStrategy};
pub use seating::SeatingStrategy;
pub use services::{BookingEnvironment, BookingService, FlightService, NewBooking, PaymentService};
pub use types::*;
