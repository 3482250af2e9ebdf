//! Domain entities: flights, passengers, bookings and aircraft.
//!
//! Entities own their invariants. They are plain data with validation and
//! state transitions; storage and orchestration live in [`crate::services`].

pub mod aircraft;
pub mod booking;
pub mod flight;
pub mod passenger;

pub use aircraft::{Aircraft, AircraftInfo, CargoPlane, CommercialAircraft, SeatClass};
pub use booking::{Booking, BookingAction, BookingStatus, BookingSummary};
pub use flight::{Flight, FlightBuilder, FlightStatus};
pub use passenger::{Passenger, PassengerProfile};
