//! Flight entity and its validating builder.

use crate::error::{BookingError, Result};
use crate::types::{AircraftId, FlightNumber, Money};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a flight
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    /// Open for booking
    #[default]
    Scheduled,
    /// Passengers boarded
    Boarded,
    /// Left the gate
    Departed,
    /// Airborne
    InFlight,
    /// Arrived
    Landed,
    /// Will not operate
    Cancelled,
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Scheduled => "SCHEDULED",
            Self::Boarded => "BOARDED",
            Self::Departed => "DEPARTED",
            Self::InFlight => "IN_FLIGHT",
            Self::Landed => "LANDED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// A scheduled flight with a seat inventory.
///
/// Invariants held by every instance:
/// - origin and destination are non-empty and differ
/// - `departure_time < arrival_time`
/// - `available_seats <= total_seats`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    flight_number: FlightNumber,
    origin: String,
    destination: String,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    aircraft_id: AircraftId,
    total_seats: u32,
    available_seats: u32,
    status: FlightStatus,
    price: Money,
}

impl Flight {
    /// Starts building a flight
    #[must_use]
    pub fn builder(flight_number: impl Into<FlightNumber>) -> FlightBuilder {
        FlightBuilder::new(flight_number.into())
    }

    /// Returns the flight number
    #[must_use]
    pub const fn flight_number(&self) -> &FlightNumber {
        &self.flight_number
    }

    /// Returns the origin airport or city
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the destination airport or city
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Returns the departure time
    #[must_use]
    pub const fn departure_time(&self) -> DateTime<Utc> {
        self.departure_time
    }

    /// Returns the arrival time
    #[must_use]
    pub const fn arrival_time(&self) -> DateTime<Utc> {
        self.arrival_time
    }

    /// Returns the operating aircraft
    #[must_use]
    pub const fn aircraft_id(&self) -> &AircraftId {
        &self.aircraft_id
    }

    /// Returns the seat capacity
    #[must_use]
    pub const fn total_seats(&self) -> u32 {
        self.total_seats
    }

    /// Returns the number of unsold seats
    #[must_use]
    pub const fn available_seats(&self) -> u32 {
        self.available_seats
    }

    /// Returns the current status
    #[must_use]
    pub const fn status(&self) -> FlightStatus {
        self.status
    }

    /// Returns the listed fare
    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    /// Takes `seats` out of the inventory.
    ///
    /// Returns `Ok(false)` and leaves the flight untouched when fewer than
    /// `seats` are available.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if `seats` is zero.
    pub fn reserve_seat(&mut self, seats: u32) -> Result<bool> {
        if seats == 0 {
            return Err(BookingError::validation("Number of seats must be positive"));
        }
        match self.available_seats.checked_sub(seats) {
            Some(remaining) => {
                self.available_seats = remaining;
                Ok(true)
            },
            None => Ok(false),
        }
    }

    /// Returns `seats` to the inventory.
    ///
    /// Returns `Ok(false)` and leaves the flight untouched when that would
    /// exceed the capacity.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if `seats` is zero.
    pub fn cancel_reservation(&mut self, seats: u32) -> Result<bool> {
        if seats == 0 {
            return Err(BookingError::validation("Number of seats must be positive"));
        }
        match self.available_seats.checked_add(seats) {
            Some(restored) if restored <= self.total_seats => {
                self.available_seats = restored;
                Ok(true)
            },
            _ => Ok(false),
        }
    }

    /// Percentage of seats sold, 0 for a flight without seats.
    #[must_use]
    pub fn occupancy_rate(&self) -> f64 {
        if self.total_seats == 0 {
            return 0.0;
        }
        let sold = self.total_seats - self.available_seats;
        f64::from(sold) / f64::from(self.total_seats) * 100.0
    }

    /// True when no seats remain
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.available_seats == 0
    }

    /// One-line human readable summary of route and schedule.
    #[must_use]
    pub fn departure_info(&self) -> String {
        format!(
            "Flight {}: {} -> {}, departs {}, arrives {}",
            self.flight_number,
            self.origin,
            self.destination,
            self.departure_time.format("%Y-%m-%d %H:%M UTC"),
            self.arrival_time.format("%Y-%m-%d %H:%M UTC"),
        )
    }

    /// Whole days between `now` and departure; negative once departed.
    #[must_use]
    pub fn days_until_departure(&self, now: DateTime<Utc>) -> i64 {
        (self.departure_time - now).num_days()
    }

    /// Calendar month of departure (1-12)
    #[must_use]
    pub fn departure_month(&self) -> u32 {
        self.departure_time.month()
    }

    /// Overrides the operational status
    pub const fn set_status(&mut self, status: FlightStatus) {
        self.status = status;
    }
}

/// Builder for [`Flight`]; `build` enforces the entity invariants.
#[derive(Clone, Debug)]
pub struct FlightBuilder {
    flight_number: FlightNumber,
    origin: String,
    destination: String,
    departure_time: Option<DateTime<Utc>>,
    arrival_time: Option<DateTime<Utc>>,
    aircraft_id: AircraftId,
    total_seats: u32,
    available_seats: Option<u32>,
    status: FlightStatus,
    price: Money,
}

impl FlightBuilder {
    fn new(flight_number: FlightNumber) -> Self {
        Self {
            flight_number,
            origin: String::new(),
            destination: String::new(),
            departure_time: None,
            arrival_time: None,
            aircraft_id: AircraftId::new(""),
            total_seats: 0,
            available_seats: None,
            status: FlightStatus::Scheduled,
            price: Money::ZERO,
        }
    }

    /// Sets origin and destination
    #[must_use]
    pub fn route(mut self, origin: impl Into<String>, destination: impl Into<String>) -> Self {
        self.origin = origin.into();
        self.destination = destination.into();
        self
    }

    /// Sets departure and arrival times
    #[must_use]
    pub const fn schedule(mut self, departure: DateTime<Utc>, arrival: DateTime<Utc>) -> Self {
        self.departure_time = Some(departure);
        self.arrival_time = Some(arrival);
        self
    }

    /// Sets the operating aircraft
    #[must_use]
    pub fn aircraft(mut self, aircraft_id: impl Into<AircraftId>) -> Self {
        self.aircraft_id = aircraft_id.into();
        self
    }

    /// Sets capacity; available seats default to the capacity
    #[must_use]
    pub const fn seats(mut self, total_seats: u32) -> Self {
        self.total_seats = total_seats;
        self
    }

    /// Sets the number of unsold seats explicitly
    #[must_use]
    pub const fn available_seats(mut self, available: u32) -> Self {
        self.available_seats = Some(available);
        self
    }

    /// Sets the listed fare
    #[must_use]
    pub const fn price(mut self, price: Money) -> Self {
        self.price = price;
        self
    }

    /// Sets the initial status
    #[must_use]
    pub const fn status(mut self, status: FlightStatus) -> Self {
        self.status = status;
        self
    }

    /// Validates and builds the flight.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if a field is missing or the
    /// route, schedule or seat counts are inconsistent.
    pub fn build(self) -> Result<Flight> {
        if self.flight_number.is_blank() {
            return Err(BookingError::validation("Flight number is required"));
        }
        let origin = self.origin.trim().to_string();
        let destination = self.destination.trim().to_string();
        if origin.is_empty() || destination.is_empty() {
            return Err(BookingError::validation("Origin and destination are required"));
        }
        if origin.to_lowercase() == destination.to_lowercase() {
            return Err(BookingError::validation("Origin and destination must be different"));
        }
        let (Some(departure_time), Some(arrival_time)) = (self.departure_time, self.arrival_time) else {
            return Err(BookingError::validation("Departure and arrival times are required"));
        };
        if departure_time >= arrival_time {
            return Err(BookingError::validation("Departure time must be before arrival time"));
        }
        let available_seats = self.available_seats.unwrap_or(self.total_seats);
        if available_seats > self.total_seats {
            return Err(BookingError::validation(format!(
                "Available seats ({available_seats}) cannot exceed total seats ({})",
                self.total_seats
            )));
        }

        Ok(Flight {
            flight_number: self.flight_number,
            origin,
            destination,
            departure_time,
            arrival_time,
            aircraft_id: self.aircraft_id,
            total_seats: self.total_seats,
            available_seats,
            status: self.status,
            price: self.price,
        })
    }
}
