//! Flight inventory service.

use crate::entities::{Flight, FlightStatus};
use crate::error::{BookingError, Result};
use crate::metrics;
use crate::types::FlightNumber;
use flight_booking_core::repository::Repository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Criteria for [`FlightService::search_flights`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlightSearch {
    /// Departure city, matched case-insensitively
    pub origin: String,
    /// Arrival city, matched case-insensitively
    pub destination: String,
    /// Flights with fewer free seats are skipped
    pub min_available_seats: u32,
}

impl FlightSearch {
    /// Search for `origin` to `destination` with at least one free seat
    #[must_use]
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            min_available_seats: 1,
        }
    }

    /// Require at least `seats` free seats
    #[must_use]
    pub const fn with_min_available_seats(mut self, seats: u32) -> Self {
        self.min_available_seats = seats;
        self
    }

    fn matches(&self, flight: &Flight) -> bool {
        flight.status() == FlightStatus::Scheduled
            && same_place(flight.origin(), &self.origin)
            && same_place(flight.destination(), &self.destination)
            && flight.available_seats() >= self.min_available_seats
    }
}

/// City names compare case-insensitively, including non-ASCII letters.
fn same_place(city: &str, wanted: &str) -> bool {
    city.to_lowercase() == wanted.trim().to_lowercase()
}

/// One line of [`FlightService::occupancy_report`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OccupancyReport {
    /// Flight
    pub flight_number: FlightNumber,
    /// Capacity
    pub total_seats: u32,
    /// Seats still for sale
    pub available_seats: u32,
    /// Percentage sold
    pub occupancy_rate: f64,
}

/// Flight service
pub struct FlightService {
    repository: Arc<dyn Repository<FlightNumber, Flight>>,
}

impl FlightService {
    /// Create a new flight service
    #[must_use]
    pub fn new(repository: Arc<dyn Repository<FlightNumber, Flight>>) -> Self {
        Self { repository }
    }

    /// Adds a flight to the inventory.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Repository`] if the flight number is taken.
    pub fn add_flight(&self, flight: Flight) -> Result<()> {
        let flight_number = flight.flight_number().clone();
        let route = format!("{} -> {}", flight.origin(), flight.destination());
        let seats = flight.total_seats();
        self.repository.add(flight_number.clone(), flight)?;
        tracing::info!(flight_number = %flight_number, %route, seats, "Flight added");
        Ok(())
    }

    /// Looks up a flight.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Repository`] if storage fails.
    pub fn get_flight(&self, flight_number: &FlightNumber) -> Result<Option<Flight>> {
        tracing::debug!(flight_number = %flight_number, "Fetching flight");
        Ok(self.repository.get(flight_number)?)
    }

    /// Every flight, in flight number order.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Repository`] if storage fails.
    pub fn get_all_flights(&self) -> Result<Vec<Flight>> {
        Ok(self.repository.get_all()?)
    }

    /// Scheduled flights on the searched route with enough free seats.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Repository`] if storage fails.
    pub fn search_flights(&self, search: &FlightSearch) -> Result<Vec<Flight>> {
        let flights: Vec<Flight> = self
            .repository
            .get_all()?
            .into_iter()
            .filter(|flight| search.matches(flight))
            .collect();
        tracing::debug!(
            origin = %search.origin,
            destination = %search.destination,
            min_available_seats = search.min_available_seats,
            found = flights.len(),
            "Flight search"
        );
        Ok(flights)
    }

    /// Takes `seats` out of a flight's inventory.
    ///
    /// Returns `Ok(false)` and persists nothing if the flight has fewer free seats.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown flight
    /// - [`BookingError::Validation`] if `seats` is zero
    /// - [`BookingError::Repository`] if storage fails
    pub fn reserve_seats(&self, flight_number: &FlightNumber, seats: u32) -> Result<bool> {
        let mut flight = self.load(flight_number)?;
        let reserved = flight.reserve_seat(seats)?;
        if reserved {
            self.repository.update(flight_number, flight.clone())?;
            metrics::record_seat_reservation("reserved", seats);
            tracing::info!(
                flight_number = %flight_number,
                seats,
                available = flight.available_seats(),
                "Seats reserved"
            );
        } else {
            metrics::record_seat_reservation("rejected", seats);
            tracing::warn!(
                flight_number = %flight_number,
                seats,
                available = flight.available_seats(),
                "Not enough seats to reserve"
            );
        }
        Ok(reserved)
    }

    /// Returns `seats` to a flight's inventory.
    ///
    /// Returns `Ok(false)` and persists nothing if that would exceed capacity.
    ///
    /// # Errors
    ///
    /// Same as [`FlightService::reserve_seats`].
    pub fn cancel_reservation(&self, flight_number: &FlightNumber, seats: u32) -> Result<bool> {
        let mut flight = self.load(flight_number)?;
        let released = flight.cancel_reservation(seats)?;
        if released {
            self.repository.update(flight_number, flight.clone())?;
            metrics::record_seat_reservation("released", seats);
            tracing::info!(
                flight_number = %flight_number,
                seats,
                available = flight.available_seats(),
                "Seats released"
            );
        } else {
            tracing::warn!(
                flight_number = %flight_number,
                seats,
                available = flight.available_seats(),
                "Release would exceed capacity"
            );
        }
        Ok(released)
    }

    /// Sets a flight's operational status.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] for an unknown flight or
    /// [`BookingError::Repository`] if storage fails.
    pub fn update_flight_status(&self, flight_number: &FlightNumber, status: FlightStatus) -> Result<Flight> {
        let mut flight = self.load(flight_number)?;
        let previous = flight.status();
        flight.set_status(status);
        self.repository.update(flight_number, flight.clone())?;
        tracing::info!(flight_number = %flight_number, from = %previous, to = %status, "Flight status changed");
        Ok(flight)
    }

    /// Occupancy of every flight, in flight number order.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Repository`] if storage fails.
    pub fn occupancy_report(&self) -> Result<Vec<OccupancyReport>> {
        Ok(self
            .repository
            .get_all()?
            .iter()
            .map(|flight| OccupancyReport {
                flight_number: flight.flight_number().clone(),
                total_seats: flight.total_seats(),
                available_seats: flight.available_seats(),
                occupancy_rate: flight.occupancy_rate(),
            })
            .collect())
    }

    fn load(&self, flight_number: &FlightNumber) -> Result<Flight> {
        self.repository
            .get(flight_number)?
            .ok_or_else(|| BookingError::not_found("Flight", flight_number))
    }
}
