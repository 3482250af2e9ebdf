//! Aircraft abstraction and its variants.
//!
//! Every variant honours the same [`Aircraft`] contract so callers can use
//! any of them through `&dyn Aircraft`: a cargo plane simply reports no seat
//! classes and zero seats.

use crate::error::{BookingError, Result};
use crate::types::AircraftId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cabin class
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatClass {
    /// First class
    First,
    /// Business class
    Business,
    /// Economy class
    Economy,
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::First => "FIRST",
            Self::Business => "BUSINESS",
            Self::Economy => "ECONOMY",
        })
    }
}

impl FromStr for SeatClass {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIRST" => Ok(Self::First),
            "BUSINESS" => Ok(Self::Business),
            "ECONOMY" => Ok(Self::Economy),
            other => Err(BookingError::validation(format!("Unknown seat class: {other}"))),
        }
    }
}

/// Serializable aircraft description
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AircraftInfo {
    /// Aircraft ID
    pub aircraft_id: AircraftId,
    /// Model name
    pub model: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Passenger seats
    pub total_seats: u32,
    /// Cabin classes on board
    pub seat_classes: Vec<SeatClass>,
    /// Luggage allowance in kilograms
    pub luggage_allowance_kg: f64,
}

/// Common contract of every aircraft variant.
pub trait Aircraft: Send + Sync {
    /// Aircraft ID
    fn aircraft_id(&self) -> &AircraftId;

    /// Model name
    fn model(&self) -> &str;

    /// Manufacturer
    fn manufacturer(&self) -> &str;

    /// Passenger seats
    fn total_seats(&self) -> u32;

    /// Cabin classes on board, possibly none.
    fn seat_classes(&self) -> Vec<SeatClass>;

    /// Seats in `class`; zero when the class is not on board.
    fn seats_in_class(&self, class: SeatClass) -> u32;

    /// Luggage allowance in kilograms.
    fn luggage_allowance_kg(&self) -> f64;

    /// Description assembled from the other methods.
    fn info(&self) -> AircraftInfo {
        AircraftInfo {
            aircraft_id: self.aircraft_id().clone(),
            model: self.model().to_string(),
            manufacturer: self.manufacturer().to_string(),
            total_seats: self.total_seats(),
            seat_classes: self.seat_classes(),
            luggage_allowance_kg: self.luggage_allowance_kg(),
        }
    }
}

fn check_identity(aircraft_id: &AircraftId, model: &str) -> Result<()> {
    if aircraft_id.is_blank() {
        return Err(BookingError::validation("Aircraft ID cannot be empty"));
    }
    if model.trim().is_empty() {
        return Err(BookingError::validation("Aircraft model cannot be empty"));
    }
    Ok(())
}

/// Passenger aircraft with three cabins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommercialAircraft {
    aircraft_id: AircraftId,
    model: String,
    manufacturer: String,
    first_class_seats: u32,
    business_class_seats: u32,
    economy_class_seats: u32,
}

impl CommercialAircraft {
    /// Per-passenger checked luggage allowance
    pub const LUGGAGE_ALLOWANCE_KG: f64 = 25.0;

    /// Creates a commercial aircraft.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if the ID or model is empty, or the
    /// cabin sizes do not add up to `total_seats`.
    pub fn new(
        aircraft_id: impl Into<AircraftId>,
        model: impl Into<String>,
        manufacturer: impl Into<String>,
        total_seats: u32,
        (first, business, economy): (u32, u32, u32),
    ) -> Result<Self> {
        let aircraft_id = aircraft_id.into();
        let model = model.into();
        check_identity(&aircraft_id, &model)?;

        let sum = u64::from(first) + u64::from(business) + u64::from(economy);
        if sum != u64::from(total_seats) {
            return Err(BookingError::validation(format!(
                "Seat distribution ({sum}) does not match total seats ({total_seats})"
            )));
        }

        Ok(Self {
            aircraft_id,
            model,
            manufacturer: manufacturer.into(),
            first_class_seats: first,
            business_class_seats: business,
            economy_class_seats: economy,
        })
    }
}

impl Aircraft for CommercialAircraft {
    fn aircraft_id(&self) -> &AircraftId {
        &self.aircraft_id
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    fn total_seats(&self) -> u32 {
        self.first_class_seats + self.business_class_seats + self.economy_class_seats
    }

    fn seat_classes(&self) -> Vec<SeatClass> {
        vec![SeatClass::First, SeatClass::Business, SeatClass::Economy]
    }

    fn seats_in_class(&self, class: SeatClass) -> u32 {
        match class {
            SeatClass::First => self.first_class_seats,
            SeatClass::Business => self.business_class_seats,
            SeatClass::Economy => self.economy_class_seats,
        }
    }

    fn luggage_allowance_kg(&self) -> f64 {
        Self::LUGGAGE_ALLOWANCE_KG
    }
}

/// Freighter without passenger seats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CargoPlane {
    aircraft_id: AircraftId,
    model: String,
    manufacturer: String,
    cargo_capacity_kg: f64,
    loaded_kg: f64,
}

impl CargoPlane {
    /// Creates a cargo plane.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if the ID or model is empty,
    /// `total_seats` is not zero, or the capacity is not positive.
    pub fn new(
        aircraft_id: impl Into<AircraftId>,
        model: impl Into<String>,
        manufacturer: impl Into<String>,
        total_seats: u32,
        cargo_capacity_kg: f64,
    ) -> Result<Self> {
        let aircraft_id = aircraft_id.into();
        let model = model.into();
        check_identity(&aircraft_id, &model)?;

        if total_seats != 0 {
            return Err(BookingError::validation("Cargo aircraft must have 0 total seats"));
        }
        if cargo_capacity_kg.is_nan() || cargo_capacity_kg <= 0.0 {
            return Err(BookingError::validation("Cargo capacity must be positive"));
        }

        Ok(Self {
            aircraft_id,
            model,
            manufacturer: manufacturer.into(),
            cargo_capacity_kg,
            loaded_kg: 0.0,
        })
    }

    /// Maximum payload
    #[must_use]
    pub const fn cargo_capacity_kg(&self) -> f64 {
        self.cargo_capacity_kg
    }

    /// Payload loaded so far
    #[must_use]
    pub const fn loaded_kg(&self) -> f64 {
        self.loaded_kg
    }

    /// Loads `weight_kg` of cargo.
    ///
    /// Returns `Ok(false)` without loading if the capacity would be exceeded.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if the weight is not positive.
    pub fn add_cargo(&mut self, weight_kg: f64) -> Result<bool> {
        if weight_kg.is_nan() || weight_kg <= 0.0 {
            return Err(BookingError::validation("Cargo weight must be positive"));
        }
        let loaded = self.loaded_kg + weight_kg;
        if loaded > self.cargo_capacity_kg {
            return Ok(false);
        }
        self.loaded_kg = loaded;
        Ok(true)
    }
}

impl Aircraft for CargoPlane {
    fn aircraft_id(&self) -> &AircraftId {
        &self.aircraft_id
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    fn total_seats(&self) -> u32 {
        0
    }

    fn seat_classes(&self) -> Vec<SeatClass> {
        Vec::new()
    }

    fn seats_in_class(&self, _class: SeatClass) -> u32 {
        0
    }

    fn luggage_allowance_kg(&self) -> f64 {
        self.cargo_capacity_kg
    }
}
