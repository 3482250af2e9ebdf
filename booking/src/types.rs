//! Value types for the flight booking domain.
//!
//! Identifiers, seat labels, money and the small enumerations that pricing
//! and seating are keyed on.

use crate::error::BookingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Identifiers
// ============================================================================

/// Declares a string-backed identifier newtype.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new `", stringify!($name), "`")]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is empty or only whitespace
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Unique flight identifier (e.g. `AA100`)
    FlightNumber
);
string_id!(
    /// Unique passenger identifier
    PassengerId
);
string_id!(
    /// Unique booking identifier (e.g. `BK-1A2B3C4D`)
    BookingId
);
string_id!(
    /// Unique aircraft identifier
    AircraftId
);

// ============================================================================
// Seat Numbers
// ============================================================================

/// A seat label such as `12A`: a row number followed by a column letter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatNumber(String);

impl SeatNumber {
    /// Creates a new `SeatNumber`
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Returns the seat number as a string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Window seats are the outer columns, `A` and `F` (case-insensitive).
    #[must_use]
    pub fn is_window(&self) -> bool {
        self.0
            .chars()
            .last()
            .is_some_and(|c| matches!(c.to_ascii_uppercase(), 'A' | 'F'))
    }

    /// Row number parsed from the leading run of digits, if any.
    #[must_use]
    pub fn row(&self) -> Option<u32> {
        let end = self
            .0
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.0.len());
        self.0[..end].parse().ok()
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeatNumber {
    fn from(number: &str) -> Self {
        Self::new(number)
    }
}

impl From<String> for SeatNumber {
    fn from(number: String) -> Self {
        Self(number)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole dollars, saturating on overflow
    #[must_use]
    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars.saturating_mul(100))
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount in dollars (rounded down)
    #[must_use]
    pub const fn dollars(&self) -> u64 {
        self.0 / 100
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Subtracts two money amounts (returns None if result would be negative)
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        if self.0 >= other.0 {
            Some(Self(self.0 - other.0))
        } else {
            None
        }
    }

    /// Subtracts, clamping at zero
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Multiplies by `factor` and rounds to the nearest cent (half away from zero).
    ///
    /// Negative or non-finite results clamp to zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // cent amounts stay far below 2^52
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked above the cast
    pub fn scale(self, factor: f64) -> Self {
        let scaled = (self.0 as f64 * factor).round();
        if scaled.is_finite() && scaled > 0.0 {
            Self(scaled as u64)
        } else {
            Self::ZERO
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.dollars(), self.0 % 100)
    }
}

// ============================================================================
// Passenger Types and Loyalty Tiers
// ============================================================================

/// Passenger age category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassengerType {
    /// Full fare
    #[default]
    Adult,
    /// 75% of the fare
    Child,
    /// 50% of the fare
    Infant,
}

impl PassengerType {
    /// Fare multiplier applied by every pricing strategy
    #[must_use]
    pub const fn price_multiplier(self) -> f64 {
        match self {
            Self::Adult => 1.0,
            Self::Child => 0.75,
            Self::Infant => 0.5,
        }
    }

    /// Parses a passenger type code, treating unknown codes as `Adult`.
    ///
    /// Unknown codes therefore price at the full-fare multiplier of 1.0.
    #[must_use]
    pub fn parse_lenient(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    /// Canonical upper-case code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adult => "ADULT",
            Self::Child => "CHILD",
            Self::Infant => "INFANT",
        }
    }
}

impl FromStr for PassengerType {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADULT" => Ok(Self::Adult),
            "CHILD" => Ok(Self::Child),
            "INFANT" => Ok(Self::Infant),
            other => Err(BookingError::validation(format!("Unknown passenger type: {other}"))),
        }
    }
}

impl fmt::Display for PassengerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frequent-flyer status unlocking a fare discount
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoyaltyTier {
    /// No discount
    #[default]
    Bronze,
    /// 5% discount (10+ flights)
    Silver,
    /// 10% discount (50+ flights)
    Gold,
    /// 15% discount (100+ flights)
    Platinum,
}

impl LoyaltyTier {
    /// Discount rate in `[0, 1)`
    #[must_use]
    pub const fn discount(self) -> f64 {
        match self {
            Self::Bronze => 0.0,
            Self::Silver => 0.05,
            Self::Gold => 0.10,
            Self::Platinum => 0.15,
        }
    }

    /// Parses a tier code, treating unknown codes as `Bronze`.
    #[must_use]
    pub fn parse_lenient(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    /// Canonical upper-case code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
        }
    }
}

impl FromStr for LoyaltyTier {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRONZE" => Ok(Self::Bronze),
            "SILVER" => Ok(Self::Silver),
            "GOLD" => Ok(Self::Gold),
            "PLATINUM" => Ok(Self::Platinum),
            other => Err(BookingError::validation(format!("Unknown loyalty tier: {other}"))),
        }
    }
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
