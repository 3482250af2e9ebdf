//! Booking entity and its lifecycle.
//!
//! ```text
//! PENDING --confirm--> CONFIRMED --pay--> PAID --check_in--> CHECKED_IN --complete--> COMPLETED
//!    \________________\______________\__________________\--cancel--> CANCELLED
//! ```
//!
//! `COMPLETED` and `CANCELLED` are terminal. Every other transition fails with
//! [`BookingError::InvalidStateTransition`].

use crate::error::{BookingError, Result};
use crate::types::{BookingId, FlightNumber, Money, PassengerId, SeatNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking lifecycle status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created, awaiting confirmation
    #[default]
    Pending,
    /// Confirmed, awaiting payment
    Confirmed,
    /// Fully paid
    Paid,
    /// Passenger checked in
    CheckedIn,
    /// Flight taken (terminal)
    Completed,
    /// Cancelled (terminal)
    Cancelled,
}

/// A lifecycle transition request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    /// PENDING -> CONFIRMED
    Confirm,
    /// CONFIRMED -> PAID
    Pay,
    /// PAID -> `CHECKED_IN`
    CheckIn,
    /// `CHECKED_IN` -> COMPLETED
    Complete,
    /// any non-terminal -> CANCELLED
    Cancel,
}

impl BookingStatus {
    /// Target status of `action`, or `None` if the lifecycle forbids it.
    #[must_use]
    pub const fn apply(self, action: BookingAction) -> Option<Self> {
        match (self, action) {
            (Self::Pending, BookingAction::Confirm) => Some(Self::Confirmed),
            (Self::Confirmed, BookingAction::Pay) => Some(Self::Paid),
            (Self::Paid, BookingAction::CheckIn) => Some(Self::CheckedIn),
            (Self::CheckedIn, BookingAction::Complete) => Some(Self::Completed),
            (Self::Pending | Self::Confirmed | Self::Paid | Self::CheckedIn, BookingAction::Cancel) => {
                Some(Self::Cancelled)
            },
            _ => None,
        }
    }

    /// True for `COMPLETED` and `CANCELLED`
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Canonical upper-case code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Paid => "PAID",
            Self::CheckedIn => "CHECKED_IN",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Confirm => "confirm",
            Self::Pay => "pay",
            Self::CheckIn => "check in",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        };
        f.write_str(s)
    }
}

/// A reservation of seats on one flight for one or more passengers.
///
/// Passenger `i` sits in seat `i`; `paid_amount` never exceeds `total_price`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    booking_id: BookingId,
    flight_id: FlightNumber,
    passenger_ids: Vec<PassengerId>,
    seat_numbers: Vec<SeatNumber>,
    booking_date: DateTime<Utc>,
    status: BookingStatus,
    total_price: Money,
    paid_amount: Money,
    payment_reference: Option<String>,
}

/// Serializable booking overview
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    /// Booking ID
    pub booking_id: BookingId,
    /// Booked flight
    pub flight_id: FlightNumber,
    /// Number of passengers
    pub passenger_count: usize,
    /// Allocated seats
    pub seats: Vec<SeatNumber>,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Total due
    pub total_price: Money,
    /// Paid so far
    pub paid_amount: Money,
    /// Still owed
    pub remaining_balance: Money,
    /// Whether nothing is owed
    pub is_paid: bool,
    /// Gateway reference of the settling payment
    pub payment_reference: Option<String>,
}

impl Booking {
    /// Creates a `PENDING` booking with nothing paid.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if an ID is empty, there are no
    /// passengers or seats, or the passenger and seat counts differ.
    pub fn new(
        booking_id: BookingId,
        flight_id: FlightNumber,
        passenger_ids: Vec<PassengerId>,
        seat_numbers: Vec<SeatNumber>,
        booking_date: DateTime<Utc>,
        total_price: Money,
    ) -> Result<Self> {
        if booking_id.is_blank() {
            return Err(BookingError::validation("Booking ID cannot be empty"));
        }
        if flight_id.is_blank() {
            return Err(BookingError::validation("Flight ID cannot be empty"));
        }
        if passenger_ids.is_empty() {
            return Err(BookingError::validation("At least one passenger is required"));
        }
        if seat_numbers.is_empty() {
            return Err(BookingError::validation("At least one seat is required"));
        }
        if passenger_ids.len() != seat_numbers.len() {
            return Err(BookingError::validation(format!(
                "Number of passengers ({}) must match number of seats ({})",
                passenger_ids.len(),
                seat_numbers.len()
            )));
        }

        Ok(Self {
            booking_id,
            flight_id,
            passenger_ids,
            seat_numbers,
            booking_date,
            status: BookingStatus::Pending,
            total_price,
            paid_amount: Money::ZERO,
            payment_reference: None,
        })
    }

    /// Returns the booking ID
    #[must_use]
    pub const fn booking_id(&self) -> &BookingId {
        &self.booking_id
    }

    /// Returns the booked flight
    #[must_use]
    pub const fn flight_id(&self) -> &FlightNumber {
        &self.flight_id
    }

    /// Returns the passengers
    #[must_use]
    pub fn passenger_ids(&self) -> &[PassengerId] {
        &self.passenger_ids
    }

    /// Returns the seats, aligned with [`Booking::passenger_ids`]
    #[must_use]
    pub fn seat_numbers(&self) -> &[SeatNumber] {
        &self.seat_numbers
    }

    /// Returns when the booking was made
    #[must_use]
    pub const fn booking_date(&self) -> DateTime<Utc> {
        self.booking_date
    }

    /// Returns the lifecycle status
    #[must_use]
    pub const fn status(&self) -> BookingStatus {
        self.status
    }

    /// Returns the total due
    #[must_use]
    pub const fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the amount paid so far
    #[must_use]
    pub const fn paid_amount(&self) -> Money {
        self.paid_amount
    }

    /// Returns the gateway reference of the settling payment
    #[must_use]
    pub fn payment_reference(&self) -> Option<&str> {
        self.payment_reference.as_deref()
    }

    /// Number of passengers on the booking
    #[must_use]
    pub fn passenger_count(&self) -> usize {
        self.passenger_ids.len()
    }

    fn transition(&mut self, action: BookingAction) -> Result<()> {
        let next = self
            .status
            .apply(action)
            .ok_or(BookingError::InvalidStateTransition {
                current: self.status,
                action,
            })?;
        self.status = next;
        Ok(())
    }

    /// PENDING -> CONFIRMED
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidStateTransition`] from any other status.
    pub fn mark_as_confirmed(&mut self) -> Result<()> {
        self.transition(BookingAction::Confirm)
    }

    /// CONFIRMED -> PAID, once the balance is settled.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidStateTransition`] unless CONFIRMED, and
    /// [`BookingError::Validation`] while a balance remains.
    pub fn mark_as_paid(&mut self) -> Result<()> {
        if self.status.apply(BookingAction::Pay).is_none() {
            return Err(BookingError::InvalidStateTransition {
                current: self.status,
                action: BookingAction::Pay,
            });
        }
        if !self.is_paid() {
            return Err(BookingError::validation(format!(
                "Booking {} still owes {}",
                self.booking_id,
                self.remaining_balance()
            )));
        }
        self.transition(BookingAction::Pay)
    }

    /// PAID -> `CHECKED_IN`
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidStateTransition`] from any other status.
    pub fn mark_as_checked_in(&mut self) -> Result<()> {
        self.transition(BookingAction::CheckIn)
    }

    /// `CHECKED_IN` -> COMPLETED
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidStateTransition`] from any other status.
    pub fn mark_as_completed(&mut self) -> Result<()> {
        self.transition(BookingAction::Complete)
    }

    /// Any non-terminal status -> CANCELLED
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidStateTransition`] if already COMPLETED
    /// or CANCELLED.
    pub fn cancel(&mut self) -> Result<()> {
        self.transition(BookingAction::Cancel)
    }

    /// True when nothing remains to be paid
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.paid_amount >= self.total_price
    }

    /// Amount still owed
    #[must_use]
    pub const fn remaining_balance(&self) -> Money {
        self.total_price.saturating_sub(self.paid_amount)
    }

    /// Adds `amount` to the paid total.
    ///
    /// Returns `Ok(false)` without recording anything if the payment would
    /// take the paid total above the price.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if `amount` is zero.
    pub fn record_payment(&mut self, amount: Money) -> Result<bool> {
        if amount.is_zero() {
            return Err(BookingError::validation("Payment amount must be positive"));
        }
        match self.paid_amount.checked_add(amount) {
            Some(paid) if paid <= self.total_price => {
                self.paid_amount = paid;
                Ok(true)
            },
            _ => Ok(false),
        }
    }

    /// Reprices the booking.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] once the booking is past
    /// CONFIRMED, or if `total_price` is below what has already been paid.
    pub fn set_total_price(&mut self, total_price: Money) -> Result<()> {
        if !matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed) {
            return Err(BookingError::validation(format!(
                "Cannot reprice a booking in status {}",
                self.status
            )));
        }
        if total_price < self.paid_amount {
            return Err(BookingError::validation(format!(
                "Total price {total_price} is below the amount already paid ({})",
                self.paid_amount
            )));
        }
        self.total_price = total_price;
        Ok(())
    }

    /// Records the gateway reference of the payment
    pub fn set_payment_reference(&mut self, reference: impl Into<String>) {
        self.payment_reference = Some(reference.into());
    }

    /// Overview for display or serialization
    #[must_use]
    pub fn summary(&self) -> BookingSummary {
        BookingSummary {
            booking_id: self.booking_id.clone(),
            flight_id: self.flight_id.clone(),
            passenger_count: self.passenger_count(),
            seats: self.seat_numbers.clone(),
            status: self.status,
            total_price: self.total_price,
            paid_amount: self.paid_amount,
            remaining_balance: self.remaining_balance(),
            is_paid: self.is_paid(),
            payment_reference: self.payment_reference.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn booking(total: Money) -> Booking {
        Booking::new(
            BookingId::new("BK-0001"),
            FlightNumber::new("AA100"),
            vec![PassengerId::new("P1"), PassengerId::new("P2")],
            vec![SeatNumber::new("1A"), SeatNumber::new("1B")],
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            total,
        )
        .unwrap()
    }

    fn paid_booking() -> Booking {
        let mut b = booking(Money::from_dollars(100));
        b.mark_as_confirmed().unwrap();
        assert!(b.record_payment(Money::from_dollars(100)).unwrap());
        b.mark_as_paid().unwrap();
        b
    }

    #[test]
    fn test_construction_checks() {
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mismatch = Booking::new(
            BookingId::new("BK-1"),
            FlightNumber::new("AA100"),
            vec![PassengerId::new("P1")],
            vec![SeatNumber::new("1A"), SeatNumber::new("1B")],
            date,
            Money::ZERO,
        );
        assert!(matches!(mismatch, Err(BookingError::Validation(_))));

        let empty = Booking::new(
            BookingId::new("BK-1"),
            FlightNumber::new("AA100"),
            vec![],
            vec![],
            date,
            Money::ZERO,
        );
        assert!(matches!(empty, Err(BookingError::Validation(_))));
    }

    #[test]
    fn test_happy_path_lifecycle() {
        let mut b = paid_booking();
        assert_eq!(b.status(), BookingStatus::Paid);
        b.mark_as_checked_in().unwrap();
        b.mark_as_completed().unwrap();
        assert_eq!(b.status(), BookingStatus::Completed);
        assert!(b.status().is_terminal());
    }

    #[test]
    fn test_pay_from_pending_is_rejected() {
        let mut b = booking(Money::ZERO);
        assert_eq!(
            b.mark_as_paid(),
            Err(BookingError::InvalidStateTransition {
                current: BookingStatus::Pending,
                action: BookingAction::Pay,
            })
        );
        assert_eq!(b.status(), BookingStatus::Pending);
    }

    #[test]
    fn test_pay_requires_settled_balance() {
        let mut b = booking(Money::from_dollars(100));
        b.mark_as_confirmed().unwrap();
        assert!(matches!(b.mark_as_paid(), Err(BookingError::Validation(_))));
        assert_eq!(b.status(), BookingStatus::Confirmed);
    }

    #[test]
    fn test_cancel_from_every_status() {
        let mut pending = booking(Money::ZERO);
        pending.cancel().unwrap();
        assert!(pending.cancel().is_err());

        let mut paid = paid_booking();
        paid.cancel().unwrap();

        let mut completed = paid_booking();
        completed.mark_as_checked_in().unwrap();
        completed.mark_as_completed().unwrap();
        assert!(matches!(
            completed.cancel(),
            Err(BookingError::InvalidStateTransition { current: BookingStatus::Completed, .. })
        ));
    }

    #[test]
    fn test_skipping_states_is_rejected() {
        let mut b = booking(Money::ZERO);
        assert!(b.mark_as_checked_in().is_err());
        assert!(b.mark_as_completed().is_err());
        b.mark_as_confirmed().unwrap();
        assert!(b.mark_as_confirmed().is_err());
    }

    #[test]
    fn test_overpayment_is_not_recorded() {
        let mut b = booking(Money::from_dollars(100));
        assert!(b.record_payment(Money::from_dollars(60)).unwrap());
        assert!(!b.record_payment(Money::from_dollars(50)).unwrap());
        assert_eq!(b.paid_amount(), Money::from_dollars(60));
        assert_eq!(b.remaining_balance(), Money::from_dollars(40));
        assert!(b.record_payment(Money::ZERO).is_err());
    }

    #[test]
    fn test_set_total_price_rules() {
        let mut b = booking(Money::from_dollars(100));
        b.record_payment(Money::from_dollars(30)).unwrap();
        assert!(b.set_total_price(Money::from_dollars(20)).is_err());
        b.set_total_price(Money::from_dollars(200)).unwrap();
        assert_eq!(b.remaining_balance(), Money::from_dollars(170));

        let mut paid = paid_booking();
        assert!(paid.set_total_price(Money::from_dollars(500)).is_err());
    }

    #[test]
    fn test_summary() {
        let mut b = paid_booking();
        b.set_payment_reference("CC-1234");
        let summary = b.summary();
        assert_eq!(summary.passenger_count, 2);
        assert!(summary.is_paid);
        assert_eq!(summary.remaining_balance, Money::ZERO);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status"], "PAID");
        assert_eq!(json["payment_reference"], "CC-1234");
    }
}
