//! Seat allocation strategies.
//!
//! Each strategy owns a [`SeatPool`] and decides which seats to hand out.
//! Allocation removes seats from the pool, so a seat is never handed out
//! twice until it is released again.
//!
//! Implementors only provide [`SeatingStrategy::select`]; the provided
//! methods validate the request and keep the pool consistent.

use crate::error::{BookingError, Result};
use crate::types::SeatNumber;
use std::collections::HashSet;

mod family;
mod sequential;
mod window;

pub use family::FamilyAllocation;
pub use sequential::SequentialAllocation;
pub use window::WindowPriority;

/// Ordered, duplicate-free list of seats still available.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeatPool {
    seats: Vec<SeatNumber>,
}

impl SeatPool {
    /// Builds a pool, dropping repeated labels
    #[must_use]
    pub fn new<I, S>(seats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SeatNumber>,
    {
        let mut pool = Self::default();
        pool.restore(seats.into_iter().map(Into::into));
        pool
    }

    /// Seats in pool order
    #[must_use]
    pub fn seats(&self) -> &[SeatNumber] {
        &self.seats
    }

    /// Number of seats left
    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// True when no seats are left
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Checks that `count` seats can be allocated.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InsufficientSeats`] if `count` is zero or
    /// larger than the pool.
    pub fn ensure_available(&self, count: usize) -> Result<()> {
        if count == 0 || count > self.seats.len() {
            return Err(BookingError::InsufficientSeats {
                requested: count,
                available: self.seats.len(),
            });
        }
        Ok(())
    }

    /// Removes `taken` from the pool
    pub fn remove(&mut self, taken: &[SeatNumber]) {
        let taken: HashSet<&SeatNumber> = taken.iter().collect();
        self.seats.retain(|seat| !taken.contains(seat));
    }

    /// Appends seats not already in the pool
    pub fn restore(&mut self, seats: impl IntoIterator<Item = SeatNumber>) {
        for seat in seats {
            if !self.seats.contains(&seat) {
                self.seats.push(seat);
            }
        }
    }
}

/// Chooses seats for a booking.
pub trait SeatingStrategy: Send + Sync {
    /// The seats this strategy can still hand out
    fn pool(&self) -> &SeatPool;

    /// Mutable access to the pool
    fn pool_mut(&mut self) -> &mut SeatPool;

    /// Picks `count` seats from the pool without removing them.
    ///
    /// Callers guarantee `0 < count <= pool().len()`.
    fn select(&self, count: usize) -> Vec<SeatNumber>;

    /// Upper-case identifier, e.g. `WINDOW_PRIORITY`
    fn name(&self) -> &'static str;

    /// One-line human readable description
    fn description(&self) -> &'static str;

    /// Allocates `count` seats and removes them from the pool.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InsufficientSeats`] if `count` is zero or the
    /// pool is too small; the pool is left untouched.
    fn allocate_seats(&mut self, count: usize) -> Result<Vec<SeatNumber>> {
        self.pool().ensure_available(count)?;
        let seats = self.select(count);
        self.pool_mut().remove(&seats);
        tracing::debug!(strategy = self.name(), ?seats, remaining = self.pool().len(), "Seats allocated");
        Ok(seats)
    }

    /// Removes caller-chosen seats from the pool so they are not handed out
    /// again. Returns the seats that were actually in the pool.
    fn claim_seats(&mut self, seats: &[SeatNumber]) -> Vec<SeatNumber> {
        let claimed: Vec<SeatNumber> = seats
            .iter()
            .filter(|seat| self.pool().seats().contains(seat))
            .cloned()
            .collect();
        self.pool_mut().remove(&claimed);
        tracing::debug!(strategy = self.name(), ?claimed, remaining = self.pool().len(), "Seats claimed");
        claimed
    }

    /// Puts previously allocated seats back at the end of the pool.
    fn release_seats(&mut self, seats: &[SeatNumber]) {
        self.pool_mut().restore(seats.iter().cloned());
        tracing::debug!(strategy = self.name(), ?seats, "Seats released");
    }

    /// Seats still available, in pool order
    fn available_seats(&self) -> &[SeatNumber] {
        self.pool().seats()
    }
}

/// Seat labels for a cabin: rows `1..=rows`, one seat per column letter.
///
/// ```
/// use flight_booking::seating::seat_map;
///
/// let seats = seat_map(2, "ABC");
/// assert_eq!(seats.len(), 6);
/// assert_eq!(seats[3].as_str(), "2A");
/// ```
#[must_use]
pub fn seat_map(rows: u32, columns: &str) -> Vec<SeatNumber> {
    (1..=rows)
        .flat_map(|row| columns.chars().map(move |column| SeatNumber::new(format!("{row}{column}"))))
        .collect()
}
