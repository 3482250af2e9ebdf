//! Booking service: lifecycle orchestration over a booking repository.

use super::BookingEnvironment;
use crate::entities::{Booking, BookingAction, BookingStatus};
use crate::error::{BookingError, Result};
use crate::metrics;
use crate::payment_gateway::PaymentReceipt;
use crate::pricing::{PricingRequest, PricingStrategy, StandardPricing};
use crate::seating::{SeatingStrategy, SequentialAllocation};
use crate::types::{BookingId, FlightNumber, Money, PassengerId, SeatNumber};
use flight_booking_core::repository::Repository;
use std::sync::Arc;

/// Request to create a booking
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBooking {
    /// Flight to book
    pub flight_id: FlightNumber,
    /// Travelling passengers
    pub passenger_ids: Vec<PassengerId>,
    /// Seats chosen by the caller; allocated by the seating strategy when `None`
    pub seat_numbers: Option<Vec<SeatNumber>>,
    /// Initial price, usually set later with [`BookingService::price_booking`]
    pub total_price: Money,
}

impl NewBooking {
    /// Booking for `passenger_ids` on `flight_id` with allocated seats and no price yet
    #[must_use]
    pub fn new(flight_id: impl Into<FlightNumber>, passenger_ids: Vec<PassengerId>) -> Self {
        Self {
            flight_id: flight_id.into(),
            passenger_ids,
            seat_numbers: None,
            total_price: Money::ZERO,
        }
    }

    /// Uses these seats instead of asking the seating strategy
    #[must_use]
    pub fn with_seats(mut self, seats: Vec<SeatNumber>) -> Self {
        self.seat_numbers = Some(seats);
        self
    }

    /// Sets the initial price
    #[must_use]
    pub const fn with_total_price(mut self, total_price: Money) -> Self {
        self.total_price = total_price;
        self
    }
}

/// Booking service
///
/// Every mutating operation loads the booking, applies the change, and
/// persists it with `update` before returning.
pub struct BookingService {
    repository: Arc<dyn Repository<BookingId, Booking>>,
    pricing: Box<dyn PricingStrategy>,
    seating: Box<dyn SeatingStrategy>,
    env: BookingEnvironment,
}

impl BookingService {
    /// Create a new booking service
    #[must_use]
    pub fn new(
        repository: Arc<dyn Repository<BookingId, Booking>>,
        pricing: Box<dyn PricingStrategy>,
        seating: Box<dyn SeatingStrategy>,
        env: BookingEnvironment,
    ) -> Self {
        Self {
            repository,
            pricing,
            seating,
            env,
        }
    }

    /// Service with $100 standard pricing and an empty sequential seat pool.
    ///
    /// Bookings then need caller-supplied seats until a seating strategy with
    /// a pool is installed.
    #[must_use]
    pub fn with_default_strategies(
        repository: Arc<dyn Repository<BookingId, Booking>>,
        env: BookingEnvironment,
    ) -> Self {
        Self::new(
            repository,
            Box::new(StandardPricing::new(Money::from_dollars(100))),
            Box::new(SequentialAllocation::default()),
            env,
        )
    }

    /// Active pricing strategy
    #[must_use]
    pub fn pricing_strategy(&self) -> &dyn PricingStrategy {
        self.pricing.as_ref()
    }

    /// Active seating strategy
    #[must_use]
    pub fn seating_strategy(&self) -> &dyn SeatingStrategy {
        self.seating.as_ref()
    }

    /// Replaces the pricing strategy
    pub fn set_pricing_strategy(&mut self, strategy: Box<dyn PricingStrategy>) {
        tracing::info!(from = self.pricing.name(), to = strategy.name(), "Pricing strategy changed");
        self.pricing = strategy;
    }

    /// Replaces the seating strategy
    pub fn set_seating_strategy(&mut self, strategy: Box<dyn SeatingStrategy>) {
        tracing::info!(from = self.seating.name(), to = strategy.name(), "Seating strategy changed");
        self.seating = strategy;
    }

    /// Creates and stores a `PENDING` booking with a generated ID.
    ///
    /// Seats come from the request, or from the seating strategy when the
    /// request has none (an empty list counts as none). Requested seats are
    /// removed from the strategy's pool. Seats taken from the pool are handed
    /// back if the booking cannot be built or stored.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Validation`] if there are no passengers or the
    ///   seat count does not match the passenger count
    /// - [`BookingError::InsufficientSeats`] if the seating pool is too small
    /// - [`BookingError::Repository`] if the booking cannot be stored
    pub fn create_booking(&mut self, request: NewBooking) -> Result<Booking> {
        if request.passenger_ids.is_empty() {
            return Err(BookingError::validation("At least one passenger is required"));
        }

        let (seats, taken) = match request.seat_numbers {
            Some(seats) if !seats.is_empty() => {
                let claimed = self.seating.claim_seats(&seats);
                (seats, claimed)
            },
            _ => {
                let seats = self.seating.allocate_seats(request.passenger_ids.len())?;
                (seats.clone(), seats)
            },
        };

        let booking_id = BookingId::new(self.env.ids.next_id());
        let stored = Booking::new(
            booking_id.clone(),
            request.flight_id,
            request.passenger_ids,
            seats.clone(),
            self.env.clock.now(),
            request.total_price,
        )
        .and_then(|booking| {
            self.repository.add(booking_id.clone(), booking.clone())?;
            Ok(booking)
        });

        match stored {
            Ok(booking) => {
                tracing::info!(
                    booking_id = %booking_id,
                    flight_id = %booking.flight_id(),
                    passengers = booking.passenger_count(),
                    seats = ?booking.seat_numbers(),
                    "Booking created"
                );
                metrics::record_booking_created();
                Ok(booking)
            },
            Err(error) => {
                if !taken.is_empty() {
                    self.seating.release_seats(&taken);
                }
                tracing::warn!(booking_id = %booking_id, %error, "Booking creation failed");
                Err(error)
            },
        }
    }

    /// PENDING -> CONFIRMED
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] for an unknown ID, or
    /// [`BookingError::InvalidStateTransition`] if the booking is not PENDING.
    pub fn confirm_booking(&self, booking_id: &BookingId) -> Result<Booking> {
        self.transition(booking_id, Booking::mark_as_confirmed)
    }

    /// Records a payment against a CONFIRMED booking.
    ///
    /// Once the balance is settled the booking moves to PAID. Returns
    /// `Ok(false)` and persists nothing if `amount` would overpay. A booking
    /// with nothing left to pay (zero total, or repriced down to what was
    /// already paid) moves to PAID without recording `amount` and also
    /// returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown ID
    /// - [`BookingError::InvalidStateTransition`] unless the booking is CONFIRMED
    /// - [`BookingError::Validation`] for a zero amount
    pub fn pay_booking(&self, booking_id: &BookingId, amount: Money) -> Result<bool> {
        self.apply_payment(booking_id, amount, None)
    }

    /// Like [`BookingService::pay_booking`], for a charge made through a
    /// payment gateway. The gateway reference is stored on the booking.
    ///
    /// # Errors
    ///
    /// Same as [`BookingService::pay_booking`].
    pub fn record_gateway_payment(&self, booking_id: &BookingId, receipt: &PaymentReceipt) -> Result<bool> {
        self.apply_payment(booking_id, receipt.amount, Some(&receipt.reference_id))
    }

    fn apply_payment(&self, booking_id: &BookingId, amount: Money, reference: Option<&str>) -> Result<bool> {
        let mut booking = self.load(booking_id)?;
        if booking.status() != BookingStatus::Confirmed {
            return Err(BookingError::InvalidStateTransition {
                current: booking.status(),
                action: BookingAction::Pay,
            });
        }

        if booking.is_paid() {
            booking.mark_as_paid()?;
            self.repository.update(booking_id, booking)?;
            tracing::info!(
                booking_id = %booking_id,
                amount = amount.cents(),
                "Booking already settled; marked as paid without charging"
            );
            metrics::record_booking_transition(BookingStatus::Paid);
            return Ok(false);
        }

        if !booking.record_payment(amount)? {
            tracing::warn!(
                booking_id = %booking_id,
                amount = amount.cents(),
                remaining = booking.remaining_balance().cents(),
                "Payment rejected: exceeds remaining balance"
            );
            return Ok(false);
        }
        if let Some(reference) = reference {
            booking.set_payment_reference(reference);
        }
        if booking.is_paid() {
            booking.mark_as_paid()?;
        }
        self.repository.update(booking_id, booking.clone())?;

        tracing::info!(
            booking_id = %booking_id,
            amount = amount.cents(),
            status = %booking.status(),
            remaining = booking.remaining_balance().cents(),
            "Payment recorded"
        );
        metrics::record_payment_succeeded(amount.cents());
        if booking.status() == BookingStatus::Paid {
            metrics::record_booking_transition(BookingStatus::Paid);
        }
        Ok(true)
    }

    /// PAID -> `CHECKED_IN`
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] for an unknown ID, or
    /// [`BookingError::InvalidStateTransition`] if the booking is not PAID.
    pub fn check_in_booking(&self, booking_id: &BookingId) -> Result<Booking> {
        self.transition(booking_id, Booking::mark_as_checked_in)
    }

    /// `CHECKED_IN` -> COMPLETED
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] for an unknown ID, or
    /// [`BookingError::InvalidStateTransition`] if the booking is not checked in.
    pub fn complete_booking(&self, booking_id: &BookingId) -> Result<Booking> {
        self.transition(booking_id, Booking::mark_as_completed)
    }

    /// Cancels a booking that is not yet COMPLETED or CANCELLED.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] for an unknown ID, or
    /// [`BookingError::InvalidStateTransition`] from a terminal status.
    pub fn cancel_booking(&self, booking_id: &BookingId) -> Result<Booking> {
        self.transition(booking_id, Booking::cancel)
    }

    /// Prices a booking with the active strategy and stores the new total.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown ID
    /// - [`BookingError::Validation`] if the request's passenger count differs
    ///   from the booking's, or the booking can no longer be repriced
    /// - any error of [`PricingStrategy::calculate_price`]
    pub fn price_booking(&self, booking_id: &BookingId, request: &PricingRequest) -> Result<Booking> {
        let mut booking = self.load(booking_id)?;
        if usize::try_from(request.num_passengers).ok() != Some(booking.passenger_count()) {
            return Err(BookingError::validation(format!(
                "Pricing request is for {} passengers but booking {booking_id} has {}",
                request.num_passengers,
                booking.passenger_count()
            )));
        }

        let total = self.calculate_booking_price(request)?;
        booking.set_total_price(total)?;
        self.repository.update(booking_id, booking.clone())?;

        tracing::info!(
            booking_id = %booking_id,
            strategy = self.pricing.name(),
            total = total.cents(),
            "Booking priced"
        );
        Ok(booking)
    }

    /// Total price for `request`: the per-passenger fare times the passenger count.
    ///
    /// # Errors
    ///
    /// Any error of [`PricingStrategy::calculate_price`], or
    /// [`BookingError::Validation`] if the total overflows.
    pub fn calculate_booking_price(&self, request: &PricingRequest) -> Result<Money> {
        let per_passenger = self.pricing.calculate_price(request)?;
        per_passenger
            .checked_multiply(request.num_passengers)
            .ok_or_else(|| BookingError::validation("Booking total overflows"))
    }

    /// Looks up a booking.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Repository`] if storage fails.
    pub fn get_booking(&self, booking_id: &BookingId) -> Result<Option<Booking>> {
        tracing::debug!(booking_id = %booking_id, "Fetching booking");
        Ok(self.repository.get(booking_id)?)
    }

    /// Every booking that includes `passenger_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Repository`] if storage fails.
    pub fn get_passenger_bookings(&self, passenger_id: &PassengerId) -> Result<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .repository
            .get_all()?
            .into_iter()
            .filter(|booking| booking.passenger_ids().contains(passenger_id))
            .collect();
        tracing::debug!(passenger_id = %passenger_id, count = bookings.len(), "Fetched passenger bookings");
        Ok(bookings)
    }

    fn load(&self, booking_id: &BookingId) -> Result<Booking> {
        self.repository
            .get(booking_id)?
            .ok_or_else(|| BookingError::not_found("Booking", booking_id))
    }

    fn transition(&self, booking_id: &BookingId, apply: impl FnOnce(&mut Booking) -> Result<()>) -> Result<Booking> {
        let mut booking = self.load(booking_id)?;
        let previous = booking.status();
        apply(&mut booking)?;
        self.repository.update(booking_id, booking.clone())?;

        tracing::info!(
            booking_id = %booking_id,
            from = %previous,
            to = %booking.status(),
            "Booking status changed"
        );
        metrics::record_booking_transition(booking.status());
        Ok(booking)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pricing::DynamicPricing;
    use crate::seating::{WindowPriority, seat_map};
    use flight_booking_core::repository::InMemoryRepository;
    use flight_booking_core::environment::Clock;
    use flight_booking_testing::{SequentialIdGenerator, test_clock};

    fn service() -> (BookingService, Arc<InMemoryRepository<BookingId, Booking>>) {
        let repository = Arc::new(InMemoryRepository::new());
        let service = BookingService::new(
            repository.clone(),
            Box::new(StandardPricing::new(Money::from_dollars(100))),
            Box::new(SequentialAllocation::new(seat_map(2, "ABC"))),
            BookingEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new("BK"))),
        );
        (service, repository)
    }

    fn passengers(n: usize) -> Vec<PassengerId> {
        (1..=n).map(|i| PassengerId::new(format!("P{i}"))).collect()
    }

    #[test]
    fn test_create_booking_allocates_and_persists() {
        let (mut service, repository) = service();
        let booking = service
            .create_booking(NewBooking::new("AA100", passengers(2)))
            .unwrap();

        assert_eq!(booking.booking_id().as_str(), "BK-0001");
        assert_eq!(booking.status(), BookingStatus::Pending);
        assert_eq!(booking.seat_numbers(), &[SeatNumber::new("1A"), SeatNumber::new("1B")]);
        assert_eq!(booking.booking_date(), test_clock().now());
        assert_eq!(repository.get(booking.booking_id()).unwrap(), Some(booking.clone()));
        assert_eq!(service.seating_strategy().available_seats().len(), 4);
    }

    #[test]
    fn test_create_booking_rejects_empty_passengers_without_allocating() {
        let (mut service, _) = service();
        assert!(matches!(
            service.create_booking(NewBooking::new("AA100", vec![])),
            Err(BookingError::Validation(_))
        ));
        assert_eq!(service.seating_strategy().available_seats().len(), 6);
    }

    #[test]
    fn test_create_booking_with_explicit_seats() {
        let (mut service, _) = service();
        let booking = service
            .create_booking(NewBooking::new("AA100", passengers(1)).with_seats(vec![SeatNumber::new("9F")]))
            .unwrap();
        assert_eq!(booking.seat_numbers(), &[SeatNumber::new("9F")]);
        assert_eq!(service.seating_strategy().available_seats().len(), 6);
    }

    #[test]
    fn test_empty_seat_list_falls_back_to_strategy() {
        let (mut service, _) = service();
        let booking = service
            .create_booking(NewBooking::new("AA100", passengers(1)).with_seats(vec![]))
            .unwrap();
        assert_eq!(booking.seat_numbers(), &[SeatNumber::new("1A")]);
        assert_eq!(service.seating_strategy().available_seats().len(), 5);
    }

    #[test]
    fn test_requested_seats_are_not_allocated_again() {
        let (mut service, _) = service();
        service
            .create_booking(NewBooking::new("AA100", passengers(1)).with_seats(vec![SeatNumber::new("1A")]))
            .unwrap();
        assert!(!service.seating_strategy().available_seats().contains(&SeatNumber::new("1A")));

        let next = service
            .create_booking(NewBooking::new("AA100", passengers(1)))
            .unwrap();
        assert_eq!(next.seat_numbers(), &[SeatNumber::new("1B")]);
    }

    #[test]
    fn test_failed_booking_returns_requested_seats() {
        let (mut service, _) = service();
        assert!(matches!(
            service.create_booking(NewBooking::new("AA100", passengers(2)).with_seats(vec![SeatNumber::new("2C")])),
            Err(BookingError::Validation(_))
        ));
        assert_eq!(service.seating_strategy().available_seats().len(), 6);
        assert!(service.seating_strategy().available_seats().contains(&SeatNumber::new("2C")));
    }

    #[test]
    fn test_zero_priced_booking_can_be_paid() {
        let (mut service, repository) = service();
        let id = service
            .create_booking(NewBooking::new("AA100", passengers(1)))
            .unwrap()
            .booking_id()
            .clone();
        service.confirm_booking(&id).unwrap();

        assert!(!service.pay_booking(&id, Money::from_cents(1)).unwrap());
        let paid = repository.get(&id).unwrap().unwrap();
        assert_eq!(paid.status(), BookingStatus::Paid);
        assert_eq!(paid.paid_amount(), Money::ZERO);
        assert_eq!(service.check_in_booking(&id).unwrap().status(), BookingStatus::CheckedIn);
    }

    #[test]
    fn test_repriced_down_to_paid_amount_can_be_paid() {
        let (mut service, repository) = service();
        let id = service
            .create_booking(NewBooking::new("AA100", passengers(1)).with_total_price(Money::from_dollars(200)))
            .unwrap()
            .booking_id()
            .clone();
        service.confirm_booking(&id).unwrap();
        assert!(service.pay_booking(&id, Money::from_dollars(100)).unwrap());

        let repriced = service.price_booking(&id, &PricingRequest::new(1, 75.0, 10)).unwrap();
        assert_eq!(repriced.total_price(), Money::from_dollars(100));
        assert_eq!(repriced.status(), BookingStatus::Confirmed);

        assert!(!service.pay_booking(&id, Money::from_cents(1)).unwrap());
        let paid = repository.get(&id).unwrap().unwrap();
        assert_eq!(paid.status(), BookingStatus::Paid);
        assert_eq!(paid.paid_amount(), Money::from_dollars(100));
        assert_eq!(service.check_in_booking(&id).unwrap().status(), BookingStatus::CheckedIn);
    }

    #[test]
    fn test_lifecycle_is_persisted_after_each_step() {
        let (mut service, repository) = service();
        let id = service
            .create_booking(NewBooking::new("AA100", passengers(1)).with_total_price(Money::from_dollars(100)))
            .unwrap()
            .booking_id()
            .clone();

        service.confirm_booking(&id).unwrap();
        assert_eq!(repository.get(&id).unwrap().unwrap().status(), BookingStatus::Confirmed);

        assert!(service.pay_booking(&id, Money::from_dollars(40)).unwrap());
        let partial = repository.get(&id).unwrap().unwrap();
        assert_eq!(partial.status(), BookingStatus::Confirmed);
        assert_eq!(partial.paid_amount(), Money::from_dollars(40));

        assert!(service.pay_booking(&id, Money::from_dollars(60)).unwrap());
        assert_eq!(repository.get(&id).unwrap().unwrap().status(), BookingStatus::Paid);

        service.check_in_booking(&id).unwrap();
        service.complete_booking(&id).unwrap();
        assert_eq!(repository.get(&id).unwrap().unwrap().status(), BookingStatus::Completed);
        assert!(service.cancel_booking(&id).is_err());
    }

    #[test]
    fn test_pay_requires_confirmed() {
        let (mut service, _) = service();
        let id = service
            .create_booking(NewBooking::new("AA100", passengers(1)).with_total_price(Money::from_dollars(100)))
            .unwrap()
            .booking_id()
            .clone();

        assert_eq!(
            service.pay_booking(&id, Money::from_dollars(100)),
            Err(BookingError::InvalidStateTransition {
                current: BookingStatus::Pending,
                action: BookingAction::Pay,
            })
        );
    }

    #[test]
    fn test_overpayment_persists_nothing() {
        let (mut service, repository) = service();
        let id = service
            .create_booking(NewBooking::new("AA100", passengers(1)).with_total_price(Money::from_dollars(100)))
            .unwrap()
            .booking_id()
            .clone();
        service.confirm_booking(&id).unwrap();

        assert!(!service.pay_booking(&id, Money::from_dollars(150)).unwrap());
        assert_eq!(repository.get(&id).unwrap().unwrap().paid_amount(), Money::ZERO);
    }

    #[test]
    fn test_unknown_booking_is_not_found() {
        let (service, _) = service();
        let missing = BookingId::new("BK-9999");
        assert_eq!(
            service.confirm_booking(&missing),
            Err(BookingError::not_found("Booking", "BK-9999"))
        );
        assert!(service.pay_booking(&missing, Money::from_dollars(1)).is_err());
        assert_eq!(service.get_booking(&missing).unwrap(), None);
    }

    #[test]
    fn test_price_booking_and_strategy_swap() {
        let (mut service, _) = service();
        let id = service
            .create_booking(NewBooking::new("AA100", passengers(2)))
            .unwrap()
            .booking_id()
            .clone();

        let request = PricingRequest::new(2, 75.0, 10);
        let priced = service.price_booking(&id, &request).unwrap();
        assert_eq!(priced.total_price(), Money::from_dollars(200));

        service.set_pricing_strategy(Box::new(DynamicPricing::new(Money::from_dollars(100))));
        assert_eq!(service.pricing_strategy().name(), "DYNAMIC");
        let repriced = service.price_booking(&id, &request).unwrap();
        assert_eq!(repriced.total_price(), Money::from_dollars(900));

        assert!(matches!(
            service.price_booking(&id, &PricingRequest::new(3, 75.0, 10)),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn test_seating_strategy_swap() {
        let (mut service, _) = service();
        service.set_seating_strategy(Box::new(WindowPriority::new(seat_map(1, "ABCDEF"))));
        let booking = service
            .create_booking(NewBooking::new("AA100", passengers(2)))
            .unwrap();
        assert_eq!(booking.seat_numbers(), &[SeatNumber::new("1A"), SeatNumber::new("1F")]);
    }

    #[test]
    fn test_passenger_bookings() {
        let (mut service, _) = service();
        service
            .create_booking(NewBooking::new("AA100", vec![PassengerId::new("P1"), PassengerId::new("P2")]))
            .unwrap();
        service
            .create_booking(NewBooking::new("AA200", vec![PassengerId::new("P2")]))
            .unwrap();

        assert_eq!(service.get_passenger_bookings(&PassengerId::new("P1")).unwrap().len(), 1);
        assert_eq!(service.get_passenger_bookings(&PassengerId::new("P2")).unwrap().len(), 2);
        assert!(service.get_passenger_bookings(&PassengerId::new("P3")).unwrap().is_empty());
    }
}
