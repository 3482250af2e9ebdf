//! End-to-end booking lifecycle tests.
//!
//! Drives flights, bookings and payments together through the public API,
//! with a fixed clock and sequential IDs so every value is predictable.
//!
//! Run with: `cargo test --test lifecycle_test`

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use chrono::Duration;
use flight_booking::entities::BookingAction;
use flight_booking::notification::EmailNotifier;
use flight_booking::payment_gateway::{
    CreditCardGateway, CustomerDetails, PaymentDetails, PaymentGatewayError, PaymentStatus,
};
use flight_booking::pricing::{DynamicPricing, LoyaltyPricing};
use flight_booking::seating::{FamilyAllocation, SequentialAllocation, seat_map};
use flight_booking::services::FlightSearch;
use flight_booking::types::LoyaltyTier;
use flight_booking::{
    BookingEnvironment, BookingError, BookingService, BookingStatus, Flight, FlightService, Money, NewBooking,
    PassengerId, PaymentService, PricingRequest, SeatNumber,
};
use flight_booking_core::environment::Clock;
use flight_booking_core::repository::InMemoryRepository;
use flight_booking_testing::{FixedClock, SequentialIdGenerator, test_clock};
use std::sync::Arc;

struct Harness {
    clock: Arc<FixedClock>,
    flights: FlightService,
    bookings: BookingService,
}

fn harness() -> Harness {
    let clock = Arc::new(test_clock());
    let env = BookingEnvironment::new(clock.clone(), Arc::new(SequentialIdGenerator::new("BK")));

    let flights = FlightService::new(Arc::new(InMemoryRepository::new()));
    let departure = clock.now() + Duration::days(10);
    flights
        .add_flight(
            Flight::builder("AA100")
                .route("New York", "Boston")
                .schedule(departure, departure + Duration::hours(2))
                .aircraft("B737-800")
                .seats(8)
                .available_seats(4)
                .price(Money::from_dollars(100))
                .build()
                .expect("valid flight"),
        )
        .expect("flight stored");

    let bookings = BookingService::new(
        Arc::new(InMemoryRepository::new()),
        Box::new(DynamicPricing::new(Money::from_dollars(100))),
        Box::new(SequentialAllocation::new(seat_map(2, "ABCD"))),
        env,
    );

    Harness {
        clock,
        flights,
        bookings,
    }
}

fn passengers(ids: &[&str]) -> Vec<PassengerId> {
    ids.iter().copied().map(PassengerId::new).collect()
}

fn customer() -> CustomerDetails {
    CustomerDetails {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        phone: Some("+1-555-0100".to_string()),
    }
}

fn card() -> PaymentDetails {
    PaymentDetails::Card {
        card_number: "4111111111111111".to_string(),
        cvv: "123".to_string(),
        expiry_date: "12/27".to_string(),
    }
}

#[test]
fn test_search_reserve_book_price_pay_complete() {
    let mut h = harness();

    let found = h
        .flights
        .search_flights(&FlightSearch::new("NEW YORK", "boston"))
        .unwrap();
    assert_eq!(found.len(), 1);
    let flight_id = found[0].flight_number().clone();

    assert!(h.flights.reserve_seats(&flight_id, 2).unwrap());
    let flight = h.flights.get_flight(&flight_id).unwrap().unwrap();
    assert_eq!(flight.available_seats(), 2);
    assert!((flight.occupancy_rate() - 75.0).abs() < 1e-9);

    let booking = h
        .bookings
        .create_booking(NewBooking::new(flight_id.clone(), passengers(&["P1", "P2"])))
        .unwrap();
    let id = booking.booking_id().clone();
    assert_eq!(id.as_str(), "BK-0001");
    assert_eq!(booking.seat_numbers(), &[SeatNumber::new("1A"), SeatNumber::new("1B")]);

    let request = PricingRequest::for_flight(&flight, 2, h.clock.now());
    assert_eq!(request.days_until_departure, 10);
    let booking = h.bookings.price_booking(&id, &request).unwrap();
    assert_eq!(booking.total_price(), Money::from_dollars(900));

    h.bookings.confirm_booking(&id).unwrap();

    let email = Arc::new(EmailNotifier::new("smtp.example.com", 587));
    let payments = PaymentService::new(CreditCardGateway::shared("merchant-1"), "USD").with_notifier(email.clone());
    let receipt = payments
        .process_booking_payment(&booking, &customer(), card())
        .unwrap();
    assert_eq!(receipt.amount, Money::from_dollars(900));
    assert_eq!(email.notifications_sent(), 1);

    assert!(h.bookings.record_gateway_payment(&id, &receipt).unwrap());
    let paid = h.bookings.get_booking(&id).unwrap().unwrap();
    assert_eq!(paid.status(), BookingStatus::Paid);
    assert_eq!(paid.payment_reference(), Some(receipt.reference_id.as_str()));
    assert_eq!(
        payments.verify_payment(&receipt.reference_id).unwrap().status,
        PaymentStatus::Confirmed
    );

    h.bookings.check_in_booking(&id).unwrap();
    let done = h.bookings.complete_booking(&id).unwrap();
    assert_eq!(done.status(), BookingStatus::Completed);
    assert_eq!(done.remaining_balance(), Money::ZERO);
}

#[test]
fn test_partial_payments_then_cancel_and_refund() {
    let mut h = harness();
    let id = h
        .bookings
        .create_booking(NewBooking::new("AA100", passengers(&["P1"])).with_total_price(Money::from_dollars(300)))
        .unwrap()
        .booking_id()
        .clone();
    h.bookings.confirm_booking(&id).unwrap();

    assert!(h.bookings.pay_booking(&id, Money::from_dollars(100)).unwrap());
    assert!(!h.bookings.pay_booking(&id, Money::from_dollars(250)).unwrap());
    let booking = h.bookings.get_booking(&id).unwrap().unwrap();
    assert_eq!(booking.status(), BookingStatus::Confirmed);
    assert_eq!(booking.remaining_balance(), Money::from_dollars(200));

    let payments = PaymentService::new(CreditCardGateway::shared("merchant-1"), "USD");
    let receipt = payments
        .process_booking_payment(&booking, &customer(), card())
        .unwrap();
    assert_eq!(receipt.amount, Money::from_dollars(200));
    assert!(h.bookings.record_gateway_payment(&id, &receipt).unwrap());

    let cancelled = h.bookings.cancel_booking(&id).unwrap();
    assert_eq!(cancelled.status(), BookingStatus::Cancelled);
    assert_eq!(
        h.bookings.cancel_booking(&id),
        Err(BookingError::InvalidStateTransition {
            current: BookingStatus::Cancelled,
            action: BookingAction::Cancel,
        })
    );

    // Only the gateway charge is refundable against its reference
    assert_eq!(cancelled.paid_amount(), Money::from_dollars(300));
    let refund = payments
        .refund_booking_payment(&cancelled, &customer(), &receipt.reference_id, "Cancelled")
        .unwrap();
    assert_eq!(refund.refund_amount, Money::from_dollars(200));
    assert!(matches!(
        payments.refund_booking_payment(&cancelled, &customer(), &receipt.reference_id, "Cancelled"),
        Err(BookingError::Payment(PaymentGatewayError::RefundExceedsCharge { .. }))
    ));
}

#[test]
fn test_loyalty_pricing_and_family_seating() {
    let mut h = harness();
    h.bookings
        .set_pricing_strategy(Box::new(LoyaltyPricing::new(Money::from_dollars(100))));
    h.bookings
        .set_seating_strategy(Box::new(FamilyAllocation::new(["1A", "3A", "3B", "3C"])));

    let booking = h
        .bookings
        .create_booking(NewBooking::new("AA100", passengers(&["P1", "P2", "P3"])))
        .unwrap();
    assert_eq!(
        booking.seat_numbers(),
        &[SeatNumber::new("1A"), SeatNumber::new("3A"), SeatNumber::new("3B")]
    );

    let request = PricingRequest::new(3, 50.0, 30).with_loyalty_tier(LoyaltyTier::Gold);
    let priced = h.bookings.price_booking(booking.booking_id(), &request).unwrap();
    assert_eq!(priced.total_price(), Money::from_dollars(270));
}

#[test]
fn test_lead_time_follows_the_clock() {
    let h = harness();
    let flight = h
        .flights
        .get_flight(&"AA100".into())
        .unwrap()
        .unwrap();

    h.clock.advance(Duration::days(9));
    let request = PricingRequest::for_flight(&flight, 1, h.clock.now());
    assert_eq!(request.days_until_departure, 1);

    h.clock.advance(Duration::days(5));
    let request = PricingRequest::for_flight(&flight, 1, h.clock.now());
    assert_eq!(request.days_until_departure, 0);
}
