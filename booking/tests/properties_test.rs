//! Property-based tests for seat allocation, pricing and flight inventory.
//!
//! Run with: `cargo test --test properties_test`

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use chrono::{Duration, TimeZone, Utc};
use flight_booking::pricing::{DynamicPricing, LoyaltyPricing, SeasonalPricing, StandardPricing};
use flight_booking::seating::{FamilyAllocation, SequentialAllocation, WindowPriority};
use flight_booking::types::{LoyaltyTier, PassengerType};
use flight_booking::{BookingError, Flight, Money, PricingRequest, PricingStrategy, SeatNumber, SeatingStrategy};
use flight_booking_testing::properties::seat_pool_and_request;
use proptest::prelude::*;
use std::collections::HashSet;

fn strategies(pool: &[String]) -> Vec<Box<dyn SeatingStrategy>> {
    vec![
        Box::new(SequentialAllocation::new(pool.iter().cloned())),
        Box::new(WindowPriority::new(pool.iter().cloned())),
        Box::new(FamilyAllocation::new(pool.iter().cloned())),
    ]
}

fn passenger_type() -> impl Strategy<Value = PassengerType> {
    prop_oneof![
        Just(PassengerType::Adult),
        Just(PassengerType::Child),
        Just(PassengerType::Infant),
    ]
}

fn loyalty_tier() -> impl Strategy<Value = Option<LoyaltyTier>> {
    prop_oneof![
        Just(None),
        Just(Some(LoyaltyTier::Bronze)),
        Just(Some(LoyaltyTier::Silver)),
        Just(Some(LoyaltyTier::Gold)),
        Just(Some(LoyaltyTier::Platinum)),
    ]
}

proptest! {
    /// Property: allocated seats come from the pool, are distinct, and leave it
    #[test]
    fn allocation_hands_out_each_seat_at_most_once((pool, requested) in seat_pool_and_request(5)) {
        for mut strategy in strategies(&pool) {
            let before: Vec<SeatNumber> = strategy.available_seats().to_vec();

            match strategy.allocate_seats(requested) {
                Ok(seats) => {
                    prop_assert!(requested > 0 && requested <= pool.len());
                    prop_assert_eq!(seats.len(), requested);

                    let distinct: HashSet<&SeatNumber> = seats.iter().collect();
                    prop_assert_eq!(distinct.len(), requested, "{} repeated a seat", strategy.name());
                    prop_assert!(seats.iter().all(|seat| before.contains(seat)));

                    let after = strategy.available_seats();
                    prop_assert_eq!(after.len(), before.len() - requested);
                    prop_assert!(seats.iter().all(|seat| !after.contains(seat)));
                },
                Err(BookingError::InsufficientSeats { requested: r, available }) => {
                    prop_assert!(requested == 0 || requested > pool.len());
                    prop_assert_eq!(r, requested);
                    prop_assert_eq!(available, pool.len());
                    prop_assert_eq!(strategy.available_seats(), before.as_slice());
                },
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }
        }
    }

    /// Property: draining the pool in chunks never yields a seat twice
    #[test]
    fn repeated_allocation_drains_pool((pool, chunk) in seat_pool_and_request(4)) {
        let chunk = chunk.max(1);
        for mut strategy in strategies(&pool) {
            let mut seen = HashSet::new();
            while let Ok(seats) = strategy.allocate_seats(chunk) {
                for seat in seats {
                    prop_assert!(seen.insert(seat));
                }
            }
            prop_assert_eq!(seen.len() + strategy.available_seats().len(), pool.len());
            prop_assert!(strategy.available_seats().len() < chunk);
        }
    }

    /// Property: window priority takes every window seat it can before any aisle seat
    #[test]
    fn window_priority_prefers_windows((pool, requested) in seat_pool_and_request(5)) {
        prop_assume!(requested > 0 && requested <= pool.len());
        let windows = pool.iter().filter(|label| SeatNumber::new(label.as_str()).is_window()).count();

        let mut strategy = WindowPriority::new(pool.iter().cloned());
        let seats = strategy.allocate_seats(requested).unwrap();
        let chosen_windows = seats.iter().filter(|seat| seat.is_window()).count();
        prop_assert_eq!(chosen_windows, requested.min(windows));
    }

    /// Property: released seats can be allocated again
    #[test]
    fn release_restores_pool((pool, requested) in seat_pool_and_request(4)) {
        prop_assume!(requested > 0 && requested <= pool.len());
        let mut strategy = SequentialAllocation::new(pool.iter().cloned());
        let seats = strategy.allocate_seats(requested).unwrap();
        strategy.release_seats(&seats);
        strategy.release_seats(&seats);
        prop_assert_eq!(strategy.available_seats().len(), pool.len());
    }

    /// Property: valid requests price without error for every strategy
    #[test]
    fn valid_requests_always_price(
        passengers in 1u32..10,
        occupancy in 0.0f64..=100.0,
        days in 0i64..400,
        month in 1u32..=12,
        kind in passenger_type(),
        tier in loyalty_tier(),
        base in 0u64..100_000,
    ) {
        let mut request = PricingRequest::new(passengers, occupancy, days)
            .with_passenger_type(kind)
            .with_departure_month(month);
        request.loyalty_tier = tier;
        let base = Money::from_cents(base);

        let strategies: [Box<dyn PricingStrategy>; 4] = [
            Box::new(StandardPricing::new(base)),
            Box::new(DynamicPricing::new(base)),
            Box::new(SeasonalPricing::new(base)),
            Box::new(LoyaltyPricing::new(base)),
        ];
        for strategy in &strategies {
            prop_assert!(strategy.calculate_price(&request).is_ok(), "{} failed", strategy.name());
        }
    }

    /// Property: out-of-range inputs are rejected by every strategy
    #[test]
    fn invalid_requests_are_rejected(
        occupancy in prop_oneof![-1000.0f64..-0.001, 100.001f64..1000.0],
        days in -400i64..0,
    ) {
        let strategies: [Box<dyn PricingStrategy>; 4] = [
            Box::new(StandardPricing::new(Money::from_dollars(100))),
            Box::new(DynamicPricing::new(Money::from_dollars(100))),
            Box::new(SeasonalPricing::new(Money::from_dollars(100))),
            Box::new(LoyaltyPricing::new(Money::from_dollars(100))),
        ];
        for request in [
            PricingRequest::new(0, 50.0, 10).with_departure_month(6),
            PricingRequest::new(1, occupancy, 10).with_departure_month(6),
            PricingRequest::new(1, 50.0, days).with_departure_month(6),
        ] {
            for strategy in &strategies {
                prop_assert!(matches!(strategy.calculate_price(&request), Err(BookingError::Validation(_))));
            }
        }
    }

    /// Property: dynamic fares never drop as the flight fills up
    #[test]
    fn dynamic_price_grows_with_occupancy(low in 0.0f64..=100.0, high in 0.0f64..=100.0, days in 0i64..365) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let strategy = DynamicPricing::new(Money::from_dollars(100));
        let cheap = strategy.calculate_price(&PricingRequest::new(1, low, days)).unwrap();
        let dear = strategy.calculate_price(&PricingRequest::new(1, high, days)).unwrap();
        prop_assert!(cheap <= dear);
    }

    /// Property: reserving then releasing the same seats restores inventory
    #[test]
    fn reserve_then_cancel_round_trips(total in 1u32..500, seats in 1u32..600) {
        let departure = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let mut flight = Flight::builder("AA100")
            .route("New York", "Boston")
            .schedule(departure, departure + Duration::hours(2))
            .aircraft("B737-800")
            .seats(total)
            .price(Money::from_dollars(100))
            .build()
            .unwrap();

        let reserved = flight.reserve_seat(seats).unwrap();
        prop_assert_eq!(reserved, seats <= total);
        if reserved {
            prop_assert_eq!(flight.available_seats(), total - seats);
            prop_assert!(flight.cancel_reservation(seats).unwrap());
        } else {
            prop_assert!(!flight.cancel_reservation(seats).unwrap());
        }
        prop_assert_eq!(flight.available_seats(), total);
        prop_assert!(flight.occupancy_rate().abs() < f64::EPSILON);
    }
}
