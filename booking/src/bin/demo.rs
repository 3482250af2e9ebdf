//! Flight Booking Demo
//!
//! Walks through the library end to end:
//! - Flight inventory and search
//! - Booking lifecycle from creation to completion
//! - Swapping pricing and seating strategies at runtime
//! - Aircraft variants behind one trait
//! - Gateway payments with notifications
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=flight_booking=debug cargo run --bin demo
//! ```

use chrono::{Duration, NaiveDate};
use flight_booking::{
    Aircraft, BookingEnvironment, BookingService, Config, Flight, FlightService, NewBooking, Passenger,
    PassengerId, PaymentService, PricingRequest,
    entities::{CargoPlane, CommercialAircraft},
    metrics::register_business_metrics,
    notification::EmailNotifier,
    payment_gateway::{CreditCardGateway, CustomerDetails, PaymentDetails},
    pricing::{DynamicPricing, LoyaltyPricing, PricingStrategy, SeasonalPricing, StandardPricing},
    seating::{FamilyAllocation, SeatingStrategy, SequentialAllocation, WindowPriority, seat_map},
    services::FlightSearch,
    types::{LoyaltyTier, PassengerType},
};
use flight_booking_core::repository::InMemoryRepository;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    register_business_metrics();

    println!("\n✈️  ============================================");
    println!("   Flight Booking - Live Demo");
    println!("============================================\n");

    let env = BookingEnvironment::from_config(&config);

    // ========== Flights ==========

    println!("📋 Adding flights...");
    let flights = FlightService::new(Arc::new(InMemoryRepository::new()));
    let departure = env.clock.now() + Duration::days(10);
    for (number, origin, destination, seats) in [
        ("AA100", "New York", "Boston", 180),
        ("AA200", "New York", "Boston", 8),
        ("UA300", "Chicago", "Denver", 150),
    ] {
        flights.add_flight(
            Flight::builder(number)
                .route(origin, destination)
                .schedule(departure, departure + Duration::hours(2))
                .aircraft("B737-800")
                .seats(seats)
                .price(config.pricing.base_price)
                .build()?,
        )?;
    }

    let found = flights.search_flights(&FlightSearch::new("new york", "boston").with_min_available_seats(2))?;
    println!("   Found {} flights New York -> Boston:", found.len());
    for flight in &found {
        println!("   • {} ({} seats free)", flight.departure_info(), flight.available_seats());
    }
    let flight = found
        .into_iter()
        .next()
        .ok_or("no flight matched the search")?;

    // ========== Passengers ==========

    println!("\n👤 Registering passengers...");
    let alice = Passenger::new(
        "P001",
        "Alice",
        "Smith",
        "alice@example.com",
        "+1-555-0100",
        NaiveDate::from_ymd_opt(1985, 4, 12).ok_or("invalid date")?,
    )?
    .with_loyalty_number("GOLD-1234");
    let ben = Passenger::new(
        "P002",
        "Ben",
        "Smith",
        "ben@example.com",
        "+1-555-0101",
        NaiveDate::from_ymd_opt(2016, 9, 3).ok_or("invalid date")?,
    )?
    .with_type(PassengerType::Child);
    for passenger in [&alice, &ben] {
        println!("   • {} ({})", passenger.full_name(), passenger.passenger_type());
    }

    // ========== Booking ==========

    println!("\n🎫 Creating booking on {}...", flight.flight_number());
    let mut bookings = BookingService::new(
        Arc::new(InMemoryRepository::new()),
        Box::new(DynamicPricing::new(config.pricing.base_price)),
        Box::new(WindowPriority::new(seat_map(30, "ABCDEF"))),
        env.clone(),
    );

    let passenger_ids: Vec<PassengerId> = vec![alice.passenger_id().clone(), ben.passenger_id().clone()];
    let seats_needed = u32::try_from(passenger_ids.len())?;
    if !flights.reserve_seats(flight.flight_number(), seats_needed)? {
        return Err("flight sold out".into());
    }
    let booking = bookings.create_booking(NewBooking::new(flight.flight_number().clone(), passenger_ids))?;
    println!(
        "   ✓ Booking {} created, seats {:?}",
        booking.booking_id(),
        booking.seat_numbers()
    );

    let flight = flights
        .get_flight(flight.flight_number())?
        .ok_or("flight disappeared")?;
    let request = PricingRequest::for_flight(&flight, seats_needed, env.clock.now());
    let booking = bookings.price_booking(booking.booking_id(), &request)?;
    println!(
        "   ✓ Priced with {}: {}",
        bookings.pricing_strategy().name(),
        booking.total_price()
    );

    let booking = bookings.confirm_booking(booking.booking_id())?;
    println!("   ✓ Status: {}", booking.status());

    // ========== Payment ==========

    println!("\n💳 Processing payment...");
    let email = Arc::new(EmailNotifier::new(
        config.notifications.smtp_server.clone(),
        config.notifications.smtp_port,
    ));
    let payments = PaymentService::new(CreditCardGateway::shared("demo-merchant"), config.pricing.currency.clone())
        .with_notifier(email.clone());
    let customer = CustomerDetails {
        name: alice.full_name(),
        email: alice.email().to_string(),
        phone: Some(alice.phone().to_string()),
    };
    let receipt = payments.process_booking_payment(
        &booking,
        &customer,
        PaymentDetails::Card {
            card_number: "4111111111111111".to_string(),
            cvv: "123".to_string(),
            expiry_date: "12/28".to_string(),
        },
    )?;
    bookings.record_gateway_payment(booking.booking_id(), &receipt)?;
    println!(
        "   ✓ Charged {} via {} (ref {}), {} email(s) sent",
        receipt.amount,
        payments.gateway_name(),
        receipt.reference_id,
        email.notifications_sent()
    );

    bookings.check_in_booking(booking.booking_id())?;
    let booking = bookings.complete_booking(booking.booking_id())?;
    println!("   ✓ Final status: {}", booking.status());
    println!("   {}", serde_json::to_string(&booking.summary())?);

    // ========== Strategy Comparison ==========

    println!("\n💰 Pricing strategies for 2 passengers, 75% full, 10 days out, July:");
    let request = PricingRequest::new(2, 75.0, 10)
        .with_departure_month(7)
        .with_loyalty_tier(LoyaltyTier::Gold);
    let strategies: Vec<Box<dyn PricingStrategy>> = vec![
        Box::new(StandardPricing::new(config.pricing.base_price)),
        Box::new(DynamicPricing::new(config.pricing.base_price)),
        Box::new(SeasonalPricing::new(config.pricing.base_price)),
        Box::new(LoyaltyPricing::new(config.pricing.base_price)),
    ];
    for strategy in strategies {
        let name = strategy.name();
        bookings.set_pricing_strategy(strategy);
        println!(
            "   • {name:<10} {} total",
            bookings.calculate_booking_price(&request)?
        );
    }

    println!("\n💺 Seating strategies for 3 passengers:");
    let seating: Vec<Box<dyn SeatingStrategy>> = vec![
        Box::new(SequentialAllocation::new(seat_map(4, "ABCDEF"))),
        Box::new(WindowPriority::new(seat_map(4, "ABCDEF"))),
        Box::new(FamilyAllocation::new(["1A", "2A", "2B", "2C", "3A"])),
    ];
    for mut strategy in seating {
        let seats = strategy.allocate_seats(3)?;
        println!("   • {:<16} {seats:?}", strategy.name());
    }

    // ========== Aircraft ==========

    println!("\n🛩️  Fleet:");
    let mut cargo = CargoPlane::new("C-001", "777F", "Boeing", 0, 102_000.0)?;
    cargo.add_cargo(40_000.0)?;
    let fleet: Vec<Box<dyn Aircraft>> = vec![
        Box::new(CommercialAircraft::new("N-001", "A320", "Airbus", 180, (12, 24, 144))?),
        Box::new(cargo),
    ];
    for aircraft in &fleet {
        let info = aircraft.info();
        println!(
            "   • {} {} {}: {} seats, classes {:?}, luggage {} kg",
            info.aircraft_id, info.manufacturer, info.model, info.total_seats, info.seat_classes, info.luggage_allowance_kg
        );
    }

    // ========== Occupancy ==========

    println!("\n📊 Occupancy:");
    for line in flights.occupancy_report()? {
        println!(
            "   • {}: {}/{} sold ({:.1}%)",
            line.flight_number,
            line.total_seats - line.available_seats,
            line.total_seats,
            line.occupancy_rate
        );
    }

    println!("\n✅ Demo complete\n");
    Ok(())
}
