//! Business metrics for the flight booking library.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `flight_booking_bookings_total{status}` - Booking lifecycle transitions (created, confirmed, paid, checked_in, completed, cancelled)
//! - `flight_booking_payments_total{status}` - Payments by status (succeeded, refunded)
//! - `flight_booking_payment_revenue_cents_total` - Total revenue in cents
//! - `flight_booking_seat_reservations_total{outcome}` - Flight seat reservations (reserved, released, rejected)
//!
//! Without an installed recorder every call is a no-op.

use crate::entities::BookingStatus;
use metrics::describe_counter;

/// Initialize and register all business metrics descriptions.
///
/// This should be called once at application startup, before any metrics are recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "flight_booking_bookings_total",
        "Booking lifecycle transitions by resulting status"
    );
    describe_counter!(
        "flight_booking_payments_total",
        "Total number of payments by status (succeeded, refunded)"
    );
    describe_counter!(
        "flight_booking_payment_revenue_cents_total",
        "Total revenue from successful payments in cents"
    );
    describe_counter!(
        "flight_booking_seat_reservations_total",
        "Flight seat reservations by outcome (reserved, released, rejected)"
    );

    tracing::info!("Business metrics registered");
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a newly created booking.
pub fn record_booking_created() {
    metrics::counter!("flight_booking_bookings_total", "status" => "created").increment(1);
    tracing::debug!("Recorded booking_created metric");
}

/// Record a booking entering `status`.
pub fn record_booking_transition(status: BookingStatus) {
    let status = status.as_str().to_ascii_lowercase();
    tracing::debug!(%status, "Recorded booking transition metric");
    metrics::counter!("flight_booking_bookings_total", "status" => status).increment(1);
}

/// Record a payment succeeded event.
///
/// # Arguments
///
/// * `amount_cents` - Payment amount in cents
pub fn record_payment_succeeded(amount_cents: u64) {
    metrics::counter!("flight_booking_payments_total", "status" => "succeeded").increment(1);
    metrics::counter!("flight_booking_payment_revenue_cents_total").increment(amount_cents);
    tracing::debug!(amount_cents, "Recorded payment_succeeded metric");
}

/// Record a payment refunded event.
pub fn record_payment_refunded(amount_cents: u64) {
    metrics::counter!("flight_booking_payments_total", "status" => "refunded").increment(1);
    tracing::debug!(amount_cents, "Recorded payment_refunded metric");
}

/// Record the outcome of a seat reservation or release on a flight.
///
/// # Arguments
///
/// * `outcome` - `reserved`, `released` or `rejected`
/// * `seats` - Seats involved
pub fn record_seat_reservation(outcome: &'static str, seats: u32) {
    metrics::counter!("flight_booking_seat_reservations_total", "outcome" => outcome)
        .increment(u64::from(seats));
    tracing::debug!(outcome, seats, "Recorded seat_reservation metric");
}
