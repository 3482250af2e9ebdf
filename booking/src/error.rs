//! Error types for the flight booking crate.

use crate::entities::booking::{BookingAction, BookingStatus};
use crate::notification::NotificationError;
use crate::payment_gateway::PaymentGatewayError;
use flight_booking_core::repository::RepositoryError;
use thiserror::Error;

/// Errors returned by entities, strategies and services.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    /// Input violated a precondition (empty name, zero seats, bad occupancy...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced entity is not stored.
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Kind of entity looked up
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// The booking lifecycle does not allow `action` from `current`.
    #[error("Cannot {action} a booking in status {current}")]
    InvalidStateTransition {
        /// Status the booking was in
        current: BookingStatus,
        /// Attempted transition
        action: BookingAction,
    },

    /// The seating pool cannot satisfy the request.
    #[error("Insufficient seats: requested {requested}, available {available}")]
    InsufficientSeats {
        /// Seats requested
        requested: usize,
        /// Seats left in the pool
        available: usize,
    },

    /// A strategy needs a parameter the request did not carry.
    #[error("Missing or invalid parameter '{name}': {reason}")]
    RequiredParameter {
        /// Parameter name
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Payment gateway failure.
    #[error(transparent)]
    Payment(#[from] PaymentGatewayError),

    /// Notification channel failure.
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl BookingError {
    /// Shorthand for [`BookingError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for [`BookingError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Result type for booking operations.
pub type Result<T> = std::result::Result<T, BookingError>;
