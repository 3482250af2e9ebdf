//! Payment service: charges and refunds bookings through a gateway.

use crate::entities::{Booking, BookingAction, BookingStatus};
use crate::error::{BookingError, Result};
use crate::metrics;
use crate::notification::{Channel, NotificationKind, Notifier};
use crate::payment_gateway::{
    ChargeRequest, CustomerDetails, PaymentDetails, PaymentGateway, PaymentReceipt, PaymentVerification,
    RefundReceipt,
};
use std::sync::Arc;

/// Payment service
///
/// Gateway failures are returned to the caller. Notifications are best
/// effort: a failed send is logged and the payment result stands.
pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
    notifier: Option<Arc<dyn Notifier>>,
    currency: String,
}

impl PaymentService {
    /// Create a new payment service charging in `currency`
    #[must_use]
    pub fn new(gateway: Arc<dyn PaymentGateway>, currency: impl Into<String>) -> Self {
        Self {
            gateway,
            notifier: None,
            currency: currency.into(),
        }
    }

    /// Sends payment and refund confirmations through `notifier`
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Name of the active gateway
    #[must_use]
    pub fn gateway_name(&self) -> &'static str {
        self.gateway.name()
    }

    /// Replaces the payment gateway
    pub fn set_payment_gateway(&mut self, gateway: Arc<dyn PaymentGateway>) {
        tracing::info!(from = self.gateway.name(), to = gateway.name(), "Payment gateway changed");
        self.gateway = gateway;
    }

    /// Replaces or removes the notifier
    pub fn set_notifier(&mut self, notifier: Option<Arc<dyn Notifier>>) {
        self.notifier = notifier;
    }

    /// Charges the booking's remaining balance.
    ///
    /// The receipt is not applied to the booking; pass it to
    /// [`BookingService::record_gateway_payment`](super::BookingService::record_gateway_payment).
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidStateTransition`] unless the booking is CONFIRMED
    /// - [`BookingError::Validation`] if nothing is owed
    /// - [`BookingError::Payment`] if the gateway rejects the charge
    pub fn process_booking_payment(
        &self,
        booking: &Booking,
        customer: &CustomerDetails,
        payment: PaymentDetails,
    ) -> Result<PaymentReceipt> {
        if booking.status() != BookingStatus::Confirmed {
            return Err(BookingError::InvalidStateTransition {
                current: booking.status(),
                action: BookingAction::Pay,
            });
        }
        let amount = booking.remaining_balance();
        if amount.is_zero() {
            return Err(BookingError::validation(format!(
                "Booking {} has no outstanding balance",
                booking.booking_id()
            )));
        }

        let charge = ChargeRequest {
            transaction_id: booking.booking_id().to_string(),
            amount,
            currency: self.currency.clone(),
            customer: customer.clone(),
            payment,
        };
        let receipt = self.gateway.process_payment(&charge).inspect_err(|error| {
            tracing::warn!(
                booking_id = %booking.booking_id(),
                gateway = self.gateway.name(),
                %error,
                "Payment declined"
            );
        })?;

        tracing::info!(
            booking_id = %booking.booking_id(),
            gateway = self.gateway.name(),
            reference_id = %receipt.reference_id,
            amount = amount.cents(),
            "Booking payment charged"
        );

        self.notify(
            booking,
            customer,
            "Payment Confirmation",
            &format!(
                "We received your payment of {amount} {} for booking {}. Reference: {}",
                self.currency,
                booking.booking_id(),
                receipt.reference_id
            ),
            NotificationKind::Payment,
        );
        Ok(receipt)
    }

    /// Refunds what was paid on `booking` against one gateway reference.
    ///
    /// The refund is capped at the amount that reference charged, so a
    /// booking paid in several charges is refunded one reference at a time.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if nothing was paid, or
    /// [`BookingError::Payment`] if the gateway rejects the refund.
    pub fn refund_booking_payment(
        &self,
        booking: &Booking,
        customer: &CustomerDetails,
        reference_id: &str,
        reason: &str,
    ) -> Result<RefundReceipt> {
        let paid = booking.paid_amount();
        if paid.is_zero() {
            return Err(BookingError::validation(format!(
                "Booking {} has no payment to refund",
                booking.booking_id()
            )));
        }
        let amount = self
            .gateway
            .verify_payment(reference_id)?
            .amount
            .map_or(paid, |charged| charged.min(paid));

        let refund = self.gateway.refund_payment(reference_id, amount, reason)?;
        tracing::info!(
            booking_id = %booking.booking_id(),
            gateway = self.gateway.name(),
            refund_id = %refund.refund_id,
            amount = amount.cents(),
            reason,
            "Payment refunded"
        );
        metrics::record_payment_refunded(amount.cents());

        self.notify(
            booking,
            customer,
            "Refund Processed",
            &format!(
                "A refund of {amount} {} for booking {} has been issued. Refund ID: {}",
                self.currency,
                booking.booking_id(),
                refund.refund_id
            ),
            NotificationKind::Refund,
        );
        Ok(refund)
    }

    /// Looks up a charge on the gateway.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Payment`] if the gateway fails.
    pub fn verify_payment(&self, reference_id: &str) -> Result<PaymentVerification> {
        let verification = self.gateway.verify_payment(reference_id)?;
        tracing::debug!(reference_id, status = ?verification.status, "Payment verified");
        Ok(verification)
    }

    fn notify(&self, booking: &Booking, customer: &CustomerDetails, subject: &str, message: &str, kind: NotificationKind) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let channel = notifier.channel();
        let recipient = match channel {
            Channel::Email => Some(customer.email.clone()),
            Channel::Sms => customer.phone.clone(),
            Channel::Push => Some(booking.booking_id().to_string()),
        };
        let Some(recipient) = recipient else {
            tracing::warn!(booking_id = %booking.booking_id(), %channel, "No recipient for notification");
            return;
        };

        match notifier.send_notification(&recipient, subject, message, kind) {
            Ok(receipt) => tracing::debug!(
                booking_id = %booking.booking_id(),
                notification_id = %receipt.notification_id,
                "Notification sent"
            ),
            Err(error) => tracing::warn!(
                booking_id = %booking.booking_id(),
                %channel,
                %error,
                "Notification failed"
            ),
        }
    }
}
