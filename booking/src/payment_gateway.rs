//! Simulated payment gateways.
//!
//! The [`PaymentGateway`] trait is the seam between booking services and a
//! payment processor. The simulators here never talk to a network and never
//! fail at random: they validate the payment details for their method, keep
//! an in-memory ledger of charges, and log what a real processor would do.

use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Payment gateway result
pub type GatewayResult<T> = Result<T, PaymentGatewayError>;

/// Payment gateway error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentGatewayError {
    /// Zero charge or refund amount
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Payment details missing, malformed, or for another gateway
    #[error("Invalid payment method for {gateway}: {reason}")]
    InvalidPaymentMethod {
        /// Gateway that rejected the details
        gateway: &'static str,
        /// Rejection reason
        reason: String,
    },

    /// No charge with this reference in the ledger
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Refunds would exceed what was charged
    #[error("Refund of {requested} exceeds refundable amount {refundable} for {reference_id}")]
    RefundExceedsCharge {
        /// Original charge reference
        reference_id: String,
        /// Refund requested
        requested: Money,
        /// Charged minus already refunded
        refundable: Money,
    },

    /// Other error
    #[error("Payment error: {message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Customer paying for a booking
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: Option<String>,
}

/// Method-specific payment details
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentDetails {
    /// Raw card details, for [`CreditCardGateway`]
    Card {
        /// Primary account number
        card_number: String,
        /// Card verification value
        cvv: String,
        /// Expiry, e.g. `12/27`
        expiry_date: String,
    },
    /// Tokenized card, for [`StripeGateway`]
    CardToken {
        /// Token issued by the processor
        token: String,
    },
    /// `PayPal` account, for [`PayPalGateway`]
    PayPal {
        /// Account email
        account: String,
    },
}

impl std::fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card { card_number, .. } => f
                .debug_struct("Card")
                .field("last_four", &last_four(card_number))
                .finish_non_exhaustive(),
            Self::CardToken { .. } => f.debug_struct("CardToken").finish_non_exhaustive(),
            Self::PayPal { account } => f.debug_struct("PayPal").field("account", account).finish(),
        }
    }
}

/// A charge to be processed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChargeRequest {
    /// Caller's transaction identifier (the booking ID)
    pub transaction_id: String,
    /// Amount to charge
    pub amount: Money,
    /// ISO currency code
    pub currency: String,
    /// Who is paying
    pub customer: CustomerDetails,
    /// How they are paying
    pub payment: PaymentDetails,
}

/// Outcome status reported by a gateway
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Charge or refund went through
    Success,
    /// Verified charge on record
    Confirmed,
    /// Unknown reference
    NotFound,
}

/// Result of a successful charge
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Always [`PaymentStatus::Success`]
    pub status: PaymentStatus,
    /// Gateway reference, e.g. `CC-1A2B3C4D5E6F7A8B`
    pub reference_id: String,
    /// Caller's transaction identifier
    pub transaction_id: String,
    /// Amount charged
    pub amount: Money,
    /// ISO currency code
    pub currency: String,
    /// Gateway name
    pub gateway: String,
    /// Last four card digits, for card payments
    pub last_four_digits: Option<String>,
}

/// Result of a successful refund
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundReceipt {
    /// Always [`PaymentStatus::Success`]
    pub status: PaymentStatus,
    /// Refund reference, e.g. `REFUND-1A2B3C4D5E6F7A8B`
    pub refund_id: String,
    /// Reference of the refunded charge
    pub original_reference: String,
    /// Amount refunded
    pub refund_amount: Money,
    /// Why the money was returned
    pub reason: String,
    /// Gateway name
    pub gateway: String,
}

/// Result of a verification lookup
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentVerification {
    /// [`PaymentStatus::Confirmed`] or [`PaymentStatus::NotFound`]
    pub status: PaymentStatus,
    /// Reference looked up
    pub reference_id: String,
    /// Amount charged, when found
    pub amount: Option<Money>,
    /// Currency, when found
    pub currency: Option<String>,
}

/// Payment gateway trait
///
/// Abstraction over payment processors like Stripe, `PayPal` or a direct
/// card acquirer.
pub trait PaymentGateway: Send + Sync {
    /// Charge the customer.
    ///
    /// # Errors
    ///
    /// Returns error if the amount is zero or the payment details are invalid
    /// for this gateway.
    fn process_payment(&self, charge: &ChargeRequest) -> GatewayResult<PaymentReceipt>;

    /// Refund part or all of an earlier charge.
    ///
    /// # Errors
    ///
    /// Returns error if the reference is unknown, the amount is zero, or the
    /// total refunded would exceed the charge.
    fn refund_payment(&self, reference_id: &str, amount: Money, reason: &str) -> GatewayResult<RefundReceipt>;

    /// Look up a charge. Unknown references verify as `NOT_FOUND`.
    ///
    /// # Errors
    ///
    /// Returns error only if the ledger is unavailable.
    fn verify_payment(&self, reference_id: &str) -> GatewayResult<PaymentVerification>;

    /// Gateway name, e.g. `STRIPE`
    fn name(&self) -> &'static str;
}

fn last_four(card_number: &str) -> &str {
    card_number.get(card_number.len().saturating_sub(4)..).unwrap_or_default()
}

fn new_reference(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", uuid[..16].to_uppercase())
}

#[derive(Clone, Debug)]
struct LedgerEntry {
    receipt: PaymentReceipt,
    refunded: Money,
}

/// In-memory record of charges and refunds for one gateway.
#[derive(Debug, Default)]
struct TransactionLedger {
    entries: RwLock<HashMap<String, LedgerEntry>>,
}

fn ledger_unavailable<T>(err: std::sync::PoisonError<T>) -> PaymentGatewayError {
    PaymentGatewayError::Other {
        message: format!("transaction ledger unavailable: {err}"),
    }
}

impl TransactionLedger {
    fn charge(
        &self,
        gateway: &'static str,
        prefix: &str,
        charge: &ChargeRequest,
        last_four_digits: Option<String>,
    ) -> GatewayResult<PaymentReceipt> {
        let receipt = PaymentReceipt {
            status: PaymentStatus::Success,
            reference_id: new_reference(prefix),
            transaction_id: charge.transaction_id.clone(),
            amount: charge.amount,
            currency: charge.currency.clone(),
            gateway: gateway.to_string(),
            last_four_digits,
        };
        self.entries.write().map_err(ledger_unavailable)?.insert(
            receipt.reference_id.clone(),
            LedgerEntry {
                receipt: receipt.clone(),
                refunded: Money::ZERO,
            },
        );

        tracing::info!(
            gateway,
            transaction_id = %receipt.transaction_id,
            reference_id = %receipt.reference_id,
            amount = receipt.amount.cents(),
            currency = %receipt.currency,
            "Payment processed"
        );
        Ok(receipt)
    }

    fn refund(
        &self,
        gateway: &'static str,
        reference_id: &str,
        amount: Money,
        reason: &str,
    ) -> GatewayResult<RefundReceipt> {
        let mut entries = self.entries.write().map_err(ledger_unavailable)?;
        let entry = entries
            .get_mut(reference_id)
            .ok_or_else(|| PaymentGatewayError::TransactionNotFound(reference_id.to_string()))?;
        if amount.is_zero() {
            return Err(PaymentGatewayError::NonPositiveAmount);
        }
        let refundable = entry.receipt.amount.saturating_sub(entry.refunded);
        if amount > refundable {
            return Err(PaymentGatewayError::RefundExceedsCharge {
                reference_id: reference_id.to_string(),
                requested: amount,
                refundable,
            });
        }
        entry.refunded = entry.refunded.checked_add(amount).unwrap_or(entry.receipt.amount);

        let receipt = RefundReceipt {
            status: PaymentStatus::Success,
            refund_id: new_reference("REFUND"),
            original_reference: reference_id.to_string(),
            refund_amount: amount,
            reason: reason.to_string(),
            gateway: gateway.to_string(),
        };
        tracing::info!(
            gateway,
            reference_id,
            refund_id = %receipt.refund_id,
            amount = amount.cents(),
            reason,
            "Refund processed"
        );
        Ok(receipt)
    }

    fn verify(&self, reference_id: &str) -> GatewayResult<PaymentVerification> {
        let entries = self.entries.read().map_err(ledger_unavailable)?;
        let verification = entries.get(reference_id).map_or_else(
            || PaymentVerification {
                status: PaymentStatus::NotFound,
                reference_id: reference_id.to_string(),
                amount: None,
                currency: None,
            },
            |entry| PaymentVerification {
                status: PaymentStatus::Confirmed,
                reference_id: reference_id.to_string(),
                amount: Some(entry.receipt.amount),
                currency: Some(entry.receipt.currency.clone()),
            },
        );
        Ok(verification)
    }
}

fn ensure_positive(amount: Money) -> GatewayResult<()> {
    if amount.is_zero() {
        Err(PaymentGatewayError::NonPositiveAmount)
    } else {
        Ok(())
    }
}

fn wrong_method(gateway: &'static str, expected: &str) -> PaymentGatewayError {
    PaymentGatewayError::InvalidPaymentMethod {
        gateway,
        reason: format!("{expected} is required"),
    }
}

// ============================================================================
// Credit Card
// ============================================================================

/// Direct card acquiring.
///
/// Accepts [`PaymentDetails::Card`] with a 13-19 digit card number, a 3-4
/// digit CVV and an expiry date.
#[derive(Debug, Default)]
pub struct CreditCardGateway {
    merchant_id: String,
    ledger: TransactionLedger,
}

impl CreditCardGateway {
    const NAME: &'static str = "CREDIT_CARD";

    /// Creates a gateway for `merchant_id`
    #[must_use]
    pub fn new(merchant_id: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            ledger: TransactionLedger::default(),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(merchant_id: impl Into<String>) -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new(merchant_id))
    }

    /// Merchant account the gateway charges into
    #[must_use]
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    fn validate_card(card_number: &str, cvv: &str, expiry_date: &str) -> GatewayResult<()> {
        let invalid = |reason: &str| PaymentGatewayError::InvalidPaymentMethod {
            gateway: Self::NAME,
            reason: reason.to_string(),
        };
        if !card_number.chars().all(|c| c.is_ascii_digit()) || !(13..=19).contains(&card_number.len()) {
            return Err(invalid("card number must be 13-19 digits"));
        }
        if !cvv.chars().all(|c| c.is_ascii_digit()) || !(3..=4).contains(&cvv.len()) {
            return Err(invalid("CVV must be 3 or 4 digits"));
        }
        if expiry_date.trim().is_empty() {
            return Err(invalid("expiry date is required"));
        }
        Ok(())
    }
}

impl PaymentGateway for CreditCardGateway {
    fn process_payment(&self, charge: &ChargeRequest) -> GatewayResult<PaymentReceipt> {
        ensure_positive(charge.amount)?;
        let PaymentDetails::Card {
            card_number,
            cvv,
            expiry_date,
        } = &charge.payment
        else {
            return Err(wrong_method(Self::NAME, "card number, CVV and expiry date"));
        };
        Self::validate_card(card_number, cvv, expiry_date)?;
        self.ledger
            .charge(Self::NAME, "CC", charge, Some(last_four(card_number).to_string()))
    }

    fn refund_payment(&self, reference_id: &str, amount: Money, reason: &str) -> GatewayResult<RefundReceipt> {
        self.ledger.refund(Self::NAME, reference_id, amount, reason)
    }

    fn verify_payment(&self, reference_id: &str) -> GatewayResult<PaymentVerification> {
        self.ledger.verify(reference_id)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

// ============================================================================
// Stripe
// ============================================================================

/// Stripe-style processor taking tokenized cards ([`PaymentDetails::CardToken`]).
#[derive(Debug, Default)]
pub struct StripeGateway {
    api_key: String,
    ledger: TransactionLedger,
}

impl StripeGateway {
    const NAME: &'static str = "STRIPE";

    /// Creates a gateway authenticated with `api_key`
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ledger: TransactionLedger::default(),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(api_key: impl Into<String>) -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new(api_key))
    }

    /// True when an API key was supplied
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl PaymentGateway for StripeGateway {
    fn process_payment(&self, charge: &ChargeRequest) -> GatewayResult<PaymentReceipt> {
        ensure_positive(charge.amount)?;
        match &charge.payment {
            PaymentDetails::CardToken { token } if !token.trim().is_empty() => {
                self.ledger.charge(Self::NAME, "STRIPE", charge, None)
            },
            _ => Err(wrong_method(Self::NAME, "card token")),
        }
    }

    fn refund_payment(&self, reference_id: &str, amount: Money, reason: &str) -> GatewayResult<RefundReceipt> {
        self.ledger.refund(Self::NAME, reference_id, amount, reason)
    }

    fn verify_payment(&self, reference_id: &str) -> GatewayResult<PaymentVerification> {
        self.ledger.verify(reference_id)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

// ============================================================================
// PayPal
// ============================================================================

/// `PayPal` wallet payments ([`PaymentDetails::PayPal`]).
#[derive(Debug, Default)]
pub struct PayPalGateway {
    client_id: String,
    ledger: TransactionLedger,
}

impl PayPalGateway {
    const NAME: &'static str = "PAYPAL";

    /// Creates a gateway for the `PayPal` app `client_id`
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ledger: TransactionLedger::default(),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(client_id: impl Into<String>) -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new(client_id))
    }

    /// `PayPal` app client ID
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl PaymentGateway for PayPalGateway {
    fn process_payment(&self, charge: &ChargeRequest) -> GatewayResult<PaymentReceipt> {
        ensure_positive(charge.amount)?;
        match &charge.payment {
            PaymentDetails::PayPal { account } if !account.trim().is_empty() => {
                self.ledger.charge(Self::NAME, "PAYPAL", charge, None)
            },
            _ => Err(wrong_method(Self::NAME, "PayPal account")),
        }
    }

    fn refund_payment(&self, reference_id: &str, amount: Money, reason: &str) -> GatewayResult<RefundReceipt> {
        self.ledger.refund(Self::NAME, reference_id, amount, reason)
    }

    fn verify_payment(&self, reference_id: &str) -> GatewayResult<PaymentVerification> {
        self.ledger.verify(reference_id)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
        }
    }

    fn charge(amount: Money, payment: PaymentDetails) -> ChargeRequest {
        ChargeRequest {
            transaction_id: "BK-0001".to_string(),
            amount,
            currency: "USD".to_string(),
            customer: customer(),
            payment,
        }
    }

    fn card() -> PaymentDetails {
        PaymentDetails::Card {
            card_number: "4242424242424242".to_string(),
            cvv: "123".to_string(),
            expiry_date: "12/27".to_string(),
        }
    }

    #[test]
    fn test_card_payment_success() {
        let gateway = CreditCardGateway::new("merchant-1");
        let receipt = gateway
            .process_payment(&charge(Money::from_dollars(100), card()))
            .unwrap();

        assert_eq!(receipt.status, PaymentStatus::Success);
        assert!(receipt.reference_id.starts_with("CC-"));
        assert_eq!(receipt.reference_id.len(), "CC-".len() + 16);
        assert_eq!(receipt.last_four_digits.as_deref(), Some("4242"));
        assert_eq!(receipt.gateway, "CREDIT_CARD");
    }

    #[test]
    fn test_card_validation() {
        let gateway = CreditCardGateway::default();
        let short = PaymentDetails::Card {
            card_number: "4242".to_string(),
            cvv: "123".to_string(),
            expiry_date: "12/27".to_string(),
        };
        assert!(matches!(
            gateway.process_payment(&charge(Money::from_dollars(1), short)),
            Err(PaymentGatewayError::InvalidPaymentMethod { .. })
        ));
        assert_eq!(
            gateway.process_payment(&charge(Money::ZERO, card())),
            Err(PaymentGatewayError::NonPositiveAmount)
        );
        assert!(
            gateway
                .process_payment(&charge(
                    Money::from_dollars(1),
                    PaymentDetails::PayPal {
                        account: "a@b".to_string()
                    }
                ))
                .is_err()
        );
    }

    #[test]
    fn test_gateways_require_their_own_method() {
        let stripe = StripeGateway::new("sk_test");
        let paypal = PayPalGateway::new("client");
        let token = PaymentDetails::CardToken {
            token: "tok_visa".to_string(),
        };
        let account = PaymentDetails::PayPal {
            account: "ada@example.com".to_string(),
        };

        assert!(stripe.process_payment(&charge(Money::from_dollars(5), token.clone())).is_ok());
        assert!(stripe.process_payment(&charge(Money::from_dollars(5), account.clone())).is_err());
        assert!(paypal.process_payment(&charge(Money::from_dollars(5), account)).is_ok());
        assert!(paypal.process_payment(&charge(Money::from_dollars(5), token)).is_err());
    }

    #[test]
    fn test_refunds_are_capped_by_charge() {
        let gateway = StripeGateway::new("sk_test");
        let receipt = gateway
            .process_payment(&charge(
                Money::from_dollars(100),
                PaymentDetails::CardToken {
                    token: "tok_visa".to_string(),
                },
            ))
            .unwrap();

        let refund = gateway
            .refund_payment(&receipt.reference_id, Money::from_dollars(60), "Customer request")
            .unwrap();
        assert!(refund.refund_id.starts_with("REFUND-"));
        assert_eq!(refund.original_reference, receipt.reference_id);

        assert!(matches!(
            gateway.refund_payment(&receipt.reference_id, Money::from_dollars(50), "again"),
            Err(PaymentGatewayError::RefundExceedsCharge { .. })
        ));
        assert!(matches!(
            gateway.refund_payment("STRIPE-UNKNOWN", Money::from_dollars(1), "x"),
            Err(PaymentGatewayError::TransactionNotFound(_))
        ));
    }

    #[test]
    fn test_verify() {
        let gateway = PayPalGateway::new("client");
        let receipt = gateway
            .process_payment(&charge(
                Money::from_dollars(20),
                PaymentDetails::PayPal {
                    account: "ada@example.com".to_string(),
                },
            ))
            .unwrap();

        let found = gateway.verify_payment(&receipt.reference_id).unwrap();
        assert_eq!(found.status, PaymentStatus::Confirmed);
        assert_eq!(found.amount, Some(Money::from_dollars(20)));

        let missing = gateway.verify_payment("PAYPAL-NOPE").unwrap();
        assert_eq!(missing.status, PaymentStatus::NotFound);
        assert_eq!(missing.amount, None);
    }

    #[test]
    fn test_debug_hides_card_secrets() {
        let rendered = format!("{:?}", card());
        assert!(rendered.contains("4242"));
        assert!(!rendered.contains("4242424242424242"));
        assert!(!rendered.contains("123"));
    }
}
