//! Configuration management for the flight booking library.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unset or unparseable variables fall back to the default.

use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Library configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Pricing configuration
    pub pricing: PricingConfig,
    /// Booking configuration
    pub booking: BookingConfig,
    /// Notification channel configuration
    pub notifications: NotificationConfig,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Base fare every strategy starts from
    pub base_price: Money,
    /// ISO currency code for charges
    pub currency: String,
    /// Occupancy assumed when a flight is not at hand (percent)
    pub default_occupancy_rate: f64,
    /// Lead time assumed when a flight is not at hand (days)
    pub default_days_until_departure: i64,
}

/// Booking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Prefix of generated booking IDs (`BK` gives `BK-1A2B3C4D`)
    pub id_prefix: String,
}

/// Notification channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// SMTP relay host
    pub smtp_server: String,
    /// SMTP relay port
    pub smtp_port: u16,
    /// SMS provider API key
    pub sms_api_key: Option<String>,
    /// Push provider API key
    pub push_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Falls back to defaults if environment variables are not set.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            pricing: PricingConfig {
                base_price: parse_var(&lookup, "BOOKING_BASE_PRICE_CENTS")
                    .map_or(PricingConfig::DEFAULT_BASE_PRICE, Money::from_cents),
                currency: lookup("BOOKING_CURRENCY").unwrap_or_else(|| "USD".to_string()),
                default_occupancy_rate: parse_var(&lookup, "BOOKING_DEFAULT_OCCUPANCY_RATE")
                    .filter(|rate: &f64| (0.0..=100.0).contains(rate))
                    .unwrap_or(50.0),
                default_days_until_departure: parse_var(&lookup, "BOOKING_DEFAULT_DAYS_UNTIL_DEPARTURE")
                    .filter(|days: &i64| *days >= 0)
                    .unwrap_or(30),
            },
            booking: BookingConfig {
                id_prefix: lookup("BOOKING_ID_PREFIX")
                    .filter(|prefix| !prefix.trim().is_empty())
                    .unwrap_or_else(|| "BK".to_string()),
            },
            notifications: NotificationConfig {
                smtp_server: lookup("BOOKING_SMTP_SERVER").unwrap_or_else(|| "smtp.example.com".to_string()),
                smtp_port: parse_var(&lookup, "BOOKING_SMTP_PORT").unwrap_or(587),
                sms_api_key: lookup("BOOKING_SMS_API_KEY"),
                push_api_key: lookup("BOOKING_PUSH_API_KEY"),
            },
            log_level: lookup("BOOKING_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl PricingConfig {
    /// $100.00
    pub const DEFAULT_BASE_PRICE: Money = Money::from_dollars(100);
}

impl Default for PricingConfig {
    fn default() -> Self {
        Config::default().pricing
    }
}
