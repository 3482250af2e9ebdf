//! Passenger entity.

use crate::error::{BookingError, Result};
use crate::types::{PassengerId, PassengerType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A traveller. Contact details are the only mutable fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    passenger_id: PassengerId,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    date_of_birth: NaiveDate,
    passenger_type: PassengerType,
    loyalty_number: Option<String>,
}

/// Serializable view of a passenger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerProfile {
    /// Passenger ID
    pub id: PassengerId,
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Age category
    #[serde(rename = "type")]
    pub passenger_type: PassengerType,
    /// Frequent-flyer number
    pub loyalty_number: Option<String>,
}

fn check_email(email: &str) -> Result<()> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(BookingError::validation("Valid email is required"))
    }
}

fn check_phone(phone: &str) -> Result<()> {
    if phone.trim().is_empty() {
        Err(BookingError::validation("Phone number is required"))
    } else {
        Ok(())
    }
}

impl Passenger {
    /// Creates a passenger.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if the ID or either name is
    /// empty, the email lacks an `@`, or the phone is empty.
    pub fn new(
        passenger_id: impl Into<PassengerId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Result<Self> {
        let passenger_id = passenger_id.into();
        let first_name = first_name.into();
        let last_name = last_name.into();
        let email = email.into();
        let phone = phone.into();

        if passenger_id.is_blank() {
            return Err(BookingError::validation("Passenger ID cannot be empty"));
        }
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(BookingError::validation("First name and last name are required"));
        }
        check_email(&email)?;
        check_phone(&phone)?;

        Ok(Self {
            passenger_id,
            first_name,
            last_name,
            email,
            phone,
            date_of_birth,
            passenger_type: PassengerType::Adult,
            loyalty_number: None,
        })
    }

    /// Sets the age category
    #[must_use]
    pub const fn with_type(mut self, passenger_type: PassengerType) -> Self {
        self.passenger_type = passenger_type;
        self
    }

    /// Attaches a frequent-flyer number
    #[must_use]
    pub fn with_loyalty_number(mut self, loyalty_number: impl Into<String>) -> Self {
        self.loyalty_number = Some(loyalty_number.into());
        self
    }

    /// Returns the passenger ID
    #[must_use]
    pub const fn passenger_id(&self) -> &PassengerId {
        &self.passenger_id
    }

    /// Returns the first name
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the email address
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the phone number
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the date of birth
    #[must_use]
    pub const fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    /// Returns the age category
    #[must_use]
    pub const fn passenger_type(&self) -> PassengerType {
        self.passenger_type
    }

    /// Returns the frequent-flyer number, if any
    #[must_use]
    pub fn loyalty_number(&self) -> Option<&str> {
        self.loyalty_number.as_deref()
    }

    /// `"First Last"`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Replaces the email address.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if the address lacks an `@`;
    /// the old address is kept.
    pub fn update_email(&mut self, email: impl Into<String>) -> Result<()> {
        let email = email.into();
        check_email(&email)?;
        self.email = email;
        Ok(())
    }

    /// Replaces the phone number.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if the number is empty.
    pub fn update_phone(&mut self, phone: impl Into<String>) -> Result<()> {
        let phone = phone.into();
        check_phone(&phone)?;
        self.phone = phone;
        Ok(())
    }

    /// Profile summary for display or serialization
    #[must_use]
    pub fn profile(&self) -> PassengerProfile {
        PassengerProfile {
            id: self.passenger_id.clone(),
            name: self.full_name(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            passenger_type: self.passenger_type,
            loyalty_number: self.loyalty_number.clone(),
        }
    }

    /// Age in whole years on `date`, or `None` if `date` precedes the birth date.
    #[must_use]
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        date.years_since(self.date_of_birth)
    }
}
