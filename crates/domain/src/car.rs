//! Car: a vehicle in the dealership's stock.
//!
//! [`Car`] is what the server returns. [`CarDraft`] is the editable subset the
//! client sends when adding or updating a car, and is validated locally
//! before any request is made.

use serde::{Deserialize, Serialize};

use crate::error::{SalonError, ValidationError};
use crate::id::{CarId, UserId};
use crate::time::{FIRST_CAR_YEAR, current_year};

/// Number of characters in a vehicle identification number.
pub const VIN_LENGTH: usize = 17;

/// A car as known to the server.
///
/// `owner_id` is `None` while the car is still for sale. `renter_id` is set
/// while somebody rents it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: CarId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub price: f64,
    pub horse_power: u32,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub renter_id: Option<UserId>,
    #[serde(default = "default_available")]
    pub is_available_for_rent: bool,
}

fn default_available() -> bool {
    true
}

impl Car {
    /// Nobody has bought this car yet.
    #[must_use]
    pub fn is_for_sale(&self) -> bool {
        self.owner_id.is_none()
    }

    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == Some(user)
    }

    #[must_use]
    pub fn is_rented_by(&self, user: UserId) -> bool {
        self.renter_id == Some(user)
    }

    /// Copy the editable fields into a draft, e.g. to pre-fill an edit form.
    #[must_use]
    pub fn to_draft(&self) -> CarDraft {
        CarDraft {
            brand: self.brand.clone(),
            model: self.model.clone(),
            year: self.year,
            vin: self.vin.clone(),
            price: self.price,
            horse_power: self.horse_power,
            is_available_for_rent: self.is_available_for_rent,
        }
    }
}

/// The fields a dealer fills in to add or edit a car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDraft {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub price: f64,
    pub horse_power: u32,
    pub is_available_for_rent: bool,
}

impl CarDraft {
    /// Create a builder for constructing a [`CarDraft`].
    #[must_use]
    pub fn builder() -> CarDraftBuilder {
        CarDraftBuilder::default()
    }

    /// Check the form rules against the current calendar year.
    ///
    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] naming the first rule that fails.
    pub fn validate(&self) -> Result<(), SalonError> {
        self.validate_for_year(current_year())
    }

    /// Check the form rules, treating `latest_year` as the newest allowed
    /// model year.
    ///
    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] naming the first rule that fails.
    pub fn validate_for_year(&self, latest_year: i32) -> Result<(), SalonError> {
        if self.brand.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "brand" }.into());
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "model" }.into());
        }
        if !(FIRST_CAR_YEAR..=latest_year).contains(&self.year) {
            return Err(ValidationError::YearOutOfRange {
                year: self.year,
                min: FIRST_CAR_YEAR,
                max: latest_year,
            }
            .into());
        }
        if !is_valid_vin(&self.vin) {
            return Err(ValidationError::InvalidVin.into());
        }
        if self.price < 0.0 || self.price.is_nan() {
            return Err(ValidationError::NegativePrice.into());
        }
        if self.horse_power < 1 {
            return Err(ValidationError::HorsePowerTooLow.into());
        }
        Ok(())
    }
}

/// Whether `vin` has exactly 17 characters drawn from `A-Z` (minus `I`, `O`,
/// `Q`) and `0-9`.
#[must_use]
pub fn is_valid_vin(vin: &str) -> bool {
    vin.len() == VIN_LENGTH
        && vin
            .bytes()
            .all(|b| b.is_ascii_digit() || (b.is_ascii_uppercase() && !matches!(b, b'I' | b'O' | b'Q')))
}

/// Step-by-step builder for [`CarDraft`].
#[derive(Debug, Default)]
pub struct CarDraftBuilder {
    brand: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    vin: Option<String>,
    price: Option<f64>,
    horse_power: Option<u32>,
    is_available_for_rent: Option<bool>,
}

impl CarDraftBuilder {
    #[must_use]
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn vin(mut self, vin: impl Into<String>) -> Self {
        self.vin = Some(vin.into());
        self
    }

    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn horse_power(mut self, horse_power: u32) -> Self {
        self.horse_power = Some(horse_power);
        self
    }

    #[must_use]
    pub fn available_for_rent(mut self, available: bool) -> Self {
        self.is_available_for_rent = Some(available);
        self
    }

    /// Consume the builder, validate, and return a [`CarDraft`].
    ///
    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] if a required field is missing or
    /// a form rule fails.
    pub fn build(self) -> Result<CarDraft, SalonError> {
        let draft = CarDraft {
            brand: self.brand.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            vin: self.vin.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            horse_power: self.horse_power.unwrap_or_default(),
            is_available_for_rent: self.is_available_for_rent.unwrap_or(true),
        };
        draft.validate()?;
        // Zero is a valid price, so a missing one has to be caught here.
        if self.price.is_none() {
            return Err(ValidationError::EmptyField { field: "price" }.into());
        }
        Ok(draft)
    }
}
