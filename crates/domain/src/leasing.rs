//! Leasing: the request a customer sends and the quote the server computes.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{SalonError, ValidationError};
use crate::id::CarId;

/// Terms a customer proposes for leasing a car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeasingRequest {
    pub down_payment: f64,
    pub months: u32,
}

impl LeasingRequest {
    #[must_use]
    pub fn new(down_payment: f64, months: u32) -> Self {
        Self {
            down_payment,
            months,
        }
    }

    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] for a zero-month term or a
    /// negative down payment.
    pub fn validate(&self) -> Result<(), SalonError> {
        if self.months == 0 {
            return Err(ValidationError::LeasingMonthsTooLow.into());
        }
        if self.down_payment < 0.0 || self.down_payment.is_nan() {
            return Err(ValidationError::NegativeDownPayment.into());
        }
        Ok(())
    }
}

/// The server's leasing quote.
///
/// `remaining_amount` and `monthly_rate` arrive as fixed two-decimal strings;
/// they are kept verbatim so the displayed figures match the server's
/// rounding exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeasingResponse {
    pub car_id: CarId,
    pub car_brand: String,
    pub car_model: String,
    pub total_price: f64,
    pub down_payment: f64,
    #[serde(deserialize_with = "decimal_text")]
    pub remaining_amount: String,
    pub months: u32,
    #[serde(deserialize_with = "decimal_text")]
    pub monthly_rate: String,
}

impl LeasingResponse {
    #[must_use]
    pub fn remaining_amount_value(&self) -> Option<f64> {
        self.remaining_amount.trim().parse().ok()
    }

    #[must_use]
    pub fn monthly_rate_value(&self) -> Option<f64> {
        self.monthly_rate.trim().parse().ok()
    }
}

/// Format an amount the way the server does: two fractional digits.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Accept either `"123.45"` or `123.45` and keep the textual form.
fn decimal_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Text(String),
        Number(f64),
    }

    Ok(match Amount::deserialize(deserializer)? {
        Amount::Text(text) => text,
        Amount::Number(number) => format_amount(number),
    })
}
