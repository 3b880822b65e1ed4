//! Users (customers and dealers) and the payloads that create or
//! authenticate them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SalonError, ValidationError};
use crate::id::UserId;

/// An account known to the server. Dealers manage stock and customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub is_dealer: bool,
}

/// Customers are plain users as far as the client is concerned.
pub type Customer = User;

impl User {
    /// `"First Last"`, as shown in lists.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields for a new account, used both for self-registration and for a
/// dealer creating a customer. The password only ever travels on creation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Self-registration carries the same fields as a dealer-created account.
pub type Registration = NewCustomer;

impl NewCustomer {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Every field is required.
    ///
    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] naming the first empty field.
    pub fn validate(&self) -> Result<(), SalonError> {
        require("username", &self.username)?;
        require("password", &self.password)?;
        require("first name", &self.first_name)?;
        require("last name", &self.last_name)?;
        Ok(())
    }

    /// The credentials this account will log in with.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

impl fmt::Debug for NewCustomer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCustomer")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Username and password for a login request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] when either field is empty.
    pub fn validate(&self) -> Result<(), SalonError> {
        require("username", &self.username)?;
        require("password", &self.password)?;
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn require(field: &'static str, value: &str) -> Result<(), SalonError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_server_user() {
        let json = r#"{"id":1,"username":"jan","firstName":"Jan","lastName":"Kowalski","isDealer":true}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert!(user.is_dealer);
        assert_eq!(user.full_name(), "Jan Kowalski");
    }

    #[test]
    fn should_treat_missing_dealer_flag_as_customer() {
        let json = r#"{"id":2,"username":"ola","firstName":"Ola","lastName":"Nowak"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(!user.is_dealer);
    }

    #[test]
    fn should_reject_new_customer_with_empty_last_name() {
        let customer = NewCustomer::new("ola", "secret", "Ola", "");
        assert!(matches!(
            customer.validate(),
            Err(SalonError::Validation(ValidationError::EmptyField { field: "last name" }))
        ));
    }

    #[test]
    fn should_accept_complete_new_customer() {
        let customer = NewCustomer::new("ola", "secret", "Ola", "Nowak");
        assert!(customer.validate().is_ok());
        assert_eq!(customer.credentials(), Credentials::new("ola", "secret"));
    }

    #[test]
    fn should_serialize_new_customer_in_camel_case() {
        let value = serde_json::to_value(NewCustomer::new("ola", "secret", "Ola", "Nowak")).unwrap();
        assert_eq!(value["firstName"], "Ola");
        assert_eq!(value["password"], "secret");
    }

    #[test]
    fn should_redact_password_in_debug_output() {
        let creds = Credentials::new("jan", "hunter2");
        let printed = format!("{creds:?}");
        assert!(printed.contains("jan"));
        assert!(!printed.contains("hunter2"));

        let customer = NewCustomer::new("ola", "hunter2", "Ola", "Nowak");
        assert!(!format!("{customer:?}").contains("hunter2"));
    }

    #[test]
    fn should_reject_credentials_without_password() {
        assert!(Credentials::new("jan", "").validate().is_err());
    }
}
