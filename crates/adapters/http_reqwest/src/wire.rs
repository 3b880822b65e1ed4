//! Response envelopes as the dealership API sends them.

use serde::Deserialize;

use salon_domain::user::User;

/// `GET /current-user`.
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentUserBody {
    pub user: User,
}

/// `POST /login` and `POST /register`.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// `POST /admin/create-customer`.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedCustomerBody {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

/// Error payload. Depending on the route the server fills `error` or
/// `message`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}
