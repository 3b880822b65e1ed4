//! Dealership API ports: the remote operations the services cache.
//!
//! Every call is made on behalf of the current session. How the session is
//! carried (a cookie jar, an in-memory handle, …) is the adapter's concern.

use std::future::Future;

use salon_domain::car::{Car, CarDraft};
use salon_domain::error::SalonError;
use salon_domain::id::CarId;
use salon_domain::leasing::{LeasingRequest, LeasingResponse};
use salon_domain::renter::CarRenter;
use salon_domain::user::{Credentials, NewCustomer, Registration, User};

/// Result of a login or registration call.
///
/// Registration may succeed without signing the new account in, in which
/// case `user` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthOutcome {
    pub message: Option<String>,
    pub user: Option<User>,
}

/// Result of a dealer creating a customer account.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedCustomer {
    pub message: Option<String>,
    pub user: User,
}

/// Session management.
pub trait AuthApi {
    /// The user bound to the current session.
    ///
    /// Fails with [`SalonError::Unauthorized`] when there is no session.
    fn current_user(&self) -> impl Future<Output = Result<User, SalonError>> + Send;

    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthOutcome, SalonError>> + Send;

    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<AuthOutcome, SalonError>> + Send;

    fn logout(&self) -> impl Future<Output = Result<(), SalonError>> + Send;
}

/// Car stock operations.
pub trait CarApi {
    fn list_cars(&self) -> impl Future<Output = Result<Vec<Car>, SalonError>> + Send;

    fn get_car(&self, id: CarId) -> impl Future<Output = Result<Car, SalonError>> + Send;

    fn create_car(&self, draft: &CarDraft)
    -> impl Future<Output = Result<Car, SalonError>> + Send;

    fn update_car(
        &self,
        id: CarId,
        draft: &CarDraft,
    ) -> impl Future<Output = Result<Car, SalonError>> + Send;

    fn delete_car(&self, id: CarId) -> impl Future<Output = Result<(), SalonError>> + Send;

    fn rent_car(&self, id: CarId) -> impl Future<Output = Result<(), SalonError>> + Send;

    fn return_car(&self, id: CarId) -> impl Future<Output = Result<(), SalonError>> + Send;

    fn buy_car(&self, id: CarId) -> impl Future<Output = Result<(), SalonError>> + Send;

    fn get_renter(&self, id: CarId) -> impl Future<Output = Result<CarRenter, SalonError>> + Send;

    fn lease_car(
        &self,
        id: CarId,
        request: &LeasingRequest,
    ) -> impl Future<Output = Result<LeasingResponse, SalonError>> + Send;
}

/// Customer account management (dealers only).
pub trait CustomerApi {
    fn list_customers(&self) -> impl Future<Output = Result<Vec<User>, SalonError>> + Send;

    fn create_customer(
        &self,
        customer: &NewCustomer,
    ) -> impl Future<Output = Result<CreatedCustomer, SalonError>> + Send;
}
