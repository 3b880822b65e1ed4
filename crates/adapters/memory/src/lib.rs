//! # salon-adapter-memory
//!
//! A dealership backend that lives in process memory.
//!
//! [`MemoryBackend`] holds the accounts and the car stock and enforces the
//! same rules as the REST server: dealers manage cars and customers, a car
//! is rented by one customer at a time and can only be returned by them, a
//! sold car leaves the rental pool. Each [`MemoryClient`] carries its own
//! session, the way each browser carries its own cookie.
//!
//! ## Dependency rule
//!
//! Depends on `salon-domain` and `salon-app` (for port traits).

mod seed;

use std::sync::Arc;

use tokio::sync::Mutex;

use salon_app::ports::{AuthApi, AuthOutcome, CarApi, CreatedCustomer, CustomerApi};
use salon_domain::car::{Car, CarDraft};
use salon_domain::error::{NotFoundError, SalonError};
use salon_domain::id::{CarId, UserId};
use salon_domain::leasing::{LeasingRequest, LeasingResponse, format_amount};
use salon_domain::renter::CarRenter;
use salon_domain::user::{Credentials, NewCustomer, Registration, User};

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct Db {
    accounts: Vec<Account>,
    cars: Vec<Car>,
    next_user: i64,
    next_car: i64,
}

impl Db {
    fn user(&self, id: UserId) -> Option<&User> {
        self.accounts.iter().map(|a| &a.user).find(|u| u.id == id)
    }

    fn add_account(&mut self, account: &NewCustomer, is_dealer: bool) -> Result<User, SalonError> {
        if self.accounts.iter().any(|a| a.user.username == account.username) {
            return Err(SalonError::Rejected(format!(
                "username {} is already taken",
                account.username
            )));
        }
        self.next_user += 1;
        let user = User {
            id: UserId::new(self.next_user),
            username: account.username.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            is_dealer,
        };
        self.accounts.push(Account {
            user: user.clone(),
            password: account.password.clone(),
        });
        Ok(user)
    }

    fn add_car(&mut self, draft: &CarDraft) -> Car {
        self.next_car += 1;
        let car = Car {
            id: CarId::new(self.next_car),
            brand: draft.brand.clone(),
            model: draft.model.clone(),
            year: draft.year,
            vin: draft.vin.clone(),
            price: draft.price,
            horse_power: draft.horse_power,
            owner_id: None,
            renter_id: None,
            is_available_for_rent: draft.is_available_for_rent,
        };
        self.cars.push(car.clone());
        car
    }

    fn car(&self, id: CarId) -> Result<&Car, SalonError> {
        self.cars
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| car_not_found(id))
    }

    fn car_mut(&mut self, id: CarId) -> Result<&mut Car, SalonError> {
        self.cars
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| car_not_found(id))
    }
}

fn car_not_found(id: CarId) -> SalonError {
    NotFoundError {
        entity: "Car",
        id: id.to_string(),
    }
    .into()
}

/// Re-check a payload on the "server" side. Validation failures here are
/// reported the way the REST server reports them: as a rejection.
fn server_check(result: Result<(), SalonError>) -> Result<(), SalonError> {
    result.map_err(|err| match err {
        SalonError::Validation(invalid) => SalonError::Rejected(invalid.to_string()),
        other => other,
    })
}

/// Shared in-memory state. Clones refer to the same data.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    db: Arc<Mutex<Db>>,
}

impl MemoryBackend {
    /// An empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend with one dealer (`dealer`/`dealer`), two customers and a
    /// handful of cars for sale.
    #[must_use]
    pub fn with_demo_data() -> Self {
        let mut db = Db::default();
        let accounts = std::iter::once((seed::dealer(), true))
            .chain(seed::customers().into_iter().map(|c| (c, false)));
        for (account, is_dealer) in accounts {
            let seeded = db.add_account(&account, is_dealer);
            debug_assert!(seeded.is_ok(), "seed usernames must be distinct");
        }
        for draft in seed::cars() {
            db.add_car(&draft);
        }
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Add an account directly, bypassing the dealer check.
    ///
    /// # Errors
    ///
    /// Returns [`SalonError::Rejected`] when the username is taken.
    pub async fn add_account(&self, account: &NewCustomer, is_dealer: bool) -> Result<User, SalonError> {
        self.db.lock().await.add_account(account, is_dealer)
    }

    /// Add a car directly, bypassing the dealer check.
    pub async fn add_car(&self, draft: &CarDraft) -> Car {
        self.db.lock().await.add_car(draft)
    }

    /// A new client with its own, initially anonymous, session.
    #[must_use]
    pub fn client(&self) -> MemoryClient {
        MemoryClient {
            db: Arc::clone(&self.db),
            session: Arc::default(),
        }
    }
}

/// One session against a [`MemoryBackend`]. Clones share the session.
#[derive(Clone)]
pub struct MemoryClient {
    db: Arc<Mutex<Db>>,
    session: Arc<Mutex<Option<UserId>>>,
}

impl MemoryClient {
    async fn session_user(&self, db: &Db) -> Result<User, SalonError> {
        let id = (*self.session.lock().await).ok_or(SalonError::Unauthorized)?;
        // An account removed behind the session's back ends the session.
        db.user(id).cloned().ok_or(SalonError::Unauthorized)
    }

    async fn require_dealer(&self, db: &Db) -> Result<User, SalonError> {
        let user = self.session_user(db).await?;
        if user.is_dealer {
            Ok(user)
        } else {
            tracing::debug!(username = %user.username, "dealer-only operation refused");
            Err(SalonError::Forbidden)
        }
    }
}

impl AuthApi for MemoryClient {
    async fn current_user(&self) -> Result<User, SalonError> {
        let db = self.db.lock().await;
        self.session_user(&db).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthOutcome, SalonError> {
        let db = self.db.lock().await;
        let account = db
            .accounts
            .iter()
            .find(|a| a.user.username == credentials.username && a.password == credentials.password)
            .ok_or_else(|| {
                tracing::debug!(username = %credentials.username, "invalid credentials");
                SalonError::Unauthorized
            })?;
        *self.session.lock().await = Some(account.user.id);
        Ok(AuthOutcome {
            message: Some("Logged in".to_string()),
            user: Some(account.user.clone()),
        })
    }

    async fn register(&self, registration: &Registration) -> Result<AuthOutcome, SalonError> {
        server_check(registration.validate())?;
        let user = self.db.lock().await.add_account(registration, false)?;
        *self.session.lock().await = Some(user.id);
        Ok(AuthOutcome {
            message: Some("Registered".to_string()),
            user: Some(user),
        })
    }

    async fn logout(&self) -> Result<(), SalonError> {
        *self.session.lock().await = None;
        Ok(())
    }
}

impl CarApi for MemoryClient {
    async fn list_cars(&self) -> Result<Vec<Car>, SalonError> {
        Ok(self.db.lock().await.cars.clone())
    }

    async fn get_car(&self, id: CarId) -> Result<Car, SalonError> {
        self.db.lock().await.car(id).cloned()
    }

    async fn create_car(&self, draft: &CarDraft) -> Result<Car, SalonError> {
        let mut db = self.db.lock().await;
        self.require_dealer(&db).await?;
        server_check(draft.validate())?;
        Ok(db.add_car(draft))
    }

    async fn update_car(&self, id: CarId, draft: &CarDraft) -> Result<Car, SalonError> {
        let mut db = self.db.lock().await;
        self.require_dealer(&db).await?;
        server_check(draft.validate())?;
        let car = db.car_mut(id)?;
        car.brand.clone_from(&draft.brand);
        car.model.clone_from(&draft.model);
        car.year = draft.year;
        car.vin.clone_from(&draft.vin);
        car.price = draft.price;
        car.horse_power = draft.horse_power;
        car.is_available_for_rent = draft.is_available_for_rent;
        Ok(car.clone())
    }

    async fn delete_car(&self, id: CarId) -> Result<(), SalonError> {
        let mut db = self.db.lock().await;
        self.require_dealer(&db).await?;
        db.car(id)?;
        db.cars.retain(|c| c.id != id);
        Ok(())
    }

    async fn rent_car(&self, id: CarId) -> Result<(), SalonError> {
        let mut db = self.db.lock().await;
        let user = self.session_user(&db).await?;
        let car = db.car_mut(id)?;
        if !car.is_available_for_rent || car.renter_id.is_some() || car.owner_id.is_some() {
            return Err(SalonError::Rejected("car is not available for rent".to_string()));
        }
        car.renter_id = Some(user.id);
        car.is_available_for_rent = false;
        Ok(())
    }

    async fn return_car(&self, id: CarId) -> Result<(), SalonError> {
        let mut db = self.db.lock().await;
        let user = self.session_user(&db).await?;
        let car = db.car_mut(id)?;
        if !car.is_rented_by(user.id) {
            return Err(SalonError::Rejected("car is not rented by you".to_string()));
        }
        car.renter_id = None;
        car.is_available_for_rent = true;
        Ok(())
    }

    async fn buy_car(&self, id: CarId) -> Result<(), SalonError> {
        let mut db = self.db.lock().await;
        let user = self.session_user(&db).await?;
        let car = db.car_mut(id)?;
        if car.owner_id.is_some() {
            return Err(SalonError::Rejected("car is already sold".to_string()));
        }
        if car.renter_id.is_some_and(|renter| renter != user.id) {
            return Err(SalonError::Rejected("car is rented by someone else".to_string()));
        }
        car.owner_id = Some(user.id);
        car.renter_id = None;
        car.is_available_for_rent = false;
        Ok(())
    }

    async fn get_renter(&self, id: CarId) -> Result<CarRenter, SalonError> {
        let db = self.db.lock().await;
        let car = db.car(id)?;
        Ok(CarRenter {
            car_id: car.id,
            renter_id: car.renter_id,
        })
    }

    async fn lease_car(
        &self,
        id: CarId,
        request: &LeasingRequest,
    ) -> Result<LeasingResponse, SalonError> {
        server_check(request.validate())?;
        let db = self.db.lock().await;
        let car = db.car(id)?;
        if request.down_payment > car.price {
            return Err(SalonError::Rejected(
                "down payment exceeds the car price".to_string(),
            ));
        }
        let remaining = car.price - request.down_payment;
        Ok(LeasingResponse {
            car_id: car.id,
            car_brand: car.brand.clone(),
            car_model: car.model.clone(),
            total_price: car.price,
            down_payment: request.down_payment,
            remaining_amount: format_amount(remaining),
            months: request.months,
            monthly_rate: format_amount(remaining / f64::from(request.months)),
        })
    }
}

impl CustomerApi for MemoryClient {
    async fn list_customers(&self) -> Result<Vec<User>, SalonError> {
        let db = self.db.lock().await;
        self.require_dealer(&db).await?;
        Ok(db
            .accounts
            .iter()
            .map(|a| &a.user)
            .filter(|u| !u.is_dealer)
            .cloned()
            .collect())
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<CreatedCustomer, SalonError> {
        let mut db = self.db.lock().await;
        self.require_dealer(&db).await?;
        server_check(customer.validate())?;
        let user = db.add_account(customer, false)?;
        Ok(CreatedCustomer {
            message: Some("Customer created".to_string()),
            user,
        })
    }
}
