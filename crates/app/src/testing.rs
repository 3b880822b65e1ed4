//! Shared in-memory API fake for service tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use salon_domain::car::{Car, CarDraft};
use salon_domain::error::{NotFoundError, SalonError};
use salon_domain::id::{CarId, UserId};
use salon_domain::leasing::{LeasingRequest, LeasingResponse, format_amount};
use salon_domain::renter::CarRenter;
use salon_domain::user::{Credentials, NewCustomer, Registration, User};

use crate::ports::{AuthApi, AuthOutcome, CarApi, CreatedCustomer, CustomerApi};

pub(crate) fn dealer() -> User {
    User {
        id: UserId::new(1),
        username: "jan".to_string(),
        first_name: "Jan".to_string(),
        last_name: "Kowalski".to_string(),
        is_dealer: true,
    }
}

pub(crate) fn customer() -> User {
    User {
        id: UserId::new(2),
        username: "ola".to_string(),
        first_name: "Ola".to_string(),
        last_name: "Nowak".to_string(),
        is_dealer: false,
    }
}

pub(crate) fn car(id: i64) -> Car {
    Car {
        id: CarId::new(id),
        brand: "Toyota".to_string(),
        model: "Corolla".to_string(),
        year: 2020,
        vin: "JTDBR32E720123456".to_string(),
        price: 80_000.0,
        horse_power: 130,
        owner_id: None,
        renter_id: None,
        is_available_for_rent: true,
    }
}

pub(crate) fn draft() -> CarDraft {
    car(0).to_draft()
}

#[derive(Default)]
struct State {
    session: Option<User>,
    cars: Vec<Car>,
    customers: Vec<User>,
    failing: HashSet<&'static str>,
    calls: HashMap<&'static str, usize>,
    register_without_session: bool,
    gates: HashMap<&'static str, Arc<Semaphore>>,
}

/// Scripted stand-in for the dealership API. Clones share state.
#[derive(Clone, Default)]
pub(crate) struct FakeApi {
    state: Arc<Mutex<State>>,
}

impl FakeApi {
    pub(crate) fn sign_in(&self, user: User) {
        self.state.lock().unwrap().session = Some(user);
    }

    pub(crate) fn sign_out(&self) {
        self.state.lock().unwrap().session = None;
    }

    pub(crate) fn seed_cars(&self, cars: Vec<Car>) {
        self.state.lock().unwrap().cars = cars;
    }

    pub(crate) fn seed_customers(&self, customers: Vec<User>) {
        self.state.lock().unwrap().customers = customers;
    }

    /// Make every later call to `op` fail with a transport error.
    pub(crate) fn fail(&self, op: &'static str) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub(crate) fn register_without_session(&self) {
        self.state.lock().unwrap().register_without_session = true;
    }

    /// Hold every later response of `op` until the returned gate gets a
    /// permit. The call is counted and answered before it waits.
    pub(crate) fn hold(&self, op: &'static str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.state.lock().unwrap().gates.insert(op, Arc::clone(&gate));
        gate
    }

    async fn pass_gate(&self, op: &'static str) {
        let gate = self.state.lock().unwrap().gates.get(op).cloned();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
    }

    pub(crate) fn calls(&self, op: &'static str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(op)
            .copied()
            .unwrap_or_default()
    }

    fn call<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut State) -> Result<T, SalonError>,
    ) -> Result<T, SalonError> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(op).or_default() += 1;
        if state.failing.contains(op) {
            return Err(SalonError::Transport(Box::new(std::io::Error::other(
                format!("{op} failed"),
            ))));
        }
        f(&mut state)
    }
}

fn car_mut(state: &mut State, id: CarId) -> Result<&mut Car, SalonError> {
    state
        .cars
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| {
            NotFoundError {
                entity: "Car",
                id: id.to_string(),
            }
            .into()
        })
}

fn session_id(state: &State) -> Result<UserId, SalonError> {
    state
        .session
        .as_ref()
        .map(|u| u.id)
        .ok_or(SalonError::Unauthorized)
}

impl AuthApi for FakeApi {
    async fn current_user(&self) -> Result<User, SalonError> {
        self.call("current_user", |s| s.session.clone().ok_or(SalonError::Unauthorized))
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthOutcome, SalonError> {
        self.call("login", |s| {
            let user = if credentials.username == dealer().username {
                dealer()
            } else {
                customer()
            };
            s.session = Some(user.clone());
            Ok(AuthOutcome {
                message: Some("logged in".to_string()),
                user: Some(user),
            })
        })
    }

    async fn register(&self, registration: &Registration) -> Result<AuthOutcome, SalonError> {
        self.call("register", |s| {
            let user = User {
                id: UserId::new(10),
                username: registration.username.clone(),
                first_name: registration.first_name.clone(),
                last_name: registration.last_name.clone(),
                is_dealer: false,
            };
            if s.register_without_session {
                return Ok(AuthOutcome {
                    message: Some("registered".to_string()),
                    user: None,
                });
            }
            s.session = Some(user.clone());
            Ok(AuthOutcome {
                message: Some("registered".to_string()),
                user: Some(user),
            })
        })
    }

    async fn logout(&self) -> Result<(), SalonError> {
        self.call("logout", |s| {
            s.session = None;
            Ok(())
        })
    }
}

impl CarApi for FakeApi {
    async fn list_cars(&self) -> Result<Vec<Car>, SalonError> {
        self.call("list_cars", |s| Ok(s.cars.clone()))
    }

    async fn get_car(&self, id: CarId) -> Result<Car, SalonError> {
        self.call("get_car", |s| car_mut(s, id).map(|c| c.clone()))
    }

    async fn create_car(&self, draft: &CarDraft) -> Result<Car, SalonError> {
        self.call("create_car", |s| {
            let next = s.cars.iter().map(|c| c.id.get()).max().unwrap_or_default() + 1;
            let created = Car {
                id: CarId::new(next),
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
            s.cars.push(created.clone());
            Ok(created)
        })
    }

    async fn update_car(&self, id: CarId, draft: &CarDraft) -> Result<Car, SalonError> {
        self.call("update_car", |s| {
            let car = car_mut(s, id)?;
            car.brand.clone_from(&draft.brand);
            car.model.clone_from(&draft.model);
            car.year = draft.year;
            car.vin.clone_from(&draft.vin);
            car.price = draft.price;
            car.horse_power = draft.horse_power;
            car.is_available_for_rent = draft.is_available_for_rent;
            Ok(car.clone())
        })
    }

    async fn delete_car(&self, id: CarId) -> Result<(), SalonError> {
        self.call("delete_car", |s| {
            s.cars.retain(|c| c.id != id);
            Ok(())
        })
    }

    async fn rent_car(&self, id: CarId) -> Result<(), SalonError> {
        self.call("rent_car", |s| {
            let user = session_id(s)?;
            let car = car_mut(s, id)?;
            car.renter_id = Some(user);
            car.is_available_for_rent = false;
            Ok(())
        })
    }

    async fn return_car(&self, id: CarId) -> Result<(), SalonError> {
        self.call("return_car", |s| {
            let car = car_mut(s, id)?;
            car.renter_id = None;
            car.is_available_for_rent = true;
            Ok(())
        })
    }

    async fn buy_car(&self, id: CarId) -> Result<(), SalonError> {
        self.call("buy_car", |s| {
            let user = session_id(s)?;
            car_mut(s, id)?.owner_id = Some(user);
            Ok(())
        })
    }

    async fn get_renter(&self, id: CarId) -> Result<CarRenter, SalonError> {
        self.call("get_renter", |s| {
            let car = car_mut(s, id)?;
            Ok(CarRenter {
                car_id: car.id,
                renter_id: car.renter_id,
            })
        })
    }

    async fn lease_car(
        &self,
        id: CarId,
        request: &LeasingRequest,
    ) -> Result<LeasingResponse, SalonError> {
        self.call("lease_car", |s| {
            let car = car_mut(s, id)?;
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
        })
    }
}

impl CustomerApi for FakeApi {
    async fn list_customers(&self) -> Result<Vec<User>, SalonError> {
        let result = self.call("list_customers", |s| Ok(s.customers.clone()));
        self.pass_gate("list_customers").await;
        result
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<CreatedCustomer, SalonError> {
        let result = self.call("create_customer", |s| {
            let user = User {
                id: UserId::new(100 + i64::try_from(s.customers.len()).unwrap_or_default()),
                username: customer.username.clone(),
                first_name: customer.first_name.clone(),
                last_name: customer.last_name.clone(),
                is_dealer: false,
            };
            s.customers.push(user.clone());
            Ok(CreatedCustomer {
                message: None,
                user,
            })
        });
        self.pass_gate("create_customer").await;
        result
    }
}
