//! Car service: owns the car-collection cache.
//!
//! The cache is a plain `Vec<Car>` in server order. It is replaced wholesale
//! on [`load`](CarService::load) and patched at a single index after every
//! mutation, so subscribers always receive the full, current collection.
//! When two mutations race, whichever response arrives last wins.

use tokio::sync::watch;

use salon_domain::car::{Car, CarDraft};
use salon_domain::error::SalonError;
use salon_domain::event::ChangeEvent;
use salon_domain::id::CarId;
use salon_domain::leasing::{LeasingRequest, LeasingResponse};
use salon_domain::renter::CarRenter;

use crate::ports::{CarApi, EventPublisher};
use crate::services::announce;
use crate::store::Store;

/// Application service for the car stock.
pub struct CarService<A, P> {
    api: A,
    publisher: P,
    cars: Store<Vec<Car>>,
}

impl<A: CarApi, P: EventPublisher> CarService<A, P> {
    /// Create a new service with an empty cache.
    pub fn new(api: A, publisher: P) -> Self {
        Self {
            api,
            publisher,
            cars: Store::default(),
        }
    }

    /// Fetch every car and replace the cache.
    ///
    /// # Errors
    ///
    /// Returns the API error. The cache keeps its previous contents.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Result<usize, SalonError> {
        let cars = self.api.list_cars().await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to load cars");
        })?;
        let count = cars.len();
        self.cars.replace(cars);
        announce(&self.publisher, ChangeEvent::CarsReloaded { count }).await;
        Ok(count)
    }

    /// Snapshot of the cached cars.
    #[must_use]
    pub fn cars(&self) -> Vec<Car> {
        self.cars.get()
    }

    /// Look a car up in the cache without touching the network.
    #[must_use]
    pub fn cached_car(&self, id: CarId) -> Option<Car> {
        self.cars.read(|cars| cars.iter().find(|c| c.id == id).cloned())
    }

    /// Follow the car collection.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Car>> {
        self.cars.subscribe()
    }

    /// Fetch one car straight from the server. The cache is not touched.
    ///
    /// # Errors
    ///
    /// Returns the API error, typically [`SalonError::NotFound`].
    #[tracing::instrument(skip(self))]
    pub async fn get_car(&self, id: CarId) -> Result<Car, SalonError> {
        self.api.get_car(id).await
    }

    /// Add a car and append the server's copy to the cache.
    ///
    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] if the draft breaks a form rule, or
    /// the API error. Nothing is cached on failure.
    #[tracing::instrument(skip(self, draft), fields(brand = %draft.brand, model = %draft.model))]
    pub async fn add_car(&self, draft: &CarDraft) -> Result<Car, SalonError> {
        draft.validate()?;
        let car = self.api.create_car(draft).await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to add car");
        })?;
        self.cars.modify(|cars| {
            cars.push(car.clone());
            true
        });
        announce(&self.publisher, ChangeEvent::CarAdded { car: car.clone() }).await;
        Ok(car)
    }

    /// Update a car and patch it in place.
    ///
    /// A car the cache does not know about is not inserted and subscribers
    /// are not notified.
    ///
    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] if the draft breaks a form rule, or
    /// the API error. The cache is untouched on failure.
    #[tracing::instrument(skip(self, draft))]
    pub async fn update_car(&self, id: CarId, draft: &CarDraft) -> Result<Car, SalonError> {
        draft.validate()?;
        let car = self.api.update_car(id, draft).await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to update car");
        })?;
        self.patch(id, car.clone()).await;
        Ok(car)
    }

    /// Delete a car and drop it from the cache.
    ///
    /// # Errors
    ///
    /// Returns the API error. The cache is untouched on failure.
    #[tracing::instrument(skip(self))]
    pub async fn delete_car(&self, id: CarId) -> Result<(), SalonError> {
        self.api.delete_car(id).await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to delete car");
        })?;
        self.cars.modify(|cars| {
            cars.retain(|c| c.id != id);
            true
        });
        announce(&self.publisher, ChangeEvent::CarRemoved { id }).await;
        Ok(())
    }

    /// Rent a car for the current user, then refresh it.
    ///
    /// # Errors
    ///
    /// Returns the API error (e.g. the car is not available for rent).
    #[tracing::instrument(skip(self))]
    pub async fn rent_car(&self, id: CarId) -> Result<(), SalonError> {
        self.api.rent_car(id).await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to rent car");
        })?;
        self.refresh(id).await;
        Ok(())
    }

    /// Give a rented car back, then refresh it.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    #[tracing::instrument(skip(self))]
    pub async fn return_car(&self, id: CarId) -> Result<(), SalonError> {
        self.api.return_car(id).await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to return car");
        })?;
        self.refresh(id).await;
        Ok(())
    }

    /// Buy a car for the current user, then refresh it.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    #[tracing::instrument(skip(self))]
    pub async fn buy_car(&self, id: CarId) -> Result<(), SalonError> {
        self.api.buy_car(id).await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to buy car");
        })?;
        self.refresh(id).await;
        Ok(())
    }

    /// Request a leasing quote, then refresh the car.
    ///
    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] for a malformed request, or the API
    /// error.
    #[tracing::instrument(skip(self))]
    pub async fn lease_car(
        &self,
        id: CarId,
        request: &LeasingRequest,
    ) -> Result<LeasingResponse, SalonError> {
        request.validate()?;
        let quote = self.api.lease_car(id, request).await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to lease car");
        })?;
        self.refresh(id).await;
        Ok(quote)
    }

    /// Who currently rents `id`.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    #[tracing::instrument(skip(self))]
    pub async fn renter(&self, id: CarId) -> Result<CarRenter, SalonError> {
        self.api.get_renter(id).await
    }

    /// Re-fetch one car and patch it in place. Failures are logged only: the
    /// mutation that triggered the refresh already succeeded.
    async fn refresh(&self, id: CarId) {
        match self.api.get_car(id).await {
            Ok(car) => self.patch(id, car).await,
            Err(err) => tracing::warn!(car_id = %id, error = %err, "failed to refresh car"),
        }
    }

    async fn patch(&self, id: CarId, car: Car) {
        let patched = self.cars.modify(|cars| match cars.iter().position(|c| c.id == id) {
            Some(index) => {
                cars[index] = car.clone();
                true
            }
            None => false,
        });
        if patched {
            announce(&self.publisher, ChangeEvent::CarUpdated { car }).await;
        } else {
            tracing::debug!(car_id = %id, "car not cached, nothing to patch");
        }
    }
}
