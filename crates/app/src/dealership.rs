//! Dealership: the three services wired over one API, with the startup
//! sequence every front-end runs.

use std::sync::Arc;

use salon_domain::catalog::{Catalog, CatalogView};

use crate::ports::{AuthApi, CarApi, CustomerApi, EventPublisher};
use crate::services::auth_service::AuthenticationService;
use crate::services::car_service::CarService;
use crate::services::customer_service::{CustomerService, Follower};

/// All client-side caches for one session.
///
/// Services are `Arc`-ed so views can hold on to them independently; the
/// customer follower lives as long as the `Dealership`.
pub struct Dealership<A, P> {
    auth: Arc<AuthenticationService<A, P>>,
    cars: Arc<CarService<A, P>>,
    customers: Arc<CustomerService<A, P>>,
    follower: Follower,
}

impl<A, P> Dealership<A, P>
where
    A: AuthApi + CarApi + CustomerApi + Clone + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    /// Build the services and run the startup sequence: probe the session,
    /// load the cars, then start following the session for customers.
    ///
    /// Startup never fails: a missing session or an unreachable car list
    /// leaves the corresponding cache empty.
    #[tracing::instrument(skip_all)]
    pub async fn start(api: A, publisher: P) -> Self {
        let auth = Arc::new(AuthenticationService::new(api.clone(), publisher.clone()));
        let cars = Arc::new(CarService::new(api.clone(), publisher.clone()));
        let customers = Arc::new(CustomerService::new(api, publisher));

        auth.probe_session().await;
        if let Err(err) = cars.load().await {
            tracing::warn!(error = %err, "starting with an empty car list");
        }
        let follower = Arc::clone(&customers).follow(auth.subscribe()).await;

        tracing::info!(
            signed_in = auth.is_logged_in(),
            cars = cars.cars().len(),
            customers = customers.customers().len(),
            "dealership ready"
        );

        Self {
            auth,
            cars,
            customers,
            follower,
        }
    }
}

impl<A, P> Dealership<A, P>
where
    A: AuthApi + CarApi + CustomerApi,
    P: EventPublisher,
{
    #[must_use]
    pub fn auth(&self) -> &Arc<AuthenticationService<A, P>> {
        &self.auth
    }

    #[must_use]
    pub fn cars(&self) -> &Arc<CarService<A, P>> {
        &self.cars
    }

    #[must_use]
    pub fn customers(&self) -> &Arc<CustomerService<A, P>> {
        &self.customers
    }

    /// Whether the customer cache is still following the session.
    #[must_use]
    pub fn is_following_session(&self) -> bool {
        self.follower.is_running()
    }

    /// Render the current car cache through `catalog` for the current user.
    #[must_use]
    pub fn catalog_view(&self, catalog: &Catalog) -> CatalogView {
        let user = self.auth.current_user();
        catalog.view(user.as_ref(), &self.cars.cars())
    }
}
