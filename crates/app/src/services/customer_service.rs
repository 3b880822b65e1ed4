//! Customer service: owns the customer-collection cache.
//!
//! Only dealers may see customers, so the cache follows the current session:
//! it is loaded whenever a dealer signs in and cleared for anyone else.
//! Every session change bumps an epoch; a response that comes back after the
//! epoch moved on belongs to a session that is gone and is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use salon_domain::error::SalonError;
use salon_domain::event::ChangeEvent;
use salon_domain::id::UserId;
use salon_domain::user::{Customer, NewCustomer, User};

use crate::ports::{CreatedCustomer, CustomerApi, EventPublisher};
use crate::services::announce;
use crate::store::Store;

/// Application service for customer accounts.
pub struct CustomerService<A, P> {
    api: A,
    publisher: P,
    customers: Store<Vec<Customer>>,
    epoch: AtomicU64,
    synced: Store<Option<UserId>>,
}

impl<A: CustomerApi, P: EventPublisher> CustomerService<A, P> {
    /// Create a new service with an empty cache.
    pub fn new(api: A, publisher: P) -> Self {
        Self {
            api,
            publisher,
            customers: Store::default(),
            epoch: AtomicU64::new(0),
            synced: Store::default(),
        }
    }

    fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch() == epoch
    }

    /// Fetch every customer and replace the cache.
    ///
    /// # Errors
    ///
    /// Returns the API error. The cache is cleared so a stale list is never
    /// shown after a failed reload.
    ///
    /// When the session changes while the request is in flight, the response
    /// is discarded and the cache is left to the newer session.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Result<usize, SalonError> {
        let epoch = self.epoch();
        let result = self.api.list_customers().await;
        if !self.is_current(epoch) {
            tracing::debug!("session changed during load, discarding customer list");
            return result.map(|customers| customers.len());
        }
        match result {
            Ok(customers) => {
                let count = customers.len();
                self.customers.replace(customers);
                announce(&self.publisher, ChangeEvent::CustomersReloaded { count }).await;
                Ok(count)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load customers");
                self.clear().await;
                Err(err)
            }
        }
    }

    /// Snapshot of the cached customers.
    #[must_use]
    pub fn customers(&self) -> Vec<Customer> {
        self.customers.get()
    }

    /// Follow the customer collection.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Customer>> {
        self.customers.subscribe()
    }

    /// Create a customer account and append it to the cache.
    ///
    /// The account is only appended when the session that asked for it is
    /// still current once the server answers.
    ///
    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] for missing fields, or the API error
    /// (e.g. [`SalonError::Forbidden`] for non-dealers).
    #[tracing::instrument(skip(self, customer), fields(username = %customer.username))]
    pub async fn add_customer(&self, customer: &NewCustomer) -> Result<CreatedCustomer, SalonError> {
        customer.validate()?;
        let epoch = self.epoch();
        let created = self.api.create_customer(customer).await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to add customer");
        })?;
        if !self.is_current(epoch) {
            tracing::debug!("session changed during create, cache left untouched");
            return Ok(created);
        }
        self.customers.modify(|customers| {
            customers.push(created.user.clone());
            true
        });
        announce(
            &self.publisher,
            ChangeEvent::CustomerAdded {
                customer: created.user.clone(),
            },
        )
        .await;
        Ok(created)
    }

    /// Bring the cache in line with `user`: load for dealers, clear otherwise.
    pub async fn sync_with(&self, user: Option<&User>) {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        if user.is_some_and(|u| u.is_dealer) {
            // Failures are logged and leave the cache empty.
            let _ = self.load().await;
        } else {
            self.clear().await;
        }
        if self.is_current(epoch) {
            self.synced.replace(user.map(|u| u.id));
        }
    }

    /// Wait until the cache has been synced for `user`'s session, whether by
    /// [`sync_with`](Self::sync_with) directly or by the follower.
    pub async fn wait_synced_for(&self, user: UserId) {
        let mut synced = self.synced.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = synced.wait_for(|synced| *synced == Some(user)).await;
    }

    async fn clear(&self) {
        self.customers.replace(Vec::new());
        announce(&self.publisher, ChangeEvent::CustomersCleared).await;
    }
}

impl<A, P> CustomerService<A, P>
where
    A: CustomerApi + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    /// Sync with the current session now, then keep following it in the
    /// background.
    ///
    /// Session changes are handled one at a time. Loads started by anyone
    /// else are discarded once a newer session has been synced, so the cache
    /// always ends up matching the latest session. The follower stops when
    /// the session store is dropped or the returned handle is dropped.
    pub async fn follow(self: Arc<Self>, mut session: watch::Receiver<Option<User>>) -> Follower {
        let user = session.borrow_and_update().clone();
        self.sync_with(user.as_ref()).await;

        let task = tokio::spawn(async move {
            while session.changed().await.is_ok() {
                let user = session.borrow_and_update().clone();
                self.sync_with(user.as_ref()).await;
            }
            tracing::debug!("session store closed, customer follower stopped");
        });
        Follower { task }
    }
}

/// Background task keeping the customer cache in step with the session.
/// Dropping it stops the task.
#[derive(Debug)]
pub struct Follower {
    task: JoinHandle<()>,
}

impl Follower {
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Follower {
    fn drop(&mut self) {
        self.task.abort();
    }
}
