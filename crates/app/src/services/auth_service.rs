//! Authentication service: owns the current-user cache.

use tokio::sync::watch;

use salon_domain::error::SalonError;
use salon_domain::event::ChangeEvent;
use salon_domain::user::{Credentials, Registration, User};

use crate::ports::{AuthApi, AuthOutcome, EventPublisher};
use crate::services::announce;
use crate::store::Store;

/// Holds who is signed in and keeps it in step with the server session.
///
/// The cache starts empty (`None`) until [`probe_session`](Self::probe_session)
/// or a successful [`login`](Self::login) fills it.
pub struct AuthenticationService<A, P> {
    api: A,
    publisher: P,
    current: Store<Option<User>>,
}

impl<A: AuthApi, P: EventPublisher> AuthenticationService<A, P> {
    /// Create a new service with an empty session.
    pub fn new(api: A, publisher: P) -> Self {
        Self {
            api,
            publisher,
            current: Store::new(None),
        }
    }

    /// Ask the server who owns the current session.
    ///
    /// One-shot: on any failure the cache is set to `None` and the failure is
    /// only logged. Returns the user now cached.
    #[tracing::instrument(skip(self))]
    pub async fn probe_session(&self) -> Option<User> {
        match self.api.current_user().await {
            Ok(user) => {
                tracing::info!(username = %user.username, dealer = user.is_dealer, "session restored");
                self.set_user(Some(user.clone())).await;
                Some(user)
            }
            Err(err) => {
                tracing::debug!(error = %err, "no active session");
                self.set_user(None).await;
                None
            }
        }
    }

    /// Sign in. The cache is only touched when the server returns a user.
    ///
    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] for empty credentials, or the error
    /// reported by the API. A failed login leaves the cache as it was.
    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthOutcome, SalonError> {
        credentials.validate()?;
        let outcome = self.api.login(credentials).await?;
        if let Some(user) = &outcome.user {
            self.set_user(Some(user.clone())).await;
        }
        Ok(outcome)
    }

    /// Create an account. If the server signs the new account in right away
    /// (returns a user), the cache follows.
    ///
    /// # Errors
    ///
    /// Returns [`SalonError::Validation`] for missing fields, or the error
    /// reported by the API.
    #[tracing::instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<AuthOutcome, SalonError> {
        registration.validate()?;
        let outcome = self.api.register(registration).await?;
        if let Some(user) = &outcome.user {
            self.set_user(Some(user.clone())).await;
        }
        Ok(outcome)
    }

    /// End the session and clear the cache.
    ///
    /// # Errors
    ///
    /// Returns the error reported by the API; the cache is left untouched.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), SalonError> {
        self.api.logout().await?;
        self.set_user(None).await;
        Ok(())
    }

    /// The cached user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.current.get()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.current.read(Option::is_some)
    }

    #[must_use]
    pub fn is_dealer(&self) -> bool {
        self.current.read(|u| u.as_ref().is_some_and(|u| u.is_dealer))
    }

    /// Follow the current user.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }

    async fn set_user(&self, user: Option<User>) {
        let event = match &user {
            Some(user) => ChangeEvent::SessionStarted { user: user.clone() },
            None => ChangeEvent::SessionEnded,
        };
        self.current.replace(user);
        announce(&self.publisher, event).await;
    }
}
