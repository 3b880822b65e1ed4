//! # salon-adapter-http-reqwest
//!
//! Client for the dealership REST API built on `reqwest`.
//!
//! The client keeps a cookie jar: the session cookie set by `/login` or
//! `/register` is sent back on every later request, and the server clearing
//! it on `/logout` ends the session.
//!
//! ## Dependency rule
//!
//! Depends on `salon-domain` and `salon-app` (for port traits).

pub mod config;
pub mod error;
mod wire;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use salon_app::ports::{AuthApi, AuthOutcome, CarApi, CreatedCustomer, CustomerApi};
use salon_domain::car::{Car, CarDraft};
use salon_domain::error::SalonError;
use salon_domain::id::CarId;
use salon_domain::leasing::{LeasingRequest, LeasingResponse};
use salon_domain::renter::CarRenter;
use salon_domain::user::{Credentials, NewCustomer, Registration, User};

pub use config::HttpConfig;
pub use error::HttpError;
use wire::{AuthBody, CreatedCustomerBody, CurrentUserBody, ErrorBody};

/// Dealership API over HTTP. Clones share the connection pool and the
/// cookie jar, so they share the session too.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// Build a client for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] for a malformed base URL, or
    /// [`HttpError::Request`] if the TLS backend cannot be initialised.
    pub fn new(config: &HttpConfig) -> Result<Self, HttpError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|err| HttpError::InvalidUrl(format!("{}: {err}", config.base_url)))?;
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout())
            .build()
            .map_err(HttpError::Request)?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send one request to `path` (relative to the base URL) and fail on any
    /// non-success status.
    async fn send(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, HttpError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| HttpError::InvalidUrl(format!("{path}: {err}")))?;
        let request = build(self.client.request(method.clone(), url));
        let resp = request.send().await.map_err(HttpError::Request)?;
        tracing::debug!(%method, path, status = resp.status().as_u16(), "api call");
        check_response(method, path, resp).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<T, HttpError> {
        self.send(method, path, build)
            .await?
            .json()
            .await
            .map_err(HttpError::Decode)
    }

    /// POST with an empty JSON object, the way the car actions expect it.
    async fn post_action(&self, path: &str) -> Result<(), HttpError> {
        self.send(Method::POST, path, |req| req.json(&serde_json::json!({})))
            .await?;
        Ok(())
    }
}

async fn check_response(method: Method, path: &str, resp: Response) -> Result<Response, HttpError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    Err(HttpError::Status {
        method,
        path: path.to_string(),
        status: status.as_u16(),
        message,
    })
}

fn no_body(req: RequestBuilder) -> RequestBuilder {
    req
}

impl AuthApi for HttpApi {
    async fn current_user(&self) -> Result<User, SalonError> {
        let body: CurrentUserBody = self.fetch(Method::GET, "current-user", no_body).await?;
        Ok(body.user)
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthOutcome, SalonError> {
        let body: AuthBody = self
            .fetch(Method::POST, "login", |req| req.json(credentials))
            .await?;
        Ok(AuthOutcome {
            message: body.message,
            user: body.user,
        })
    }

    async fn register(&self, registration: &Registration) -> Result<AuthOutcome, SalonError> {
        let body: AuthBody = self
            .fetch(Method::POST, "register", |req| req.json(registration))
            .await?;
        Ok(AuthOutcome {
            message: body.message,
            user: body.user,
        })
    }

    async fn logout(&self) -> Result<(), SalonError> {
        self.post_action("logout").await?;
        Ok(())
    }
}

impl CarApi for HttpApi {
    async fn list_cars(&self) -> Result<Vec<Car>, SalonError> {
        Ok(self.fetch(Method::GET, "cars", no_body).await?)
    }

    async fn get_car(&self, id: CarId) -> Result<Car, SalonError> {
        Ok(self.fetch(Method::GET, &format!("cars/{id}"), no_body).await?)
    }

    async fn create_car(&self, draft: &CarDraft) -> Result<Car, SalonError> {
        Ok(self
            .fetch(Method::POST, "cars", |req| req.json(draft))
            .await?)
    }

    async fn update_car(&self, id: CarId, draft: &CarDraft) -> Result<Car, SalonError> {
        Ok(self
            .fetch(Method::PUT, &format!("cars/{id}"), |req| req.json(draft))
            .await?)
    }

    async fn delete_car(&self, id: CarId) -> Result<(), SalonError> {
        self.send(Method::DELETE, &format!("cars/{id}"), no_body)
            .await?;
        Ok(())
    }

    async fn rent_car(&self, id: CarId) -> Result<(), SalonError> {
        Ok(self.post_action(&format!("cars/{id}/rent")).await?)
    }

    async fn return_car(&self, id: CarId) -> Result<(), SalonError> {
        Ok(self.post_action(&format!("cars/{id}/return")).await?)
    }

    async fn buy_car(&self, id: CarId) -> Result<(), SalonError> {
        Ok(self.post_action(&format!("cars/{id}/buy")).await?)
    }

    async fn get_renter(&self, id: CarId) -> Result<CarRenter, SalonError> {
        Ok(self
            .fetch(Method::GET, &format!("cars/{id}/renter"), no_body)
            .await?)
    }

    async fn lease_car(
        &self,
        id: CarId,
        request: &LeasingRequest,
    ) -> Result<LeasingResponse, SalonError> {
        Ok(self
            .fetch(Method::POST, &format!("cars/{id}/leasing"), |req| {
                req.json(request)
            })
            .await?)
    }
}

impl CustomerApi for HttpApi {
    async fn list_customers(&self) -> Result<Vec<User>, SalonError> {
        Ok(self.fetch(Method::GET, "users", no_body).await?)
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<CreatedCustomer, SalonError> {
        let body: CreatedCustomerBody = self
            .fetch(Method::POST, "admin/create-customer", |req| req.json(customer))
            .await?;
        Ok(CreatedCustomer {
            message: body.message,
            user: body.user,
        })
    }
}
