//! Application services: use-case implementations.
//!
//! Each service owns one [`Store`](crate::store::Store) and accepts port
//! trait implementations via generic parameters (constructor injection),
//! keeping this layer decoupled from concrete adapters.

pub mod auth_service;
pub mod car_service;
pub mod customer_service;

use salon_domain::event::ChangeEvent;

use crate::ports::EventPublisher;

/// Publish a change, logging instead of failing: the cache is already updated.
pub(crate) async fn announce<P: EventPublisher>(publisher: &P, event: ChangeEvent) {
    let kind = event.kind();
    tracing::debug!(event = kind, "cache changed");
    if let Err(err) = publisher.publish(event).await {
        tracing::warn!(event = kind, error = %err, "failed to publish change event");
    }
}
