//! Event bus port: publish/subscribe for cache change events.

use std::future::Future;

use salon_domain::error::SalonError;
use salon_domain::event::ChangeEvent;

/// Publishes change events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: ChangeEvent) -> impl Future<Output = Result<(), SalonError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: ChangeEvent) -> impl Future<Output = Result<(), SalonError>> + Send {
        (**self).publish(event)
    }
}
