//! Change events: what happened to a cache, for consumers that want deltas
//! rather than whole snapshots.

use serde::Serialize;

use crate::car::Car;
use crate::id::CarId;
use crate::user::User;

/// A change applied to one of the client-side caches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    SessionStarted { user: User },
    SessionEnded,
    CarsReloaded { count: usize },
    CarAdded { car: Car },
    CarUpdated { car: Car },
    CarRemoved { id: CarId },
    CustomersReloaded { count: usize },
    CustomersCleared,
    CustomerAdded { customer: User },
}

impl ChangeEvent {
    /// Short machine-readable name, used as a log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. } => "session_started",
            Self::SessionEnded => "session_ended",
            Self::CarsReloaded { .. } => "cars_reloaded",
            Self::CarAdded { .. } => "car_added",
            Self::CarUpdated { .. } => "car_updated",
            Self::CarRemoved { .. } => "car_removed",
            Self::CustomersReloaded { .. } => "customers_reloaded",
            Self::CustomersCleared => "customers_cleared",
            Self::CustomerAdded { .. } => "customer_added",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_with_type_tag() {
        let value = serde_json::to_value(ChangeEvent::CarRemoved { id: CarId::new(3) }).unwrap();
        assert_eq!(value["type"], "car_removed");
        assert_eq!(value["id"], 3);
    }

    #[test]
    fn should_match_kind_with_serialized_tag() {
        let event = ChangeEvent::CustomersReloaded { count: 2 };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], event.kind());
    }
}
