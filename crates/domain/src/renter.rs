//! Car–renter join record.

use serde::{Deserialize, Serialize};

use crate::id::{CarId, UserId};

/// Who currently rents a car. `renter_id` is `None` when nobody does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRenter {
    pub car_id: CarId,
    #[serde(default)]
    pub renter_id: Option<UserId>,
}

impl CarRenter {
    #[must_use]
    pub fn is_rented_by(&self, user: UserId) -> bool {
        self.renter_id == Some(user)
    }
}
