//! Catalog: the car list as a signed-in (or anonymous) user sees it.
//!
//! The catalog splits a car snapshot into the user's own cars, the cars the
//! user rents, and the cars still for sale. The for-sale list can be narrowed
//! by a brand search and ordered by price or horse power. Each sort key
//! toggles between ascending and descending on repeated use; choosing one key
//! resets the other to ascending.

use std::cmp::Ordering;

use crate::car::Car;
use crate::user::User;

/// Column the for-sale list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Price,
    HorsePower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The partitions derived from one car snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogView {
    /// Cars whose owner is the current user.
    pub owned: Vec<Car>,
    /// Cars currently rented by the current user.
    pub rented: Vec<Car>,
    /// Cars without an owner, after brand search and sorting.
    pub for_sale: Vec<Car>,
}

/// Search and sort preferences applied to every new car snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    brand_query: String,
    active: Option<(SortKey, SortDirection)>,
    next_price: SortDirection,
    next_horse_power: SortDirection,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive brand substring. Empty matches everything.
    pub fn set_brand_query(&mut self, query: impl Into<String>) {
        self.brand_query = query.into();
    }

    #[must_use]
    pub fn brand_query(&self) -> &str {
        &self.brand_query
    }

    /// The ordering currently applied, if any.
    #[must_use]
    pub fn active_sort(&self) -> Option<(SortKey, SortDirection)> {
        self.active
    }

    /// Order by `key`, flipping direction each time the same key is chosen.
    ///
    /// Returns the direction that is now applied.
    pub fn toggle_sort(&mut self, key: SortKey) -> SortDirection {
        let direction = match key {
            SortKey::Price => {
                let dir = self.next_price;
                self.next_price = dir.reversed();
                self.next_horse_power = SortDirection::Ascending;
                dir
            }
            SortKey::HorsePower => {
                let dir = self.next_horse_power;
                self.next_horse_power = dir.reversed();
                self.next_price = SortDirection::Ascending;
                dir
            }
        };
        self.active = Some((key, direction));
        direction
    }

    /// Order by `key` in an explicit direction.
    pub fn sort_by(&mut self, key: SortKey, direction: SortDirection) {
        match key {
            SortKey::Price => {
                self.next_price = direction.reversed();
                self.next_horse_power = SortDirection::Ascending;
            }
            SortKey::HorsePower => {
                self.next_horse_power = direction.reversed();
                self.next_price = SortDirection::Ascending;
            }
        }
        self.active = Some((key, direction));
    }

    /// Derive the partitions for `user` from a car snapshot.
    ///
    /// Anonymous users own and rent nothing.
    #[must_use]
    pub fn view(&self, user: Option<&User>, cars: &[Car]) -> CatalogView {
        let (owned, rented) = match user {
            Some(user) => (
                cars.iter().filter(|c| c.is_owned_by(user.id)).cloned().collect(),
                cars.iter().filter(|c| c.is_rented_by(user.id)).cloned().collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        let needle = self.brand_query.to_lowercase();
        let mut for_sale: Vec<Car> = cars
            .iter()
            .filter(|c| c.is_for_sale())
            .filter(|c| c.brand.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        if let Some((key, direction)) = self.active {
            for_sale.sort_by(|a, b| {
                let ord = compare(key, a, b);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        CatalogView {
            owned,
            rented,
            for_sale,
        }
    }
}

fn compare(key: SortKey, a: &Car, b: &Car) -> Ordering {
    match key {
        SortKey::Price => a.price.total_cmp(&b.price),
        SortKey::HorsePower => a.horse_power.cmp(&b.horse_power),
    }
}
