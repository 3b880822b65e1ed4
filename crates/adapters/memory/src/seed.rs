//! Demo data loaded by [`MemoryBackend::with_demo_data`](crate::MemoryBackend::with_demo_data).

use salon_domain::car::CarDraft;
use salon_domain::user::NewCustomer;

pub(crate) fn dealer() -> NewCustomer {
    NewCustomer::new("dealer", "dealer", "Jan", "Kowalski")
}

pub(crate) fn customers() -> Vec<NewCustomer> {
    vec![
        NewCustomer::new("ola", "ola123", "Ola", "Nowak"),
        NewCustomer::new("piotr", "piotr123", "Piotr", "Wiśniewski"),
    ]
}

pub(crate) fn cars() -> Vec<CarDraft> {
    [
        ("Toyota", "Corolla", 2020, "JTDBR32E720123456", 80_000.0, 132),
        ("BMW", "M3", 2018, "WBS8M9C50J5K12345", 250_000.0, 431),
        ("Audi", "A4", 2011, "WAUZZZ8K9BA123456", 45_000.0, 143),
        ("Ford", "Mustang", 2017, "1FA6P8CF5H5123456", 160_000.0, 310),
    ]
    .into_iter()
    .map(|(brand, model, year, vin, price, horse_power)| CarDraft {
        brand: brand.to_string(),
        model: model.to_string(),
        year,
        vin: vin.to_string(),
        price,
        horse_power,
        is_available_for_rent: true,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn should_use_distinct_usernames() {
        let accounts: Vec<_> = std::iter::once(dealer()).chain(customers()).collect();
        let usernames: HashSet<_> = accounts.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(usernames.len(), accounts.len());
    }
}
