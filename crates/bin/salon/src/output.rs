//! Plain-text rendering for the terminal.

use salon_domain::car::Car;
use salon_domain::catalog::{Catalog, CatalogView, SortDirection, SortKey};
use salon_domain::leasing::{LeasingResponse, format_amount};
use salon_domain::user::User;

pub fn user_line(user: &User) -> String {
    let role = if user.is_dealer { "dealer" } else { "customer" };
    format!("#{} {} ({}, {role})", user.id, user.full_name(), user.username)
}

pub fn car_line(car: &Car) -> String {
    let status = if car.renter_id.is_some() {
        " [rented]"
    } else if car.owner_id.is_some() {
        " [sold]"
    } else if !car.is_available_for_rent {
        " [not for rent]"
    } else {
        ""
    };
    format!(
        "#{:<4} {} {} ({})  {:>12}  {:>4} HP  VIN {}{status}",
        car.id.get(),
        car.brand,
        car.model,
        car.year,
        format_amount(car.price),
        car.horse_power,
        car.vin,
    )
}

pub fn catalog(view: &CatalogView, signed_in: bool) -> String {
    let mut out = String::new();
    if signed_in {
        section(&mut out, "Your cars", &view.owned);
        section(&mut out, "Rented by you", &view.rented);
    }
    section(&mut out, "For sale", &view.for_sale);
    out
}

/// Describe the ordering applied to `catalog`, if any.
pub fn sort_line(catalog: &Catalog) -> Option<String> {
    let (key, direction) = catalog.active_sort()?;
    let key = match key {
        SortKey::Price => "price",
        SortKey::HorsePower => "horse power",
    };
    let direction = match direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    };
    Some(format!("sorted by {key}, {direction}"))
}

fn section(out: &mut String, title: &str, cars: &[Car]) {
    out.push_str(title);
    out.push('\n');
    if cars.is_empty() {
        out.push_str("  (none)\n");
    }
    for car in cars {
        out.push_str("  ");
        out.push_str(&car_line(car));
        out.push('\n');
    }
}

/// Amounts the server sends as text are re-rendered when they parse, and
/// shown verbatim otherwise.
pub fn leasing(quote: &LeasingResponse) -> String {
    let remaining = quote
        .remaining_amount_value()
        .map_or_else(|| quote.remaining_amount.clone(), format_amount);
    let monthly_rate = quote
        .monthly_rate_value()
        .map_or_else(|| quote.monthly_rate.clone(), format_amount);
    format!(
        "{} {} (#{})\n  total price     {}\n  down payment    {}\n  remaining       {}\n  {} monthly rates of {}",
        quote.car_brand,
        quote.car_model,
        quote.car_id,
        format_amount(quote.total_price),
        format_amount(quote.down_payment),
        remaining,
        quote.months,
        monthly_rate,
    )
}
