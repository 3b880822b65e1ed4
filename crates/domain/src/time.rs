//! Time helpers.

use chrono::{Datelike, Utc};

/// The first year a production car could have been built.
pub const FIRST_CAR_YEAR: i32 = 1886;

/// Return the current calendar year (UTC).
#[must_use]
pub fn current_year() -> i32 {
    Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_year_after_first_car() {
        assert!(current_year() > FIRST_CAR_YEAR);
    }
}
