//! Stay dates for booking scenarios.

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// A one-night stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stay {
    /// Arrival day
    pub checkin: NaiveDate,
    /// Departure day, always the day after arrival
    pub checkout: NaiveDate,
}

impl Stay {
    /// One night starting `checkin`
    #[must_use]
    pub fn starting(checkin: NaiveDate) -> Self {
        Self {
            checkin,
            checkout: checkin + Days::new(1),
        }
    }

    /// One night starting tomorrow
    #[must_use]
    pub fn tomorrow(today: NaiveDate) -> Self {
        Self::starting(today + Days::new(1))
    }

    /// One night starting 1 to 100 days ahead, chosen from the clock so
    /// repeated runs rarely book the same night
    #[must_use]
    pub fn spread(today: NaiveDate, now_millis: i64) -> Self {
        let offset = now_millis.rem_euclid(100).unsigned_abs() + 1;
        Self::starting(today + Days::new(offset))
    }

    /// Random future stay from the local clock
    #[must_use]
    pub fn random_future() -> Self {
        let now = chrono::Local::now();
        Self::spread(now.date_naive(), now.timestamp_millis())
    }

    /// `M/D/YYYY` pair as the booking widget expects
    #[must_use]
    pub fn us_format(&self) -> (String, String) {
        (us_date(self.checkin), us_date(self.checkout))
    }

    /// `YYYY-MM-DD` pair as the reservation URL expects
    #[must_use]
    pub fn iso_format(&self) -> (String, String) {
        (
            self.checkin.format("%Y-%m-%d").to_string(),
            self.checkout.format("%Y-%m-%d").to_string(),
        )
    }
}

/// `M/D/YYYY` without zero padding
#[must_use]
pub fn us_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_us_format_has_no_padding() {
        let stay = Stay::starting(date(2026, 3, 5));
        assert_eq!(
            stay.us_format(),
            ("3/5/2026".to_string(), "3/6/2026".to_string())
        );
    }

    #[test]
    fn test_iso_format_crosses_year() {
        let stay = Stay::tomorrow(date(2026, 12, 30));
        assert_eq!(
            stay.iso_format(),
            ("2026-12-31".to_string(), "2027-01-01".to_string())
        );
    }

    #[test]
    fn test_spread_offset_from_millis() {
        let today = date(2026, 1, 1);
        assert_eq!(Stay::spread(today, 0).checkin, date(2026, 1, 2));
        assert_eq!(Stay::spread(today, 1_234_599).checkin, date(2026, 4, 11));
    }

    proptest! {
        #[test]
        fn prop_spread_is_within_hundred_days(millis in any::<i64>(), day in 0u32..365) {
            let today = date(2026, 1, 1) + Days::new(u64::from(day));
            let stay = Stay::spread(today, millis);
            let ahead = (stay.checkin - today).num_days();
            prop_assert!((1..=100).contains(&ahead));
            prop_assert_eq!((stay.checkout - stay.checkin).num_days(), 1);
        }

        #[test]
        fn prop_us_date_round_trips(day in 0u32..3650) {
            let d = date(2020, 1, 1) + Days::new(u64::from(day));
            let parsed = NaiveDate::parse_from_str(&us_date(d), "%m/%d/%Y").unwrap();
            prop_assert_eq!(parsed, d);
        }
    }
}
