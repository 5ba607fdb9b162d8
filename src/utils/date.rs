//! `BirdNET` calendar helpers for location filtering.
//!
//! The meta model is trained on a 48-week year, so request dates are snapped
//! to the start of their `BirdNET` week before scoring.

use crate::constants::calendar::DAYS_IN_MONTH;
use crate::constants::range_filter::{DAYS_PER_WEEK, WEEKS_PER_YEAR, YEAR_START_DAY};
use chrono::Datelike;

/// Convert month/day to week number (1-48).
///
/// Assumes a non-leap year; Feb 29 maps to the same week as Mar 1.
pub fn date_to_week(month: u32, day: u32) -> u32 {
    let month = month.clamp(1, 12);
    let day_of_year: u32 = DAYS_IN_MONTH.iter().take((month - 1) as usize).sum::<u32>() + day.max(1);

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let week = ((day_of_year - 1) as f32 / DAYS_PER_WEEK).floor() as u32 + 1;

    week.min(WEEKS_PER_YEAR)
}

/// Convert day of year (1-365) to (month, day).
pub fn day_of_year_to_date(day_of_year: u32) -> (u32, u32) {
    let mut remaining = day_of_year;
    for (month_idx, &days_in_month) in DAYS_IN_MONTH.iter().enumerate() {
        if remaining <= days_in_month {
            #[allow(clippy::cast_possible_truncation)]
            return ((month_idx + 1) as u32, remaining);
        }
        remaining -= days_in_month;
    }

    (12, 31)
}

/// Starting day of year for a `BirdNET` week (1-48).
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn week_to_start_day(week: u32) -> u32 {
    ((week.max(1) - 1) as f32).mul_add(DAYS_PER_WEEK, YEAR_START_DAY) as u32
}

/// Month and day at the start of the `BirdNET` week containing `date`.
pub fn week_start_of<D: Datelike>(date: &D) -> (u32, u32) {
    let week = date_to_week(date.month(), date.day());
    day_of_year_to_date(week_to_start_day(week))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_date_to_week_jan_1() {
        assert_eq!(date_to_week(1, 1), 1);
    }

    #[test]
    fn test_date_to_week_dec_31() {
        assert_eq!(date_to_week(12, 31), 48);
    }

    #[test]
    fn test_date_to_week_jun_15() {
        // Day 166: (166 - 1) / 7.6 = 21.71 -> 22
        assert_eq!(date_to_week(6, 15), 22);
    }

    #[test]
    fn test_week_to_start_day() {
        assert_eq!(week_to_start_day(1), 1);
        // (24-1) * 7.6 + 1 = 175.8 -> 175
        assert_eq!(week_to_start_day(24), 175);
        assert_eq!(week_to_start_day(48), 358);
    }

    #[test]
    fn test_day_of_year_to_date() {
        assert_eq!(day_of_year_to_date(1), (1, 1));
        assert_eq!(day_of_year_to_date(166), (6, 15));
        assert_eq!(day_of_year_to_date(365), (12, 31));
        assert_eq!(day_of_year_to_date(400), (12, 31));
    }

    #[test]
    fn test_week_start_of_snaps_to_week_boundary() {
        // July 1 is in week 24, which starts on day 175 (June 24).
        let date = NaiveDate::from_ymd_opt(2024, 7, 1);
        assert_eq!(date.map(|d| week_start_of(&d)), Some((6, 24)));
    }

    #[test]
    fn test_week_start_of_leap_day() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29);
        // Day 60 -> week 8 -> start day 54 (Feb 23)
        assert_eq!(date.map(|d| week_start_of(&d)), Some((2, 23)));
    }
}
