//! Reference-instant generators for field-name sampling.
//!
//! Name tables are derived by formatting representative instants and pulling
//! one field out of each. All anchors are fixed constants so the resulting
//! tables are a pure function of locale configuration, which is what makes
//! caching them forever safe.

use crate::error::FormatError;
use crate::instant::Instant;

/// Every sample lives in this year.
pub const REFERENCE_YEAR: i32 = 2016;

// 2016-11-13 is a Sunday, so the seven sampled days run Sunday through
// Saturday and index 0 of a weekday table is always Sunday.
const WEEKDAY_ANCHOR_MONTH: u32 = 11;
const WEEKDAY_ANCHOR_DAY: u32 = 13;

// One morning hour and one afternoon hour, in AM/PM order.
const MERIDIEM_HOURS: [u32; 2] = [9, 13];

// One BCE year and one CE year, in BC/AD order.
const ERA_YEARS: [i32; 2] = [-40, REFERENCE_YEAR];

/// Applies `f` to the first day of each month of the reference year, in
/// calendar order.
pub fn map_months<T>(
    mut f: impl FnMut(&Instant) -> Result<T, FormatError>,
) -> Result<Vec<T>, FormatError> {
    let mut out = Vec::with_capacity(12);
    for month in 1..=12 {
        let instant = Instant::from_ymd(REFERENCE_YEAR, month, 1)?;
        out.push(f(&instant)?);
    }
    Ok(out)
}

/// Applies `f` to seven consecutive days starting at the Sunday anchor.
pub fn map_weekdays<T>(
    mut f: impl FnMut(&Instant) -> Result<T, FormatError>,
) -> Result<Vec<T>, FormatError> {
    let mut out = Vec::with_capacity(7);
    for offset in 0..7 {
        let instant = Instant::from_ymd(
            REFERENCE_YEAR,
            WEEKDAY_ANCHOR_MONTH,
            WEEKDAY_ANCHOR_DAY + offset,
        )?;
        out.push(f(&instant)?);
    }
    Ok(out)
}

/// Applies `f` to one ante-meridiem and one post-meridiem instant.
pub fn map_meridiems<T>(
    mut f: impl FnMut(&Instant) -> Result<T, FormatError>,
) -> Result<Vec<T>, FormatError> {
    let mut out = Vec::with_capacity(2);
    for hour in MERIDIEM_HOURS {
        let instant = Instant::from_ymd_hms(REFERENCE_YEAR, 1, 1, hour, 0, 0)?;
        out.push(f(&instant)?);
    }
    Ok(out)
}

/// Applies `f` to one instant in each era, earlier era first.
pub fn map_eras<T>(
    mut f: impl FnMut(&Instant) -> Result<T, FormatError>,
) -> Result<Vec<T>, FormatError> {
    let mut out = Vec::with_capacity(2);
    for year in ERA_YEARS {
        let instant = Instant::from_ymd(year, 1, 1)?;
        out.push(f(&instant)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    #[test]
    fn months_are_sampled_in_calendar_order() {
        let months = map_months(|inst| Ok(inst.wall().month())).unwrap();
        assert_eq!(months, (1..=12).collect::<Vec<_>>());
        let days = map_months(|inst| Ok(inst.wall().day())).unwrap();
        assert!(days.iter().all(|&d| d == 1));
    }

    #[test]
    fn weekday_window_is_seven_consecutive_days_starting_sunday() {
        let weekdays = map_weekdays(|inst| Ok(inst.wall().weekday())).unwrap();
        assert_eq!(weekdays[0], Weekday::Sun);
        assert_eq!(weekdays[6], Weekday::Sat);
        assert_eq!(weekdays.len(), 7);
        let mut seen = weekdays.clone();
        seen.dedup();
        assert_eq!(seen.len(), 7, "all sampled weekdays are distinct");
    }

    #[test]
    fn sample_instants_are_universal() {
        map_months(|inst| {
            assert!(inst.zone().is_universal());
            Ok(())
        })
        .unwrap();
        map_eras(|inst| {
            assert!(inst.zone().is_universal());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn meridiem_samples_straddle_noon() {
        let hours = map_meridiems(|inst| Ok(chrono::Timelike::hour(&inst.wall()))).unwrap();
        assert!(hours[0] < 12 && hours[1] >= 12);
    }

    #[test]
    fn era_samples_straddle_year_one() {
        let years = map_eras(|inst| Ok(inst.wall().year())).unwrap();
        assert!(years[0] <= 0 && years[1] > 0);
    }
}
