//! Week/date utilities: timezone-aware "today" and week boundaries.

use anyhow::Result;
use chrono::{Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// Sunday on or before `date`. Plans are keyed by this date.
pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Today's calendar date in an IANA timezone like "America/Chicago".
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

/// Start of the current week in `tz`.
pub fn current_week_start(tz: &str) -> Result<NaiveDate> {
    Ok(week_start_for(today_in(tz)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_start_is_previous_sunday() {
        // 2026-10-16 is a Friday
        let fri = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(week_start_for(fri), NaiveDate::from_ymd_opt(2026, 10, 11).unwrap());
    }

    #[test]
    fn test_week_start_on_sunday_is_same_day() {
        let sun = NaiveDate::from_ymd_opt(2026, 10, 11).unwrap();
        assert_eq!(week_start_for(sun), sun);
    }

    #[test]
    fn test_invalid_timezone() {
        assert!(today_in("Mars/Olympus_Mons").is_err());
        assert!(today_in("America/Chicago").is_ok());
    }
}
