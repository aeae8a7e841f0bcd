//! Local-calendar helpers shared by the statistics and timeline views.
//!
//! All engine arithmetic runs on epoch milliseconds; these functions are the
//! only place the viewer's local timezone enters the picture.

use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

/// Converts a local date at midnight to epoch milliseconds.
/// Handles DST ambiguity by picking the earlier time.
#[must_use]
pub fn local_midnight_ms(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    let utc = match Local.from_local_datetime(&midnight) {
        // Single or ambiguous (DST fall-back): use the earlier time
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // DST spring-forward gap at midnight is rare but possible
            // Use 1am local which is guaranteed to exist
            let one_am = date.and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap());
            Local
                .from_local_datetime(&one_am)
                .unwrap()
                .with_timezone(&Utc)
        }
    };
    utc.timestamp_millis()
}

/// The local calendar date containing the given instant.
#[must_use]
pub fn local_date_of(timestamp_ms: i64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .unwrap_or_default()
        .with_timezone(&Local)
        .date_naive()
}

/// The Monday starting the week that contains `date`.
#[must_use]
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    let days_since_monday = date.weekday().num_days_from_monday();
    date - Duration::days(i64::from(days_since_monday))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_monday_of_a_wednesday() {
        let wednesday = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        assert_eq!(
            week_monday(wednesday),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
    }

    #[test]
    fn week_monday_is_fixed_point() {
        let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(week_monday(monday), monday);
    }

    #[test]
    fn week_monday_of_a_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();
        assert_eq!(
            week_monday(sunday),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
    }

    #[test]
    fn local_midnight_roundtrips_through_local_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let midnight_ms = local_midnight_ms(date);
        assert_eq!(local_date_of(midnight_ms), date);
        // One minute before local midnight is the previous day.
        assert_eq!(
            local_date_of(midnight_ms - 60_000),
            date - Duration::days(1)
        );
    }
}
