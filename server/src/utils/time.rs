//! Time helpers
//!
//! Calendar-day windows are computed local-midnight to local-midnight and
//! converted to UTC once, at the API boundary; repositories only ever see
//! UTC instants.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {} (use YYYY-MM-DD)", date)))
}

/// Half-open UTC window `[start, end)` covering one local calendar day
///
/// DST gap fallback: if local midnight does not exist, the earliest valid
/// local instant is used.
pub fn local_day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    (day_start_utc(date), day_start_utc(date.succ_opt().unwrap_or(date)))
}

/// Today's local calendar date
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn day_start_utc(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date("2025-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_date("01/03/2025").is_err());
        assert!(parse_date("2025-13-40").is_err());
    }

    #[test]
    fn day_window_is_half_open_and_24h_wide() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let (start, end) = local_day_window(date);
        assert!(start < end);
        // 24h except across DST transitions
        let width = end - start;
        assert!(width >= chrono::Duration::hours(23));
        assert!(width <= chrono::Duration::hours(25));
    }
}
