pub mod assets;
pub mod loans;
pub mod reports;

use chrono::{DateTime, NaiveDate, Utc};

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (taken as
/// midnight UTC).
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let invalid = || format!("'{s}' is not an RFC 3339 timestamp or YYYY-MM-DD date");
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| invalid())?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_instant_forms() {
        let midnight = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_instant("2024-06-01").unwrap(), midnight);
        assert_eq!(parse_instant("2024-06-01T00:00:00Z").unwrap(), midnight);
        assert_eq!(parse_instant("2024-06-01T02:00:00+02:00").unwrap(), midnight);
        assert!(parse_instant("June 1st").is_err());
    }
}
