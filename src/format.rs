use chrono::DateTime;

/// Render a duration in milliseconds for display
///
/// Durations of an hour or more drop the residual seconds ("1h 1m");
/// shorter ones show minutes and seconds ("12m 5s"). Missing or zero
/// durations render as "Unknown".
pub fn format_duration(millis: Option<u64>) -> String {
    let millis = match millis {
        Some(ms) if ms > 0 => ms,
        _ => return "Unknown".to_string(),
    };

    let seconds = millis / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else {
        format!("{}m {}s", minutes, seconds % 60)
    }
}

/// Reduce an ISO 8601 timestamp to its calendar day (YYYY-MM-DD)
///
/// The day is taken as written, without converting time zones.
pub fn format_date(iso_date: Option<&str>) -> String {
    let iso_date = match iso_date.map(str::trim) {
        Some(date) if !date.is_empty() => date,
        _ => return "Unknown".to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(iso_date) {
        return dt.format("%Y-%m-%d").to_string();
    }

    iso_date
        .split('T')
        .next()
        .unwrap_or(iso_date)
        .to_string()
}

/// Format a byte count as megabytes with one decimal
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_zero_is_unknown() {
        assert_eq!(format_duration(Some(0)), "Unknown");
        assert_eq!(format_duration(None), "Unknown");
    }

    #[test]
    fn duration_with_hours_ignores_seconds() {
        assert_eq!(format_duration(Some(3_661_000)), "1h 1m");
        assert_eq!(format_duration(Some(7_199_999)), "1h 59m");
    }

    #[test]
    fn duration_under_an_hour_shows_seconds() {
        assert_eq!(format_duration(Some(725_000)), "12m 5s");
        assert_eq!(format_duration(Some(999)), "0m 0s");
    }

    #[test]
    fn date_keeps_calendar_day() {
        assert_eq!(format_date(Some("2025-12-26T10:45:00Z")), "2025-12-26");
    }

    #[test]
    fn date_does_not_shift_time_zones() {
        assert_eq!(format_date(Some("2025-12-26T23:30:00-08:00")), "2025-12-26");
    }

    #[test]
    fn date_without_time_part_is_kept() {
        assert_eq!(format_date(Some("2025-12-26")), "2025-12-26");
    }

    #[test]
    fn missing_date_is_unknown() {
        assert_eq!(format_date(None), "Unknown");
        assert_eq!(format_date(Some("")), "Unknown");
    }

    #[test]
    fn megabytes_have_one_decimal() {
        assert_eq!(format_megabytes(0), "0.0");
        assert_eq!(format_megabytes(1024 * 1024), "1.0");
        assert_eq!(format_megabytes(3 * 1024 * 1024 / 2), "1.5");
    }
}
