//! Timestamp formatting for rendered records

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// How a sink renders a record's time
///
/// # Examples
///
/// ```
/// use log_dedup::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let time = Utc.with_ymd_and_hms(2023, 9, 29, 13, 0, 59).unwrap();
/// assert_eq!(TimestampFormat::Rfc3339.format(&time), "2023-09-29T13:00:59Z");
/// assert_eq!(
///     TimestampFormat::Rfc3339Nanos.format(&time),
///     "2023-09-29T13:00:59.000000000Z"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// RFC 3339 with only as many fractional digits as needed: `2023-09-29T13:00:59Z`
    #[default]
    Rfc3339,

    /// RFC 3339 with milliseconds: `2023-09-29T13:00:59.000Z`
    Rfc3339Millis,

    /// RFC 3339 with nanoseconds: `2023-09-29T13:00:59.000000000Z`
    ///
    /// The layout CloudWatch Logs Insights parses without configuration.
    Rfc3339Nanos,

    /// Unix timestamp in milliseconds: `1695992459000`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            TimestampFormat::Rfc3339Millis => datetime.to_rfc3339_opts(SecondsFormat::Millis, true),
            TimestampFormat::Rfc3339Nanos => datetime.to_rfc3339_opts(SecondsFormat::Nanos, true),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Check if this is a numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::UnixMillis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 9, 29, 13, 0, 59)
            .single()
            .expect("valid datetime")
    }

    #[test]
    fn test_rfc3339_omits_zero_fraction() {
        assert_eq!(
            TimestampFormat::Rfc3339.format(&fixed_datetime()),
            "2023-09-29T13:00:59Z"
        );
        let with_millis = fixed_datetime() + chrono::Duration::milliseconds(250);
        assert_eq!(
            TimestampFormat::Rfc3339.format(&with_millis),
            "2023-09-29T13:00:59.250Z"
        );
    }

    #[test]
    fn test_fixed_precision_formats() {
        let dt = fixed_datetime();
        assert_eq!(
            TimestampFormat::Rfc3339Millis.format(&dt),
            "2023-09-29T13:00:59.000Z"
        );
        assert_eq!(
            TimestampFormat::Rfc3339Nanos.format(&dt),
            "2023-09-29T13:00:59.000000000Z"
        );
    }

    #[test]
    fn test_unix_millis() {
        let format = TimestampFormat::UnixMillis;
        assert!(format.is_numeric());
        assert_eq!(format.format(&fixed_datetime()), "1695992459000");
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y-%m-%d".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2023-09-29");
        assert!(!format.is_numeric());
    }
}
