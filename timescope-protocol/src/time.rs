use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Parses a field value into epoch milliseconds.
///
/// Accepted shapes, in order of attempt:
/// - JSON numbers: taken as epoch milliseconds directly.
/// - RFC 3339 / ISO-8601 strings (`2024-01-01T00:00:05Z`).
/// - `YYYY-MM-DD HH:MM:SS[.fff]` (assumed UTC).
/// - Bare dates `YYYY-MM-DD` (midnight UTC).
/// - Numeric strings, retried as a raw millisecond value.
///
/// Booleans, objects, arrays and anything unparseable yield `None`.
pub fn parse_timestamp_ms(value: &Value) -> Option<i64> {
    match value {
        Value::Number(num) => num.as_i64().or_else(|| num.as_f64().map(|f| f as i64)),
        Value::String(text) => parse_timestamp_str(text),
        _ => None,
    }
}

/// String-only variant of [`parse_timestamp_ms`].
pub fn parse_timestamp_str(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc).timestamp_millis());
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }

    trimmed.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_are_epoch_milliseconds() {
        assert_eq!(parse_timestamp_ms(&json!(1700000000000i64)), Some(1700000000000));
        assert_eq!(parse_timestamp_ms(&json!(0)), Some(0));
    }

    #[test]
    fn rfc3339_strings_parse() {
        assert_eq!(
            parse_timestamp_ms(&json!("1970-01-01T00:00:01Z")),
            Some(1000)
        );
        assert_eq!(
            parse_timestamp_ms(&json!("1970-01-01T01:00:00+01:00")),
            Some(0)
        );
    }

    #[test]
    fn space_separated_and_bare_dates_parse_as_utc() {
        assert_eq!(parse_timestamp_ms(&json!("1970-01-01 00:00:02")), Some(2000));
        assert_eq!(parse_timestamp_ms(&json!("1970-01-02")), Some(86_400_000));
    }

    #[test]
    fn numeric_strings_fall_back_to_milliseconds() {
        assert_eq!(parse_timestamp_ms(&json!("1500")), Some(1500));
    }

    #[test]
    fn non_dates_are_rejected() {
        assert_eq!(parse_timestamp_ms(&json!(true)), None);
        assert_eq!(parse_timestamp_ms(&json!({"nested": 1})), None);
        assert_eq!(parse_timestamp_ms(&json!([1])), None);
        assert_eq!(parse_timestamp_ms(&json!("not a date")), None);
        assert_eq!(parse_timestamp_ms(&json!("")), None);
    }
}
