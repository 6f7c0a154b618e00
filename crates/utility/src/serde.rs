/// Timestamps as written by the AisStream feed, e.g.
/// `2024-05-01 12:34:56.123456789 +0000 UTC`.
pub mod ais_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize as _, Deserializer};

    const AIS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        let trimmed = value.trim().trim_end_matches("UTC").trim_end();
        DateTime::parse_from_str(trimmed, AIS_FORMAT)
            .map(|date_time| date_time.with_timezone(&Utc))
            .ok()
    }

    /// Lenient: an unparseable timestamp becomes `None` instead of failing the
    /// whole message, the receiver substitutes its own clock.
    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.as_deref().and_then(parse))
    }
}

/// RFC 2822 dates as used by RSS `pubDate` elements.
pub mod rfc2822 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize as _, Deserializer};

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.and_then(|s| {
            DateTime::parse_from_rfc2822(s.trim())
                .map(|date_time| date_time.with_timezone(&Utc))
                .ok()
        }))
    }
}

/// Unix timestamps (seconds) as used by the OpenSky REST API.
pub mod unix_seconds {
    use chrono::{DateTime, Utc};

    pub fn from_value(value: &serde_json::Value) -> Option<DateTime<Utc>> {
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|seconds| seconds as i64))
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike, Utc};
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize)]
    struct MetaData {
        #[serde(deserialize_with = "ais_time::deserialize_option", default)]
        time_utc: Option<chrono::DateTime<Utc>>,
    }

    #[test]
    fn parses_ais_timestamps() {
        let parsed = ais_time::parse("2024-05-01 12:34:56.123456789 +0000 UTC").unwrap();
        assert_eq!(
            parsed.with_nanosecond(0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap()
        );
        assert_eq!(parsed.nanosecond(), 123_456_789);
    }

    #[test]
    fn unparseable_ais_timestamps_become_none() {
        let meta: MetaData =
            serde_json::from_value(json!({ "time_utc": "yesterday" })).unwrap();
        assert!(meta.time_utc.is_none());

        let meta: MetaData = serde_json::from_value(json!({})).unwrap();
        assert!(meta.time_utc.is_none());
    }

    #[test]
    fn unix_seconds_from_integer_or_float() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(unix_seconds::from_value(&json!(1704067200)), Some(expected));
        assert_eq!(unix_seconds::from_value(&json!(1704067200.0)), Some(expected));
        assert_eq!(unix_seconds::from_value(&json!(null)), None);
    }
}
