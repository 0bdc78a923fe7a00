use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Calendar format used by the newer history files.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One OHLCV observation as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(deserialize_with = "deserialize_time")]
    pub time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volumefrom: Decimal,
    pub volumeto: Decimal,
}

/// The persisted format has changed over time: older files store `time` as a
/// Unix epoch integer, newer ones as a `YYYY-MM-DD HH:MM:SS` string. Both
/// encodings normalize to UTC here, so nothing downstream sees the difference.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTime {
    Epoch(i64),
    Text(String),
}

fn deserialize_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match RawTime::deserialize(deserializer)? {
        RawTime::Epoch(secs) => Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| Error::custom(format!("epoch timestamp {secs} out of range"))),
        RawTime::Text(text) => NaiveDateTime::parse_from_str(&text, TIME_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|e| Error::custom(format!("bad timestamp '{text}': {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_and_text_encodings_normalize_to_the_same_instant() {
        // 1609459200 == 2021-01-01 00:00:00 UTC
        let from_epoch: PricePoint = serde_json::from_str(
            r#"{"time": 1609459200, "open": 1, "high": 2, "low": 0.5, "close": 1.5,
                "volumefrom": 10, "volumeto": 20}"#,
        )
        .unwrap();
        let from_text: PricePoint = serde_json::from_str(
            r#"{"time": "2021-01-01 00:00:00", "open": 1, "high": 2, "low": 0.5, "close": 1.5,
                "volumefrom": 10, "volumeto": 20}"#,
        )
        .unwrap();

        assert_eq!(from_epoch.time, from_text.time);
        assert_eq!(from_epoch, from_text);
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        let result: Result<PricePoint, _> = serde_json::from_str(
            r#"{"time": "yesterday", "open": 1, "high": 2, "low": 0.5, "close": 1.5,
                "volumefrom": 10, "volumeto": 20}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_time_field_is_rejected() {
        let result: Result<PricePoint, _> = serde_json::from_str(
            r#"{"open": 1, "high": 2, "low": 0.5, "close": 1.5,
                "volumefrom": 10, "volumeto": 20}"#,
        );
        assert!(result.is_err());
    }
}
