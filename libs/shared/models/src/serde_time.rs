//! Wall-clock times travel as `HH:MM`, the way doctors enter them.

use chrono::NaiveTime;
use serde::{de, Deserialize, Deserializer, Serializer};

pub const TIME_FORMAT: &str = "%H:%M";

/// Accepts `HH:MM` and, for lenient clients, `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_time(time))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_time(&raw).map_err(|_| de::Error::custom(format!("invalid time {:?}, expected HH:MM", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_precisions() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(parse_time("09:00").unwrap(), nine);
        assert_eq!(parse_time("09:00:00").unwrap(), nine);
        assert!(parse_time("9am").is_err());
        assert_eq!(format_time(&nine), "09:00");
    }
}
