use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use tracing::debug;

use shared_models::serde_time;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
const PHONE_PATTERN: &str = r"^\+?[0-9][0-9\s\-\.\(\)]{5,19}$";

pub fn validate_email(email: &str) -> bool {
    let valid = email.len() <= 254
        && Regex::new(EMAIL_PATTERN)
            .map(|re| re.is_match(email))
            .unwrap_or(false);
    if !valid {
        debug!("Rejected email address: {:?}", email);
    }
    valid
}

pub fn validate_phone(phone: &str) -> bool {
    let valid = Regex::new(PHONE_PATTERN)
        .map(|re| re.is_match(phone))
        .unwrap_or(false);
    if !valid {
        debug!("Rejected phone number: {:?}", phone);
    }
    valid
}

/// Trimmed value, or an error naming the empty field.
pub fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        debug!("Required field {} is empty", field);
        Err(format!("{} must not be empty", field))
    } else {
        Ok(trimmed)
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date {:?}, expected YYYY-MM-DD", raw))
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    serde_time::parse_time(raw).map_err(|_| format!("Invalid time {:?}, expected HH:MM", raw))
}
