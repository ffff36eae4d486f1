//! Display helpers: field labels and local date-time values

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Turn a property name into a human label.
///
/// Words break at underscores, hyphens and spaces, before an uppercase letter
/// that follows a lowercase letter or digit, and before the last capital of an
/// acronym run. Every word gets an uppercase first letter.
///
/// `parValue` becomes "Par Value", `ISINCode` becomes "ISIN Code".
pub fn normalize_label(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map(|n| n.is_lowercase()).unwrap_or(false);
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Reformat a timestamp for a `datetime-local` input in the host's time zone
pub fn to_local_datetime_string(value: &str) -> String {
    to_datetime_string_in(value, &Local)
}

/// Reformat a timestamp as `YYYY-MM-DDTHH:MM:SS` in the given time zone.
///
/// Offset-bearing RFC 3339 values are converted; offset-less values are
/// taken to already be wall-clock time. Anything unparseable yields an empty
/// string, which a `datetime-local` input shows as blank.
pub fn to_datetime_string_in<Tz: TimeZone>(value: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.with_timezone(tz).format(LOCAL_DATETIME_FORMAT).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.format(LOCAL_DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}
