use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, TimeDelta, Utc};

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d/%m/%Y"];

/// Parses a chapter timestamp against the wall clock.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    parse_date_at(text, Utc::now())
}

/// Parses relative ("5 days ago") and absolute timestamps. `None` means the date is unknown;
/// no input makes this fail.
pub fn parse_date_at(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let lowered = text.to_lowercase();
    let tokens = lowered.split_whitespace().collect::<Vec<_>>();

    if tokens.contains(&"ago") {
        return parse_relative(&tokens, now);
    }

    match lowered.as_str() {
        "just now" | "today" => return Some(now),
        "yesterday" => return now.checked_sub_signed(TimeDelta::days(1)),
        _ => {}
    }

    parse_absolute(text)
}

fn parse_relative(tokens: &[&str], now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let magnitude = tokens.first()?.parse::<u32>().ok()?;
    let unit = *tokens.get(1)?;

    if unit.starts_with("sec") {
        now.checked_sub_signed(TimeDelta::try_seconds(i64::from(magnitude))?)
    } else if unit.starts_with("min") {
        now.checked_sub_signed(TimeDelta::try_minutes(i64::from(magnitude))?)
    } else if unit.starts_with("hour") {
        now.checked_sub_signed(TimeDelta::try_hours(i64::from(magnitude))?)
    } else if unit.starts_with("day") {
        now.checked_sub_signed(TimeDelta::try_days(i64::from(magnitude))?)
    } else if unit.starts_with("week") {
        now.checked_sub_signed(TimeDelta::try_weeks(i64::from(magnitude))?)
    } else if unit.starts_with("month") {
        now.checked_sub_months(Months::new(magnitude))
    } else if unit.starts_with("year") {
        now.checked_sub_months(Months::new(magnitude.checked_mul(12)?))
    } else {
        None
    }
}

fn parse_absolute(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(text, format) {
            return parsed.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
        }
    }

    None
}
