use chrono::{DateTime, Datelike, Local, Month, TimeZone, Timelike};

fn clock<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let (is_pm, hour) = date.hour12();
    let suffix = if is_pm { "pm" } else { "am" };
    format!("{hour}:{:02}{suffix}", date.minute())
}

fn to_local(timestamp_ms: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(timestamp_ms).single()
}

/// `3:04pm`
pub fn format_time<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    clock(date)
}

/// `January 3, 2019 · 3:04pm`
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let month = Month::try_from(date.month() as u8)
        .map(|m| m.name())
        .unwrap_or_default();
    format!(
        "{} {}, {} · {}",
        month,
        date.day(),
        date.year(),
        clock(date)
    )
}

pub fn convert_timestamp_to_time(timestamp_ms: i64) -> String {
    to_local(timestamp_ms)
        .map(|date| format_time(&date))
        .unwrap_or_default()
}

pub fn convert_timestamp_to_date(timestamp_ms: i64) -> String {
    to_local(timestamp_ms)
        .map(|date| format_date(&date))
        .unwrap_or_default()
}
