use chrono::prelude::*;
use chrono_tz::Tz;

pub fn to_local(timestamp_millis: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    Utc.timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|dt| dt.with_timezone(tz))
}

pub fn french_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "lundi",
        Weekday::Tue => "mardi",
        Weekday::Wed => "mercredi",
        Weekday::Thu => "jeudi",
        Weekday::Fri => "vendredi",
        Weekday::Sat => "samedi",
        Weekday::Sun => "dimanche",
    }
}

/// 14/03
pub fn format_day_month(date: &DateTime<Tz>) -> String {
    format!("{:02}/{:02}", date.day(), date.month())
}

/// 14/03/2025
pub fn format_full_date(date: &DateTime<Tz>) -> String {
    format!("{:02}/{:02}/{}", date.day(), date.month(), date.year())
}

/// 14h30, 9h05
pub fn format_time(date: &DateTime<Tz>) -> String {
    format!("{}h{:02}", date.hour(), date.minute())
}
