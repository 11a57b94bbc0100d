//! Sms texts sent to clients.
//!
//! Everything produced here is plain ASCII and fits in a single 160 character
//! GSM segment, so providers never switch to UCS-2 or split the message.

use crate::date::{format_day_month, format_time, french_weekday};
use crate::NotificationContext;
use chrono::Datelike;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

pub const SMS_SEGMENT_LEN: usize = 160;

const ELLIPSIS: &str = "...";

/// Strips accents and typographic characters so that the text only
/// contains printable ASCII, and collapses whitespace.
pub fn normalize_text(input: &str) -> String {
    let mut replaced = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            // Not decomposed by NFD
            'œ' => replaced.push_str("oe"),
            'Œ' => replaced.push_str("OE"),
            'æ' => replaced.push_str("ae"),
            'Æ' => replaced.push_str("AE"),
            'ß' => replaced.push_str("ss"),
            'ø' => replaced.push('o'),
            'Ø' => replaced.push('O'),
            'ł' => replaced.push('l'),
            'Ł' => replaced.push('L'),
            'đ' => replaced.push('d'),
            'Đ' => replaced.push('D'),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' | '\u{00B4}' => replaced.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => replaced.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => replaced.push('-'),
            '\u{2026}' => replaced.push_str(ELLIPSIS),
            '\u{00A0}' | '\u{202F}' | '\u{2009}' => replaced.push(' '),
            '\u{20AC}' => replaced.push_str("EUR"),
            c => replaced.push(c),
        }
    }

    let ascii = replaced
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii() && (!c.is_ascii_control() || c.is_ascii_whitespace()))
        .collect::<String>();

    ascii.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` down to `max` characters.
///
/// A cut text ends with `"..."` unless the cut lands right after a
/// sentence ending period, in which case the period is kept as the end.
pub fn ensure_single_segment(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let truncated = text.chars().take(max).collect::<String>();
    if truncated.ends_with('.') {
        return truncated;
    }
    if max <= ELLIPSIS.len() {
        return truncated;
    }

    let cut = text.chars().take(max - ELLIPSIS.len()).collect::<String>();
    let cut = cut.trim_end_matches(|c: char| c.is_whitespace() || c == ',');
    if cut.ends_with('.') {
        return cut.to_string();
    }
    format!("{}{}", cut, ELLIPSIS)
}

struct SmsFields {
    first_name: String,
    service: String,
    salon: String,
    weekday: &'static str,
    date: String,
    time: String,
}

fn sms_fields(ctx: &NotificationContext) -> SmsFields {
    let (weekday, date, time) = match ctx.local_start() {
        Some(start) => (
            french_weekday(start.weekday()),
            format_day_month(&start),
            format_time(&start),
        ),
        None => ("", String::new(), String::new()),
    };

    SmsFields {
        first_name: normalize_text(&ctx.client.first_name),
        service: normalize_text(&ctx.service.name),
        salon: normalize_text(&ctx.salon.name),
        weekday,
        date,
        time,
    }
}

pub fn build_confirmation_sms(ctx: &NotificationContext) -> String {
    let f = sms_fields(ctx);
    let text = format!(
        "Bonjour {}, votre rendez-vous {} chez {} est confirme pour {} {} a {}.",
        f.first_name, f.service, f.salon, f.weekday, f.date, f.time
    );
    ensure_single_segment(&normalize_text(&text), SMS_SEGMENT_LEN)
}

pub fn build_reminder_sms(ctx: &NotificationContext) -> String {
    let f = sms_fields(ctx);
    let text = format!(
        "Rappel: {}, votre rendez-vous {} chez {} est prevu {} {} a {}. A demain !",
        f.first_name, f.service, f.salon, f.weekday, f.date, f.time
    );
    ensure_single_segment(&normalize_text(&text), SMS_SEGMENT_LEN)
}
