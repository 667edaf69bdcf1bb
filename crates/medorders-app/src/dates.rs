// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    Instant(OffsetDateTime),
    Text(&'a str),
}

impl From<OffsetDateTime> for DateInput<'_> {
    fn from(value: OffsetDateTime) -> Self {
        Self::Instant(value)
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

/// Formats a date as `DD-MM-YYYY` in the instant's own offset. Anything that
/// does not parse to a calendar instant yields an empty string.
pub fn format_display_date<'a>(value: impl Into<DateInput<'a>>) -> String {
    let instant = match value.into() {
        DateInput::Instant(instant) => instant,
        DateInput::Text(raw) => match parse_date_text(raw) {
            Some(instant) => instant,
            None => return String::new(),
        },
    };

    instant
        .date()
        .format(format_description!("[day]-[month]-[year]"))
        .unwrap_or_default()
}

/// Accepts RFC 3339, an offset-less ISO date-time, or a bare ISO date. The
/// offset-less forms are read as UTC.
pub fn parse_date_text(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(instant) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(instant);
    }

    let local = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    if let Ok(datetime) = PrimitiveDateTime::parse(trimmed, local) {
        return Some(datetime.assume_utc());
    }

    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}
