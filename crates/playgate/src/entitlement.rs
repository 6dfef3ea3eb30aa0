// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entitlement resolution: which playlist variant a client gets right now.
//!
//! Everything here is pure. Callers pass `now` explicitly so decisions are
//! reproducible in tests and identical between the delivery and cleanup paths.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::registry::{ClientRecord, RegistrationDate};

/// Playlist variant a client is entitled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Trial,
    Full,
}

/// A registration timestamp that cannot start an entitlement clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRegistration {
    Unparseable(String),
    FutureDated(DateTime<Utc>),
}

impl fmt::Display for InvalidRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparseable(raw) => write!(f, "unparseable registration date {raw:?}"),
            Self::FutureDated(at) => write!(f, "registration date {at} is in the future"),
        }
    }
}

/// Position of a client on the entitlement clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Window {
    Unregistered,
    Invalid(InvalidRegistration),
    Elapsed(Duration),
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn parse_text(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis);
    }
    None
}

/// Parse a stored registration timestamp. Naive values are taken as UTC.
pub fn parse_registration(date: &RegistrationDate) -> Option<DateTime<Utc>> {
    match date {
        RegistrationDate::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms),
        RegistrationDate::Text(raw) => parse_text(raw),
        RegistrationDate::Other(_) => None,
    }
}

/// Where `record` sits on the entitlement clock at `now`.
pub fn window(record: &ClientRecord, now: DateTime<Utc>) -> Window {
    let Some(date) = record.registration() else {
        return Window::Unregistered;
    };
    let Some(at) = parse_registration(date) else {
        let raw = match date {
            RegistrationDate::EpochMillis(ms) => ms.to_string(),
            RegistrationDate::Text(s) => s.clone(),
            RegistrationDate::Other(v) => v.to_string(),
        };
        return Window::Invalid(InvalidRegistration::Unparseable(raw));
    };
    match now.signed_duration_since(at).to_std() {
        Ok(elapsed) => Window::Elapsed(elapsed),
        Err(_) => Window::Invalid(InvalidRegistration::FutureDated(at)),
    }
}

/// Decide the variant for `record` at `now`.
///
/// Trial only while the window is open and a trial source exists. Absent or
/// invalid registrations get the full playlist.
pub fn resolve(
    record: &ClientRecord,
    now: DateTime<Utc>,
    trial_window: Duration,
    trial_available: bool,
) -> Variant {
    match window(record, now) {
        Window::Elapsed(elapsed) if trial_available && elapsed < trial_window => Variant::Trial,
        _ => Variant::Full,
    }
}

/// Whether the trial window of `record` has closed at `now`.
pub fn is_expired(record: &ClientRecord, now: DateTime<Utc>, trial_window: Duration) -> bool {
    matches!(window(record, now), Window::Elapsed(elapsed) if elapsed >= trial_window)
}

#[cfg(test)]
#[path = "entitlement_tests.rs"]
mod tests;
