// File: crates/strata-core/src/types.rs
// Summary: Shared types: keys, key parsing, points, groups, margins.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

/// Default surface width in pixels.
pub const WIDTH: u32 = 800;
/// Default surface height in pixels.
pub const HEIGHT: u32 = 500;

/// Axis group identifier; series in [`DEFAULT_GROUP`] map to the primary
/// y-scale, any other group maps to y2.
pub type GroupId = u32;
pub const DEFAULT_GROUP: GroupId = 0;

/// Key parsing mode, matching the configured input shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    #[default]
    Time,
    Number,
    String,
}

/// A raw input scalar before cleaning. Live feeds legitimately carry
/// placeholders like `"n/a"` or nulls; coercion failures drop the point.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Datum {
    Number(f64),
    Text(String),
    Null,
}

impl Datum {
    /// Numeric coercion: finite numbers pass through, text is parsed,
    /// anything else yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Datum::Number(n) if n.is_finite() => Some(*n),
            Datum::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Number(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Text(v.to_string())
    }
}

#[derive(Debug, Error)]
pub enum KeyParseError {
    #[error("unrecognized time key {0:?}")]
    Time(String),
    #[error("non-numeric key {0:?}")]
    Number(String),
    #[error("null key")]
    Null,
}

/// The ordinate identifying a point's position along the primary axis.
///
/// Total ordering: `f64` keys compare via `total_cmp`; NaN keys are never
/// constructed (cleaning drops unparseable keys before a `Key` exists).
#[derive(Clone, Debug)]
pub enum Key {
    Time(NaiveDateTime),
    Number(f64),
    Category(String),
}

impl Key {
    /// Numeric position along the x axis, when intrinsic to the key.
    /// Time keys use epoch milliseconds; category positions are assigned
    /// by the ordinal x-scale instead.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Key::Time(t) => Some(t.and_utc().timestamp_millis() as f64),
            Key::Number(v) => Some(*v),
            Key::Category(_) => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveDateTime> {
        match self {
            Key::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            Key::Category(s) => Some(s),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Key::Time(_) => 0,
            Key::Number(_) => 1,
            Key::Category(_) => 2,
        }
    }

    /// Parse an ISO-8601-ish time key. Accepts a full RFC 3339 timestamp,
    /// a naive `YYYY-MM-DDTHH:MM:SS`, or a bare `YYYY-MM-DD` date.
    pub fn parse_time(text: &str) -> Result<Key, KeyParseError> {
        let s = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Key::Time(dt.naive_utc()));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Key::Time(dt));
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(Key::Time(dt));
            }
        }
        Err(KeyParseError::Time(text.to_string()))
    }

    /// Interpret an epoch-milliseconds number as a time key.
    pub fn from_epoch_millis(ms: f64) -> Result<Key, KeyParseError> {
        if !ms.is_finite() {
            return Err(KeyParseError::Number(ms.to_string()));
        }
        DateTime::from_timestamp_millis(ms as i64)
            .map(|dt| Key::Time(dt.naive_utc()))
            .ok_or_else(|| KeyParseError::Time(ms.to_string()))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Time(a), Key::Time(b)) => a.cmp(b),
            (Key::Number(a), Key::Number(b)) => a.total_cmp(b),
            (Key::Category(a), Key::Category(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Time(t) => {
                if t.time() == chrono::NaiveTime::MIN {
                    write!(f, "{}", t.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", t.format("%Y-%m-%dT%H:%M:%S"))
                }
            }
            Key::Number(v) => write!(f, "{v}"),
            Key::Category(s) => write!(f, "{s}"),
        }
    }
}

/// One cleaned observation: a key, a numeric value, and the series it
/// belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub key: Key,
    pub value: f64,
    pub series_id: String,
}

/// Screen margins, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(32, 32, 48, 48)
    }
}
