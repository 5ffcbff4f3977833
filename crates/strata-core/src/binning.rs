// File: crates/strata-core/src/binning.rs
// Summary: Resolution ladder, auto-resolution selection, and bucket aggregation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

use crate::types::{Key, Point};

/// Minimum horizontal room per bucket; drives auto-resolution density.
const MIN_BUCKET_PX: f64 = 8.0;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Binning granularity, coarsest to finest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum Resolution {
    Decade,
    Year,
    Quarter,
    Month,
}

/// The default toggle ladder, coarsest first.
pub const DEFAULT_LADDER: [Resolution; 4] = [
    Resolution::Decade,
    Resolution::Year,
    Resolution::Quarter,
    Resolution::Month,
];

impl Resolution {
    /// Short tag as shown on binning toggles.
    pub fn tag(self) -> &'static str {
        match self {
            Resolution::Decade => "10y",
            Resolution::Year => "1y",
            Resolution::Quarter => "1q",
            Resolution::Month => "1mo",
        }
    }

    /// Approximate bucket width in milliseconds, for density estimates.
    fn approx_width_ms(self) -> f64 {
        match self {
            Resolution::Decade => 3650.0 * MS_PER_DAY,
            Resolution::Year => 365.0 * MS_PER_DAY,
            Resolution::Quarter => 91.0 * MS_PER_DAY,
            Resolution::Month => 30.0 * MS_PER_DAY,
        }
    }

    /// Truncate a timestamp down to this resolution's bucket start.
    pub fn truncate(self, t: NaiveDateTime) -> NaiveDateTime {
        let (year, month) = match self {
            Resolution::Decade => (t.year() - t.year().rem_euclid(10), 1),
            Resolution::Year => (t.year(), 1),
            Resolution::Quarter => (t.year(), (t.month0() / 3) * 3 + 1),
            Resolution::Month => (t.year(), t.month()),
        };
        // Bucket starts are always representable dates.
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or(t)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "10y" => Ok(Resolution::Decade),
            "1y" => Ok(Resolution::Year),
            "1q" => Ok(Resolution::Quarter),
            "1mo" => Ok(Resolution::Month),
            other => Err(format!("unknown binning resolution {other:?}")),
        }
    }
}

impl TryFrom<String> for Resolution {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Resolution ladder control, owned by the chart orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinningState {
    pub resolution: Resolution,
    pub is_auto: bool,
}

impl Default for BinningState {
    fn default() -> Self {
        Self { resolution: Resolution::Month, is_auto: true }
    }
}

/// Pick the binning resolution for a data span.
///
/// Auto mode walks the ladder from coarsest to finest and keeps the finest
/// resolution whose estimated bucket count stays under the density the
/// chart width allows; when nothing fits, the coarsest wins. A manual
/// selection is always honored.
pub fn select_resolution(
    span_ms: f64,
    is_auto: bool,
    current: Resolution,
    ladder: &[Resolution],
    chart_width_px: f64,
) -> Resolution {
    if !is_auto || ladder.is_empty() {
        return current;
    }
    let max_buckets = (chart_width_px / MIN_BUCKET_PX).max(1.0);
    let mut selected = ladder[0];
    for &resolution in ladder {
        let buckets = (span_ms / resolution.approx_width_ms()).ceil() + 1.0;
        if buckets <= max_buckets {
            selected = resolution;
        }
    }
    debug!(%selected, span_ms, chart_width_px, "auto-selected binning resolution");
    selected
}

/// Aggregate points into resolution-sized buckets by summation.
///
/// Time keys are truncated to the bucket start; non-time keys keep their
/// bucket (duplicates still merge). Buckets with no contributing points do
/// not appear: there is no zero-filling. The operation is idempotent,
/// aggregating singleton buckets is a no-op.
///
/// Callers bin each series separately; the series id of the first
/// contributing point labels each bucket.
pub fn bin(points: &[Point], resolution: Resolution) -> Vec<Point> {
    let mut buckets: BTreeMap<Key, Point> = BTreeMap::new();
    for point in points {
        let key = match &point.key {
            Key::Time(t) => Key::Time(resolution.truncate(*t)),
            other => other.clone(),
        };
        buckets
            .entry(key.clone())
            .and_modify(|bucket| bucket.value += point.value)
            .or_insert_with(|| Point {
                key,
                value: point.value,
                series_id: point.series_id.clone(),
            });
    }
    buckets.into_values().collect()
}
