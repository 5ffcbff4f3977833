// File: crates/strata-core/src/data.rs
// Summary: Data normalization (clean, pivot, sort, stack) and the
// nearest-point query used for hover lookup.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::config::ChartType;
use crate::scale::ScaleSet;
use crate::series::{RawInput, RawSeries, Series, SeriesValue};
use crate::types::{GroupId, Key, KeyType, Point};

/// The pivoted view at one key: every series' contribution, in series
/// order. This is what hover/tooltip rendering consumes.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyEntry {
    pub key: Key,
    pub values: Vec<SeriesValue>,
}

/// One series' slab in a stacked layout at a given key. `end` is the
/// running partial sum; the first layer starts at 0.
#[derive(Clone, Debug, PartialEq)]
pub struct StackLayer {
    pub series_id: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StackedKey {
    pub key: Key,
    pub layers: Vec<StackLayer>,
}

impl StackedKey {
    /// Top of the stack: the sum of all series values at this key.
    pub fn total(&self) -> f64 {
        self.layers.last().map(|l| l.end).unwrap_or(0.0)
    }
}

/// The normalized in-memory model every visual layer reads from.
///
/// Invariants, established by [`normalize`]:
/// - `flat_data_sorted` is strictly ascending by key, one point per
///   distinct key;
/// - no series holds two points with the same key (duplicates merged by
///   summation, the aggregation rule binning uses);
/// - `has_second_axis` is recomputed here on every call, never set.
#[derive(Clone, Debug, Default)]
pub struct DataSet {
    pub data_by_series: Vec<Series>,
    pub data_by_key: Vec<KeyEntry>,
    pub flat_data_sorted: Vec<Point>,
    pub group_keys: BTreeMap<GroupId, BTreeSet<String>>,
    pub has_second_axis: bool,
    pub stack_data: Option<Vec<StackedKey>>,
}

impl DataSet {
    pub fn is_empty(&self) -> bool {
        self.flat_data_sorted.is_empty()
    }

    /// Span of the key axis in milliseconds-equivalent domain units.
    pub fn key_span(&self) -> Option<f64> {
        let first = self.flat_data_sorted.first()?.key.numeric()?;
        let last = self.flat_data_sorted.last()?.key.numeric()?;
        Some(last - first)
    }
}

/// Parse and validate raw input into cleaned series.
///
/// A point whose key fails parsing or whose value fails numeric coercion
/// is dropped, never an error: partial records are expected from live
/// feeds. Series and point order are preserved.
pub fn clean(raw: &RawInput, key_type: KeyType) -> Vec<Series> {
    raw.series
        .iter()
        .map(|rs| {
            let mut values = Vec::with_capacity(rs.values.len());
            let mut dropped = 0usize;
            for rp in &rs.values {
                let key = match RawSeries::parse_key(&rp.key, key_type) {
                    Ok(k) => k,
                    Err(err) => {
                        trace!(series = %rs.id, %err, "dropping point with bad key");
                        dropped += 1;
                        continue;
                    }
                };
                let Some(value) = rp.value.as_number() else {
                    trace!(series = %rs.id, key = %key, "dropping non-numeric value");
                    dropped += 1;
                    continue;
                };
                values.push(Point { key, value, series_id: rs.id.clone() });
            }
            if dropped > 0 {
                debug!(series = %rs.id, dropped, kept = values.len(), "cleaned series");
            }
            Series {
                id: rs.id.clone(),
                label: rs.label.clone(),
                group: rs.group,
                color_key: rs.color_key.clone(),
                values,
            }
        })
        .collect()
}

/// Build the canonical [`DataSet`] from cleaned series.
///
/// `series_order` lists ids that should come first (stacking and legend
/// order); unlisted series keep insertion order behind them.
pub fn normalize(
    mut series: Vec<Series>,
    chart_type: ChartType,
    series_order: &[String],
) -> DataSet {
    apply_series_order(&mut series, series_order);

    for s in &mut series {
        merge_sorted(&mut s.values);
    }

    // Pivot: key -> contributions in series order.
    let mut pivot: BTreeMap<Key, Vec<SeriesValue>> = BTreeMap::new();
    let mut flat: BTreeMap<Key, Point> = BTreeMap::new();
    for s in &series {
        for p in &s.values {
            pivot
                .entry(p.key.clone())
                .or_default()
                .push(SeriesValue { series_id: s.id.clone(), value: p.value });
            flat.entry(p.key.clone()).or_insert_with(|| p.clone());
        }
    }
    let data_by_key: Vec<KeyEntry> = pivot
        .into_iter()
        .map(|(key, values)| KeyEntry { key, values })
        .collect();
    let flat_data_sorted: Vec<Point> = flat.into_values().collect();

    let mut group_keys: BTreeMap<GroupId, BTreeSet<String>> = BTreeMap::new();
    for s in &series {
        group_keys.entry(s.group).or_default().insert(s.id.clone());
    }
    let has_second_axis = series.iter().any(Series::uses_second_axis);

    let stack_data = chart_type
        .is_stacked()
        .then(|| stack(&series, &data_by_key))
        .filter(|s| !s.is_empty());

    debug!(
        series = series.len(),
        keys = data_by_key.len(),
        has_second_axis,
        stacked = stack_data.is_some(),
        "normalized data"
    );

    DataSet {
        data_by_series: series,
        data_by_key,
        flat_data_sorted,
        group_keys,
        has_second_axis,
        stack_data,
    }
}

/// Cumulative layout in series order. Stacked series share key sets: a
/// key missing from a series contributes 0 rather than breaking
/// alignment. Second-axis series do not participate.
fn stack(series: &[Series], data_by_key: &[KeyEntry]) -> Vec<StackedKey> {
    let stacked_ids: Vec<&str> = series
        .iter()
        .filter(|s| !s.uses_second_axis())
        .map(|s| s.id.as_str())
        .collect();
    if stacked_ids.is_empty() {
        return Vec::new();
    }

    data_by_key
        .iter()
        .map(|entry| {
            let mut layers = Vec::with_capacity(stacked_ids.len());
            let mut cursor = 0.0f64;
            for id in &stacked_ids {
                let value = entry
                    .values
                    .iter()
                    .find(|v| v.series_id == *id)
                    .map(|v| v.value)
                    .unwrap_or(0.0);
                let start = cursor;
                cursor += value;
                layers.push(StackLayer { series_id: (*id).to_string(), start, end: cursor });
            }
            StackedKey { key: entry.key.clone(), layers }
        })
        .collect()
}

fn apply_series_order(series: &mut Vec<Series>, order: &[String]) {
    if order.is_empty() {
        return;
    }
    let rank = |id: &str| order.iter().position(|o| o == id).unwrap_or(order.len());
    series.sort_by_key(|s| rank(&s.id));
}

/// Sort by key and merge equal keys by summation.
fn merge_sorted(values: &mut Vec<Point>) {
    values.sort_by(|a, b| a.key.cmp(&b.key));
    let mut merged: Vec<Point> = Vec::with_capacity(values.len());
    for p in values.drain(..) {
        match merged.last_mut() {
            Some(last) if last.key == p.key => last.value += p.value,
            _ => merged.push(p),
        }
    }
    *values = merged;
}

/// Resolve a pixel x coordinate to the nearest keyed entry.
///
/// Inverts the pixel through the x-scale, then binary-searches the sorted
/// key list and compares the two adjacent candidates. Equidistant
/// candidates resolve to the lower key so hover feedback stays stable
/// under slow pointer movement. Out-of-range pixels clamp to the boundary
/// entry; an empty dataset yields `None`.
pub fn nearest_data_point<'a>(
    x_pixel: f64,
    data: &'a DataSet,
    scales: &ScaleSet,
) -> Option<&'a KeyEntry> {
    if data.data_by_key.is_empty() {
        return None;
    }
    let target = scales.x.invert(x_pixel as f32);

    let idx = data
        .data_by_key
        .partition_point(|entry| scales.x.key_position(&entry.key) < target);

    let hi = idx.min(data.data_by_key.len() - 1);
    let lo = idx.saturating_sub(1);
    let dist = |i: usize| (scales.x.key_position(&data.data_by_key[i].key) - target).abs();

    // Lower key wins ties.
    let chosen = if dist(lo) <= dist(hi) { lo } else { hi };
    Some(&data.data_by_key[chosen])
}
