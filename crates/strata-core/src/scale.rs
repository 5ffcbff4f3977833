// File: crates/strata-core/src/scale.rs
// Summary: X/Y scale transforms and whole-ScaleSet derivation from a DataSet.

use tracing::debug;

use crate::color::{ColorScale, DEFAULT_PALETTE};
use crate::config::{ChartConfig, ChartType, Domain};
use crate::data::DataSet;
use crate::types::{Key, KeyType};

/// Below this width a domain counts as degenerate and gets expanded.
const MIN_DOMAIN_SPAN: f64 = 1e-9;

/// Linear mapping from a value domain onto a pixel range. The range may be
/// inverted (y axes map domain min to the bottom pixel).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain: expand_degenerate(domain), range }
    }

    #[inline]
    pub fn to_px(&self, v: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = (d1 - d0).abs().max(MIN_DOMAIN_SPAN) * (d1 - d0).signum();
        r0 + (((v - d0) / span) as f32) * (r1 - r0)
    }

    #[inline]
    pub fn from_px(&self, px: f32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let rspan = r1 - r0;
        let frac = if rspan.abs() < f32::EPSILON { 0.0 } else { (px - r0) / rspan };
        d0 + f64::from(frac) * (d1 - d0)
    }
}

/// X-axis scale. Positions are intrinsic for time (epoch milliseconds) and
/// number keys; category keys take their index in the ordinal domain.
#[derive(Clone, Debug)]
pub struct XScale {
    pub key_type: KeyType,
    inner: LinearScale,
    categories: Vec<String>,
}

impl XScale {
    pub fn new(key_type: KeyType, domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { key_type, inner: LinearScale::new(domain, range), categories: Vec::new() }
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.inner.range
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Numeric x position of a key, in domain units.
    pub fn key_position(&self, key: &Key) -> f64 {
        if let Some(v) = key.numeric() {
            return v;
        }
        key.as_category()
            .and_then(|c| self.categories.iter().position(|k| k == c))
            .map(|i| i as f64)
            .unwrap_or(0.0)
    }

    pub fn to_px(&self, key: &Key) -> f32 {
        self.inner.to_px(self.key_position(key))
    }

    pub fn position_to_px(&self, position: f64) -> f32 {
        self.inner.to_px(position)
    }

    /// Invert a pixel back to a domain-unit position.
    pub fn invert(&self, px: f32) -> f64 {
        self.inner.from_px(px)
    }
}

/// The full set of coordinated scales for one pipeline run. Rebuilt
/// wholesale on every data or configuration change; never patched in
/// place, so no layer can observe a stale domain.
#[derive(Clone, Debug)]
pub struct ScaleSet {
    pub x: XScale,
    pub y: LinearScale,
    pub y2: Option<LinearScale>,
    pub color: ColorScale,
    pub has_second_axis: bool,
}

/// Derive x/y/y2/color scales from the normalized data and configuration.
pub fn derive_scales(data: &DataSet, config: &ChartConfig) -> ScaleSet {
    let left = config.margin.left as f32;
    let right = left + config.chart_width() as f32;
    let top = config.margin.top as f32;
    let bottom = top + config.chart_height() as f32;

    let categories: Vec<String> = data
        .flat_data_sorted
        .iter()
        .filter_map(|p| p.key.as_category().map(str::to_string))
        .collect();

    let x_domain = match config.x_domain {
        Domain::Fixed(lo, hi) => (lo, hi),
        Domain::Auto => auto_x_domain(data, &categories),
    };
    let x = XScale::new(config.key_type, x_domain, (left, right)).with_categories(categories);

    let (y_auto, y2_auto) = auto_y_domains(data, config.chart_type);
    let y_domain = match config.y_domain {
        Domain::Fixed(lo, hi) => (lo, hi),
        Domain::Auto => y_auto,
    };
    // Larger values sit higher on screen, so the y range is inverted.
    let y = LinearScale::new(y_domain, (bottom, top));

    let y2 = data.has_second_axis.then(|| {
        let domain = match config.y2_domain {
            Domain::Fixed(lo, hi) => (lo, hi),
            Domain::Auto => y2_auto,
        };
        LinearScale::new(domain, (bottom, top))
    });

    let palette = if config.color_schema.is_empty() {
        &DEFAULT_PALETTE[..]
    } else {
        &config.color_schema[..]
    };
    let color = ColorScale::assign(
        data.data_by_series.iter().map(|s| s.color_key()),
        palette,
    );

    debug!(
        x_domain = ?x.domain(),
        y_domain = ?y.domain,
        has_second_axis = data.has_second_axis,
        "derived scales"
    );

    ScaleSet { x, y, y2, color, has_second_axis: data.has_second_axis }
}

fn auto_x_domain(data: &DataSet, categories: &[String]) -> (f64, f64) {
    if data.flat_data_sorted.is_empty() {
        return (0.0, 1.0);
    }
    if !categories.is_empty() {
        return (0.0, (categories.len() - 1) as f64);
    }
    let first = &data.flat_data_sorted[0].key;
    let last = &data.flat_data_sorted[data.flat_data_sorted.len() - 1].key;
    match (first.numeric(), last.numeric()) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => (0.0, 1.0),
    }
}

/// Auto y/y2 domains, computed independently per axis group. Stacked chart
/// types use the cumulative stack extent rather than per-series extents.
fn auto_y_domains(data: &DataSet, chart_type: ChartType) -> ((f64, f64), (f64, f64)) {
    if chart_type.is_stacked() {
        if let Some(stack) = &data.stack_data {
            let mut min = 0.0f64;
            let mut max = f64::NEG_INFINITY;
            for entry in stack {
                for layer in &entry.layers {
                    min = min.min(layer.start).min(layer.end);
                    max = max.max(layer.end);
                }
            }
            if max.is_finite() {
                // Second-axis series are excluded from stacking, so their
                // extent still comes from the per-series sweep.
                let (_, y2) = extent_by_group(data);
                return ((min, max), y2);
            }
        }
    }
    extent_by_group(data)
}

fn extent_by_group(data: &DataSet) -> ((f64, f64), (f64, f64)) {
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y2 = (f64::INFINITY, f64::NEG_INFINITY);
    for series in &data.data_by_series {
        let target = if series.uses_second_axis() { &mut y2 } else { &mut y };
        for point in &series.values {
            target.0 = target.0.min(point.value);
            target.1 = target.1.max(point.value);
        }
    }
    (finite_or_default(y), finite_or_default(y2))
}

fn finite_or_default((lo, hi): (f64, f64)) -> (f64, f64) {
    if lo.is_finite() && hi.is_finite() {
        (lo, hi)
    } else {
        (0.0, 1.0)
    }
}

/// Expand a zero-width domain symmetrically so downstream scales never
/// divide by a zero range.
fn expand_degenerate((lo, hi): (f64, f64)) -> (f64, f64) {
    if (hi - lo).abs() < MIN_DOMAIN_SPAN {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}
