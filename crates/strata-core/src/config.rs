// File: crates/strata-core/src/config.rs
// Summary: Immutable chart configuration and shallow partial updates.

use serde::Deserialize;

use crate::binning::{Resolution, DEFAULT_LADDER};
use crate::color::Color;
use crate::types::{Insets, KeyType, HEIGHT, WIDTH};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
    Area,
    StackedArea,
    Sunburst,
}

impl ChartType {
    /// Chart types that lay series out cumulatively.
    pub fn is_stacked(self) -> bool {
        matches!(self, ChartType::Area | ChartType::StackedArea | ChartType::Bar)
    }

    /// Sunburst has no cartesian axes; the axis/line subsystems stay off.
    pub fn has_cartesian_axes(self) -> bool {
        !matches!(self, ChartType::Sunburst)
    }
}

/// An axis domain: derived from the data, or supplied verbatim.
///
/// A fixed domain is never validated against the data; an out-of-range
/// domain simply clips visible points downstream.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Domain {
    #[default]
    Auto,
    Fixed(f64, f64),
}

/// Full chart configuration. Treated as an immutable value: `set_config`
/// produces a new `ChartConfig` rather than mutating shared state, and
/// every pipeline stage receives it explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin: Insets,

    pub key_type: KeyType,
    pub chart_type: ChartType,

    pub x_domain: Domain,
    pub y_domain: Domain,
    pub y2_domain: Domain,

    pub binning_resolution: Resolution,
    pub binning_is_auto: bool,
    pub binning_toggles: Vec<Resolution>,
    pub binning_is_enabled: bool,

    pub brush_range_min: Option<f64>,
    pub brush_range_max: Option<f64>,

    /// Explicit stacking/legend order; series not listed keep insertion
    /// order after the listed ones.
    pub series_order: Vec<String>,
    pub color_schema: Vec<Color>,

    /// Pointer-move coalescing window, in milliseconds.
    pub pointer_throttle_ms: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            margin: Insets::default(),
            key_type: KeyType::Time,
            chart_type: ChartType::Line,
            x_domain: Domain::Auto,
            y_domain: Domain::Auto,
            y2_domain: Domain::Auto,
            binning_resolution: Resolution::Month,
            binning_is_auto: true,
            binning_toggles: DEFAULT_LADDER.to_vec(),
            binning_is_enabled: true,
            brush_range_min: None,
            brush_range_max: None,
            series_order: Vec::new(),
            color_schema: Vec::new(),
            pointer_throttle_ms: 20,
        }
    }
}

impl ChartConfig {
    /// Horizontal room available to the plot panel, in pixels.
    pub fn chart_width(&self) -> f64 {
        f64::from(self.width.saturating_sub(self.margin.hsum()))
    }

    pub fn chart_height(&self) -> f64 {
        f64::from(self.height.saturating_sub(self.margin.vsum()))
    }

    /// Shallow merge: every set field of `update` overrides, everything
    /// else is preserved. Returns a new value; `self` is untouched.
    pub fn merged(&self, update: ConfigUpdate) -> ChartConfig {
        let mut next = self.clone();
        if let Some(v) = update.width { next.width = v; }
        if let Some(v) = update.height { next.height = v; }
        if let Some(v) = update.margin { next.margin = v; }
        if let Some(v) = update.key_type { next.key_type = v; }
        if let Some(v) = update.chart_type { next.chart_type = v; }
        if let Some(v) = update.x_domain { next.x_domain = v; }
        if let Some(v) = update.y_domain { next.y_domain = v; }
        if let Some(v) = update.y2_domain { next.y2_domain = v; }
        if let Some(v) = update.binning_resolution { next.binning_resolution = v; }
        if let Some(v) = update.binning_is_auto { next.binning_is_auto = v; }
        if let Some(v) = update.binning_toggles { next.binning_toggles = v; }
        if let Some(v) = update.binning_is_enabled { next.binning_is_enabled = v; }
        if let Some(v) = update.brush_range_min { next.brush_range_min = v; }
        if let Some(v) = update.brush_range_max { next.brush_range_max = v; }
        if let Some(v) = update.series_order { next.series_order = v; }
        if let Some(v) = update.color_schema { next.color_schema = v; }
        if let Some(v) = update.pointer_throttle_ms { next.pointer_throttle_ms = v; }
        next
    }
}

/// Partial configuration for [`ChartConfig::merged`]. Unset fields keep
/// the current value; `brush_range_*` use a nested `Option` so a range can
/// be cleared explicitly.
#[derive(Clone, Debug, Default)]
pub struct ConfigUpdate {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub margin: Option<Insets>,
    pub key_type: Option<KeyType>,
    pub chart_type: Option<ChartType>,
    pub x_domain: Option<Domain>,
    pub y_domain: Option<Domain>,
    pub y2_domain: Option<Domain>,
    pub binning_resolution: Option<Resolution>,
    pub binning_is_auto: Option<bool>,
    pub binning_toggles: Option<Vec<Resolution>>,
    pub binning_is_enabled: Option<bool>,
    pub brush_range_min: Option<Option<f64>>,
    pub brush_range_max: Option<Option<f64>>,
    pub series_order: Option<Vec<String>>,
    pub color_schema: Option<Vec<Color>>,
    pub pointer_throttle_ms: Option<u64>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_type(mut self, v: KeyType) -> Self {
        self.key_type = Some(v);
        self
    }

    pub fn chart_type(mut self, v: ChartType) -> Self {
        self.chart_type = Some(v);
        self
    }

    pub fn x_domain(mut self, v: Domain) -> Self {
        self.x_domain = Some(v);
        self
    }

    pub fn y_domain(mut self, v: Domain) -> Self {
        self.y_domain = Some(v);
        self
    }

    pub fn y2_domain(mut self, v: Domain) -> Self {
        self.y2_domain = Some(v);
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn binning(mut self, resolution: Resolution, is_auto: bool) -> Self {
        self.binning_resolution = Some(resolution);
        self.binning_is_auto = Some(is_auto);
        self
    }

    pub fn binning_enabled(mut self, enabled: bool) -> Self {
        self.binning_is_enabled = Some(enabled);
        self
    }

    pub fn series_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.series_order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    pub fn color_schema(mut self, palette: Vec<Color>) -> Self {
        self.color_schema = Some(palette);
        self
    }

    pub fn pointer_throttle_ms(mut self, ms: u64) -> Self {
        self.pointer_throttle_ms = Some(ms);
        self
    }
}
