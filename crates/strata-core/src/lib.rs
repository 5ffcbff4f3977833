// File: crates/strata-core/src/lib.rs
// Summary: Core library entry point; exports the data-to-geometry pipeline API.

pub mod binning;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod event;
pub mod scale;
pub mod series;
pub mod types;

pub use binning::{bin, select_resolution, BinningState, Resolution, DEFAULT_LADDER};
pub use chart::{Chart, Frame};
pub use color::{Color, ColorScale, DEFAULT_PALETTE};
pub use config::{ChartConfig, ChartType, ConfigUpdate, Domain};
pub use data::{clean, nearest_data_point, normalize, DataSet, KeyEntry, StackedKey};
pub use event::{AxisTag, ChartEvent, EventKind, Throttle};
pub use scale::{derive_scales, LinearScale, ScaleSet, XScale};
pub use series::{RawInput, RawPoint, RawSeries, Series, SeriesValue};
pub use types::{Datum, Insets, Key, KeyType, Point};
