// File: crates/strata-core/src/chart.rs
// Summary: Chart orchestrator: config lifecycle, pipeline threading, frame
// publication, and the pointer/hover subsystem.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::binning::{self, BinningState, Resolution};
use crate::config::{ChartConfig, ConfigUpdate, Domain};
use crate::data::{self, DataSet};
use crate::event::{AxisTag, ChartEvent, Dispatcher, EventKind, Throttle};
use crate::scale::{self, ScaleSet};
use crate::series::RawInput;
use crate::types::KeyType;

/// One pipeline run's published output. Collaborators hold the `Arc`s
/// read-only; the next run replaces the whole frame instead of mutating
/// it, so nothing downstream ever sees a half-updated model.
#[derive(Clone, Debug)]
pub struct Frame {
    pub data: Arc<DataSet>,
    pub scales: Arc<ScaleSet>,
    pub generation: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum HoverState {
    #[default]
    Idle,
    Tracking,
}

type PointerPos = (f64, f64);

/// Owns configuration and pipeline state; wires DataManager, BinningPolicy
/// and ScaleEngine output to rendering collaborators on every data or
/// configuration change.
pub struct Chart {
    config: ChartConfig,
    binning: BinningState,
    raw: Option<RawInput>,
    frame: Option<Frame>,

    dispatcher: Dispatcher,
    frame_listeners: Vec<Box<dyn FnMut(&Frame)>>,

    hover: HoverState,
    throttle: Throttle<PointerPos>,

    generation: u64,
    // Re-entrancy guard: a set_data issued while a run is in flight only
    // records the newest input; the loop below picks it up after the
    // current run, so superseded requests are dropped, not interleaved.
    in_flight: bool,
    pending_input: Option<RawInput>,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart {
    pub fn new() -> Self {
        let config = ChartConfig::default();
        let binning = BinningState {
            resolution: config.binning_resolution,
            is_auto: config.binning_is_auto,
        };
        let throttle = Throttle::new(Duration::from_millis(config.pointer_throttle_ms));
        Self {
            config,
            binning,
            raw: None,
            frame: None,
            dispatcher: Dispatcher::new(),
            frame_listeners: Vec::new(),
            hover: HoverState::Idle,
            throttle,
            generation: 0,
            in_flight: false,
            pending_input: None,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn binning_state(&self) -> BinningState {
        self.binning
    }

    /// The last published frame, if any data has been set.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Merge a partial configuration over the current one. Does not run
    /// the pipeline, so callers can batch changes and then `render`.
    pub fn set_config(&mut self, update: ConfigUpdate) -> &mut Self {
        if let Some(resolution) = update.binning_resolution {
            self.binning.resolution = resolution;
        }
        if let Some(is_auto) = update.binning_is_auto {
            self.binning.is_auto = is_auto;
        }
        if let Some(ms) = update.pointer_throttle_ms {
            self.throttle = Throttle::new(Duration::from_millis(ms));
        }
        self.config = self.config.merged(update);
        self
    }

    /// Accept new raw input and run the full pipeline synchronously; the
    /// frame is published to all collaborators before this returns.
    pub fn set_data(&mut self, raw: RawInput) -> &mut Self {
        self.pending_input = Some(raw);
        self.drain_pending();
        self
    }

    /// Re-run the pipeline on the last input under the current config.
    pub fn render(&mut self) -> &mut Self {
        if let Some(raw) = self.raw.clone() {
            self.pending_input = Some(raw);
            self.drain_pending();
        }
        self
    }

    fn drain_pending(&mut self) {
        if self.in_flight {
            return;
        }
        self.in_flight = true;
        while let Some(raw) = self.pending_input.take() {
            self.generation += 1;
            let generation = self.generation;
            self.run_pipeline(raw, generation);
        }
        self.in_flight = false;
    }

    fn run_pipeline(&mut self, raw: RawInput, generation: u64) {
        let config = self.config.clone();
        let mut series = data::clean(&raw, config.key_type);

        if config.binning_is_enabled && config.key_type == KeyType::Time {
            let span = key_span(&series);
            let resolution = binning::select_resolution(
                span,
                self.binning.is_auto,
                self.binning.resolution,
                &config.binning_toggles,
                config.chart_width(),
            );
            if resolution != self.binning.resolution {
                self.binning.resolution = resolution;
                self.dispatcher.emit(&ChartEvent::BinningChanged {
                    resolution,
                    is_auto: self.binning.is_auto,
                });
            }
            for s in &mut series {
                s.values = binning::bin(&s.values, resolution);
            }
        }

        let dataset = data::normalize(series, config.chart_type, &config.series_order);
        let scales = scale::derive_scales(&dataset, &config);

        let frame = Frame {
            data: Arc::new(dataset),
            scales: Arc::new(scales),
            generation,
        };
        debug!(generation, "publishing frame");
        for listener in &mut self.frame_listeners {
            listener(&frame);
        }
        self.raw = Some(raw);
        self.frame = Some(frame);
    }

    // --- collaborator wiring -------------------------------------------

    /// Subscribe to a chart event by kind.
    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&ChartEvent) + 'static) -> &mut Self {
        self.dispatcher.on(kind, handler);
        self
    }

    /// Subscribe to frame publication (data + scales snapshots).
    pub fn on_frame(&mut self, mut listener: impl FnMut(&Frame) + 'static) -> &mut Self {
        if let Some(frame) = &self.frame {
            listener(frame);
        }
        self.frame_listeners.push(Box::new(listener));
        self
    }

    /// Drop all listeners and flush the pointer throttle.
    pub fn destroy(&mut self) {
        self.flush_pointer();
        self.dispatcher.clear();
        self.frame_listeners.clear();
    }

    // --- binning / brush / domain toggles ------------------------------

    /// Binning toggle interface: the only way `BinningState` changes from
    /// outside, aside from auto-selection.
    pub fn set_binning(&mut self, resolution: Resolution, is_auto: bool) -> &mut Self {
        self.binning = BinningState { resolution, is_auto };
        self.config = self
            .config
            .merged(ConfigUpdate::new().binning(resolution, is_auto));
        self.dispatcher
            .emit(&ChartEvent::BinningChanged { resolution, is_auto });
        self.render()
    }

    pub fn set_brush_range(&mut self, min: Option<f64>, max: Option<f64>) -> &mut Self {
        let mut update = ConfigUpdate::new();
        update.brush_range_min = Some(min);
        update.brush_range_max = Some(max);
        self.config = self.config.merged(update);
        self.dispatcher.emit(&ChartEvent::BrushChanged { min, max });
        self
    }

    pub fn set_domain(&mut self, axis: AxisTag, domain: Domain) -> &mut Self {
        let update = match axis {
            AxisTag::X => ConfigUpdate::new().x_domain(domain),
            AxisTag::Y => ConfigUpdate::new().y_domain(domain),
            AxisTag::Y2 => ConfigUpdate::new().y2_domain(domain),
        };
        self.config = self.config.merged(update);
        self.dispatcher.emit(&ChartEvent::DomainChanged { axis, domain });
        self.render()
    }

    // --- pointer subsystem ---------------------------------------------

    /// Pointer entered the panel: Idle -> Tracking.
    pub fn pointer_entered(&mut self, x_px: f64, y_px: f64) {
        self.hover = HoverState::Tracking;
        self.dispatcher.emit(&ChartEvent::MouseOverPanel { x_px, y_px });
    }

    /// Pointer left the panel: Tracking -> Idle. The throttle's trailing
    /// payload is flushed first so the last position is not lost.
    pub fn pointer_left(&mut self) {
        self.flush_pointer();
        self.hover = HoverState::Idle;
        self.dispatcher.emit(&ChartEvent::MouseOutPanel);
    }

    pub fn pointer_moved(&mut self, x_px: f64, y_px: f64) {
        self.pointer_moved_at(x_px, y_px, Instant::now());
    }

    /// Testable variant with an explicit clock. Moves inside the throttle
    /// window replace each other; only the newest survives, and the
    /// nearest-point lookup itself only runs when the throttle emits.
    pub fn pointer_moved_at(&mut self, x_px: f64, y_px: f64, now: Instant) {
        if self.hover != HoverState::Tracking {
            return;
        }
        if let Some((x, y)) = self.throttle.offer((x_px, y_px), now) {
            self.emit_move(x, y);
        }
    }

    /// Emit the trailing pointer move once the throttle window elapses.
    pub fn pointer_tick(&mut self, now: Instant) {
        if let Some((x, y)) = self.throttle.poll(now) {
            self.emit_move(x, y);
        }
    }

    fn flush_pointer(&mut self) {
        if let Some((x, y)) = self.throttle.flush() {
            self.emit_move(x, y);
        }
    }

    /// Resolve a pointer position to its nearest data point and publish
    /// it, with the event's x snapped to the resolved point.
    fn emit_move(&mut self, x_px: f64, y_px: f64) {
        let Some(frame) = &self.frame else { return };
        let Some(entry) = data::nearest_data_point(x_px, &frame.data, &frame.scales) else {
            return;
        };
        let snapped_x = f64::from(frame.scales.x.to_px(&entry.key));
        let point = entry.clone();
        self.dispatcher
            .emit(&ChartEvent::MouseMovePanel { point, x_px: snapped_x, y_px });
    }
}

impl std::fmt::Debug for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("config", &self.config)
            .field("binning", &self.binning)
            .field("generation", &self.generation)
            .field("has_frame", &self.frame.is_some())
            .finish()
    }
}

fn key_span(series: &[crate::series::Series]) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for s in series {
        for p in &s.values {
            if let Some(v) = p.key.numeric() {
                min = min.min(v);
                max = max.max(v);
            }
        }
    }
    if min.is_finite() && max.is_finite() {
        max - min
    } else {
        0.0
    }
}
