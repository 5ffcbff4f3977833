// File: crates/strata-core/src/event.rs
// Summary: Typed event channel for collaborators and the pointer-move
// throttle scheduler.

use std::time::{Duration, Instant};

use crate::binning::Resolution;
use crate::config::Domain;
use crate::data::KeyEntry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    MouseOverPanel,
    MouseOutPanel,
    MouseMovePanel,
    BinningChanged,
    BrushChanged,
    DomainChanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisTag {
    X,
    Y,
    Y2,
}

/// Events published to rendering collaborators (tooltip, axis, legend,
/// brush). All payloads are owned values: listeners never get a handle
/// back into the chart's mutable state.
#[derive(Clone, Debug)]
pub enum ChartEvent {
    MouseOverPanel { x_px: f64, y_px: f64 },
    MouseOutPanel,
    /// `x_px` is snapped to the resolved point's own x position.
    MouseMovePanel { point: KeyEntry, x_px: f64, y_px: f64 },
    BinningChanged { resolution: Resolution, is_auto: bool },
    BrushChanged { min: Option<f64>, max: Option<f64> },
    DomainChanged { axis: AxisTag, domain: Domain },
}

impl ChartEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ChartEvent::MouseOverPanel { .. } => EventKind::MouseOverPanel,
            ChartEvent::MouseOutPanel => EventKind::MouseOutPanel,
            ChartEvent::MouseMovePanel { .. } => EventKind::MouseMovePanel,
            ChartEvent::BinningChanged { .. } => EventKind::BinningChanged,
            ChartEvent::BrushChanged { .. } => EventKind::BrushChanged,
            ChartEvent::DomainChanged { .. } => EventKind::DomainChanged,
        }
    }
}

type Handler = Box<dyn FnMut(&ChartEvent)>;

/// Listener registry keyed by event kind.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<(EventKind, Handler)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&ChartEvent) + 'static) {
        self.handlers.push((kind, Box::new(handler)));
    }

    pub fn emit(&mut self, event: &ChartEvent) {
        let kind = event.kind();
        for (k, handler) in &mut self.handlers {
            if *k == kind {
                handler(event);
            }
        }
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Leading/trailing rate limiter for high-frequency events.
///
/// The first offer in a quiet window emits immediately; offers inside the
/// window replace the held payload rather than queueing, so the consumer
/// always sees the most recent position. `flush` emits the held payload
/// unconditionally and is called on pointer-leave and teardown.
#[derive(Debug)]
pub struct Throttle<T> {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_emit: None, pending: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offer a payload at `now`. Returns it when the leading edge fires;
    /// otherwise holds it as the trailing payload and returns `None`.
    pub fn offer(&mut self, payload: T, now: Instant) -> Option<T> {
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.interval => {
                self.pending = Some(payload);
                None
            }
            _ => {
                self.last_emit = Some(now);
                self.pending = None;
                Some(payload)
            }
        }
    }

    /// Emit the trailing payload if the window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.interval => None,
            _ => {
                let out = self.pending.take();
                if out.is_some() {
                    self.last_emit = Some(now);
                }
                out
            }
        }
    }

    /// Deterministic teardown: emit whatever is held, reset the window.
    pub fn flush(&mut self) -> Option<T> {
        self.last_emit = None;
        self.pending.take()
    }
}
