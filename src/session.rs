//! The edit session: mutable pick state and the blocking interaction loop.
//!
//! An [`EditSession`] owns the current pick, the filter and gravity flags,
//! the visible window and the band-pass corners for the lifetime of one
//! editing run. Each cycle refreshes the filtered buffer if it went stale,
//! redraws through the [`PlotSurface`], blocks for the next gesture and
//! applies exactly one state transition. Every transition either completes
//! or leaves the state untouched; none of them can fail the loop.

use serde::Serialize;

use crate::config::SessionConfig;
use crate::filter::{FilterEngine, FilterParams};
use crate::hotkeys::{Action, KeyBindings};
use crate::refine::{refine, ActiveBuffer};
use crate::surface::{AnnotationRegion, Gesture, MarkerColor, PlotSurface};
use crate::trace::Trace;

/// Visible time window in seconds. Maintains `xmin < xmax`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    pub xmin: f64,
    pub xmax: f64,
}

impl ViewWindow {
    /// Window spanning the whole trace, `(b, b + N * delta)`.
    pub fn full_of(trace: &Trace) -> Self {
        let (xmin, xmax) = trace.full_extent();
        Self { xmin, xmax }
    }

    /// Window of `pre` seconds before and `post` seconds after `anchor`,
    /// the usual seed around a phase marker.
    pub fn around(anchor: f64, pre: f64, post: f64) -> Self {
        Self {
            xmin: anchor - pre,
            xmax: anchor + post,
        }
    }
}

/// Whether the loop keeps running after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Snapshot of the session result for the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSummary {
    pub pick: Option<f64>,
    pub needs_save: bool,
}

impl SessionSummary {
    /// One-line JSON form, convenient for piping to a persistence layer.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Serialization error: {}", e))
    }
}

/// Static help text redrawn above the plot each cycle.
const HELP_LINES: [&str; 3] = [
    "Click-click to zoom, reverse drag to unzoom. Q quits the edit session.",
    "Z/Y mark the phase, D deletes the mark, G toggles gravity.",
    "F toggles the band-pass filter, L/H enter the corner frequencies (Hz).",
];

/// Interactive editor state for a single pick on a single trace.
pub struct EditSession {
    trace: Trace,
    pick: Option<f64>,
    reference: Option<f64>,
    view: ViewWindow,
    params: FilterParams,
    bindings: KeyBindings,
    half_window: f64,
    filter_enabled: bool,
    gravity_enabled: bool,
    filter_stale: bool,
    needs_save: bool,
}

impl EditSession {
    /// Start a session over `trace` with the view spanning the full trace.
    pub fn new(trace: Trace, config: SessionConfig) -> Self {
        let view = ViewWindow::full_of(&trace);
        Self {
            trace,
            pick: None,
            reference: None,
            view,
            params: config.filter,
            bindings: config.bindings,
            half_window: config.half_window,
            filter_enabled: config.filter_enabled,
            gravity_enabled: config.gravity_enabled,
            // With filtering requested up front, the first cycle must run
            // the engine before anything reads the filtered buffer.
            filter_stale: config.filter_enabled,
            needs_save: false,
        }
    }

    /// Seed the initial view window (e.g. around an aligned phase).
    pub fn with_view(mut self, view: ViewWindow) -> Self {
        self.view = view;
        self
    }

    /// Seed a previously saved pick.
    pub fn with_pick(mut self, pick: f64) -> Self {
        self.pick = Some(pick);
        self
    }

    /// Attach a read-only reference marker (e.g. the alignment phase).
    pub fn with_reference(mut self, reference: f64) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn pick(&self) -> Option<f64> {
        self.pick
    }

    pub fn needs_save(&self) -> bool {
        self.needs_save
    }

    pub fn view(&self) -> ViewWindow {
        self.view
    }

    pub fn filter_params(&self) -> FilterParams {
        self.params
    }

    pub fn filter_enabled(&self) -> bool {
        self.filter_enabled
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            pick: self.pick,
            needs_save: self.needs_save,
        }
    }

    /// Run the blocking interaction loop until the operator quits.
    pub fn run(&mut self, engine: &mut dyn FilterEngine, surface: &mut dyn PlotSurface) {
        loop {
            self.refresh_filter(engine);
            self.redraw(surface);
            let gesture = surface.next_gesture();
            if self.handle(gesture, surface) == Control::Quit {
                break;
            }
        }
        log::debug!(
            "edit session finished: pick={:?} needs_save={}",
            self.pick,
            self.needs_save
        );
    }

    /// Apply one gesture to the session state. Public so embedders can
    /// drive the session from their own event pump.
    pub fn handle(&mut self, gesture: Gesture, surface: &mut dyn PlotSurface) -> Control {
        match gesture {
            Gesture::Click { time } => self.mark(time),
            Gesture::Drag { start, end } => self.zoom(start, end),
            Gesture::Key { key, time } => match self.bindings.action_for(key) {
                Some(Action::Mark) => self.mark(time),
                Some(Action::ToggleGravity) => {
                    self.gravity_enabled = !self.gravity_enabled;
                }
                Some(Action::ToggleFilter) => {
                    self.filter_enabled = !self.filter_enabled;
                    self.filter_stale = true;
                }
                Some(Action::DeleteMark) => {
                    self.pick = None;
                    self.needs_save = true;
                    log::debug!("pick deleted");
                }
                Some(Action::EnterLowCorner) => {
                    if let Some(v) = surface.prompt_number("Enter low corner frequency (Hz):") {
                        self.set_corner(v, true);
                    }
                }
                Some(Action::EnterHighCorner) => {
                    if let Some(v) = surface.prompt_number("Enter high corner frequency (Hz):") {
                        self.set_corner(v, false);
                    }
                }
                Some(Action::Quit) => return Control::Quit,
                None => {}
            },
        }
        Control::Continue
    }

    fn mark(&mut self, time: f64) {
        let picked = if self.gravity_enabled {
            let buffer = if self.filter_enabled {
                ActiveBuffer::Filtered
            } else {
                ActiveBuffer::Raw
            };
            refine(&self.trace, buffer, time, self.half_window)
        } else {
            time
        };
        self.pick = Some(picked);
        self.needs_save = true;
        log::debug!("pick set to {picked} (clicked {time})");
    }

    fn zoom(&mut self, start: f64, end: f64) {
        if end > start {
            self.view = ViewWindow {
                xmin: start,
                xmax: end,
            };
        } else {
            // Reverse or degenerate drag: back out to the full trace.
            self.view = ViewWindow::full_of(&self.trace);
        }
    }

    fn set_corner(&mut self, value: f64, low: bool) {
        if !value.is_finite() {
            log::warn!("ignoring non-finite corner frequency {value}");
            return;
        }
        if low {
            self.params.low_hz = value;
        } else {
            self.params.high_hz = value;
        }
        self.filter_stale = true;
    }

    /// Re-run the band-pass when parameters or the enable flag changed.
    /// At most one engine invocation happens per redraw cycle, and it is
    /// ordered before any draw or refinement that reads the filtered
    /// buffer.
    fn refresh_filter(&mut self, engine: &mut dyn FilterEngine) {
        if !self.filter_stale {
            return;
        }
        if self.filter_enabled {
            match engine.bandpass(self.trace.data(), self.trace.delta(), self.params) {
                Ok(buffer) => {
                    if let Err(err) = self.trace.set_filtered(buffer) {
                        log::warn!("discarding filtered buffer: {err}");
                        self.trace.clear_filtered();
                    }
                }
                Err(err) => {
                    log::warn!("band-pass failed, filtered buffer dropped: {err}");
                    self.trace.clear_filtered();
                }
            }
        }
        self.filter_stale = false;
    }

    /// Redraw the trace, markers and annotations.
    fn redraw(&self, surface: &mut dyn PlotSurface) {
        surface.set_view(self.view.xmin, self.view.xmax);

        // The filtered buffer is drawn only when filtering is on and a
        // filter pass has succeeded; otherwise the raw signal shows.
        let ys: &[f64] = if self.filter_enabled {
            self.trace.filtered().unwrap_or_else(|| self.trace.data())
        } else {
            self.trace.data()
        };
        let xs: Vec<f64> = (0..self.trace.len()).map(|i| self.trace.time_at(i)).collect();
        surface.draw_line(&xs, ys);

        if let Some(t) = self.reference {
            surface.draw_marker(t, "a", MarkerColor::Reference);
        }
        if let Some(t) = self.pick {
            surface.draw_marker(t, "f", MarkerColor::Pick);
        }

        surface.draw_annotation(AnnotationRegion::Status, &self.status_text());
        for (i, line) in HELP_LINES.iter().enumerate() {
            surface.draw_annotation(AnnotationRegion::HelpLine(i as u8), line);
        }
    }

    fn status_text(&self) -> String {
        let gravity = if self.gravity_enabled {
            "Gravity On"
        } else {
            "Gravity Off"
        };
        if self.filter_enabled {
            format!(
                "{} [Filtering, bandpass from {:.2} to {:.2}]",
                gravity, self.params.low_hz, self.params.high_hz
            )
        } else {
            format!("{} [No Filtering]", gravity)
        }
    }
}
