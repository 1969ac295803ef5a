//! Plotting backend capability trait and the gesture event type.
//!
//! The session never talks to a concrete graphics stack. Any backend that
//! can draw a polyline, a labelled vertical marker and a line of text, and
//! that can block for the next pointer/key gesture, satisfies
//! [`PlotSurface`] — an immediate-mode canvas, a retained scene graph or a
//! terminal plot all qualify. The tests drive the session through a
//! scripted in-memory implementation.

/// One blocking input event reported by the backend.
///
/// Pointer coordinates are in data space (seconds along the trace); the
/// backend performs any pixel-to-data conversion before reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Primary click at a time coordinate. Marks the pick.
    Click { time: f64 },
    /// Two-point drag, reported once both anchors are known. A drag whose
    /// second point does not exceed the first (including a double-click
    /// style immediate second press) requests an unzoom.
    Drag { start: f64, end: f64 },
    /// Key press, with the pointer position at press time.
    Key { key: char, time: f64 },
}

/// Color slot for a vertical marker; the backend maps slots to its own
/// palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    /// The editable pick marker.
    Pick,
    /// The read-only alignment/reference marker.
    Reference,
}

/// Where an annotation line goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationRegion {
    /// Status line inside the plot area (gravity + filter state).
    Status,
    /// Numbered help line above the plot, counted from the top.
    HelpLine(u8),
}

/// Capability trait for the rendering/event backend.
pub trait PlotSurface {
    /// Set the visible time window before drawing.
    fn set_view(&mut self, xmin: f64, xmax: f64);

    /// Draw the active trace as a polyline. `xs` and `ys` have equal length.
    fn draw_line(&mut self, xs: &[f64], ys: &[f64]);

    /// Draw a labelled vertical marker at `time` seconds.
    fn draw_marker(&mut self, time: f64, label: &str, color: MarkerColor);

    /// Draw one line of annotation text.
    fn draw_annotation(&mut self, region: AnnotationRegion, text: &str);

    /// Block until the operator produces the next gesture.
    fn next_gesture(&mut self) -> Gesture;

    /// Block on a numeric entry prompt. `None` means the operator aborted.
    fn prompt_number(&mut self, prompt: &str) -> Option<f64>;
}
