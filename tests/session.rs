//! End-to-end tests of the edit session loop driven through scripted
//! collaborators: a playback plotting surface and a counting filter engine.

use std::collections::VecDeque;

use phasepick::{
    AnnotationRegion, EditSession, FilterEngine, FilterError, FilterParams, Gesture, MarkerColor,
    PlotSurface, SessionConfig, Trace, ViewWindow,
};

/// Plays back a fixed gesture script and records everything the session
/// asks it to draw.
struct ScriptedSurface {
    gestures: VecDeque<Gesture>,
    prompt_answers: VecDeque<Option<f64>>,
    views: Vec<(f64, f64)>,
    last_ys: Vec<f64>,
    markers: Vec<(String, f64)>,
    annotations: Vec<String>,
    prompts_seen: Vec<String>,
}

impl ScriptedSurface {
    fn new(gestures: Vec<Gesture>) -> Self {
        Self {
            gestures: gestures.into(),
            prompt_answers: VecDeque::new(),
            views: Vec::new(),
            last_ys: Vec::new(),
            markers: Vec::new(),
            annotations: Vec::new(),
            prompts_seen: Vec::new(),
        }
    }

    fn with_prompt_answers(mut self, answers: Vec<Option<f64>>) -> Self {
        self.prompt_answers = answers.into();
        self
    }
}

impl PlotSurface for ScriptedSurface {
    fn set_view(&mut self, xmin: f64, xmax: f64) {
        self.views.push((xmin, xmax));
    }

    fn draw_line(&mut self, _xs: &[f64], ys: &[f64]) {
        self.last_ys = ys.to_vec();
    }

    fn draw_marker(&mut self, time: f64, label: &str, _color: MarkerColor) {
        self.markers.push((label.to_string(), time));
    }

    fn draw_annotation(&mut self, region: AnnotationRegion, text: &str) {
        if region == AnnotationRegion::Status {
            self.annotations.push(text.to_string());
        }
    }

    fn next_gesture(&mut self) -> Gesture {
        self.gestures.pop_front().expect("gesture script exhausted")
    }

    fn prompt_number(&mut self, prompt: &str) -> Option<f64> {
        self.prompts_seen.push(prompt.to_string());
        self.prompt_answers.pop_front().unwrap_or(None)
    }
}

/// Filter engine that counts invocations and either fails or writes a
/// single spike into an otherwise flat buffer.
struct CountingFilter {
    calls: usize,
    fail: bool,
    spike_at: Option<usize>,
}

impl CountingFilter {
    fn ok_with_spike(spike_at: usize) -> Self {
        Self {
            calls: 0,
            fail: false,
            spike_at: Some(spike_at),
        }
    }

    fn failing() -> Self {
        Self {
            calls: 0,
            fail: true,
            spike_at: None,
        }
    }
}

impl FilterEngine for CountingFilter {
    fn bandpass(
        &mut self,
        data: &[f64],
        _delta: f64,
        _params: FilterParams,
    ) -> Result<Vec<f64>, FilterError> {
        self.calls += 1;
        if self.fail {
            return Err(FilterError::Backend("engine unavailable".into()));
        }
        let mut out = vec![0.0; data.len()];
        if let Some(i) = self.spike_at {
            out[i] = 1.0;
        }
        Ok(out)
    }
}

fn key(key: char) -> Gesture {
    Gesture::Key { key, time: 0.0 }
}

/// Delta=0.01 s, N=1000, flat except a raw spike at index 500 (t=5.0 s).
fn spike_trace() -> Trace {
    let mut data = vec![0.0; 1000];
    data[500] = 10.0;
    Trace::new(0.0, 0.01, data).unwrap()
}

#[test]
fn failed_filter_pass_leaves_gravity_marks_literal() {
    // Filter toggled on with no successful filter pass: the gravity mark
    // must fall back to the literal click, not the raw-buffer extremum.
    let mut surface = ScriptedSurface::new(vec![
        key('F'),
        Gesture::Click { time: 4.98 },
        key('Q'),
    ]);
    let mut engine = CountingFilter::failing();
    let mut session = EditSession::new(spike_trace(), SessionConfig::default());

    session.run(&mut engine, &mut surface);

    assert_eq!(engine.calls, 1);
    assert_eq!(session.pick(), Some(4.98));
    assert!(session.needs_save());
}

#[test]
fn gravity_refines_against_filtered_buffer() {
    // The engine puts the filtered extremum at index 600 (t=6.0 s); with
    // filtering enabled from the start, marking near it snaps onto it even
    // though the raw spike sits elsewhere.
    let config = SessionConfig {
        filter_enabled: true,
        ..SessionConfig::default()
    };
    let mut surface =
        ScriptedSurface::new(vec![Gesture::Click { time: 6.004 }, key('Q')]);
    let mut engine = CountingFilter::ok_with_spike(600);
    let mut session = EditSession::new(spike_trace(), config);

    session.run(&mut engine, &mut surface);

    assert_eq!(engine.calls, 1);
    let pick = session.pick().expect("pick set");
    assert!((pick - 6.0).abs() < 1e-12, "pick {pick}");
    // The drawn line must be the filtered signal.
    assert_eq!(surface.last_ys[600], 1.0);
    assert_eq!(surface.last_ys[500], 0.0);
}

#[test]
fn filter_runs_at_most_once_per_redraw_cycle() {
    // Toggling on costs one pass; a corner entry costs one more; marking
    // and quitting cost none.
    let mut surface = ScriptedSurface::new(vec![
        key('F'),
        key('L'),
        Gesture::Click { time: 5.004 },
        key('Q'),
    ])
    .with_prompt_answers(vec![Some(1.25)]);
    let mut engine = CountingFilter::ok_with_spike(500);
    let mut session = EditSession::new(spike_trace(), SessionConfig::default());

    session.run(&mut engine, &mut surface);

    assert_eq!(engine.calls, 2);
    assert_eq!(session.filter_params().low_hz, 1.25);
    assert_eq!(surface.prompts_seen, vec!["Enter low corner frequency (Hz):"]);
}

#[test]
fn disabling_filter_never_invokes_engine() {
    let mut surface = ScriptedSurface::new(vec![key('F'), key('F'), key('Q')]);
    let mut engine = CountingFilter::ok_with_spike(600);
    let mut session = EditSession::new(spike_trace(), SessionConfig::default());

    session.run(&mut engine, &mut surface);

    // On-toggle ran the engine; off-toggle marks state stale but must not
    // recompute anything.
    assert_eq!(engine.calls, 1);
    assert!(!session.filter_enabled());
    // After disabling, the raw buffer is drawn again.
    assert_eq!(surface.last_ys[500], 10.0);
}

#[test]
fn zoom_then_reverse_drag_resets_to_full_extent() {
    let mut surface = ScriptedSurface::new(vec![
        Gesture::Drag { start: 2.0, end: 4.0 },
        Gesture::Drag { start: 10.0, end: 5.0 },
        key('Q'),
    ]);
    let mut engine = CountingFilter::ok_with_spike(600);
    let mut session = EditSession::new(spike_trace(), SessionConfig::default());

    session.run(&mut engine, &mut surface);

    assert_eq!(surface.views, vec![(0.0, 10.0), (2.0, 4.0), (0.0, 10.0)]);
    assert_eq!(session.view(), ViewWindow { xmin: 0.0, xmax: 10.0 });
}

#[test]
fn delete_key_clears_pick() {
    let mut surface = ScriptedSurface::new(vec![key('D'), key('Q')]);
    let mut engine = CountingFilter::ok_with_spike(600);
    let mut session =
        EditSession::new(spike_trace(), SessionConfig::default()).with_pick(5.0);

    session.run(&mut engine, &mut surface);

    assert_eq!(session.pick(), None);
    assert!(session.needs_save());
}

#[test]
fn markers_and_status_line_are_drawn() {
    let mut surface = ScriptedSurface::new(vec![key('Q')]);
    let mut engine = CountingFilter::ok_with_spike(600);
    let mut session = EditSession::new(spike_trace(), SessionConfig::default())
        .with_reference(3.0)
        .with_pick(5.0)
        .with_view(ViewWindow::around(5.0, 1.0, 2.0));

    session.run(&mut engine, &mut surface);

    assert!(surface.markers.contains(&("a".to_string(), 3.0)));
    assert!(surface.markers.contains(&("f".to_string(), 5.0)));
    assert_eq!(surface.annotations, vec!["Gravity On [No Filtering]"]);
    assert_eq!(surface.views, vec![(4.0, 7.0)]);
}

#[test]
fn quitting_without_edits_needs_no_save() {
    let mut surface = ScriptedSurface::new(vec![key('G'), key('Q')]);
    let mut engine = CountingFilter::ok_with_spike(600);
    let mut session = EditSession::new(spike_trace(), SessionConfig::default());

    session.run(&mut engine, &mut surface);

    // Gravity toggles are annotation-only; no persisted state changed.
    assert!(!session.needs_save());
    assert_eq!(session.pick(), None);
    assert_eq!(engine.calls, 0);
}
