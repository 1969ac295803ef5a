//! Adaptive local-extremum refinement of an approximate pick time.
//!
//! Given a rough time selected by the operator, [`refine`] snaps it to the
//! nearest locally significant peak or trough of the trace. The search runs
//! in two passes: a cheap three-point probe (window edges vs. window
//! center) that expands its half-width until it classifies the center as a
//! local-maximum or local-minimum candidate, then a fine scan over every
//! sample of the accepted window to locate the true extremum, which may lie
//! strictly inside the window rather than at a probe point.
//!
//! Every failure mode recovers to the unmodified input time: a probe index
//! outside the trace, a collapsed window, a missing filtered buffer, or
//! expansion reaching the radius cap without classifying.

use crate::trace::Trace;

/// Which amplitude buffer refinement reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveBuffer {
    Raw,
    Filtered,
}

#[derive(Clone, Copy, PartialEq)]
enum Candidate {
    Max,
    Min,
}

/// Snap `approx` (seconds) to the nearest qualifying local extremum of the
/// selected buffer, searching at most `max_half_window` seconds to either
/// side. Returns `approx` unchanged when no extremum qualifies, when the
/// search leaves the trace, or when the filtered buffer is requested but
/// absent.
pub fn refine(trace: &Trace, buffer: ActiveBuffer, approx: f64, max_half_window: f64) -> f64 {
    let data: &[f64] = match buffer {
        ActiveBuffer::Raw => trace.data(),
        ActiveBuffer::Filtered => match trace.filtered() {
            Some(buf) => buf,
            // Filtering has not produced a buffer yet; nothing to refine
            // against. The caller must re-run the filter, not silently
            // fall back to the raw signal.
            None => return approx,
        },
    };

    if !(max_half_window > 0.0) {
        return approx;
    }

    // Base step: 1/50th of the search radius, grown until it spans at
    // least one sample so adjacent probes never land on the same index.
    let base = max_half_window / 50.0;
    let mut step = base;
    while step < trace.delta() {
        step += base;
    }

    let mut found: Option<(Candidate, usize, usize)> = None;

    let mut w = step;
    while found.is_none() && w < max_half_window {
        let start = trace.index_at(approx - w);
        let end = trace.index_at(approx + w);
        let center = trace.index_at(approx);

        if !trace.contains_index(start)
            || !trace.contains_index(end)
            || !trace.contains_index(center)
        {
            return approx;
        }
        if end <= start {
            return approx;
        }
        let (s, e, c) = (start as usize, end as usize, center as usize);

        if data[s] < data[c] && data[e] < data[c] {
            found = Some((Candidate::Max, s, e));
        } else if data[s] > data[c] && data[e] > data[c] {
            found = Some((Candidate::Min, s, e));
        } else {
            w += step;
        }
    }

    let Some((candidate, s, e)) = found else {
        // Expansion hit the radius cap without ever classifying.
        return approx;
    };

    // Fine scan over the classification-time window. Strict comparisons
    // keep the first occurrence on ties, so the earlier time wins.
    let mut imin = s;
    let mut imax = s;
    for i in s..=e {
        if data[i] > data[imax] {
            imax = i;
        }
        if data[i] < data[imin] {
            imin = i;
        }
    }

    match candidate {
        Candidate::Max => trace.time_at(imax),
        Candidate::Min => trace.time_at(imin),
    }
}
