//! Time-series view of one digitized waveform trace.
//!
//! A [`Trace`] holds amplitudes on a uniform time grid (`origin + i * delta`
//! seconds for sample `i`) plus an optional filtered copy of the same length.
//! The raw buffer is immutable for the lifetime of an editing session; the
//! filtered buffer is rewritten whenever the session re-runs its filter
//! engine and cleared when filtering fails.

use thiserror::Error;

/// Errors raised when constructing or mutating a [`Trace`].
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("sample spacing must be greater than zero (got {0})")]
    InvalidSpacing(f64),
    #[error("trace must contain at least one sample")]
    Empty,
    #[error("filtered buffer length {actual} does not match trace length {expected}")]
    FilteredLengthMismatch { expected: usize, actual: usize },
}

/// Read-only view of a single waveform with uniform sampling.
#[derive(Debug, Clone)]
pub struct Trace {
    origin: f64,
    delta: f64,
    data: Vec<f64>,
    filtered: Option<Vec<f64>>,
}

impl Trace {
    /// Create a trace from its time origin (seconds), sample spacing
    /// (seconds per sample, must be positive) and amplitude buffer.
    pub fn new(origin: f64, delta: f64, data: Vec<f64>) -> Result<Self, TraceError> {
        if !(delta > 0.0) {
            return Err(TraceError::InvalidSpacing(delta));
        }
        if data.is_empty() {
            return Err(TraceError::Empty);
        }
        Ok(Self {
            origin,
            delta,
            data,
            filtered: None,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample spacing in seconds per sample.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Time of the first sample in seconds.
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Raw amplitude buffer.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Filtered amplitude buffer, present only after at least one
    /// successful filter pass.
    pub fn filtered(&self) -> Option<&[f64]> {
        self.filtered.as_deref()
    }

    /// Install a freshly computed filtered buffer. The length must match
    /// the raw buffer exactly.
    pub fn set_filtered(&mut self, buffer: Vec<f64>) -> Result<(), TraceError> {
        if buffer.len() != self.data.len() {
            return Err(TraceError::FilteredLengthMismatch {
                expected: self.data.len(),
                actual: buffer.len(),
            });
        }
        self.filtered = Some(buffer);
        Ok(())
    }

    /// Drop the filtered buffer (filter failed or became meaningless).
    pub fn clear_filtered(&mut self) {
        self.filtered = None;
    }

    /// Nearest sample index for a time in seconds. The result may fall
    /// outside the trace; check with [`Trace::contains_index`].
    pub fn index_at(&self, seconds: f64) -> i64 {
        ((seconds - self.origin) / self.delta).round() as i64
    }

    /// Time in seconds of sample `index`.
    pub fn time_at(&self, index: usize) -> f64 {
        self.origin + index as f64 * self.delta
    }

    /// Whether `index` addresses a sample of this trace.
    pub fn contains_index(&self, index: i64) -> bool {
        index >= 0 && (index as usize) < self.data.len()
    }

    /// Full time extent `(first sample, one past the last sample)`,
    /// used as the unzoomed view window.
    pub fn full_extent(&self) -> (f64, f64) {
        (
            self.origin,
            self.origin + self.data.len() as f64 * self.delta,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace() -> Trace {
        Trace::new(2.0, 0.5, vec![0.0; 10]).unwrap()
    }

    #[test]
    fn rejects_bad_spacing_and_empty_buffers() {
        assert!(matches!(
            Trace::new(0.0, 0.0, vec![1.0]),
            Err(TraceError::InvalidSpacing(_))
        ));
        assert!(matches!(
            Trace::new(0.0, -0.1, vec![1.0]),
            Err(TraceError::InvalidSpacing(_))
        ));
        assert!(matches!(Trace::new(0.0, 1.0, vec![]), Err(TraceError::Empty)));
    }

    #[test]
    fn index_time_round_trip_on_grid() {
        let tr = trace();
        for i in 0..tr.len() {
            assert_eq!(tr.index_at(tr.time_at(i)), i as i64);
        }
    }

    #[test]
    fn index_at_rounds_to_nearest_sample() {
        let tr = trace();
        // 2.0 + 3 * 0.5 = 3.5; anything within a quarter sample snaps to 3
        assert_eq!(tr.index_at(3.6), 3);
        assert_eq!(tr.index_at(3.4), 3);
        assert_eq!(tr.index_at(3.76), 4);
    }

    #[test]
    fn bounds_checking() {
        let tr = trace();
        assert!(tr.contains_index(0));
        assert!(tr.contains_index(9));
        assert!(!tr.contains_index(10));
        assert!(!tr.contains_index(-1));
    }

    #[test]
    fn full_extent_spans_n_delta() {
        let tr = trace();
        assert_eq!(tr.full_extent(), (2.0, 7.0));
    }

    #[test]
    fn filtered_buffer_must_match_length() {
        let mut tr = trace();
        assert!(tr.set_filtered(vec![1.0; 9]).is_err());
        assert!(tr.filtered().is_none());
        tr.set_filtered(vec![1.0; 10]).unwrap();
        assert!(tr.filtered().is_some());
        tr.clear_filtered();
        assert!(tr.filtered().is_none());
    }
}
