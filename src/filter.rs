//! Band-pass filter parameters and the capability trait for the external
//! filtering engine.
//!
//! The signal-processing math lives outside this crate. The edit session
//! only decides *when* a filter pass runs (at most once per redraw cycle,
//! and only when the corner frequencies or the enable flag changed) and
//! stores the result on the trace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors an external filter implementation may report.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("band-pass corners are invalid: {low_hz} Hz .. {high_hz} Hz")]
    InvalidCorners { low_hz: f64, high_hz: f64 },
    #[error("filter backend failed: {0}")]
    Backend(String),
}

/// Band-pass corner frequencies in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub low_hz: f64,
    pub high_hz: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            low_hz: 0.5,
            high_hz: 5.0,
        }
    }
}

/// External band-pass implementation.
///
/// `data` is the raw amplitude buffer, `delta` the sample spacing in
/// seconds. A successful call returns a filtered buffer of the same
/// length; on failure the session drops any previously filtered buffer,
/// so refinement against the filtered signal becomes a no-op until the
/// operator retries.
pub trait FilterEngine {
    fn bandpass(
        &mut self,
        data: &[f64],
        delta: f64,
        params: FilterParams,
    ) -> Result<Vec<f64>, FilterError>;
}
