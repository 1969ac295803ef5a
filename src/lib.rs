//! phasepick crate root: re-exports and module wiring.
//!
//! This crate refines a single seismic phase-arrival pick on a digitized
//! waveform through a blocking key/mouse event loop:
//! - `trace`: time-series view (sampling grid, raw/filtered buffers)
//! - `refine`: adaptive local-extremum refinement of an approximate pick
//! - `session`: the edit session state machine and interaction loop
//! - `surface`: plotting/event backend capability trait
//! - `filter`: band-pass parameters and the external filter trait
//! - `hotkeys`: key bindings with YAML persistence
//! - `config`: session configuration with YAML persistence

pub mod config;
pub mod filter;
pub mod hotkeys;
pub mod refine;
pub mod session;
pub mod surface;
pub mod trace;

// Public re-exports for a compact external API
pub use config::SessionConfig;
pub use filter::{FilterEngine, FilterError, FilterParams};
pub use hotkeys::{Action, KeyBindings};
pub use refine::{refine, ActiveBuffer};
pub use session::{Control, EditSession, SessionSummary, ViewWindow};
pub use surface::{AnnotationRegion, Gesture, MarkerColor, PlotSurface};
pub use trace::{Trace, TraceError};
