//! Calibration pipeline on top of the region engine.
//!
//! - [`params`]: tunable parameters and run-level configuration errors.
//! - [`pipeline`]: single-scan analysis per clock domain and domain combination.
//! - [`batch`]: parallel analysis of a whole run into a [`CalibrationReport`](crate::diagnostics::CalibrationReport).
//! - [`outcome`]: per-unit failures and warnings.

pub mod batch;
pub mod outcome;
pub mod params;
pub mod pipeline;

pub use batch::CalibrationInput;
pub use outcome::{UnitFailure, UnitWarning};
pub use params::{CalibrationParams, ConfigError};
pub use pipeline::{CombinedPhase, LongestRegion, PhaseCalibrator, SafeWindow};
