//! Serializable reports produced by a calibration run.
//!
//! [`CalibrationReport`] is the main entry point returned by
//! [`PhaseCalibrator::calibrate_batch`](crate::PhaseCalibrator::calibrate_batch):
//! one [`UnitReport`] per analyzed scan, one [`CombinedReport`] per board with
//! a secondary clock-domain scan, and a timing trace.

pub mod report;
pub mod timing;

pub use report::{CalibrationReport, CombinedReport, UnitReport};
pub use timing::{StageTiming, TimingBreakdown};
