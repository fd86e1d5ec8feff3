#![doc = include_str!("../README.md")]

// Region engine
pub mod circular;
pub mod overlap;
pub mod plateau;
pub mod regions;
pub mod types;

// Calibration layer built on top of the engine.
pub mod calibrator;
pub mod diagnostics;
pub mod efficiency;
pub mod registers;
pub mod scan;

// Tool support
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

pub use crate::calibrator::{
    CalibrationInput, CalibrationParams, ConfigError, PhaseCalibrator, UnitFailure, UnitWarning,
};
pub use crate::circular::find_circular_regions;
pub use crate::diagnostics::CalibrationReport;
pub use crate::overlap::combine_regions;
pub use crate::plateau::plateau_center;
pub use crate::regions::MergeParams;
pub use crate::types::{Region, UnitKey};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use phase_calib::prelude::*;
///
/// # fn main() {
/// let input = CalibrationInput {
///     period: 16,
///     units: vec![UnitScan {
///         key: UnitKey::board("rocA"),
///         domain: Domain::Primary,
///         good: (0..16).map(|i| i < 13).collect(),
///         soft_reset: Vec::new(),
///     }],
///     register_scans: Vec::new(),
/// };
/// let report = PhaseCalibrator::default().calibrate_batch(&input).expect("valid input");
/// report.print_text_summary();
/// # }
/// ```
pub mod prelude {
    pub use crate::scan::{Domain, UnitScan};
    pub use crate::{
        CalibrationInput, CalibrationParams, CalibrationReport, PhaseCalibrator, Region, UnitKey,
    };
}
