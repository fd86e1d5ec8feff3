use super::RegionParamsConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct RocPhaseOutputConfig {
    /// Full calibration report.
    pub report_json: PathBuf,
    /// Core clock register fields per board.
    #[serde(default)]
    pub registers_json: Option<PathBuf>,
}

/// Configuration of the core clock phase calibration tool.
#[derive(Clone, Debug, Deserialize)]
pub struct RocPhaseConfig {
    /// Scan file holding a [`CalibrationInput`](crate::calibrator::CalibrationInput).
    pub input: PathBuf,
    #[serde(default)]
    pub params: RegionParamsConfig,
    pub output: RocPhaseOutputConfig,
}

pub fn load_config(path: &Path) -> Result<RocPhaseConfig, String> {
    super::load_config(path)
}
