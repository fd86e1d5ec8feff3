//! JSON configuration of the calibration tools.
//!
//! - [`RegionParamsConfig`]: region engine parameters as written in JSON,
//!   resolved into [`CalibrationParams`].
//! - [`rocphase`]: configuration of the `rocphase_calib` tool.
//! - [`plateau`]: configuration of the `plateau_phase` tool.

pub mod plateau;
pub mod rocphase;

use crate::calibrator::{CalibrationParams, ConfigError};
use crate::regions::MergeParams;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Region engine parameters as found in a config file.
///
/// Fields are signed so that a negative value is reported by
/// [`RegionParamsConfig::resolve`] rather than by the JSON parser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionParamsConfig {
    /// Widest gap (in steps) bridged when merging neighbouring regions.
    pub hole_width: i64,
    /// Holes a region may already carry and still take part in a merge.
    pub max_num_holes: i64,
    pub expected_bad_count: i64,
    pub expected_good_count: i64,
    pub size_spread_tolerance: i64,
    /// Steps of one fast-clock period.
    pub register_modulus: i64,
}

impl Default for RegionParamsConfig {
    fn default() -> Self {
        let params = CalibrationParams::default();
        Self {
            hole_width: params.merge.hole_width as i64,
            max_num_holes: params.merge.max_num_holes as i64,
            expected_bad_count: params.expected_bad_count as i64,
            expected_good_count: params.expected_good_count as i64,
            size_spread_tolerance: params.size_spread_tolerance as i64,
            register_modulus: params.register_modulus as i64,
        }
    }
}

impl RegionParamsConfig {
    pub fn resolve(&self) -> Result<CalibrationParams, ConfigError> {
        let params = CalibrationParams {
            merge: MergeParams {
                hole_width: non_negative("hole_width", self.hole_width)?,
                max_num_holes: non_negative("max_num_holes", self.max_num_holes)?,
            },
            expected_bad_count: non_negative("expected_bad_count", self.expected_bad_count)?,
            expected_good_count: non_negative("expected_good_count", self.expected_good_count)?,
            size_spread_tolerance: non_negative(
                "size_spread_tolerance",
                self.size_spread_tolerance,
            )?,
            register_modulus: non_negative("register_modulus", self.register_modulus)?,
        };
        params.validate()?;
        Ok(params)
    }
}

fn non_negative(name: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::NegativeParameter { name, value })
}

/// Read and parse a JSON config file.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
