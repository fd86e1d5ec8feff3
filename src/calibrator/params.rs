//! Parameters of the calibration pipeline.
//!
//! Defaults match a clock scan with two edges per period: at most two bad
//! regions, single-step holes, one hole per merged region.

use crate::regions::MergeParams;
use crate::scan::Domain;
use crate::types::UnitKey;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalibrationParams {
    /// Hole tolerance used for good regions and, on ambiguous scans, for bad ones.
    pub merge: MergeParams,
    /// Bad regions expected per period; more triggers the fallback pick.
    pub expected_bad_count: usize,
    /// Good regions expected in a per-channel scan.
    pub expected_good_count: usize,
    /// Largest tolerated length difference between per-channel good regions.
    pub size_spread_tolerance: usize,
    /// Fast-clock period in steps, used to fold the combined phase.
    pub register_modulus: usize,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            merge: MergeParams::default(),
            expected_bad_count: 2,
            expected_good_count: 2,
            size_spread_tolerance: 2,
            register_modulus: 32,
        }
    }
}

impl CalibrationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.register_modulus == 0 {
            return Err(ConfigError::ZeroParameter {
                name: "register_modulus",
            });
        }
        Ok(())
    }
}

/// Configuration problems that reject a whole calibration run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    NegativeParameter {
        name: &'static str,
        value: i64,
    },
    ZeroParameter {
        name: &'static str,
    },
    /// Period length `N <= 0`.
    EmptyPeriod {
        period: i64,
    },
    LengthMismatch {
        unit: UnitKey,
        domain: Domain,
        expected: usize,
        found: usize,
    },
    /// Two scans of the same unit in the same domain.
    DuplicateUnit {
        unit: UnitKey,
        domain: Domain,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NegativeParameter { name, value } => {
                write!(f, "{name} must not be negative (got {value})")
            }
            ConfigError::ZeroParameter { name } => write!(f, "{name} must be positive"),
            ConfigError::EmptyPeriod { period } => {
                write!(f, "scan period must be positive (got {period})")
            }
            ConfigError::LengthMismatch {
                unit,
                domain,
                expected,
                found,
            } => write!(
                f,
                "{domain} scan of {unit} has {found} steps, period is {expected}"
            ),
            ConfigError::DuplicateUnit { unit, domain } => {
                write!(f, "{unit} has more than one {domain} scan")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
