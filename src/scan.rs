//! Scan inputs: per-step validity of one hardware unit over a full period.
//!
//! Scans arrive either already reduced to good/bad flags ([`UnitScan`]) or as
//! raw register read-back per step ([`RegisterUnitScan`]), which is reduced
//! by comparing enabled columns against expected values.

use crate::types::UnitKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical state of one step, as shown in reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Good,
    Bad,
    SoftReset,
}

/// Merge good flags with soft-reset flags; a soft reset masks the step.
pub fn classify_steps(good: &[bool], soft_reset: &[bool]) -> Vec<StepState> {
    good.iter()
        .enumerate()
        .map(|(i, &g)| {
            if soft_reset.get(i).copied().unwrap_or(false) {
                StepState::SoftReset
            } else if g {
                StepState::Good
            } else {
                StepState::Bad
            }
        })
        .collect()
}

/// Which calibration a scan belongs to and therefore how it is analyzed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Anchor domain (e.g. 40 MHz core clock): full safe-window selection.
    Primary,
    /// Second domain (e.g. 160 MHz core clock): regions become overlap candidates.
    Secondary,
    /// Per-channel scan (e.g. one VMM): longest region wins.
    PerChannel,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Primary => "primary",
            Domain::Secondary => "secondary",
            Domain::PerChannel => "per-channel",
        };
        f.write_str(name)
    }
}

/// Good/bad flags of one unit over one period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitScan {
    #[serde(flatten)]
    pub key: UnitKey,
    pub domain: Domain,
    pub good: Vec<bool>,
    /// Steps where the unit went through a soft reset; reported only.
    #[serde(default)]
    pub soft_reset: Vec<bool>,
}

/// Register read-back per step: one row per step, one column per register.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterScan {
    rows: Vec<Vec<u32>>,
}

impl RegisterScan {
    pub fn new(rows: Vec<Vec<u32>>) -> Self {
        Self { rows }
    }

    pub fn steps(&self) -> usize {
        self.rows.len()
    }

    /// A step matches when every enabled column equals `expected`.
    ///
    /// Column `j` is enabled unless `mask[j]` is `false`; columns past the
    /// end of `mask` are enabled. A step with no enabled column matches.
    pub fn matching_steps(&self, expected: u32, mask: &[bool]) -> Vec<bool> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(j, _)| mask.get(*j).copied().unwrap_or(true))
                    .all(|(_, &v)| v == expected)
            })
            .collect()
    }
}

/// Expected value over a masked set of columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCondition {
    pub expected: u32,
    #[serde(default)]
    pub mask: Vec<bool>,
}

/// Raw register scan of one unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUnitScan {
    #[serde(flatten)]
    pub key: UnitKey,
    pub domain: Domain,
    pub registers: RegisterScan,
    /// A step is good when every condition holds.
    pub conditions: Vec<ColumnCondition>,
    #[serde(default)]
    pub soft_reset: Option<ColumnCondition>,
}

impl RegisterUnitScan {
    pub fn to_unit_scan(&self) -> UnitScan {
        let mut good = vec![true; self.registers.steps()];
        for cond in &self.conditions {
            let matched = self.registers.matching_steps(cond.expected, &cond.mask);
            for (g, m) in good.iter_mut().zip(matched) {
                *g &= m;
            }
        }
        let soft_reset = self
            .soft_reset
            .as_ref()
            .map(|cond| self.registers.matching_steps(cond.expected, &cond.mask))
            .unwrap_or_default();
        UnitScan {
            key: self.key.clone(),
            domain: self.domain,
            good,
            soft_reset,
        }
    }
}
