use super::outcome::UnitFailure;
use super::params::ConfigError;
use super::pipeline::PhaseCalibrator;
use crate::circular::find_circular_regions;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{CalibrationReport, CombinedReport, TimingBreakdown, UnitReport};
use crate::scan::{classify_steps, Domain, RegisterUnitScan, UnitScan};
use crate::types::UnitKey;
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// All scans of one calibration run. Every scan spans the same period.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalibrationInput {
    /// Steps per period; signed so that a bad value is reported instead of
    /// failing deserialization.
    pub period: i64,
    pub units: Vec<UnitScan>,
    /// Raw register scans, reduced to good flags before analysis.
    pub register_scans: Vec<RegisterUnitScan>,
}

impl CalibrationInput {
    /// Flag scans followed by the reduced register scans.
    pub fn unit_scans(&self) -> Vec<UnitScan> {
        self.units
            .iter()
            .cloned()
            .chain(self.register_scans.iter().map(RegisterUnitScan::to_unit_scan))
            .collect()
    }
}

#[derive(Default)]
struct DomainPair<'a> {
    primary: Option<&'a UnitReport>,
    secondary: Option<&'a UnitReport>,
}

impl PhaseCalibrator {
    /// Analyze every scan of `input` and reconcile the two core-clock domains.
    ///
    /// Parameters, the period and every scan length are checked before any
    /// analysis; a problem there rejects the run. Afterwards a failing unit
    /// only marks its own report and the rest of the batch goes on.
    pub fn calibrate_batch(&self, input: &CalibrationInput) -> Result<CalibrationReport, ConfigError> {
        let total_start = Instant::now();
        self.params().validate()?;
        if input.period <= 0 {
            return Err(ConfigError::EmptyPeriod {
                period: input.period,
            });
        }
        let period = input.period as usize;

        let mut timings = TimingBreakdown::default();
        let scans = timings.time("decode", || input.unit_scans());
        let mut seen = BTreeSet::new();
        for scan in &scans {
            if !seen.insert((&scan.key, scan.domain)) {
                return Err(ConfigError::DuplicateUnit {
                    unit: scan.key.clone(),
                    domain: scan.domain,
                });
            }
            let found = if scan.good.len() != period {
                Some(scan.good.len())
            } else if !scan.soft_reset.is_empty() && scan.soft_reset.len() != period {
                Some(scan.soft_reset.len())
            } else {
                None
            };
            if let Some(found) = found {
                return Err(ConfigError::LengthMismatch {
                    unit: scan.key.clone(),
                    domain: scan.domain,
                    expected: period,
                    found,
                });
            }
        }
        debug!("calibrate_batch: {} scans, period {period}", scans.len());

        let units: Vec<UnitReport> = timings.time("analyze", || {
            scans.par_iter().map(|scan| self.analyze_unit(scan)).collect()
        });
        let combined = timings.time("combine", || self.combine_domains(&units, period));

        timings.total_ms = elapsed_ms(total_start);
        Ok(CalibrationReport {
            period,
            units,
            combined,
            timings,
        })
    }

    fn analyze_unit(&self, scan: &UnitScan) -> UnitReport {
        let mut report = UnitReport {
            key: scan.key.clone(),
            domain: scan.domain,
            phase: None,
            region: None,
            good_regions: Vec::new(),
            bad_regions: Vec::new(),
            soft_reset_regions: find_circular_regions(&scan.soft_reset, None),
            steps: classify_steps(&scan.good, &scan.soft_reset),
            warnings: Vec::new(),
            failure: None,
        };
        let outcome = match scan.domain {
            Domain::Primary => self.analyze_safe_window(&scan.good).map(|window| {
                report.phase = Some(window.phase);
                report.region = Some(window.region);
                report.good_regions = window.good_regions;
                report.bad_regions = window.bad_regions;
                report.warnings = window.warnings;
            }),
            Domain::Secondary => self.analyze_candidates(&scan.good).map(|regions| {
                report.good_regions = regions;
            }),
            Domain::PerChannel => self.analyze_longest_region(&scan.good).map(|longest| {
                report.phase = Some(longest.phase);
                report.region = Some(longest.region);
                report.good_regions = longest.regions;
                report.warnings = longest.warnings;
            }),
        };
        if let Err(failure) = outcome {
            warn!("{} scan of {}: {failure}", scan.domain, scan.key);
            report.failure = Some(failure);
        }
        report
    }

    /// Boards with a secondary scan are combined with their primary window.
    fn combine_domains(&self, units: &[UnitReport], period: usize) -> Vec<CombinedReport> {
        let mut pairs: BTreeMap<&UnitKey, DomainPair<'_>> = BTreeMap::new();
        for unit in units {
            match unit.domain {
                Domain::Primary => pairs.entry(&unit.key).or_default().primary = Some(unit),
                Domain::Secondary => pairs.entry(&unit.key).or_default().secondary = Some(unit),
                Domain::PerChannel => {}
            }
        }

        pairs
            .into_iter()
            .filter_map(|(key, pair)| {
                let secondary = pair.secondary?;
                let mut report = CombinedReport {
                    key: key.clone(),
                    phase: None,
                    overlap: Vec::new(),
                    candidate: None,
                    registers: None,
                    failure: None,
                };
                let anchor = pair
                    .primary
                    .filter(|p| p.failure.is_none())
                    .and_then(|p| p.region.as_ref());
                let outcome = match anchor {
                    None => Err(UnitFailure::MissingDomain {
                        domain: Domain::Primary,
                    }),
                    Some(_) if secondary.failure.is_some() => Err(UnitFailure::MissingDomain {
                        domain: Domain::Secondary,
                    }),
                    Some(anchor) => self.combine(anchor, &secondary.good_regions, period),
                };
                match outcome {
                    Ok(combined) => {
                        report.phase = Some(combined.phase);
                        report.overlap = combined.overlap;
                        report.candidate = Some(combined.candidate);
                        report.registers = Some(combined.registers);
                    }
                    Err(failure) => {
                        warn!("combining {key}: {failure}");
                        report.failure = Some(failure);
                    }
                }
                Some(report)
            })
            .collect()
    }
}
