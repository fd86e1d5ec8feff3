use super::timing::TimingBreakdown;
use crate::calibrator::{UnitFailure, UnitWarning};
use crate::registers::CorePhaseRegisters;
use crate::scan::{Domain, StepState};
use crate::types::{Region, UnitKey};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one analyzed unit scan.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitReport {
    #[serde(flatten)]
    pub key: UnitKey,
    pub domain: Domain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<usize>,
    /// Window the phase was taken from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    pub good_regions: Vec<Region>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bad_regions: Vec<Region>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub soft_reset_regions: Vec<Region>,
    pub steps: Vec<StepState>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<UnitWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<UnitFailure>,
}

/// Common phase of a board calibrated in both clock domains.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    #[serde(flatten)]
    pub key: UnitKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overlap: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<Region>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registers: Option<CorePhaseRegisters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<UnitFailure>,
}

/// Everything a calibration run produced, one entry per unit.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationReport {
    pub period: usize,
    pub units: Vec<UnitReport>,
    pub combined: Vec<CombinedReport>,
    pub timings: TimingBreakdown,
}

fn format_phase(phase: Option<usize>) -> String {
    phase
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl CalibrationReport {
    /// Units and combinations that ended without a phase.
    pub fn failure_count(&self) -> usize {
        self.units.iter().filter(|u| u.failure.is_some()).count()
            + self.combined.iter().filter(|c| c.failure.is_some()).count()
    }

    pub fn unit(&self, key: &UnitKey, domain: Domain) -> Option<&UnitReport> {
        self.units
            .iter()
            .find(|u| &u.key == key && u.domain == domain)
    }

    /// Core clock register fields per board for every successful combination.
    pub fn core_register_fields(&self) -> BTreeMap<String, BTreeMap<&'static str, usize>> {
        self.combined
            .iter()
            .filter_map(|c| c.registers.map(|r| (c.key.board.clone(), r.fields())))
            .collect()
    }

    pub fn print_text_summary(&self) {
        println!("Calibration summary (period {})", self.period);
        for unit in &self.units {
            let status = match &unit.failure {
                Some(failure) if failure.is_degenerate() => format!("SKIPPED: {failure}"),
                Some(failure) => format!("FAILED: {failure}"),
                None => format!("phase {}", format_phase(unit.phase)),
            };
            println!("  [{}] {}: {}", unit.domain, unit.key, status);
            if let Some(region) = &unit.region {
                println!("      window {region}");
            }
            for warning in &unit.warnings {
                println!("      warning: {warning}");
            }
        }
        if !self.combined.is_empty() {
            println!("\nCombined core phases");
            for c in &self.combined {
                match (&c.failure, &c.registers) {
                    (Some(failure), _) => println!("  {}: FAILED: {failure}", c.key),
                    (None, Some(regs)) => println!(
                        "  {}: phase {} (40MHz={} 160MHz={}) overlap {} steps",
                        c.key,
                        format_phase(c.phase),
                        regs.phase_40mhz,
                        regs.phase_160mhz,
                        c.overlap.len()
                    ),
                    (None, None) => println!("  {}: phase {}", c.key, format_phase(c.phase)),
                }
            }
        }
        println!(
            "\nTimings (ms): total={:.3} failures={}",
            self.timings.total_ms,
            self.failure_count()
        );
    }
}
