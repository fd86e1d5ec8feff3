//! Hit efficiency bookkeeping for pulse-phase sweeps.
//!
//! Every test pulse is registered under a [`HitKey`] naming the expected
//! channel and the phase at which it was sent. Observed channels are then
//! recorded against it; the efficiency of a `(layer, vmm, phase)` point is the
//! fraction of observed hits landing on the expected channel.

use crate::plateau::plateau_run;
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Composite key of one expected hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitKey {
    pub layer: u32,
    pub vmm: u32,
    pub expected_channel: u32,
    pub phase: u32,
}

impl HitKey {
    pub fn sweep(&self) -> SweepKey {
        SweepKey {
            layer: self.layer,
            vmm: self.vmm,
        }
    }
}

/// One phase sweep: a VMM on a given layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SweepKey {
    pub layer: u32,
    pub vmm: u32,
}

impl fmt::Display for SweepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {} vmm {:03}", self.layer, self.vmm)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EfficiencyError {
    DuplicateExpectation(HitKey),
}

impl fmt::Display for EfficiencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EfficiencyError::DuplicateExpectation(key) => {
                write!(f, "expected hit registered twice: {key:?}")
            }
        }
    }
}

impl std::error::Error for EfficiencyError {}

#[derive(Clone, Debug, Default)]
pub struct EfficiencyTable {
    hits: BTreeMap<HitKey, Vec<u32>>,
}

impl EfficiencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an expected hit. Each key may be declared once.
    pub fn register(&mut self, key: HitKey) -> Result<(), EfficiencyError> {
        if self.hits.contains_key(&key) {
            return Err(EfficiencyError::DuplicateExpectation(key));
        }
        self.hits.insert(key, Vec::new());
        Ok(())
    }

    /// Record an observed channel; returns `false` for undeclared keys.
    pub fn record_hit(&mut self, key: HitKey, observed_channel: u32) -> bool {
        match self.hits.get_mut(&key) {
            Some(observed) => {
                observed.push(observed_channel);
                true
            }
            None => {
                warn!("unexpected hit {key:?}: the acquired data may be inconsistent");
                false
            }
        }
    }

    /// All phases seen across the table, ascending.
    pub fn phases(&self) -> Vec<u32> {
        let set: BTreeSet<u32> = self.hits.keys().map(|k| k.phase).collect();
        set.into_iter().collect()
    }

    /// Efficiency per sweep and phase; `0.0` where nothing was observed.
    pub fn efficiencies(&self) -> BTreeMap<SweepKey, BTreeMap<u32, f64>> {
        let mut counts: BTreeMap<(SweepKey, u32), (u32, u32)> = BTreeMap::new();
        for (key, observed) in &self.hits {
            let entry = counts.entry((key.sweep(), key.phase)).or_default();
            for &ch in observed {
                entry.1 += 1;
                if ch == key.expected_channel {
                    entry.0 += 1;
                }
            }
        }
        let mut out: BTreeMap<SweepKey, BTreeMap<u32, f64>> = BTreeMap::new();
        for ((sweep, phase), (matched, total)) in counts {
            let eff = if total > 0 {
                f64::from(matched) / f64::from(total)
            } else {
                0.0
            };
            out.entry(sweep).or_default().insert(phase, eff);
        }
        out
    }

    /// Efficiency of every sweep over the common phase axis [`Self::phases`].
    pub fn sweeps(&self) -> BTreeMap<SweepKey, Vec<f64>> {
        let phases = self.phases();
        self.efficiencies()
            .into_iter()
            .map(|(sweep, by_phase)| {
                let values = phases
                    .iter()
                    .map(|p| by_phase.get(p).copied().unwrap_or(0.0))
                    .collect();
                (sweep, values)
            })
            .collect()
    }
}

/// Efficiency values of one sweep, one per phase step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepValues {
    #[serde(flatten)]
    pub key: SweepKey,
    pub values: Vec<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedHit {
    #[serde(flatten)]
    pub key: HitKey,
    pub channel: u32,
}

/// Input of a plateau run: ready-made sweeps, raw hits, or both.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateauInput {
    pub sweeps: Vec<SweepValues>,
    pub expected: Vec<HitKey>,
    pub hits: Vec<ObservedHit>,
}

impl PlateauInput {
    /// Sweeps accumulated from the hits, overridden by explicit sweeps.
    pub fn to_sweeps(&self) -> Result<BTreeMap<SweepKey, Vec<f64>>, EfficiencyError> {
        let mut table = EfficiencyTable::new();
        for &key in &self.expected {
            table.register(key)?;
        }
        let dropped = self
            .hits
            .iter()
            .filter(|hit| !table.record_hit(hit.key, hit.channel))
            .count();
        if dropped > 0 {
            warn!("{dropped} hits without a registered expectation were ignored");
        }
        let mut sweeps = table.sweeps();
        for sweep in &self.sweeps {
            sweeps.insert(sweep.key, sweep.values.clone());
        }
        Ok(sweeps)
    }
}

/// Working phase of one sweep.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepPhase {
    #[serde(flatten)]
    pub key: SweepKey,
    /// Serialized as `-1` when the sweep has no plateau.
    #[serde(serialize_with = "phase_or_sentinel")]
    pub phase: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plateau: Option<(usize, usize)>,
}

fn phase_or_sentinel<S: Serializer>(phase: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
    match phase {
        Some(p) => s.serialize_u64(*p as u64),
        None => s.serialize_i64(-1),
    }
}

/// Plateau center of every sweep, in key order.
pub fn sweep_phases(sweeps: &BTreeMap<SweepKey, Vec<f64>>) -> Vec<SweepPhase> {
    sweeps
        .par_iter()
        .map(|(&key, values)| {
            let plateau = plateau_run(values);
            let phase = plateau.map(|(start, end)| (start + end) / 2);
            debug!("{key}: plateau {plateau:?} phase {phase:?}");
            SweepPhase {
                key,
                phase,
                plateau,
            }
        })
        .collect()
}
