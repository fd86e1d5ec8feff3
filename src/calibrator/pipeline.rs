//! Per-unit analysis driving the region engine end-to-end.
//!
//! The [`PhaseCalibrator`] exposes one entry point per kind of scan:
//!
//! - [`PhaseCalibrator::analyze_safe_window`]: circular regions merged across
//!   holes, bad-region complement, safe-window selection and its middle step.
//! - [`PhaseCalibrator::analyze_candidates`]: plain circular regions of a
//!   second domain, kept as overlap candidates.
//! - [`PhaseCalibrator::analyze_longest_region`]: per-channel scans where the
//!   longest good region wins.
//! - [`PhaseCalibrator::combine`]: reconcile an anchor window with the
//!   candidates of the other domain.
//!
//! Typical usage:
//! ```no_run
//! use phase_calib::{CalibrationParams, PhaseCalibrator};
//!
//! # fn example(good: &[bool]) {
//! let calibrator = PhaseCalibrator::new(CalibrationParams::default());
//! match calibrator.analyze_safe_window(good) {
//!     Ok(window) => println!("phase {} in {}", window.phase, window.region),
//!     Err(failure) => println!("no phase: {failure}"),
//! }
//! # }
//! ```
use super::outcome::{UnitFailure, UnitWarning};
use super::params::CalibrationParams;
use crate::circular::find_circular_regions;
use crate::overlap::combine_regions;
use crate::regions::{
    bad_regions, longest_region, merge_regions, region_middle, select_safe_region,
    shortest_region,
};
use crate::registers::CorePhaseRegisters;
use crate::types::Region;
use log::{debug, warn};

/// Safe window of an anchor-domain scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeWindow {
    pub phase: usize,
    pub region: Region,
    /// Good regions after merging, in original indices.
    pub good_regions: Vec<Region>,
    /// Bad regions the selection was based on.
    pub bad_regions: Vec<Region>,
    /// True when the bad regions had to be merged to reach the expected count.
    pub bad_regions_merged: bool,
    pub split_from: Option<Region>,
    pub warnings: Vec<UnitWarning>,
}

/// Longest good region of a per-channel scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LongestRegion {
    pub phase: usize,
    pub region: Region,
    pub regions: Vec<Region>,
    pub warnings: Vec<UnitWarning>,
}

/// Common phase of two reconciled domains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinedPhase {
    pub phase: usize,
    pub candidate: Region,
    pub overlap: Vec<usize>,
    pub registers: CorePhaseRegisters,
}

/// Stateless driver of the region engine; every call depends only on its
/// arguments and the parameters.
#[derive(Clone, Debug, Default)]
pub struct PhaseCalibrator {
    params: CalibrationParams,
}

impl PhaseCalibrator {
    pub fn new(params: CalibrationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CalibrationParams {
        &self.params
    }

    pub fn analyze_safe_window(&self, good: &[bool]) -> Result<SafeWindow, UnitFailure> {
        let period = good.len();
        if period == 0 {
            return Err(UnitFailure::EmptySequence);
        }
        let good_regions = find_circular_regions(good, Some(&self.params.merge));
        if good_regions.is_empty() {
            return Err(UnitFailure::NoGoodRegions);
        }
        debug!("analyze_safe_window: good regions {good_regions:?}");

        let mut bad = bad_regions(&good_regions, period);
        let mut bad_regions_merged = false;
        if bad.len() > self.params.expected_bad_count {
            bad = merge_regions(&bad, &self.params.merge);
            bad_regions_merged = true;
            debug!("analyze_safe_window: merged bad regions {bad:?}");
        }

        let selection = select_safe_region(
            &good_regions,
            &bad,
            self.params.expected_bad_count,
            period,
        )?;
        let mut warnings = Vec::new();
        if let Some(topology) = selection.topology {
            warnings.push(UnitWarning::UnexpectedTopology {
                bad_regions: topology.bad_regions,
                expected: topology.expected,
            });
        }
        let phase = region_middle(&selection.region, period);
        debug!(
            "analyze_safe_window: window {} phase {phase}",
            selection.region
        );
        Ok(SafeWindow {
            phase,
            region: selection.region,
            good_regions,
            bad_regions: bad,
            bad_regions_merged,
            split_from: selection.split_from,
            warnings,
        })
    }

    /// Good regions of a second-domain scan, unmerged.
    pub fn analyze_candidates(&self, good: &[bool]) -> Result<Vec<Region>, UnitFailure> {
        if good.is_empty() {
            return Err(UnitFailure::EmptySequence);
        }
        let regions = find_circular_regions(good, None);
        if regions.is_empty() {
            return Err(UnitFailure::NoGoodRegions);
        }
        debug!("analyze_candidates: {regions:?}");
        Ok(regions)
    }

    pub fn analyze_longest_region(&self, good: &[bool]) -> Result<LongestRegion, UnitFailure> {
        let period = good.len();
        if period == 0 {
            return Err(UnitFailure::EmptySequence);
        }
        let regions = find_circular_regions(good, None);
        let region = longest_region(&regions, period)
            .cloned()
            .ok_or(UnitFailure::NoGoodRegions)?;

        let mut warnings = Vec::new();
        if regions.len() != self.params.expected_good_count {
            warn!(
                "analyze_longest_region: {} good regions (expected {})",
                regions.len(),
                self.params.expected_good_count
            );
            warnings.push(UnitWarning::UnexpectedRegionCount {
                found: regions.len(),
                expected: self.params.expected_good_count,
            });
        } else if let Some(shortest) = shortest_region(&regions, period) {
            let (shortest, longest) = (shortest.len_circular(period), region.len_circular(period));
            if longest - shortest > self.params.size_spread_tolerance {
                warnings.push(UnitWarning::RegionSizeSpread { shortest, longest });
            }
        }

        let phase = region_middle(&region, period);
        debug!("analyze_longest_region: {region} of {regions:?} phase {phase}");
        Ok(LongestRegion {
            phase,
            region,
            regions,
            warnings,
        })
    }

    pub fn combine(
        &self,
        anchor: &Region,
        candidates: &[Region],
        period: usize,
    ) -> Result<CombinedPhase, UnitFailure> {
        let overlap = combine_regions(anchor, candidates, period)?;
        debug!(
            "combine: {anchor} with {} shares {:?}",
            overlap.candidate, overlap.indices
        );
        Ok(CombinedPhase {
            phase: overlap.phase,
            registers: CorePhaseRegisters::from_phase(overlap.phase, self.params.register_modulus),
            candidate: overlap.candidate,
            overlap: overlap.indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(period: usize, bad: &[usize]) -> Vec<bool> {
        (0..period).map(|i| !bad.contains(&i)).collect()
    }

    #[test]
    fn single_bad_gap_centres_the_window() {
        let calibrator = PhaseCalibrator::default();
        let window = calibrator
            .analyze_safe_window(&flags(16, &[13, 14, 15]))
            .unwrap();
        assert_eq!(window.region, Region::new(0, 12));
        assert_eq!(window.bad_regions, vec![Region::new(13, 15)]);
        assert_eq!(window.phase, 6);
        assert!(window.warnings.is_empty());
    }

    #[test]
    fn window_follows_narrowest_gap_across_boundary() {
        let calibrator = PhaseCalibrator::default();
        // bad 4..=7 (4 steps) and 14..=15 (2 steps); window starts at 0
        let window = calibrator
            .analyze_safe_window(&flags(16, &[4, 5, 6, 7, 14, 15]))
            .unwrap();
        assert_eq!(window.region, Region::new(0, 3));
        assert_eq!(window.phase, 1);
    }

    #[test]
    fn hole_in_window_is_split_off() {
        let calibrator = PhaseCalibrator::default();
        // narrow gap 0..=1, wide gap 20..=23, single bad step at 10
        let window = calibrator
            .analyze_safe_window(&flags(32, &[0, 1, 10, 20, 21, 22, 23]))
            .unwrap();
        assert_eq!(window.split_from, Some(Region::with_holes(2, 19, [10])));
        assert_eq!(window.region, Region::new(11, 19));
        assert_eq!(window.phase, 15);
    }

    #[test]
    fn extra_bad_regions_are_merged_before_fallback() {
        let calibrator = PhaseCalibrator::default();
        // Three bad gaps; two of them are separated by one good step only,
        // so the merged complement has two regions again.
        let window = calibrator
            .analyze_safe_window(&flags(32, &[4, 5, 7, 8, 20, 21, 22]))
            .unwrap();
        assert!(window.bad_regions_merged);
        assert_eq!(window.bad_regions.len(), 2);
        assert!(window.warnings.is_empty());
    }

    #[test]
    fn degenerate_scans_fail_cleanly() {
        let calibrator = PhaseCalibrator::default();
        assert_eq!(
            calibrator.analyze_safe_window(&[]),
            Err(UnitFailure::EmptySequence)
        );
        assert_eq!(
            calibrator.analyze_safe_window(&[false; 8]),
            Err(UnitFailure::NoGoodRegions)
        );
        assert_eq!(
            calibrator.analyze_candidates(&[false; 8]),
            Err(UnitFailure::NoGoodRegions)
        );
    }

    #[test]
    fn per_channel_scan_takes_longest_region() {
        let calibrator = PhaseCalibrator::default();
        let result = calibrator
            .analyze_longest_region(&flags(16, &[0, 1, 8, 9]))
            .unwrap();
        assert_eq!(result.regions, vec![Region::new(2, 7), Region::new(10, 15)]);
        assert_eq!(result.region, Region::new(2, 7));
        assert_eq!(result.phase, 4);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn per_channel_scan_flags_odd_topology() {
        let calibrator = PhaseCalibrator::default();
        let result = calibrator
            .analyze_longest_region(&flags(16, &[0, 12]))
            .unwrap();
        assert_eq!(
            result.warnings,
            vec![UnitWarning::RegionSizeSpread {
                shortest: 3,
                longest: 11
            }]
        );
        let single = calibrator.analyze_longest_region(&flags(16, &[5])).unwrap();
        assert_eq!(
            single.warnings,
            vec![UnitWarning::UnexpectedRegionCount {
                found: 1,
                expected: 2
            }]
        );
    }

    #[test]
    fn combined_phase_derives_registers() {
        let calibrator = PhaseCalibrator::default();
        let combined = calibrator
            .combine(
                &Region::new(30, 45),
                &[Region::new(0, 20), Region::new(36, 60)],
                64,
            )
            .unwrap();
        assert_eq!(combined.overlap, (36..=45).collect::<Vec<_>>());
        assert_eq!(combined.phase, 40);
        assert_eq!(combined.registers, CorePhaseRegisters::from_phase(40, 32));
        assert_eq!(combined.registers.phase_160mhz, 8);
    }
}
