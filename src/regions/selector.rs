//! Safe-window selection on a circular period.
//!
//! The bad regions are the circular complement of the good ones. The
//! narrowest bad gap marks the sharpest transition; the good region right
//! after it is taken as the safe window.

use crate::types::Region;
use log::{debug, warn};
use serde::Serialize;
use std::fmt;

/// More bad regions were found than the period is expected to contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnexpectedTopology {
    pub bad_regions: usize,
    pub expected: usize,
}

/// Result of [`select_safe_region`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Hole-free window on the normal path; the last good region on fallback.
    pub region: Region,
    /// Region the window was cut from when the pick still carried holes.
    pub split_from: Option<Region>,
    /// Set when the fallback policy was applied.
    pub topology: Option<UnexpectedTopology>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionError {
    NoGoodRegions,
    /// No good region starts right after the narrowest bad gap.
    NoRegionAfterGap { gap: Region },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::NoGoodRegions => write!(f, "no good regions"),
            SelectionError::NoRegionAfterGap { gap } => {
                write!(f, "no good region follows the narrowest bad gap {gap}")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// Circular complement of `good`: one bad region per gap between
/// consecutive good regions, the last gap wrapping back to the first.
///
/// Empty gaps are skipped. With no good regions the whole period is bad.
pub fn bad_regions(good: &[Region], period: usize) -> Vec<Region> {
    if period == 0 {
        return Vec::new();
    }
    if good.is_empty() {
        return vec![Region::new(0, period - 1)];
    }
    let mut sorted = good.to_vec();
    sorted.sort_by_key(Region::start);

    let mut bad = Vec::with_capacity(sorted.len());
    for (i, cur) in sorted.iter().enumerate() {
        let next = &sorted[(i + 1) % sorted.len()];
        let gap_start = (cur.end() + 1) % period;
        if gap_start == next.start() {
            continue;
        }
        let gap_end = (next.start() + period - 1) % period;
        bad.push(Region::new(gap_start, gap_end));
    }
    bad.sort_by_key(Region::start);
    bad
}

/// Pick the safe window among `good` using the complement `bad`.
///
/// If `bad` holds more than `expected_bad_count` regions the pick is
/// ambiguous: the last good region is returned as-is and the selection is
/// flagged with [`UnexpectedTopology`]. Otherwise the good region starting
/// right after the smallest bad region (first one on ties) is chosen, and if
/// it carries holes it is cut at every hole and the longest hole-free piece is
/// kept.
pub fn select_safe_region(
    good: &[Region],
    bad: &[Region],
    expected_bad_count: usize,
    period: usize,
) -> Result<Selection, SelectionError> {
    let last = good.last().ok_or(SelectionError::NoGoodRegions)?;

    if bad.len() > expected_bad_count {
        warn!(
            "select_safe_region: {} bad regions (expected at most {}), falling back to {}",
            bad.len(),
            expected_bad_count,
            last
        );
        return Ok(Selection {
            region: last.clone(),
            split_from: None,
            topology: Some(UnexpectedTopology {
                bad_regions: bad.len(),
                expected: expected_bad_count,
            }),
        });
    }

    let picked = match shortest_region(bad, period) {
        Some(gap) => {
            let follow = (gap.end() + 1) % period;
            debug!("select_safe_region: narrowest bad gap {gap}, looking for start {follow}");
            good.iter()
                .find(|r| r.start() == follow)
                .ok_or_else(|| SelectionError::NoRegionAfterGap { gap: gap.clone() })?
        }
        // Nothing bad at all: the single good region spans the period.
        None => &good[0],
    };

    if picked.num_holes() == 0 {
        return Ok(Selection {
            region: picked.clone(),
            split_from: None,
            topology: None,
        });
    }

    let pieces = split_at_holes(picked, period);
    let region = longest_region(&pieces, period)
        .cloned()
        .unwrap_or_else(|| picked.clone());
    debug!("select_safe_region: split {picked} into {pieces:?}, keeping {region}");
    Ok(Selection {
        region,
        split_from: Some(picked.clone()),
        topology: None,
    })
}

/// Cut `region` at every hole into maximal hole-free sub-regions, in the
/// region's circular order.
pub fn split_at_holes(region: &Region, period: usize) -> Vec<Region> {
    let mut pieces = Vec::with_capacity(region.num_holes() + 1);
    let mut run: Option<(usize, usize)> = None;
    for idx in region.expand(period) {
        if region.holes().binary_search(&idx).is_ok() {
            if let Some((start, end)) = run.take() {
                pieces.push(Region::new(start, end));
            }
            continue;
        }
        run = match run {
            Some((start, _)) => Some((start, idx)),
            None => Some((idx, idx)),
        };
    }
    if let Some((start, end)) = run {
        pieces.push(Region::new(start, end));
    }
    pieces
}

/// Middle step of `region`; the lower one when the length is even.
///
/// Equivalent to taking element `(len - 1) / 2` of the wrap-aware expansion.
pub fn region_middle(region: &Region, period: usize) -> usize {
    debug_assert!(region.fits(period), "{region} outside period {period}");
    let len = region.len_circular(period);
    (region.start() + (len - 1) / 2) % period
}

/// First region with the largest circular length.
pub fn longest_region(regions: &[Region], period: usize) -> Option<&Region> {
    extremum(regions, period, Extremum::Longest)
}

/// First region with the smallest circular length.
pub fn shortest_region(regions: &[Region], period: usize) -> Option<&Region> {
    extremum(regions, period, Extremum::Shortest)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Shortest,
    Longest,
}

fn extremum(regions: &[Region], period: usize, which: Extremum) -> Option<&Region> {
    let mut best: Option<(&Region, usize)> = None;
    for region in regions {
        let len = region.len_circular(period);
        let better = match (best, which) {
            (None, _) => true,
            (Some((_, b)), Extremum::Shortest) => len < b,
            (Some((_, b)), Extremum::Longest) => len > b,
        };
        if better {
            best = Some((region, len));
        }
    }
    best.map(|(r, _)| r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_of_plain_and_wrapped_regions() {
        assert_eq!(region_middle(&Region::new(2, 6), 10), 4);
        assert_eq!(region_middle(&Region::new(8, 2), 10), 0);
        // Even length picks the first of the two middles.
        assert_eq!(region_middle(&Region::new(0, 3), 10), 1);
        assert_eq!(region_middle(&Region::new(9, 0), 10), 9);
    }

    #[test]
    fn complement_pairs_ends_with_next_starts() {
        let good = vec![Region::new(0, 3), Region::new(6, 12)];
        assert_eq!(
            bad_regions(&good, 16),
            vec![Region::new(4, 5), Region::new(13, 15)]
        );
    }

    #[test]
    fn complement_handles_wrapping_good_region() {
        let good = vec![Region::new(5, 9), Region::new(12, 2)];
        assert_eq!(
            bad_regions(&good, 16),
            vec![Region::new(3, 4), Region::new(10, 11)]
        );
    }

    #[test]
    fn complement_of_full_or_empty_period() {
        assert!(bad_regions(&[Region::new(0, 15)], 16).is_empty());
        assert_eq!(bad_regions(&[], 16), vec![Region::new(0, 15)]);
        assert_eq!(bad_regions(&[Region::new(3, 7)], 16), vec![Region::new(8, 2)]);
    }

    #[test]
    fn selects_region_after_narrowest_gap() {
        let good = vec![Region::new(0, 3), Region::new(6, 12)];
        let bad = bad_regions(&good, 16);
        let sel = select_safe_region(&good, &bad, 2, 16).unwrap();
        assert_eq!(sel.region, Region::new(6, 12));
        assert!(sel.topology.is_none());
        assert!(sel.split_from.is_none());
    }

    #[test]
    fn narrowest_gap_ties_go_to_first() {
        let good = vec![Region::new(0, 3), Region::new(6, 12)];
        let bad = vec![Region::new(4, 5), Region::new(13, 14)];
        let sel = select_safe_region(&good, &bad, 2, 16).unwrap();
        assert_eq!(sel.region, Region::new(6, 12));
    }

    #[test]
    fn wrapping_gap_selects_region_at_zero() {
        let good = vec![Region::new(0, 5), Region::new(9, 13)];
        let bad = bad_regions(&good, 16);
        assert_eq!(bad, vec![Region::new(6, 8), Region::new(14, 15)]);
        let sel = select_safe_region(&good, &bad, 2, 16).unwrap();
        assert_eq!(sel.region, Region::new(0, 5));
    }

    #[test]
    fn too_many_bad_regions_fall_back_to_last_good() {
        let good = vec![Region::new(0, 2), Region::new(5, 7), Region::new(10, 12)];
        let bad = bad_regions(&good, 16);
        let sel = select_safe_region(&good, &bad, 2, 16).unwrap();
        assert_eq!(sel.region, Region::new(10, 12));
        assert_eq!(
            sel.topology,
            Some(UnexpectedTopology {
                bad_regions: 3,
                expected: 2
            })
        );
    }

    #[test]
    fn holes_are_split_and_longest_piece_kept() {
        let good = vec![Region::with_holes(0, 10, [3]), Region::new(13, 14)];
        let bad = bad_regions(&good, 16);
        assert_eq!(bad, vec![Region::new(11, 12), Region::new(15, 15)]);
        let sel = select_safe_region(&good, &bad, 2, 16).unwrap();
        assert_eq!(sel.region, Region::new(4, 10));
        assert_eq!(sel.split_from, Some(Region::with_holes(0, 10, [3])));
    }

    #[test]
    fn split_follows_wrapped_order() {
        let r = Region::with_holes(12, 5, [14, 2]);
        assert_eq!(
            split_at_holes(&r, 16),
            vec![Region::new(12, 13), Region::new(15, 1), Region::new(3, 5)]
        );
    }

    #[test]
    fn no_good_regions_is_an_error() {
        assert_eq!(
            select_safe_region(&[], &[Region::new(0, 15)], 2, 16),
            Err(SelectionError::NoGoodRegions)
        );
    }

    #[test]
    fn unanchored_gap_is_reported() {
        let good = vec![Region::new(0, 3)];
        let bad = vec![Region::new(5, 6)];
        assert_eq!(
            select_safe_region(&good, &bad, 2, 16),
            Err(SelectionError::NoRegionAfterGap {
                gap: Region::new(5, 6)
            })
        );
    }
}
