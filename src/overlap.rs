//! Reconciliation of two calibrated domains sharing one index space.
//!
//! The anchor is the safe window chosen in one domain; candidates are the
//! good regions of the other. The candidate sharing the most steps with the
//! anchor wins and the middle of the shared steps becomes the common phase.

use crate::types::Region;
use log::debug;
use std::fmt;

/// Winning candidate and the steps it shares with the anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlap {
    pub candidate_index: usize,
    pub candidate: Region,
    /// Shared steps in the candidate's circular order; not necessarily contiguous.
    pub indices: Vec<usize>,
    pub phase: usize,
}

/// No candidate shares a single step with the anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoSafeOverlap {
    pub anchor: Region,
    pub candidates: usize,
}

impl fmt::Display for NoSafeOverlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no overlap between {} and {} candidate region(s)",
            self.anchor, self.candidates
        )
    }
}

impl std::error::Error for NoSafeOverlap {}

/// Intersect `anchor` with every candidate and keep the largest overlap.
///
/// Ties go to the first candidate. The phase is element `(len - 1) / 2` of
/// the overlap list, taken literally rather than from a rebuilt span.
pub fn combine_regions(
    anchor: &Region,
    candidates: &[Region],
    period: usize,
) -> Result<Overlap, NoSafeOverlap> {
    let mut best: Option<(usize, Vec<usize>)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let shared: Vec<usize> = candidate
            .expand(period)
            .into_iter()
            .filter(|&idx| anchor.contains(idx, period))
            .collect();
        debug!("combine_regions: {anchor} x {candidate} -> {} shared", shared.len());
        let larger = match &best {
            Some((_, b)) => shared.len() > b.len(),
            None => true,
        };
        if larger {
            best = Some((i, shared));
        }
    }

    match best {
        Some((candidate_index, indices)) if !indices.is_empty() => {
            let phase = indices[(indices.len() - 1) / 2];
            Ok(Overlap {
                candidate_index,
                candidate: candidates[candidate_index].clone(),
                indices,
                phase,
            })
        }
        _ => Err(NoSafeOverlap {
            anchor: anchor.clone(),
            candidates: candidates.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_candidate_wins_ties() {
        let anchor = Region::new(5, 10);
        let candidates = [Region::new(3, 7), Region::new(8, 20)];
        let overlap = combine_regions(&anchor, &candidates, 32).unwrap();
        assert_eq!(overlap.candidate_index, 0);
        assert_eq!(overlap.indices, vec![5, 6, 7]);
        assert_eq!(overlap.phase, 6);
    }

    #[test]
    fn largest_overlap_wins() {
        let anchor = Region::new(5, 10);
        let candidates = [Region::new(3, 6), Region::new(7, 20)];
        let overlap = combine_regions(&anchor, &candidates, 32).unwrap();
        assert_eq!(overlap.candidate_index, 1);
        assert_eq!(overlap.indices, vec![7, 8, 9, 10]);
        assert_eq!(overlap.phase, 8);
    }

    #[test]
    fn wrapping_overlap_keeps_circular_order() {
        let anchor = Region::new(13, 3);
        let candidates = [Region::new(14, 1)];
        let overlap = combine_regions(&anchor, &candidates, 16).unwrap();
        assert_eq!(overlap.indices, vec![14, 15, 0, 1]);
        assert_eq!(overlap.phase, 15);
    }

    #[test]
    fn disjoint_domains_fail() {
        let anchor = Region::new(0, 3);
        let err = combine_regions(&anchor, &[Region::new(6, 9)], 16).unwrap_err();
        assert_eq!(err.candidates, 1);
        assert!(combine_regions(&anchor, &[], 16).is_err());
    }
}
