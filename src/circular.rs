//! Circular view over one full period of a calibration scan.
//!
//! A linear scan of a periodic sequence would split a good region that
//! straddles the array edge. [`find_shift`] locates the first real transition
//! and [`CircularScan`] reads the sequence starting there through modular
//! indexing, so no region can straddle the scan boundary. Regions are mapped
//! back to original indices afterwards.
//!
//! When the sequence is constant there is no transition to anchor on; the
//! final [`fuse_boundary_regions`] pass joins any pair of regions touching
//! both ends of the period.

use crate::regions::{find_regions_in, merge_regions, MergeParams};
use crate::types::Region;
use log::debug;

/// Rotated copy where position `i` holds `seq[(i + k) mod N]`.
pub fn rotate<T: Clone>(seq: &[T], k: usize) -> Vec<T> {
    let n = seq.len();
    (0..n).map(|i| seq[(i + k) % n].clone()).collect()
}

/// Smallest `i > 0` with `seq[i] != seq[0]`, or `0` when the sequence is constant.
pub fn find_shift<T: PartialEq>(seq: &[T]) -> usize {
    match seq.split_first() {
        Some((first, rest)) => rest
            .iter()
            .position(|v| v != first)
            .map(|i| i + 1)
            .unwrap_or(0),
        None => 0,
    }
}

/// Modular read-out of a period starting at `shift`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircularScan {
    period: usize,
    shift: usize,
}

impl CircularScan {
    pub fn new(period: usize, shift: usize) -> Self {
        let shift = if period == 0 { 0 } else { shift % period };
        Self { period, shift }
    }

    /// Scan anchored on the first transition of `seq`.
    pub fn for_sequence<T: PartialEq>(seq: &[T]) -> Self {
        Self::new(seq.len(), find_shift(seq))
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn shift(&self) -> usize {
        self.shift
    }

    /// Iterate `seq` in scan order without copying it.
    pub fn view<'a, T: Copy>(&self, seq: &'a [T]) -> impl Iterator<Item = T> + 'a {
        debug_assert_eq!(seq.len(), self.period);
        let (period, shift) = (self.period, self.shift);
        (0..period).map(move |i| seq[(i + shift) % period])
    }

    /// Original index of scan position `i`.
    pub fn to_original(&self, i: usize) -> usize {
        (i + self.shift) % self.period
    }

    pub fn region_to_original(&self, region: &Region) -> Region {
        Region::with_holes(
            self.to_original(region.start()),
            self.to_original(region.end()),
            region.holes().iter().map(|&h| self.to_original(h)),
        )
    }
}

/// Map regions found in a sequence rotated by `shift` back to original
/// indices, sorted by start.
pub fn shift_back_regions(regions: &[Region], shift: usize, period: usize) -> Vec<Region> {
    let scan = CircularScan::new(period, shift);
    let mut out: Vec<Region> = regions.iter().map(|r| scan.region_to_original(r)).collect();
    out.sort_by_key(Region::start);
    out
}

/// Join a region starting at `0` with a different region ending at
/// `period - 1` into one wrapping region.
pub fn fuse_boundary_regions(mut regions: Vec<Region>, period: usize) -> Vec<Region> {
    if period == 0 || regions.len() < 2 {
        return regions;
    }
    let head = regions
        .iter()
        .position(|r| !r.wraps() && r.start() == 0);
    let tail = regions
        .iter()
        .position(|r| !r.wraps() && r.end() == period - 1);
    let (Some(head), Some(tail)) = (head, tail) else {
        return regions;
    };
    if head == tail {
        return regions;
    }
    let fused = {
        let (h, t) = (&regions[head], &regions[tail]);
        Region::with_holes(
            t.start(),
            h.end(),
            h.holes().iter().chain(t.holes()).copied(),
        )
    };
    debug!(
        "fuse_boundary_regions: {} + {} -> {}",
        regions[tail], regions[head], fused
    );
    let (first, second) = if head > tail { (head, tail) } else { (tail, head) };
    regions.remove(first);
    regions.remove(second);
    regions.push(fused);
    regions.sort_by_key(Region::start);
    regions
}

/// Good regions of one circular period, in original indices.
///
/// Regions are extracted in scan order, optionally merged across holes
/// there, shifted back and finally fused across the period boundary.
pub fn find_circular_regions(good: &[bool], merge: Option<&MergeParams>) -> Vec<Region> {
    let scan = CircularScan::for_sequence(good);
    if scan.period() == 0 {
        return Vec::new();
    }
    let mut regions = find_regions_in(scan.view(good));
    debug!(
        "find_circular_regions: shift={} scan regions {:?}",
        scan.shift(),
        regions
    );
    if let Some(params) = merge {
        regions = merge_regions(&regions, params);
    }
    let regions = shift_back_regions(&regions, scan.shift(), scan.period());
    fuse_boundary_regions(regions, scan.period())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_moves_index_k_to_front() {
        assert_eq!(rotate(&[0, 1, 2, 3, 4], 2), vec![2, 3, 4, 0, 1]);
        assert_eq!(rotate(&[0, 1, 2], 3), vec![0, 1, 2]);
        assert!(rotate::<u8>(&[], 4).is_empty());
    }

    #[test]
    fn shift_finds_first_transition() {
        assert_eq!(find_shift(&[true, true, false, true]), 2);
        assert_eq!(find_shift(&[false, true]), 1);
        assert_eq!(find_shift(&[true; 5]), 0);
        assert_eq!(find_shift::<bool>(&[]), 0);
    }

    #[test]
    fn view_matches_physical_rotation() {
        let seq = [true, true, false, false, true, false];
        let scan = CircularScan::for_sequence(&seq);
        let viewed: Vec<bool> = scan.view(&seq).collect();
        assert_eq!(viewed, rotate(&seq, scan.shift()));
    }

    #[test]
    fn region_straddling_boundary_is_kept_whole() {
        // good at 14, 15, 0, 1, 2 and 6..=9
        let good: Vec<bool> = (0..16)
            .map(|i| i <= 2 || i >= 14 || (6..=9).contains(&i))
            .collect();
        let regions = find_circular_regions(&good, None);
        assert_eq!(regions, vec![Region::new(6, 9), Region::new(14, 2)]);
    }

    #[test]
    fn merge_happens_before_shift_back() {
        // bad gap 3..=4 anchors the scan, single bad step at 9 is a hole
        let good: Vec<bool> = (0..16).map(|i| i != 3 && i != 4 && i != 9).collect();
        let regions = find_circular_regions(&good, Some(&MergeParams::default()));
        assert_eq!(regions, vec![Region::with_holes(5, 2, [9])]);
    }

    #[test]
    fn boundary_regions_are_fused() {
        let regions = vec![Region::new(0, 2), Region::new(5, 8), Region::new(13, 15)];
        assert_eq!(
            fuse_boundary_regions(regions, 16),
            vec![Region::new(5, 8), Region::new(13, 2)]
        );
    }

    #[test]
    fn full_period_region_is_not_fused_with_itself() {
        let regions = vec![Region::new(0, 15)];
        assert_eq!(fuse_boundary_regions(regions.clone(), 16), regions);
    }

    #[test]
    fn constant_sequences() {
        assert_eq!(find_circular_regions(&[true; 8], None), vec![Region::new(0, 7)]);
        assert!(find_circular_regions(&[false; 8], None).is_empty());
        assert!(find_circular_regions(&[], None).is_empty());
    }
}
