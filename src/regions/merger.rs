use crate::types::Region;
use log::debug;
use serde::{Deserialize, Serialize};

/// Tolerance used when merging neighbouring good regions across bad steps.
///
/// - `hole_width`: largest run of bad steps that may be bridged.
/// - `max_num_holes`: a region already carrying this many holes is not merged
///   any further.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeParams {
    pub hole_width: usize,
    pub max_num_holes: usize,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            hole_width: 1,
            max_num_holes: 1,
        }
    }
}

/// True when `b` may be folded into `a` without exceeding the hole budget.
pub fn mergeable(a: &Region, b: &Region, params: &MergeParams) -> bool {
    a.num_holes() < params.max_num_holes
        && b.num_holes() < params.max_num_holes
        && b.start().saturating_sub(a.end()) <= params.hole_width + 1
}

fn merge_pair(a: &Region, b: &Region) -> Region {
    let bridged = (a.end() + 1)..b.start();
    let holes = a
        .holes()
        .iter()
        .chain(b.holes())
        .copied()
        .chain(bridged);
    Region::with_holes(a.start(), b.end(), holes)
}

/// Merge adjacent regions across tolerated holes.
///
/// Each pass merges the leftmost mergeable pair and restarts from the front;
/// passes repeat until nothing merges. The input is left untouched and the
/// result is a fixed point, so merging it again is a no-op.
pub fn merge_regions(regions: &[Region], params: &MergeParams) -> Vec<Region> {
    let mut current = regions.to_vec();
    loop {
        let Some(i) = current
            .windows(2)
            .position(|pair| mergeable(&pair[0], &pair[1], params))
        else {
            return current;
        };
        let merged = merge_pair(&current[i], &current[i + 1]);
        debug!(
            "merge_regions: {} + {} -> {}",
            current[i],
            current[i + 1],
            merged
        );
        current.splice(i..=i + 1, std::iter::once(merged));
    }
}
