//! Region extraction, merging and safe-window selection.
//!
//! - [`finder`]: maximal good runs of a linear sequence.
//! - [`merger`]: bridge small bad gaps ("holes") between neighbouring runs.
//! - [`selector`]: circular complement, safe-window choice and middle step.

pub mod finder;
pub mod merger;
pub mod selector;

pub use finder::{find_regions, find_regions_in};
pub use merger::{merge_regions, mergeable, MergeParams};
pub use selector::{
    bad_regions, longest_region, region_middle, select_safe_region, shortest_region,
    split_at_holes, Selection, SelectionError, UnexpectedTopology,
};
