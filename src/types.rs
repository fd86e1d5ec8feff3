use serde::{Deserialize, Serialize};
use std::fmt;

/// Contiguous run of good steps, inclusive bounds in original index space.
///
/// A region with `end < start` wraps around the period boundary. `holes`
/// lists interior steps that are not good but were tolerated while merging;
/// it is kept sorted and free of duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RegionRepr")]
pub struct Region {
    start: usize,
    end: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    holes: Vec<usize>,
}

#[derive(Deserialize)]
struct RegionRepr {
    start: usize,
    end: usize,
    #[serde(default)]
    holes: Vec<usize>,
}

impl From<RegionRepr> for Region {
    fn from(repr: RegionRepr) -> Self {
        Region::with_holes(repr.start, repr.end, repr.holes)
    }
}

impl Region {
    /// Hole-free region spanning `start..=end` (wrapping when `end < start`).
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            holes: Vec::new(),
        }
    }

    pub fn with_holes(start: usize, end: usize, holes: impl IntoIterator<Item = usize>) -> Self {
        let mut holes: Vec<usize> = holes.into_iter().collect();
        holes.sort_unstable();
        holes.dedup();
        Self { start, end, holes }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn holes(&self) -> &[usize] {
        &self.holes
    }

    pub fn num_holes(&self) -> usize {
        self.holes.len()
    }

    pub fn wraps(&self) -> bool {
        self.end < self.start
    }

    /// True when both bounds are valid indices of a period of length `period`.
    pub fn fits(&self, period: usize) -> bool {
        self.start < period && self.end < period
    }

    /// Number of steps covered, counting around the boundary for wrapping regions.
    pub fn len_circular(&self, period: usize) -> usize {
        if self.wraps() {
            self.end + period - self.start + 1
        } else {
            self.end - self.start + 1
        }
    }

    /// Explicit index list, `[start..period) ++ [0..=end]` when wrapping.
    pub fn expand(&self, period: usize) -> Vec<usize> {
        if self.wraps() {
            (self.start..period).chain(0..=self.end).collect()
        } else {
            (self.start..=self.end).collect()
        }
    }

    pub fn contains(&self, index: usize, period: usize) -> bool {
        if index >= period {
            return false;
        }
        if self.wraps() {
            index >= self.start || index <= self.end
        } else {
            index >= self.start && index <= self.end
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)?;
        if !self.holes.is_empty() {
            write!(f, " holes: {:?}", self.holes)?;
        }
        Ok(())
    }
}

/// Identifies one calibrated hardware unit: a board and, for per-channel
/// scans, the channel (VMM) on that board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKey {
    pub board: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
}

impl UnitKey {
    pub fn board(board: impl Into<String>) -> Self {
        Self {
            board: board.into(),
            channel: None,
        }
    }

    pub fn channel(board: impl Into<String>, channel: u32) -> Self {
        Self {
            board: board.into(),
            channel: Some(channel),
        }
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.channel {
            Some(ch) => write!(f, "{} vmm{}", self.board, ch),
            None => write!(f, "{}", self.board),
        }
    }
}
