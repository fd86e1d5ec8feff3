use crate::overlap::NoSafeOverlap;
use crate::regions::SelectionError;
use crate::scan::Domain;
use crate::types::Region;
use serde::Serialize;
use std::fmt;

/// Why a single unit got no phase. The rest of the batch is unaffected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UnitFailure {
    EmptySequence,
    NoGoodRegions,
    #[serde(rename_all = "camelCase")]
    NoRegionAfterGap { gap: Region },
    #[serde(rename_all = "camelCase")]
    NoSafeOverlap { anchor: Region, candidates: usize },
    /// The other domain needed for combination has no usable result.
    #[serde(rename_all = "camelCase")]
    MissingDomain { domain: Domain },
}

impl UnitFailure {
    /// Empty or featureless input, as opposed to an inconsistent one.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, UnitFailure::EmptySequence | UnitFailure::NoGoodRegions)
    }
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitFailure::EmptySequence => write!(f, "empty scan"),
            UnitFailure::NoGoodRegions => write!(f, "no good regions"),
            UnitFailure::NoRegionAfterGap { gap } => {
                write!(f, "no good region follows the narrowest bad gap {gap}")
            }
            UnitFailure::NoSafeOverlap { anchor, candidates } => write!(
                f,
                "no safe overlap between {anchor} and {candidates} candidate region(s)"
            ),
            UnitFailure::MissingDomain { domain } => write!(f, "no usable {domain} result"),
        }
    }
}

impl std::error::Error for UnitFailure {}

impl From<SelectionError> for UnitFailure {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::NoGoodRegions => UnitFailure::NoGoodRegions,
            SelectionError::NoRegionAfterGap { gap } => UnitFailure::NoRegionAfterGap { gap },
        }
    }
}

impl From<NoSafeOverlap> for UnitFailure {
    fn from(err: NoSafeOverlap) -> Self {
        UnitFailure::NoSafeOverlap {
            anchor: err.anchor,
            candidates: err.candidates,
        }
    }
}

/// Recoverable oddities: a phase was still chosen but deserves a look.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UnitWarning {
    #[serde(rename_all = "camelCase")]
    UnexpectedTopology { bad_regions: usize, expected: usize },
    #[serde(rename_all = "camelCase")]
    UnexpectedRegionCount { found: usize, expected: usize },
    #[serde(rename_all = "camelCase")]
    RegionSizeSpread { shortest: usize, longest: usize },
}

impl fmt::Display for UnitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitWarning::UnexpectedTopology {
                bad_regions,
                expected,
            } => write!(
                f,
                "{bad_regions} bad regions (expected {expected}), fell back to the last good region"
            ),
            UnitWarning::UnexpectedRegionCount { found, expected } => {
                write!(f, "{found} good regions (expected {expected})")
            }
            UnitWarning::RegionSizeSpread { shortest, longest } => {
                write!(f, "good regions vary in size ({shortest}..{longest} steps)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn featureless_scans_are_degenerate() {
        assert!(UnitFailure::EmptySequence.is_degenerate());
        assert!(UnitFailure::NoGoodRegions.is_degenerate());
        let overlap = UnitFailure::NoSafeOverlap {
            anchor: Region::new(0, 3),
            candidates: 2,
        };
        assert!(!overlap.is_degenerate());
        assert!(!UnitFailure::MissingDomain {
            domain: Domain::Primary
        }
        .is_degenerate());
    }

    #[test]
    fn failures_serialize_with_kind_tag() {
        let json = serde_json::to_value(UnitFailure::NoRegionAfterGap {
            gap: Region::new(4, 5),
        })
        .unwrap();
        assert_eq!(json["kind"], "noRegionAfterGap");
        assert_eq!(json["gap"]["start"], 4);
    }
}
