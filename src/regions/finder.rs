use crate::types::Region;

/// Extract maximal runs of good steps from a linear sequence.
///
/// The scan opens a region on a bad→good transition and closes it on the next
/// good→bad transition; a region still open at the last step closes there.
/// The output is sorted by `start`, pairwise disjoint and hole-free.
pub fn find_regions(steps: &[bool]) -> Vec<Region> {
    find_regions_in(steps.iter().copied())
}

/// Same as [`find_regions`] over any step iterator, e.g. a modular view of a
/// circular scan.
pub fn find_regions_in<I>(steps: I) -> Vec<Region>
where
    I: IntoIterator<Item = bool>,
{
    let mut regions = Vec::new();
    let mut open: Option<usize> = None;
    let mut last: Option<usize> = None;
    for (i, good) in steps.into_iter().enumerate() {
        match (good, open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                regions.push(Region::new(start, i - 1));
                open = None;
            }
            _ => {}
        }
        last = Some(i);
    }
    if let (Some(start), Some(end)) = (open, last) {
        regions.push(Region::new(start, end));
    }
    regions
}
