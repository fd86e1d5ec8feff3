mod common;

use common::synthetic_scan::{flags_with_bad, pseudo_random_flags};
use phase_calib::circular::{find_shift, rotate, shift_back_regions};
use phase_calib::overlap::combine_regions;
use phase_calib::plateau::plateau_center;
use phase_calib::regions::{
    bad_regions, find_regions, merge_regions, region_middle, select_safe_region, MergeParams,
};
use phase_calib::Region;

#[test]
fn all_bad_sequence_has_no_regions() {
    assert!(find_regions(&[false; 12]).is_empty());
}

#[test]
fn all_good_sequence_is_one_region() {
    assert_eq!(find_regions(&[true; 12]), vec![Region::new(0, 11)]);
}

#[test]
fn found_regions_are_sorted_and_disjoint() {
    for seed in 1..40u64 {
        let flags = pseudo_random_flags(64, seed, 0.6);
        let regions = find_regions(&flags);
        for pair in regions.windows(2) {
            assert!(
                pair[0].end() + 1 < pair[1].start(),
                "seed {seed}: {} and {} touch or overlap",
                pair[0],
                pair[1]
            );
        }
        for r in &regions {
            assert!(r.start() <= r.end());
            assert!(r.holes().is_empty());
            assert!((r.start()..=r.end()).all(|i| flags[i]));
        }
    }
}

#[test]
fn merging_is_idempotent() {
    let params = [
        MergeParams::default(),
        MergeParams {
            hole_width: 2,
            max_num_holes: 3,
        },
        MergeParams {
            hole_width: 0,
            max_num_holes: 1,
        },
    ];
    for seed in 1..30u64 {
        let regions = find_regions(&pseudo_random_flags(96, seed, 0.7));
        for p in &params {
            let once = merge_regions(&regions, p);
            assert_eq!(merge_regions(&once, p), once, "seed {seed} params {p:?}");
        }
    }
}

#[test]
fn region_middle_follows_circular_order() {
    assert_eq!(region_middle(&Region::new(2, 6), 10), 4);
    assert_eq!(region_middle(&Region::new(8, 2), 10), 0);
}

#[test]
fn plateau_center_cases() {
    assert_eq!(plateau_center(&[0.1, 0.1, 0.1]), None);
    assert_eq!(plateau_center(&[0.0, 1.0, 1.0, 1.0, 0.0]), Some(2));
}

#[test]
fn window_follows_the_smaller_bad_gap() {
    // bad {4, 5} (2 steps) and {13, 14, 15} (3 steps)
    let good = vec![Region::new(0, 3), Region::new(6, 12)];
    let bad = bad_regions(&good, 16);
    assert_eq!(bad, vec![Region::new(4, 5), Region::new(13, 15)]);
    let selection = select_safe_region(&good, &bad, 2, 16).unwrap();
    assert_eq!(selection.region, Region::new(6, 12));
    assert!(selection.topology.is_none());
}

#[test]
fn overlap_ties_keep_the_first_candidate() {
    let overlap = combine_regions(
        &Region::new(5, 10),
        &[Region::new(3, 7), Region::new(8, 20)],
        32,
    )
    .unwrap();
    assert_eq!(overlap.indices, vec![5, 6, 7]);
    assert_eq!(overlap.candidate_index, 0);
    assert_eq!(overlap.phase, 6);
}

#[test]
fn rotated_scan_recovers_the_safe_phase() {
    let period = 16;
    let flags = flags_with_bad(period, &[13, 14, 15]);
    let shift = find_shift(&flags);
    assert_eq!(shift, 13);
    let rotated = rotate(&flags, shift);

    let scanned = merge_regions(&find_regions(&rotated), &MergeParams::default());
    let good = shift_back_regions(&scanned, shift, period);
    assert_eq!(good, vec![Region::new(0, 12)]);

    let bad = bad_regions(&good, period);
    let selection = select_safe_region(&good, &bad, 2, period).unwrap();
    assert_eq!(selection.region, Region::new(0, 12));
    assert_eq!(region_middle(&selection.region, period), 6);
}
