//! Plateau centering for linear (non-wrapping) efficiency sweeps.
//!
//! A sample belongs to the plateau when it equals the maximum or exceeds a
//! fraction of it. The fraction is tighter (`0.99`) when more than half of
//! the sweep already sits exactly at the maximum, looser (`0.95`) otherwise.
//! The longest plateau run wins and its center is the working point.

const TIGHT_TOLERANCE: f64 = 0.99;
const LOOSE_TOLERANCE: f64 = 0.95;

/// Inclusive `[start, end]` of the winning plateau run, or `None` when the
/// sweep is empty or flat.
///
/// A later run replaces the current best only if `end - start` is strictly
/// larger, so equal runs keep the first one.
pub fn plateau_run(values: &[f64]) -> Option<(usize, usize)> {
    let (best, worst) = values.iter().fold(
        (f64::NEG_INFINITY, f64::INFINITY),
        |(hi, lo), &v| (hi.max(v), lo.min(v)),
    );
    if values.is_empty() || best == worst {
        return None;
    }

    let at_best = values.iter().filter(|&&v| v == best).count();
    let tolerance = if 2 * at_best > values.len() {
        TIGHT_TOLERANCE
    } else {
        LOOSE_TOLERANCE
    };

    let mut winner: Option<(usize, usize)> = None;
    let mut open: Option<usize> = None;

    for (i, &v) in values.iter().enumerate() {
        let in_plateau = v == best || v > tolerance * best;
        match (in_plateau, open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                close(start, i - 1, &mut winner);
                open = None;
            }
            _ => {}
        }
    }
    // A run reaching the last sample is a plateau too and competes normally.
    if let Some(start) = open {
        close(start, values.len() - 1, &mut winner);
    }
    winner
}

fn close(start: usize, end: usize, winner: &mut Option<(usize, usize)>) {
    let longer = match *winner {
        Some((s, e)) => end - start > e - s,
        None => true,
    };
    if longer {
        *winner = Some((start, end));
    }
}

/// Center step of the longest plateau, `floor((start + end) / 2)`.
///
/// `None` plays the role of the `-1` sentinel: the sweep does not
/// discriminate between steps.
pub fn plateau_center(values: &[f64]) -> Option<usize> {
    plateau_run(values).map(|(start, end)| (start + end) / 2)
}
