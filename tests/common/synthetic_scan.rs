#![allow(dead_code)]

/// Good flags over one period with the listed steps bad.
pub fn flags_with_bad(period: usize, bad: &[usize]) -> Vec<bool> {
    assert!(bad.iter().all(|&i| i < period), "bad step outside the period");
    (0..period).map(|i| !bad.contains(&i)).collect()
}

/// Deterministic pseudo-random flags (xorshift), roughly `good_ratio` good.
pub fn pseudo_random_flags(period: usize, seed: u64, good_ratio: f64) -> Vec<bool> {
    let mut state = seed.max(1);
    (0..period)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 1000) as f64 / 1000.0 < good_ratio
        })
        .collect()
}

/// Register read-back rows: every column reads `expected` on good steps,
/// column 0 reads `expected + 1` on bad ones.
pub fn register_rows(good: &[bool], expected: u32, columns: usize) -> Vec<Vec<u32>> {
    assert!(columns > 0, "need at least one column");
    good.iter()
        .map(|&g| {
            let mut row = vec![expected; columns];
            if !g {
                row[0] = expected + 1;
            }
            row
        })
        .collect()
}

/// Linear efficiency sweep: `level` on `start..=end`, a low floor elsewhere.
pub fn plateau_sweep(len: usize, start: usize, end: usize, level: f64) -> Vec<f64> {
    (0..len)
        .map(|i| if (start..=end).contains(&i) { level } else { 0.1 * level })
        .collect()
}
