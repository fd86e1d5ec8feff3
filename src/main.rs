use phase_calib::prelude::*;

fn main() {
    // Demo stub: one board whose clock scan fails near both ends of the period
    let period = 64usize;
    let primary: Vec<bool> = (0..period).map(|i| !(i < 4 || (46..51).contains(&i))).collect();
    let secondary: Vec<bool> = (0..period).map(|i| !(i < 3 || (21..28).contains(&i))).collect();
    let input = CalibrationInput {
        period: period as i64,
        units: vec![
            UnitScan {
                key: UnitKey::board("demo"),
                domain: Domain::Primary,
                good: primary,
                soft_reset: Vec::new(),
            },
            UnitScan {
                key: UnitKey::board("demo"),
                domain: Domain::Secondary,
                good: secondary,
                soft_reset: Vec::new(),
            },
        ],
        register_scans: Vec::new(),
    };

    match PhaseCalibrator::default().calibrate_batch(&input) {
        Ok(report) => {
            let phase = report.combined.first().and_then(|c| c.phase);
            println!(
                "phase={:?} failures={} latency_ms={:.3}",
                phase,
                report.failure_count(),
                report.timings.total_ms
            );
        }
        Err(err) => println!("rejected: {err}"),
    }
}
