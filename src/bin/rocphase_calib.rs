use phase_calib::config::rocphase;
use phase_calib::io::{load_json_file, write_json_file};
use phase_calib::{CalibrationInput, PhaseCalibrator};
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = rocphase::load_config(Path::new(&config_path))?;
    let params = config
        .params
        .resolve()
        .map_err(|e| format!("Invalid parameters in {config_path}: {e}"))?;
    let input: CalibrationInput = load_json_file(&config.input)?;

    let calibrator = PhaseCalibrator::new(params);
    let report = calibrator
        .calibrate_batch(&input)
        .map_err(|e| format!("Rejected {}: {e}", config.input.display()))?;

    report.print_text_summary();
    write_json_file(&config.output.report_json, &report)?;
    println!(
        "\nSaved report for {} scans to {}",
        report.units.len(),
        config.output.report_json.display()
    );

    if let Some(path) = &config.output.registers_json {
        let fields = report.core_register_fields();
        write_json_file(path, &fields)?;
        println!("Saved register values for {} boards to {}", fields.len(), path.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: rocphase_calib <config.json>".to_string()
}
