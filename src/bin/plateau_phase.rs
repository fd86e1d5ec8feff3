use phase_calib::config::plateau::{self, ArtMappingConfig};
use phase_calib::efficiency::{sweep_phases, PlateauInput, SweepPhase};
use phase_calib::io::{load_json_file, write_json_file};
use phase_calib::registers::ArtPhaseRegisters;
use std::collections::BTreeMap;
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
    let config = plateau::load_config(Path::new(&config_path))?;
    let input: PlateauInput = load_json_file(&config.input)?;

    let sweeps = input
        .to_sweeps()
        .map_err(|e| format!("Inconsistent input {}: {e}", config.input.display()))?;
    let phases = sweep_phases(&sweeps);

    for p in &phases {
        match p.phase {
            Some(phase) => println!("{}: phase {phase}", p.key),
            None => println!("{}: no plateau", p.key),
        }
    }
    write_json_file(&config.output.result_json, &phases)?;
    println!(
        "Saved {} sweep phases to {}",
        phases.len(),
        config.output.result_json.display()
    );

    if let (Some(art), Some(path)) = (&config.art, &config.output.art_registers_json) {
        let registers = art_registers(art, &phases);
        write_json_file(path, &registers)?;
        println!("Saved ART registers to {}", path.display());
    }

    Ok(())
}

fn art_registers(art: &ArtMappingConfig, phases: &[SweepPhase]) -> ArtPhaseRegisters {
    let by_sweep: BTreeMap<_, _> = phases
        .iter()
        .filter_map(|p| p.phase.map(|phase| (p.key, phase as u32)))
        .collect();
    let channels: BTreeMap<_, _> = art
        .channels
        .iter()
        .filter_map(|m| by_sweep.get(&m.sweep()).map(|&phase| (m.art_channel(), phase)))
        .collect();
    ArtPhaseRegisters::from_phases(&channels, art.default_phase)
}

fn usage() -> String {
    "Usage: plateau_phase <config.json>".to_string()
}
