//! Derived configuration register values for calibrated phases.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Replicated core-clock phase fields written for every calibrated board.
pub const CORE_PHASE_40MHZ_FIELDS: [&str; 3] = [
    "ePllCore.ePllPhase40MHz_0",
    "ePllCore.ePllPhase40MHz_1",
    "ePllCore.ePllPhase40MHz_2",
];
pub const CORE_PHASE_160MHZ_FIELDS: [&str; 3] = [
    "ePllCore.ePllPhase160MHz_0",
    "ePllCore.ePllPhase160MHz_1",
    "ePllCore.ePllPhase160MHz_2",
];

/// Core clock register values derived from one combined phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorePhaseRegisters {
    pub phase_40mhz: usize,
    pub phase_160mhz: usize,
}

impl CorePhaseRegisters {
    /// The fast-clock value is the phase folded into one fast-clock period.
    pub fn from_phase(phase: usize, modulus: usize) -> Self {
        let phase_160mhz = if modulus == 0 { phase } else { phase % modulus };
        Self {
            phase_40mhz: phase,
            phase_160mhz,
        }
    }

    /// Register field → value, ready to be written into a board configuration.
    pub fn fields(&self) -> BTreeMap<&'static str, usize> {
        CORE_PHASE_40MHZ_FIELDS
            .iter()
            .map(|&f| (f, self.phase_40mhz))
            .chain(CORE_PHASE_160MHZ_FIELDS.iter().map(|&f| (f, self.phase_160mhz)))
            .collect()
    }
}

pub const ART_CONNECTORS: u8 = 4;
pub const VMMS_PER_CONNECTOR: u8 = 8;
const ART_REGISTER_BASE: u32 = 6;
const ART_REGISTER_STRIDE: u32 = 15;

/// Input channel of an ART ASIC: a connector and the VMM behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtChannel {
    pub connector: u8,
    pub vmm: u8,
}

/// Per-register phase-select fields of one ART ASIC.
///
/// Each register holds two VMM inputs; a connector spans four consecutive
/// registers starting at `06`, `21`, `36` and `51`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArtPhaseRegisters {
    registers: BTreeMap<String, BTreeMap<String, u32>>,
}

impl ArtPhaseRegisters {
    /// Channels absent from `phases` get `default_phase`.
    pub fn from_phases(phases: &BTreeMap<ArtChannel, u32>, default_phase: u32) -> Self {
        let mut registers = BTreeMap::new();
        for connector in 0..ART_CONNECTORS {
            for pair in 0..VMMS_PER_CONNECTOR / 2 {
                let mut fields = BTreeMap::new();
                for vmm in [pair * 2 + 1, pair * 2] {
                    let phase = phases
                        .get(&ArtChannel { connector, vmm })
                        .copied()
                        .unwrap_or(default_phase);
                    fields.insert(format!("phaseSelectChannel{vmm}input"), phase);
                }
                registers.insert(Self::register_name(connector, pair), fields);
            }
        }
        Self { registers }
    }

    pub fn register_name(connector: u8, pair: u8) -> String {
        let reg = ART_REGISTER_BASE + ART_REGISTER_STRIDE * u32::from(connector) + u32::from(pair);
        format!("{reg:02}")
    }

    pub fn registers(&self) -> &BTreeMap<String, BTreeMap<String, u32>> {
        &self.registers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_clock_value_is_folded() {
        let regs = CorePhaseRegisters::from_phase(70, 32);
        assert_eq!(regs.phase_40mhz, 70);
        assert_eq!(regs.phase_160mhz, 6);
        let fields = regs.fields();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields["ePllCore.ePllPhase160MHz_2"], 6);
        assert_eq!(fields["ePllCore.ePllPhase40MHz_0"], 70);
    }

    #[test]
    fn art_register_layout() {
        assert_eq!(ArtPhaseRegisters::register_name(0, 0), "06");
        assert_eq!(ArtPhaseRegisters::register_name(1, 3), "24");
        assert_eq!(ArtPhaseRegisters::register_name(3, 0), "51");

        let mut phases = BTreeMap::new();
        phases.insert(ArtChannel { connector: 2, vmm: 5 }, 3);
        let regs = ArtPhaseRegisters::from_phases(&phases, 7);
        assert_eq!(regs.registers().len(), 16);
        let reg = &regs.registers()["38"];
        assert_eq!(reg["phaseSelectChannel5input"], 3);
        assert_eq!(reg["phaseSelectChannel4input"], 7);
    }
}
