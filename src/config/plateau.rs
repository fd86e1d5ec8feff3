use crate::efficiency::SweepKey;
use crate::registers::ArtChannel;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct PlateauOutputConfig {
    pub result_json: PathBuf,
    #[serde(default)]
    pub art_registers_json: Option<PathBuf>,
}

/// Where the phase of one sweep goes on the ART ASIC.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ArtChannelMapping {
    pub layer: u32,
    pub vmm: u32,
    pub connector: u8,
    pub channel: u8,
}

impl ArtChannelMapping {
    pub fn sweep(&self) -> SweepKey {
        SweepKey {
            layer: self.layer,
            vmm: self.vmm,
        }
    }

    pub fn art_channel(&self) -> ArtChannel {
        ArtChannel {
            connector: self.connector,
            vmm: self.channel,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ArtMappingConfig {
    /// Phase written for inputs without a calibrated sweep.
    #[serde(default)]
    pub default_phase: u32,
    pub channels: Vec<ArtChannelMapping>,
}

/// Configuration of the input phase plateau tool.
#[derive(Clone, Debug, Deserialize)]
pub struct PlateauToolConfig {
    /// File holding a [`PlateauInput`](crate::efficiency::PlateauInput).
    pub input: PathBuf,
    pub output: PlateauOutputConfig,
    #[serde(default)]
    pub art: Option<ArtMappingConfig>,
}

pub fn load_config(path: &Path) -> Result<PlateauToolConfig, String> {
    super::load_config(path)
}
