#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::emu::Machine;

// Cycles a register access usually lags behind the last step, when the
// APU is driven by a CPU emulator issuing the access mid-instruction.
pub const DEFAULT_AUTOSTEP: u32 = 3;

pub const DEFAULT_SAMPLERATE: u32 = 44100;
pub const DEFAULT_BUFFERSIZE: usize = 2048;

// Accuracy of the band-limited steps. High interpolates between kernel
// phases, Low picks the nearest phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Quality {
    Low,

    // High for the two square wave channels, Low for wave and noise
    Medium,

    High,
}

impl Quality {
    // Interpolation flag of each channel, in channel order
    pub fn channel_flags(self) -> [bool; 4] {
        match self {
            Quality::Low => [false; 4],
            Quality::Medium => [true, true, false, false],
            Quality::High => [true; 4],
        }
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::Medium
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ApuConfig {
    pub samplerate: u32,

    // Stereo samples the buffer holds between two reads
    pub buffersize: usize,

    pub machine: Machine,
    pub quality: Quality,

    // Output gain. 1.0 is full scale with all channels at max volume.
    pub volume: f32,
}

impl ApuConfig {
    pub fn new(samplerate: u32, buffersize: usize) -> Self {
        ApuConfig {
            samplerate,
            buffersize,
            ..Self::default()
        }
    }

    pub fn with_machine(mut self, machine: Machine) -> Self {
        self.machine = machine;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_samplerate(mut self, samplerate: u32) -> Self {
        self.samplerate = samplerate;
        self
    }

    pub fn with_buffersize(mut self, buffersize: usize) -> Self {
        self.buffersize = buffersize;
        self
    }
}

impl Default for ApuConfig {
    fn default() -> Self {
        ApuConfig {
            samplerate: DEFAULT_SAMPLERATE,
            buffersize: DEFAULT_BUFFERSIZE,
            machine: Machine::default(),
            quality: Quality::default(),
            volume: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ApuConfig::default();
        assert_eq!(config.samplerate, 44100);
        assert_eq!(config.buffersize, 2048);
        assert_eq!(config.machine, Machine::GameBoyDMG);
        assert_eq!(config.quality, Quality::Medium);
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn builder() {
        let config = ApuConfig::new(48000, 512)
            .with_machine(Machine::GameBoyCGB)
            .with_quality(Quality::High)
            .with_volume(0.5);
        assert_eq!(config.samplerate, 48000);
        assert_eq!(config.buffersize, 512);
        assert_eq!(config.machine, Machine::GameBoyCGB);
        assert_eq!(config.quality, Quality::High);
        assert_eq!(config.volume, 0.5);
    }

    #[test]
    fn medium_quality_favours_square_channels() {
        assert_eq!(Quality::Medium.channel_flags(), [true, true, false, false]);
        assert_eq!(Quality::Low.channel_flags(), [false; 4]);
        assert_eq!(Quality::High.channel_flags(), [true; 4]);
    }
}
