use crate::apu::channel::{EnvelopeGenerator, SoundGenerator};
use crate::apu::envelope::Envelope;

// SquareWaveSoundGenerator
// ------------------------
//
// Used for both sound channel 1 and 2. Channel 1 additionally has a
// frequency sweep, which is driven by `Sweep` from the outside.
//
// ---------
// Registers
// ---------
//
// NR10 (0xFF10): Sweep. Only for sound channel 1.
// - bit 6..4: sweep time
// - bit 3:    sweep direction
// - bit 2..0: number of sweep shifts
//
// NR11 (0xFF11), NR21 (0xFF16): Wave pattern and sound length
// - bit 7..6: wave pattern, aka "duty".
// - bit 5..0: sound length (write only)
//
// NR12 (0xFF12), NR22 (0xFF17): Envelope
//
// NR13 (0xFF13), NR23 (0xFF18): lo bits of frequency (write only)
//
// NR14 (0xFF14), NR24 (0xFF19): hi bits of frequency + more
// - bit 7: initial, 1 = restart sound (write only)
// - bit 6: length counter/consecutive selection
// - bit 2..0: hi bits of frequency (write only)
//
// The output is high when bit `duty_position` of the selected waveform
// is set:
//
//   0: 12.5% - _______-
//   1: 25%   - -______-
//   2: 50%   - -____---
//   3: 75%   - _------_
//
const WAVE_DUTY: [u8; 4] = [0b1000_0000, 0b1000_0001, 0b1110_0001, 0b0111_1110];

// Cycles per duty step is (2048 - frequency) * 4
const PERIOD_MULTIPLIER: u32 = 4;

// Frequencies above 2041 (~21.8 kHz) are out of the audible range
const MIN_AUDIBLE_FREQUENCY: u32 = 2042;

#[derive(Clone, Debug)]
pub struct SquareWaveSoundGenerator {
    // Duty Cycle Pattern. Bit 7..6 of NR11. R/W.
    duty: u8,

    waveform: u8,

    // Internal register. Holds a value between 0 and 7 and moves to
    // the next position each time the frequency timer fires.
    duty_position: u8,

    envelope: Envelope,
}

impl SquareWaveSoundGenerator {
    pub fn new() -> Self {
        SquareWaveSoundGenerator {
            duty: 0,
            waveform: WAVE_DUTY[0],
            duty_position: 0,
            envelope: Envelope::new(),
        }
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    // Takes effect on the next step, no trigger needed
    pub fn set_duty(&mut self, duty: u8) {
        self.duty = duty & 0b11;
        self.waveform = WAVE_DUTY[self.duty as usize];
    }

    pub fn duty_position(&self) -> u8 {
        self.duty_position
    }

    fn duty_output(&self) -> u8 {
        (self.waveform >> self.duty_position) & 1
    }
}

impl Default for SquareWaveSoundGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundGenerator for SquareWaveSoundGenerator {
    const LENGTH_MAX: u16 = 64;
    const DEFAULT_PERIOD: u32 = 2048 * PERIOD_MULTIPLIER;
    const MIN_PERIOD: u32 = (2048 - MIN_AUDIBLE_FREQUENCY) * PERIOD_MULTIPLIER;

    fn period(&self, frequency: u16) -> u32 {
        (2048 - frequency as u32) * PERIOD_MULTIPLIER
    }

    fn clock(&mut self, _cycletime: u32) {
        self.duty_position = (self.duty_position + 1) & 7;
    }

    fn fastforward(&mut self, clocks: u32, _cycletime: u32) {
        self.duty_position = ((self.duty_position as u32 + clocks) & 7) as u8;
    }

    fn output(&self) -> u8 {
        self.duty_output() * self.envelope.volume()
    }

    // Restarting resets the duty position, which may give a click
    fn restart(&mut self) {
        self.duty_position = 0;
        self.envelope.restart();
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

impl EnvelopeGenerator for SquareWaveSoundGenerator {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }
}
