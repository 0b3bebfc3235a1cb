use crate::apu::channel::{Channel, EnvelopeGenerator, SoundGenerator};
use crate::apu::envelope::Envelope;

// NoiseSoundGenerator
// -------------------
//
// Sound channel 4 outputs white noise from a linear feedback shift
// register.
//
// NR41 (0xFF20): sound length
// - bit 5..0: sound length (write only)
//
// NR42 (0xFF21): Envelope
//
// NR43 (0xFF22): polynomial counter
// - bit 7..4: shift clock frequency (scf)
// - bit 3:    counter step/width (0 = 15 bits, 1 = 7 bits)
// - bit 2..0: dividing ratio of frequencies (drf)
//
// NR44 (0xFF23): counter/consecutive; initial
// - bit 7: initial, 1 = restart sound (write only)
// - bit 6: length counter/consecutive selection

const LFSR_SEED: u16 = 0x7FFF;

// Cycles per LFSR shift is DIVISORS[drf] << scf
const DIVISORS: [u32; 8] = [8, 16, 32, 48, 64, 80, 96, 112];

// Shift clock frequencies 14 and 15 don't clock the LFSR at all
const MAX_VALID_SCF: u8 = 13;

#[derive(Clone, Debug)]
pub struct NoiseSoundGenerator {
    // NR43
    register: u8,

    lfsr: u16,

    // 7-bit mode
    half_width: bool,

    valid_scf: bool,

    envelope: Envelope,
}

impl NoiseSoundGenerator {
    pub fn new() -> Self {
        NoiseSoundGenerator {
            register: 0,
            lfsr: LFSR_SEED,
            half_width: false,
            valid_scf: true,
            envelope: Envelope::new(),
        }
    }

    pub fn read_register(&self) -> u8 {
        self.register
    }

    pub fn write_register(&mut self, value: u8) {
        self.register = value;
        self.half_width = value & 0b1000 != 0;
        self.valid_scf = (value >> 4) <= MAX_VALID_SCF;
    }

    pub fn lfsr(&self) -> u16 {
        self.lfsr
    }

    pub fn is_half_width(&self) -> bool {
        self.half_width
    }
}

impl Default for NoiseSoundGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundGenerator for NoiseSoundGenerator {
    const LENGTH_MAX: u16 = 64;
    const DEFAULT_PERIOD: u32 = DIVISORS[0];

    // The frequency registers are not used by the noise channel
    fn period(&self, _frequency: u16) -> u32 {
        let drf = (self.register & 0b111) as usize;
        let scf = (self.register >> 4) as u32;
        DIVISORS[drf] << scf
    }

    fn clock(&mut self, _cycletime: u32) {
        if !self.valid_scf {
            return;
        }

        let feedback = (self.lfsr ^ (self.lfsr >> 1)) & 1;
        self.lfsr = (self.lfsr >> 1) | (feedback << 14);
        if self.half_width {
            self.lfsr = (self.lfsr & !0x40) | (feedback << 6);
        }
    }

    fn output(&self) -> u8 {
        (!self.lfsr & 1) as u8 * self.envelope.volume()
    }

    fn restart(&mut self) {
        self.lfsr = LFSR_SEED;
        self.envelope.restart();
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

impl EnvelopeGenerator for NoiseSoundGenerator {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }
}

impl Channel<NoiseSoundGenerator> {
    // NR43. The new period applies on the next timer reload.
    pub fn write_polynomial(&mut self, value: u8) {
        self.gen.write_register(value);
        self.update_period();
    }

    pub fn read_polynomial(&self) -> u8 {
        self.gen.read_register()
    }
}
