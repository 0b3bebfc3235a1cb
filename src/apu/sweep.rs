use crate::apu::channel::Channel;
use crate::apu::square_gen::SquareWaveSoundGenerator;
use crate::apu::MAX_FREQUENCY;

// Frequency sweep of sound channel 1.
//
// NR10 (0xFF10):
// - bit 6..4: sweep time, in 128 Hz ticks (0 = off)
// - bit 3:    sweep direction (1 = subtraction)
// - bit 2..0: number of sweep shifts
//
// The register is latched on trigger. Each time the sweep time has
// passed, the frequency in the shadow register is shifted right and
// added to (or subtracted from) itself. A result above 2047 disables
// the channel until it is triggered again.
#[derive(Clone, Debug, Default)]
pub struct Sweep {
    register: u8,

    subtraction: bool,
    time: u8,
    shift: u8,
    counter: u8,
    shadow_frequency: u16,
}

impl Sweep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn read_register(&self) -> u8 {
        self.register
    }

    pub fn write_register(&mut self, value: u8) {
        self.register = value & 0x7F;
    }

    pub fn shadow_frequency(&self) -> u16 {
        self.shadow_frequency
    }

    // Next frequency, or None on overflow. A subtraction below zero
    // leaves the frequency as it is.
    fn calculate(&self) -> Option<u16> {
        let shadow = self.shadow_frequency as i32;
        let delta = shadow >> self.shift;
        let next = if self.subtraction {
            shadow - delta
        } else {
            shadow + delta
        };

        if next < 0 {
            Some(self.shadow_frequency)
        } else if next > MAX_FREQUENCY as i32 {
            None
        } else {
            Some(next as u16)
        }
    }

    // Called after channel 1 has been triggered
    pub fn restart(&mut self, channel: &mut Channel<SquareWaveSoundGenerator>) {
        self.counter = 0;
        self.shift = self.register & 0b111;
        self.subtraction = self.register & 0b1000 != 0;
        self.time = (self.register >> 4) & 0b111;
        self.shadow_frequency = channel.frequency();

        if self.shift != 0 && self.calculate().is_none() {
            channel.disable();
        }
    }

    // 128 Hz frame sequencer tick
    pub fn clock(&mut self, channel: &mut Channel<SquareWaveSoundGenerator>) {
        if self.time == 0 || !channel.enabled() {
            return;
        }

        self.counter += 1;
        if self.counter < self.time {
            return;
        }
        self.counter = 0;

        match self.calculate() {
            None => channel.disable(),
            Some(frequency) => {
                if self.shift != 0 {
                    self.shadow_frequency = frequency;
                    channel.set_frequency(frequency);
                }
            }
        }
    }
}
