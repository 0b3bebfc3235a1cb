// Volume envelope shared by the two square wave channels and the noise
// channel.
//
// NR12, NR22, NR42: Envelope
// - bit 7..4: initial volume
// - bit 3:    envelope direction (1 = amplify)
// - bit 2..0: number of envelope sweeps (period)
//
// The register is latched into the envelope on trigger. Writes in
// between only affect the DAC power (bits 7..3 all zero turns the DAC
// off) and the next trigger.
#[derive(Clone, Debug, Default)]
pub struct Envelope {
    register: u8,
    counter: u8,
    period: u8,
    amplify: bool,
    volume: u8,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn read_register(&self) -> u8 {
        self.register
    }

    // Store the register value. Returns the new DAC power state.
    pub fn write_register(&mut self, value: u8) -> bool {
        self.register = value;
        value & 0b1111_1000 != 0
    }

    pub fn restart(&mut self) {
        self.counter = 0;
        self.period = self.register & 0b111;
        self.amplify = self.register & 0b1000 != 0;
        self.volume = self.register >> 4;
    }

    // Called by the frame sequencer at 64 Hz. A period of zero
    // freezes the volume.
    pub fn clock(&mut self) {
        if self.period == 0 {
            return;
        }

        self.counter += 1;
        if self.counter == self.period {
            self.counter = 0;

            if self.amplify && self.volume < 0xF {
                self.volume += 1;
            }

            if !self.amplify && self.volume > 0 {
                self.volume -= 1;
            }
        }
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }
}
