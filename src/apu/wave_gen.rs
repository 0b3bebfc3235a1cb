use crate::apu::channel::{Channel, SoundGenerator};

// WaveSoundGenerator
// ------------------
//
// Sound channel 3 plays back 32 4-bit samples stored in wave RAM.
//
// NR30 (0xFF1A): DAC power
// - bit 7: 1 = on
//
// NR31 (0xFF1B): sound length (write only, 8 bits)
//
// NR32 (0xFF1C): output level
// - bit 6..5: 0 = mute, 1 = 100%, 2 = 50%, 3 = 25%
//
// NR33 (0xFF1D): lo bits of frequency (write only)
//
// NR34 (0xFF1E): hi bits of frequency + more, same as NR14
//
// 0xFF30-0xFF3F: wave RAM, two samples per byte with the high nibble
// played first.
//
// Some obscure behaviour is not emulated: retriggering while the
// channel is playing corrupts wave RAM on the DMG.

pub const WAVE_RAM_SIZE: usize = 16;

// Cycles per sample is (2048 - frequency) * 2
const PERIOD_MULTIPLIER: u32 = 2;

// On the DMG, wave RAM can only be accessed by the CPU while the channel
// is playing if it happens within this many cycles after the channel
// itself read from it.
pub const RAM_ACCESS_WINDOW: i64 = 4;

// Right shift applied to the sample for each NR32 output level
const VOLUME_SHIFT: [u8; 4] = [4, 0, 1, 2];

#[derive(Clone, Debug)]
pub struct WaveSoundGenerator {
    wave: [u8; WAVE_RAM_SIZE],

    // Index of the sample being played, 0..31
    position: u8,

    // Last sample read from wave RAM. Not cleared on trigger.
    sample_buffer: u8,

    // Bit 6..5 of NR32
    volume_code: u8,
    volume_shift: u8,

    // Cycle time of the last wave RAM fetch, relative to the start of
    // the current frame. May be negative after a frame has ended.
    last_ram_access: i64,
}

impl WaveSoundGenerator {
    pub fn new() -> Self {
        WaveSoundGenerator {
            wave: [0; WAVE_RAM_SIZE],
            position: 0,
            sample_buffer: 0,
            volume_code: 0,
            volume_shift: VOLUME_SHIFT[0],
            last_ram_access: i64::MIN / 2,
        }
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn wave_ram(&self) -> &[u8; WAVE_RAM_SIZE] {
        &self.wave
    }

    // NR32
    pub fn read_volume(&self) -> u8 {
        self.volume_code << 5
    }

    pub fn write_volume(&mut self, value: u8) {
        self.volume_code = (value >> 5) & 0b11;
        self.volume_shift = VOLUME_SHIFT[self.volume_code as usize];
    }

    // Move the last fetch time to the time base of the next frame
    pub fn rebase(&mut self, frame_cycles: u32) {
        self.last_ram_access -= frame_cycles as i64;
    }

    fn fetch(&mut self) {
        let byte = self.wave[(self.position >> 1) as usize];
        self.sample_buffer = if self.position & 1 == 0 {
            byte >> 4
        } else {
            byte & 0x0F
        };
    }
}

impl Default for WaveSoundGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundGenerator for WaveSoundGenerator {
    const LENGTH_MAX: u16 = 256;
    const DEFAULT_PERIOD: u32 = 2048 * PERIOD_MULTIPLIER;

    fn period(&self, frequency: u16) -> u32 {
        (2048 - frequency as u32) * PERIOD_MULTIPLIER
    }

    fn clock(&mut self, cycletime: u32) {
        self.position = (self.position + 1) & 0x1F;
        self.fetch();
        self.last_ram_access = cycletime as i64;
    }

    fn output(&self) -> u8 {
        self.sample_buffer >> self.volume_shift
    }

    // Playback restarts at the first sample, but the sample buffer keeps
    // the last fetched sample until the next clock.
    fn restart(&mut self) {
        self.position = 0;
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Channel<WaveSoundGenerator> {
    // While the DAC is on, the CPU only reaches wave RAM right after the
    // channel read from it itself. The CGB has no such restriction.
    pub fn can_access_ram(&self, cycletime: u32, dmg: bool) -> bool {
        if !self.dac_enabled() || !dmg {
            return true;
        }

        let since = cycletime as i64 - self.gen.last_ram_access;
        (0..RAM_ACCESS_WINDOW).contains(&since)
    }

    // Byte at `index` with the DAC off, otherwise the byte being played
    fn ram_address(&self, index: usize) -> usize {
        if self.dac_enabled() {
            (self.gen.position >> 1) as usize
        } else {
            index & (WAVE_RAM_SIZE - 1)
        }
    }

    // Returns None if wave RAM is not accessible at the moment
    pub fn read_ram(&self, index: usize, cycletime: u32, dmg: bool) -> Option<u8> {
        if self.can_access_ram(cycletime, dmg) {
            Some(self.gen.wave[self.ram_address(index)])
        } else {
            None
        }
    }

    // Returns false if the write was dropped
    pub fn write_ram(&mut self, index: usize, value: u8, cycletime: u32, dmg: bool) -> bool {
        if self.can_access_ram(cycletime, dmg) {
            let address = self.ram_address(index);
            self.gen.wave[address] = value;
            true
        } else {
            false
        }
    }
}
