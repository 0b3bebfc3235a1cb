// All channels have a length counter which counts down and disables
// the channel when it reaches zero. The length counter can be
// disabled.
//
// The counter is loaded with the value written to NRx1 (6 bits for
// channel 1, 2 and 4, 8 bits for channel 3) and clocked at 256 Hz by
// the frame sequencer.
#[derive(Clone, Debug)]
pub struct LengthCounter {
    // Max length value. 256 for ch 3 (wave), 64 for the others
    max: u16,

    enabled: bool,
    value: u16,
}

impl LengthCounter {
    pub fn new(max: u16) -> Self {
        LengthCounter {
            max,
            enabled: false,
            value: 0,
        }
    }

    pub fn reset(&mut self) {
        self.enabled = false;
        self.value = 0;
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn write(&mut self, value: u8) {
        self.value = value as u16 & (self.max - 1);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, en: bool) {
        self.enabled = en;
    }

    // When triggered, if length counter is 0 it should
    // be reset to 64 (256 for wave channel).
    pub fn restart(&mut self) {
        if self.value == 0 {
            self.value = self.max;
        }
    }

    // This function should be called by the 256 Hz frame sequencer
    // tick. If it returns true, it has reached zero and the channel
    // should be disabled.
    pub fn clock(&mut self) -> bool {
        if !self.enabled || self.value == 0 {
            return false;
        }

        self.value -= 1;
        self.value == 0
    }
}
