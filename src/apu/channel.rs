use crate::apu::envelope::Envelope;
use crate::apu::length_counter::LengthCounter;
use crate::apu::mixer::{Mixer, Panning};
use crate::apu::timer::Timer;
use crate::apu::MAX_FREQUENCY;

// The waveform part of a sound channel. Everything a channel has in
// common (frequency timer, length counter, DAC and enabled flags) lives
// in `Channel`; the generator only decides what the output is and how
// it changes each time the frequency timer fires.
pub trait SoundGenerator {
    // Length counter size: 64 for the square and noise channels, 256 for
    // the wave channel.
    const LENGTH_MAX: u16;

    // Timer period of a freshly reset channel
    const DEFAULT_PERIOD: u32;

    // Channels running faster than this are inaudible. They keep being
    // clocked but don't contribute to the output.
    const MIN_PERIOD: u32 = 0;

    // Frequency timer period, in cycles, for the given 11-bit frequency
    fn period(&self, frequency: u16) -> u32;

    // Called each time the frequency timer fires. `cycletime` is when.
    fn clock(&mut self, cycletime: u32);

    // Clock the generator several times in one go. The last clock
    // happened at `cycletime`.
    fn fastforward(&mut self, clocks: u32, cycletime: u32) {
        for _ in 0..clocks {
            self.clock(cycletime);
        }
    }

    // Current 4-bit digital output
    fn output(&self) -> u8;

    fn restart(&mut self);

    fn reset(&mut self);
}

// Generators with a volume envelope (square and noise)
pub trait EnvelopeGenerator {
    fn envelope(&self) -> &Envelope;
    fn envelope_mut(&mut self) -> &mut Envelope;
}

// NRx4 bits shared by all channels
const TRIGGER_BIT: u8 = 0b1000_0000;
const LENGTH_ENABLE_BIT: u8 = 0b0100_0000;

pub struct Channel<G> {
    pub gen: G,

    // Frequency timer. Fires once per generator step.
    timer: Timer,

    length_counter: LengthCounter,

    // Frequency. 11 bits, NRx3 + bit 2..0 of NRx4.
    frequency: u16,

    dac_on: bool,

    // Internal enabled flag. Set on trigger (if the DAC is on), cleared
    // by the length counter, sweep overflow or turning the DAC off.
    enabled: bool,

    // Last output level handed to the mixer
    last_output: u8,
}

impl<G: SoundGenerator> Channel<G> {
    pub fn new(gen: G) -> Self {
        Channel {
            gen,
            timer: Timer::new(G::DEFAULT_PERIOD),
            length_counter: LengthCounter::new(G::LENGTH_MAX),
            frequency: 0,
            dac_on: false,
            enabled: false,
            last_output: 0,
        }
    }

    // Digital output. Always 0 for a disabled channel.
    pub fn output(&self) -> u8 {
        if self.enabled {
            self.gen.output()
        } else {
            0
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn dac_enabled(&self) -> bool {
        self.dac_on
    }

    pub fn frequency(&self) -> u16 {
        self.frequency
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn length_counter(&self) -> &LengthCounter {
        &self.length_counter
    }

    pub fn last_output(&self) -> u8 {
        self.last_output
    }

    // True if the step loop must stop at this channel's timer events
    pub fn is_clocked(&self) -> bool {
        self.enabled && self.timer.period() >= G::MIN_PERIOD
    }

    // Turning the DAC off also disables the channel. Turning it on
    // doesn't enable the channel until the next trigger.
    pub fn set_dac_enabled(&mut self, on: bool) {
        self.dac_on = on;
        if !on {
            self.disable();
        }
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    // The new period is picked up on the next timer reload
    pub fn set_frequency(&mut self, frequency: u16) {
        self.frequency = frequency & MAX_FREQUENCY;
        let period = self.gen.period(self.frequency);
        self.timer.set_period(period);
    }

    // Re-read the period from the generator, after a change of its
    // own timing parameters.
    pub(crate) fn update_period(&mut self) {
        let period = self.gen.period(self.frequency);
        self.timer.set_period(period);
    }

    // NRx3
    pub fn write_frequency_lsb(&mut self, value: u8) {
        self.set_frequency((self.frequency & 0x700) | value as u16);
    }

    // NRx4. Returns true if the channel was triggered.
    pub fn write_frequency_msb(&mut self, value: u8) -> bool {
        self.set_frequency((self.frequency & 0xFF) | ((value as u16 & 0b111) << 8));
        self.write_control(value)
    }

    // The length enable and trigger bits of NRx4. Returns true if the
    // channel was triggered.
    pub fn write_control(&mut self, value: u8) -> bool {
        self.length_counter.set_enabled(value & LENGTH_ENABLE_BIT != 0);

        if value & TRIGGER_BIT != 0 {
            self.restart();
            true
        } else {
            false
        }
    }

    // NRx1 length field
    pub fn write_length(&mut self, value: u8) {
        self.length_counter.write(value);
    }

    // 256 Hz frame sequencer tick
    pub fn clock_length(&mut self) {
        if self.length_counter.clock() {
            self.disable();
        }
    }

    pub fn restart(&mut self) {
        self.timer.restart();
        self.length_counter.restart();
        self.gen.restart();
        self.enabled = self.dac_on;
    }

    pub fn reset(&mut self) {
        self.gen.reset();
        self.timer.reset(G::DEFAULT_PERIOD);
        self.length_counter.reset();
        self.frequency = 0;
        self.dac_on = false;
        self.enabled = false;
    }

    // Hand the change from the last mixed level to `level` to the mixer
    fn update(&mut self, mixer: &mut Mixer, panning: Panning, hq: bool, cycletime: u32, level: u8) {
        let delta = level as i8 - self.last_output as i8;
        if delta != 0 {
            mixer.mix(panning, hq, delta, cycletime);
            self.last_output = level;
        }
    }

    // Run the channel for `cycles` cycles starting at `cycletime`.
    // Unless the channel is too fast to be mixed, `cycles` must not pass
    // the next timer event.
    pub fn step(
        &mut self,
        mixer: &mut Mixer,
        panning: Panning,
        hq: bool,
        cycletime: u32,
        cycles: u32,
    ) {
        if !self.enabled {
            // frozen until the next trigger
            self.update(mixer, panning, hq, cycletime, 0);
            return;
        }

        if self.timer.period() < G::MIN_PERIOD {
            let counter = self.timer.counter();
            let period = self.timer.period();
            let clocks = self.timer.fastforward(cycles);
            if clocks > 0 {
                let last = cycletime + counter + (clocks - 1) * period;
                self.gen.fastforward(clocks, last);
            }
            self.update(mixer, panning, hq, cycletime, 0);
            return;
        }

        // changes made by register writes or the frame sequencer
        // since the last step
        let level = self.gen.output();
        self.update(mixer, panning, hq, cycletime, level);

        if self.timer.run(cycles) {
            let time = cycletime + cycles;
            self.gen.clock(time);
            let level = self.gen.output();
            self.update(mixer, panning, hq, time, level);
        }
    }
}

impl<G: SoundGenerator + EnvelopeGenerator> Channel<G> {
    // NRx2. Also powers the DAC.
    pub fn write_envelope(&mut self, value: u8) {
        let dac_on = self.gen.envelope_mut().write_register(value);
        self.set_dac_enabled(dac_on);
    }

    pub fn read_envelope(&self) -> u8 {
        self.gen.envelope().read_register()
    }

    // 64 Hz frame sequencer tick
    pub fn clock_envelope(&mut self) {
        self.gen.envelope_mut().clock();
    }
}
