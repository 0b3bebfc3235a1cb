use log::{debug, trace};

use crate::apu::channel::Channel;
use crate::apu::config::{ApuConfig, Quality};
use crate::apu::mixer::{Mixer, Panning, Terminal};
use crate::apu::noise_gen::NoiseSoundGenerator;
use crate::apu::registers::*;
use crate::apu::sequencer::{Sequencer, SequencerClock};
use crate::apu::square_gen::SquareWaveSoundGenerator;
use crate::apu::sweep::Sweep;
use crate::apu::wave_gen::WaveSoundGenerator;
use crate::emu::Machine;

// Max output is 15 on each of the four channels at master volume 8,
// which maps to full scale.
const VOLUME_DIVISOR: f32 = 15.0 * 4.0 * 8.0;

pub struct AudioProcessingUnit {
    machine: Machine,
    quality: Quality,

    pub ch1: Channel<SquareWaveSoundGenerator>,
    pub ch2: Channel<SquareWaveSoundGenerator>,
    pub ch3: Channel<WaveSoundGenerator>,
    pub ch4: Channel<NoiseSoundGenerator>,

    // Frequency sweep of channel 1
    sweep: Sweep,

    sequencer: Sequencer,
    mixer: Mixer,

    // NR51, per channel
    pannings: [Panning; 4],

    // Band-limited step interpolation, per channel
    high_quality: [bool; 4],

    registers: Registers,

    // Cycles since the start of the current frame
    cycletime: u32,

    // NR50 master volume, 1..8
    left_volume: u8,
    right_volume: u8,

    gain: f32,

    // Bit 7 of NR52. Controls power to the audio hardware
    powered_on: bool,
}

impl AudioProcessingUnit {
    pub fn new(samplerate: u32, buffersize: usize) -> Self {
        Self::with_config(ApuConfig::new(samplerate, buffersize))
    }

    pub fn with_config(config: ApuConfig) -> Self {
        let mut apu = AudioProcessingUnit {
            machine: config.machine,
            quality: config.quality,
            ch1: Channel::new(SquareWaveSoundGenerator::new()),
            ch2: Channel::new(SquareWaveSoundGenerator::new()),
            ch3: Channel::new(WaveSoundGenerator::new()),
            ch4: Channel::new(NoiseSoundGenerator::new()),
            sweep: Sweep::new(),
            sequencer: Sequencer::new(),
            mixer: Mixer::new(config.samplerate, config.buffersize),
            pannings: [Panning::MUTE; 4],
            high_quality: config.quality.channel_flags(),
            registers: Registers::new(),
            cycletime: 0,
            left_volume: 1,
            right_volume: 1,
            gain: config.volume,
            powered_on: false,
        };
        apu.update_volume();
        apu
    }

    pub fn machine(&self) -> Machine {
        self.machine
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn is_powered_on(&self) -> bool {
        self.powered_on
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    // Position in the current frame, in cycles
    pub fn cycletime(&self) -> u32 {
        self.cycletime
    }

    // Back to the power-on state: powered off with every register
    // cleared. Completes the current frame first.
    pub fn reset(&mut self) {
        debug!("reset ({:?})", self.machine);
        self.end_frame();

        self.write_panning(0);
        self.left_volume = 1;
        self.right_volume = 1;
        self.update_volume();

        self.sequencer.reset();
        self.sweep.reset();
        self.ch1.reset();
        self.ch2.reset();
        self.ch3.reset();
        self.ch4.reset();
        self.powered_on = false;
        self.registers = Registers::new();
    }

    pub fn reset_with_machine(&mut self, machine: Machine) {
        self.machine = machine;
        self.reset();
    }

    // Run all components for the given number of cycles. The loop jumps
    // from one timer event to the next.
    pub fn step(&mut self, cycles: u32) {
        let mut remaining = cycles;

        while remaining > 0 {
            let mut to_step = remaining;
            if self.powered_on {
                to_step = to_step.min(self.sequencer.counter());
            }
            if self.ch1.is_clocked() {
                to_step = to_step.min(self.ch1.timer().counter());
            }
            if self.ch2.is_clocked() {
                to_step = to_step.min(self.ch2.timer().counter());
            }
            if self.ch3.is_clocked() {
                to_step = to_step.min(self.ch3.timer().counter());
            }
            if self.ch4.is_clocked() {
                to_step = to_step.min(self.ch4.timer().counter());
            }
            assert!(to_step > 0);

            let time = self.cycletime;
            let mixer = &mut self.mixer;
            self.ch1
                .step(mixer, self.pannings[0], self.high_quality[0], time, to_step);
            self.ch2
                .step(mixer, self.pannings[1], self.high_quality[1], time, to_step);
            self.ch3
                .step(mixer, self.pannings[2], self.high_quality[2], time, to_step);
            self.ch4
                .step(mixer, self.pannings[3], self.high_quality[3], time, to_step);

            if self.powered_on {
                if let Some(clock) = self.sequencer.step(to_step) {
                    self.clock_modulators(clock);
                }
            }

            self.cycletime += to_step;
            remaining -= to_step;
        }
    }

    // Step up to the given time in the current frame. Does nothing if
    // that time has already passed.
    pub fn step_to(&mut self, cycletime: u32) {
        if cycletime > self.cycletime {
            self.step(cycletime - self.cycletime);
        }
    }

    fn clock_modulators(&mut self, clock: SequencerClock) {
        if clock.clocks_length() {
            self.ch1.clock_length();
            self.ch2.clock_length();
            self.ch3.clock_length();
            self.ch4.clock_length();
        }

        if clock.clocks_sweep() {
            self.sweep.clock(&mut self.ch1);
        }

        if clock.clocks_envelope() {
            self.ch1.clock_envelope();
            self.ch2.clock_envelope();
            self.ch4.clock_envelope();
        }
    }

    // Make the samples up to the current time available for reading,
    // and start a new frame at cycle 0.
    pub fn end_frame(&mut self) {
        self.mixer.end_frame(self.cycletime);
        self.ch3.gen.rebase(self.cycletime);
        self.cycletime = 0;
    }

    pub fn available_samples(&self) -> usize {
        self.mixer.available_samples()
    }

    // Read interleaved stereo samples into `dest`. Returns the number of
    // stereo samples read.
    pub fn read_samples(&mut self, dest: &mut [i16]) -> usize {
        self.mixer.read_samples(dest)
    }

    pub fn read_samples_f32(&mut self, dest: &mut [f32]) -> usize {
        self.mixer.read_samples_f32(dest)
    }

    pub fn remove_samples(&mut self, samples: usize) {
        self.mixer.remove_samples(samples);
    }

    pub fn clear_samples(&mut self) {
        let pending = self.mixer.available_samples();
        if pending > 0 {
            debug!("clearing {} unread samples", pending);
        }
        self.mixer.clear();
    }

    // Output gain. 1.0 is full scale with every channel at max volume.
    pub fn set_volume(&mut self, gain: f32) {
        self.gain = gain;
        self.update_volume();
    }

    // Unread samples are lost
    pub fn set_samplerate(&mut self, samplerate: u32) {
        self.mixer.set_samplerate(samplerate);
        self.clear_samples();
    }

    // Unread samples are lost
    pub fn set_buffersize(&mut self, samples: usize) {
        self.mixer.set_buffersize(samples);
    }

    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
        self.high_quality = quality.channel_flags();
    }

    fn terminal_volume(&self, level: u8) -> f32 {
        self.gain * level as f32 / VOLUME_DIVISOR
    }

    fn last_outputs(&self) -> [u8; 4] {
        [
            self.ch1.last_output(),
            self.ch2.last_output(),
            self.ch3.last_output(),
            self.ch4.last_output(),
        ]
    }

    // Apply the master volume and gain to the mixer. The current output
    // level of each channel is moved to the new volume right away.
    fn update_volume(&mut self) {
        let left = self.terminal_volume(self.left_volume);
        let right = self.terminal_volume(self.right_volume);
        let outputs = self.last_outputs();

        for &(terminal, volume) in [(Terminal::Left, left), (Terminal::Right, right)].iter() {
            let level: u32 = self
                .pannings
                .iter()
                .zip(outputs.iter())
                .filter(|(pan, _)| pan.pans(terminal))
                .map(|(_, out)| *out as u32)
                .sum();
            let change = volume - self.mixer.volume(terminal);
            self.mixer
                .add_delta(terminal, level as f32 * change, self.cycletime);
        }

        self.mixer.set_volume(left, right);
    }

    // NR51. A channel moved to or away from a terminal takes its
    // current output level with it.
    fn write_panning(&mut self, value: u8) {
        let outputs = self.last_outputs();

        for (channel, output) in outputs.iter().enumerate() {
            let old = self.pannings[channel];
            let new = Panning::from_nr51(value, channel);

            for &terminal in [Terminal::Left, Terminal::Right].iter() {
                let amplitude = *output as f32 * self.mixer.volume(terminal);
                match (old.pans(terminal), new.pans(terminal)) {
                    (false, true) => self.mixer.add_delta(terminal, amplitude, self.cycletime),
                    (true, false) => self.mixer.add_delta(terminal, -amplitude, self.cycletime),
                    _ => {}
                }
            }

            self.pannings[channel] = new;
        }
    }

    // NR50. Bit 7 and 3 (Vin) are not emulated.
    fn write_master_volume(&mut self, value: u8) {
        self.left_volume = ((value >> 4) & 0b111) + 1;
        self.right_volume = (value & 0b111) + 1;
        self.update_volume();
    }

    fn write_power(&mut self, value: u8) {
        let on = value & 0x80 != 0;
        if on == self.powered_on {
            return;
        }

        if on {
            debug!("power on");
            self.powered_on = true;
            self.sequencer.reset();
            self.registers.nr52 = 0x80;
        } else {
            debug!("power off");
            // Every register is cleared. The DMG keeps the length
            // counters.
            let dmg = self.machine.is_dmg();
            for reg in NR10_REG..NR52_REG {
                match reg {
                    NR11_REG | NR21_REG if dmg => {
                        self.registers.set(reg, 0);
                        let gen = if reg == NR11_REG {
                            &mut self.ch1.gen
                        } else {
                            &mut self.ch2.gen
                        };
                        gen.set_duty(0);
                    }
                    NR31_REG | NR41_REG if dmg => {}
                    _ => self.write_powered(reg, 0),
                }
            }
            self.powered_on = false;
            self.registers.nr52 = 0;
        }
    }

    // Write to a length counter while powered off
    fn write_length_only(&mut self, reg: u8, value: u8) {
        match reg {
            NR11_REG => self.ch1.write_length(value),
            NR21_REG => self.ch2.write_length(value),
            NR31_REG => self.ch3.write_length(value),
            NR41_REG => self.ch4.write_length(value),
            _ => {}
        }
    }

    pub fn write_register(&mut self, reg: u8, value: u8, autostep: u32) {
        self.step(autostep);

        trace!(
            "write {} (0x{:02x}) = 0x{:02x} at {}",
            register_name(reg),
            reg,
            value,
            self.cycletime
        );

        match reg {
            NR52_REG => self.write_power(value),
            NR10_REG..=NR51_REG => {
                if self.powered_on {
                    self.write_powered(reg, value);
                } else if self.machine.is_dmg() {
                    self.write_length_only(reg, value);
                }
            }
            WAVE_RAM_START..=WAVE_RAM_END => {
                let index = (reg - WAVE_RAM_START) as usize;
                if !self
                    .ch3
                    .write_ram(index, value, self.cycletime, self.machine.is_dmg())
                {
                    trace!("wave RAM write blocked while the channel 3 DAC is on");
                }
            }
            _ => {}
        }
    }

    fn write_powered(&mut self, reg: u8, value: u8) {
        self.registers.set(reg, value);

        match reg {
            // Channel 1
            NR10_REG => self.sweep.write_register(value),
            NR11_REG => {
                self.ch1.gen.set_duty(value >> 6);
                self.ch1.write_length(value);
            }
            NR12_REG => self.ch1.write_envelope(value),
            NR13_REG => self.ch1.write_frequency_lsb(value),
            NR14_REG => {
                if self.ch1.write_frequency_msb(value) {
                    self.sweep.restart(&mut self.ch1);
                }
            }

            // Channel 2
            NR21_REG => {
                self.ch2.gen.set_duty(value >> 6);
                self.ch2.write_length(value);
            }
            NR22_REG => self.ch2.write_envelope(value),
            NR23_REG => self.ch2.write_frequency_lsb(value),
            NR24_REG => {
                self.ch2.write_frequency_msb(value);
            }

            // Channel 3
            NR30_REG => self.ch3.set_dac_enabled(value & 0x80 != 0),
            NR31_REG => self.ch3.write_length(value),
            NR32_REG => self.ch3.gen.write_volume(value),
            NR33_REG => self.ch3.write_frequency_lsb(value),
            NR34_REG => {
                self.ch3.write_frequency_msb(value);
            }

            // Channel 4
            NR41_REG => self.ch4.write_length(value),
            NR42_REG => self.ch4.write_envelope(value),
            NR43_REG => self.ch4.write_polynomial(value),
            NR44_REG => {
                self.ch4.write_control(value);
            }

            // Control
            NR50_REG => self.write_master_volume(value),
            NR51_REG => self.write_panning(value),

            _ => {}
        }
    }

    // NR52: power bit, and the enabled flag of each channel in bit 3..0
    fn read_status(&self) -> u8 {
        let mask = READ_MASKS[(NR52_REG - NR10_REG) as usize];
        let mut status = (self.registers.nr52 & 0x80) | mask;
        for (bit, enabled) in [
            self.ch1.enabled(),
            self.ch2.enabled(),
            self.ch3.enabled(),
            self.ch4.enabled(),
        ]
        .iter()
        .enumerate()
        {
            if *enabled {
                status |= 1 << bit;
            }
        }
        status
    }

    pub fn read_register(&mut self, reg: u8, autostep: u32) -> u8 {
        self.step(autostep);

        match reg {
            NR52_REG => self.read_status(),

            // registers owned by a single component read back from it
            NR10_REG => self.sweep.read_register() | READ_MASKS[0],
            NR12_REG => self.ch1.read_envelope(),
            NR22_REG => self.ch2.read_envelope(),
            NR32_REG => {
                self.ch3.gen.read_volume() | READ_MASKS[(NR32_REG - NR10_REG) as usize]
            }
            NR42_REG => self.ch4.read_envelope(),
            NR43_REG => self.ch4.read_polynomial(),

            NR10_REG..=NR51_REG => {
                let index = (reg - NR10_REG) as usize;
                self.registers.get(reg).unwrap_or(0) | READ_MASKS[index]
            }
            WAVE_RAM_START..=WAVE_RAM_END => {
                let index = (reg - WAVE_RAM_START) as usize;
                self.ch3
                    .read_ram(index, self.cycletime, self.machine.is_dmg())
                    .unwrap_or(0xFF)
            }
            _ => 0xFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apu::config::DEFAULT_AUTOSTEP;
    use crate::CLOCK_SPEED;

    fn apu() -> AudioProcessingUnit {
        let mut apu = AudioProcessingUnit::new(44100, 4096);
        apu.write_register(NR52_REG, 0x80, 0);
        apu.write_register(NR50_REG, 0x77, 0);
        apu.write_register(NR51_REG, 0xFF, 0);
        apu
    }

    fn write_all(apu: &mut AudioProcessingUnit, writes: &[(u8, u8)]) {
        for (reg, value) in writes {
            apu.write_register(*reg, *value, 0);
        }
    }

    fn trigger_ch1(apu: &mut AudioProcessingUnit) {
        write_all(
            apu,
            &[
                (NR10_REG, 0x00),
                (NR11_REG, 0x80),
                (NR12_REG, 0xF0),
                (NR13_REG, 0x00),
                (NR14_REG, 0x87),
            ],
        );
    }

    #[test]
    fn square_wave_end_to_end() {
        let mut apu = apu();
        trigger_ch1(&mut apu);
        assert!(apu.ch1.enabled());
        assert_eq!(apu.ch1.timer().period(), 1024);
        assert_eq!(apu.ch1.output(), 15);

        let mut outputs = vec![];
        for _ in 0..8 {
            apu.step(1024);
            outputs.push(apu.ch1.output());
        }
        assert_eq!(outputs, vec![0, 0, 0, 0, 15, 15, 15, 15]);
        assert_eq!(apu.cycletime(), 8192);

        apu.end_frame();
        assert_eq!(apu.cycletime(), 0);
        let available = apu.available_samples();
        assert_eq!(available, (8192.0 * 44100.0 / CLOCK_SPEED as f64) as usize);

        let mut samples = vec![0i16; available * 2];
        assert_eq!(apu.read_samples(&mut samples), available);
        let max = samples.iter().copied().max().unwrap();
        let min = samples.iter().copied().min().unwrap();
        assert!(max > 4000, "max {}", max);
        assert!(min < max / 4, "min {}", min);

        // both terminals carry the channel
        for frame in samples.chunks_exact(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn silent_without_panning() {
        let mut apu = apu();
        apu.write_register(NR51_REG, 0x00, 0);
        trigger_ch1(&mut apu);
        apu.step(20000);
        apu.end_frame();

        let mut samples = vec![0i16; 1024];
        let n = apu.read_samples(&mut samples);
        assert!(n > 0);
        assert!(samples[..n * 2].iter().all(|s| *s == 0));
    }

    #[test]
    fn dac_off_disables_channel() {
        let mut apu = apu();
        trigger_ch1(&mut apu);
        assert_eq!(apu.read_register(NR52_REG, 0) & 0x01, 0x01);

        apu.write_register(NR12_REG, 0x07, DEFAULT_AUTOSTEP);
        assert!(!apu.ch1.enabled());
        assert!(!apu.ch1.dac_enabled());
        assert_eq!(apu.ch1.output(), 0);
        assert_eq!(apu.read_register(NR52_REG, 0) & 0x01, 0x00);

        // DAC on again, but the channel needs a trigger
        apu.write_register(NR12_REG, 0xF0, 0);
        assert!(!apu.ch1.enabled());
        apu.write_register(NR14_REG, 0x80, 0);
        assert!(apu.ch1.enabled());
    }

    #[test]
    fn sweep_overflow_disables_until_trigger() {
        let mut apu = apu();
        // frequency 1500, sweep up by 1/4 every 128 Hz tick
        write_all(
            &mut apu,
            &[
                (NR10_REG, 0x12),
                (NR12_REG, 0xF0),
                (NR13_REG, 0xDC),
                (NR14_REG, 0x85),
            ],
        );
        assert!(apu.ch1.enabled());

        // first sweep tick: 1500 -> 1875
        apu.step(3 * 8192);
        assert_eq!(apu.ch1.frequency(), 1875);
        assert!(apu.ch1.enabled());

        // second: overflow
        apu.step(4 * 8192);
        assert!(!apu.ch1.enabled());

        apu.write_register(NR10_REG, 0x00, 0);
        apu.write_register(NR12_REG, 0xF0, 0);
        apu.write_register(NR13_REG, 0x00, 0);
        apu.step(65536);
        assert!(!apu.ch1.enabled());

        apu.write_register(NR14_REG, 0x80, 0);
        assert!(apu.ch1.enabled());
    }

    #[test]
    fn length_counter_of_one() {
        let mut apu = apu();
        write_all(
            &mut apu,
            &[(NR22_REG, 0xF0), (NR21_REG, 0x01), (NR24_REG, 0xC7)],
        );
        assert!(apu.ch2.enabled());

        apu.step(8192);
        assert!(!apu.ch2.enabled());
        assert_eq!(apu.read_register(NR52_REG, 0) & 0x02, 0);
    }

    #[test]
    fn length_counter_of_zero_loads_max() {
        let mut apu = apu();
        write_all(
            &mut apu,
            &[(NR22_REG, 0xF0), (NR21_REG, 0x00), (NR24_REG, 0xC7)],
        );
        assert_eq!(apu.ch2.length_counter().value(), 64);

        apu.step(8192);
        assert!(apu.ch2.enabled());
        assert_eq!(apu.ch2.length_counter().value(), 63);

        // 63 more ticks at 256 Hz
        apu.step(63 * 16384 - 1);
        assert!(apu.ch2.enabled());
        apu.step(1);
        assert!(!apu.ch2.enabled());
    }

    #[test]
    fn wave_length_counter_is_eight_bits() {
        let mut apu = apu();
        write_all(
            &mut apu,
            &[(NR30_REG, 0x80), (NR31_REG, 0xFF), (NR34_REG, 0xC0)],
        );
        assert_eq!(apu.ch3.length_counter().value(), 255);
    }

    #[test]
    fn read_masks() {
        let mut apu = apu();
        write_all(
            &mut apu,
            &[
                (NR10_REG, 0x00),
                (NR11_REG, 0x80),
                (NR12_REG, 0xF3),
                (NR13_REG, 0x12),
                (NR14_REG, 0x47),
                (NR32_REG, 0x40),
                (NR43_REG, 0x5A),
            ],
        );
        assert_eq!(apu.read_register(NR10_REG, 0), 0x80);
        assert_eq!(apu.read_register(NR11_REG, 0), 0xBF);
        assert_eq!(apu.read_register(NR12_REG, 0), 0xF3);
        assert_eq!(apu.read_register(NR13_REG, 0), 0xFF);
        assert_eq!(apu.read_register(NR14_REG, 0), 0xFF);
        assert_eq!(apu.read_register(NR32_REG, 0), 0xDF);
        assert_eq!(apu.read_register(NR43_REG, 0), 0x5A);
        assert_eq!(apu.read_register(NR50_REG, 0), 0x77);
        assert_eq!(apu.read_register(NR51_REG, 0), 0xFF);
        assert_eq!(apu.read_register(NR52_REG, 0), 0xF0);
    }

    #[test]
    fn unused_registers_read_ff() {
        let mut apu = apu();
        for reg in [0x00, 0x0F, NR20_REG, NR40_REG, 0x27, 0x2F, 0x40, 0xFF].iter() {
            apu.write_register(*reg, 0x00, 0);
            assert_eq!(apu.read_register(*reg, 0), 0xFF, "register 0x{:02x}", reg);
        }
    }

    #[test]
    fn wave_ram_blocked_while_dac_on() {
        let mut apu = apu();
        for i in 0..16 {
            apu.write_register(WAVE_RAM_START + i, i * 0x11, 0);
        }
        assert_eq!(apu.read_register(WAVE_RAM_START + 3, 0), 0x33);

        // lowest frequency, so the channel doesn't fetch for a while
        write_all(&mut apu, &[(NR30_REG, 0x80), (NR34_REG, 0x80)]);
        assert!(apu.ch3.enabled());
        assert_eq!(apu.read_register(WAVE_RAM_START + 3, DEFAULT_AUTOSTEP), 0xFF);
        apu.write_register(WAVE_RAM_START + 3, 0x00, 0);

        // accessible again once the channel stops
        apu.write_register(NR30_REG, 0x00, 0);
        assert_eq!(apu.read_register(WAVE_RAM_START + 3, 0), 0x33);
    }

    #[test]
    fn wave_ram_blocked_by_dac_before_trigger() {
        let mut apu = apu();
        apu.write_register(WAVE_RAM_START + 3, 0x33, 0);
        apu.write_register(NR30_REG, 0x80, 0);
        assert!(!apu.ch3.enabled());
        assert!(apu.ch3.dac_enabled());

        assert_eq!(apu.read_register(WAVE_RAM_START + 3, 100), 0xFF);
        apu.write_register(WAVE_RAM_START + 3, 0x00, 0);

        apu.write_register(NR30_REG, 0x00, 0);
        assert_eq!(apu.read_register(WAVE_RAM_START + 3, 0), 0x33);
    }

    #[test]
    fn wave_dac_off_disables_channel() {
        let mut apu = apu();
        constant_wave(&mut apu);
        apu.step(100);
        assert!(apu.ch3.enabled());
        assert_eq!(apu.ch3.output(), 15);

        apu.write_register(NR30_REG, 0x00, 0);
        assert!(!apu.ch3.enabled());
        assert!(!apu.ch3.dac_enabled());
        assert_eq!(apu.ch3.output(), 0);
        assert_eq!(apu.read_register(NR52_REG, 0) & 0x04, 0x00);
    }

    #[test]
    fn noise_dac_off_disables_channel() {
        let mut apu = apu();
        write_all(
            &mut apu,
            &[(NR42_REG, 0xF0), (NR43_REG, 0x00), (NR44_REG, 0x80)],
        );
        // 20 LFSR clocks, the last output bit is high
        apu.step(20 * 8);
        assert!(apu.ch4.enabled());
        assert_eq!(apu.ch4.output(), 15);

        apu.write_register(NR42_REG, 0x07, 0);
        assert!(!apu.ch4.enabled());
        assert!(!apu.ch4.dac_enabled());
        assert_eq!(apu.ch4.output(), 0);
        assert_eq!(apu.read_register(NR52_REG, 0) & 0x08, 0x00);
    }

    #[test]
    fn component_registers_read_back() {
        let mut apu = apu();
        write_all(
            &mut apu,
            &[
                (NR10_REG, 0xFF),
                (NR22_REG, 0x5B),
                (NR32_REG, 0xFF),
                (NR42_REG, 0x3C),
                (NR43_REG, 0xF7),
            ],
        );
        assert_eq!(apu.read_register(NR10_REG, 0), 0xFF);
        assert_eq!(apu.read_register(NR22_REG, 0), 0x5B);
        assert_eq!(apu.read_register(NR32_REG, 0), 0xFF);
        assert_eq!(apu.read_register(NR42_REG, 0), 0x3C);
        assert_eq!(apu.read_register(NR43_REG, 0), 0xF7);

        apu.write_register(NR32_REG, 0x40, 0);
        assert_eq!(apu.read_register(NR32_REG, 0), 0xDF);
    }

    #[test]
    fn samplerate_change_drops_unread_samples() {
        let mut apu = apu();
        trigger_ch1(&mut apu);
        apu.step(10000);
        apu.end_frame();
        assert!(apu.available_samples() > 0);

        apu.set_samplerate(48000);
        assert_eq!(apu.available_samples(), 0);

        apu.step(10000);
        apu.end_frame();
        assert!(apu.available_samples() > 0);
    }

    #[test]
    fn wave_ram_window_after_fetch() {
        let mut apu = apu();
        for i in 0..16 {
            apu.write_register(WAVE_RAM_START + i, i * 0x11, 0);
        }
        write_all(&mut apu, &[(NR30_REG, 0x80), (NR34_REG, 0x87)]);
        let period = apu.ch3.timer().period();
        assert_eq!(period, 512);

        // the third fetch reads byte 1, the byte being played is
        // returned whatever the address
        apu.step(3 * period);
        assert_eq!(apu.read_register(WAVE_RAM_START + 9, 0), 0x11);
        assert_eq!(apu.read_register(WAVE_RAM_START + 9, 3), 0x11);
        assert_eq!(apu.read_register(WAVE_RAM_START + 9, 1), 0xFF);
    }

    #[test]
    fn wave_ram_always_accessible_on_cgb() {
        let mut apu = AudioProcessingUnit::with_config(ApuConfig::default().with_machine(Machine::GameBoyCGB));
        apu.write_register(NR52_REG, 0x80, 0);
        for i in 0..16 {
            apu.write_register(WAVE_RAM_START + i, i * 0x11, 0);
        }
        write_all(&mut apu, &[(NR30_REG, 0x80), (NR34_REG, 0x80)]);
        assert!(apu.ch3.enabled());
        assert_eq!(apu.read_register(WAVE_RAM_START + 3, 100), 0x00);
    }

    #[test]
    fn power_off_clears_registers() {
        let mut apu = apu();
        trigger_ch1(&mut apu);
        write_all(&mut apu, &[(NR42_REG, 0xF0), (NR44_REG, 0x80), (NR32_REG, 0x20)]);
        assert_eq!(apu.read_register(NR52_REG, 0), 0xF9);

        apu.write_register(NR52_REG, 0x00, 0);
        assert!(!apu.is_powered_on());
        assert_eq!(apu.read_register(NR52_REG, 0), 0x70);
        for reg in NR10_REG..NR52_REG {
            let index = (reg - NR10_REG) as usize;
            assert_eq!(apu.read_register(reg, 0), READ_MASKS[index]);
        }

        // writes are ignored while powered off
        apu.write_register(NR12_REG, 0xF0, 0);
        apu.write_register(NR51_REG, 0xFF, 0);
        assert_eq!(apu.read_register(NR12_REG, 0), 0x00);
        assert_eq!(apu.read_register(NR51_REG, 0), 0x00);
    }

    #[test]
    fn dmg_length_counters_survive_power_off() {
        let mut apu = apu();
        apu.write_register(NR41_REG, 0x10, 0);
        apu.write_register(NR52_REG, 0x00, 0);
        assert_eq!(apu.ch4.length_counter().value(), 0x10);

        apu.write_register(NR11_REG, 0x85, 0);
        assert_eq!(apu.ch1.length_counter().value(), 0x05);
        assert_eq!(apu.ch1.gen.duty(), 0);
    }

    #[test]
    fn cgb_clears_length_counters() {
        let mut apu = AudioProcessingUnit::with_config(ApuConfig::default().with_machine(Machine::GameBoyCGB));
        apu.write_register(NR52_REG, 0x80, 0);
        apu.write_register(NR41_REG, 0x10, 0);
        apu.write_register(NR52_REG, 0x00, 0);
        assert_eq!(apu.ch4.length_counter().value(), 0);

        apu.write_register(NR11_REG, 0x05, 0);
        assert_eq!(apu.ch1.length_counter().value(), 0);
    }

    #[test]
    fn power_on_resets_sequencer() {
        let mut apu = apu();
        apu.step(30000);
        assert_ne!(apu.sequencer().counter(), 8192);

        apu.write_register(NR52_REG, 0x00, 0);
        apu.write_register(NR52_REG, 0x80, 0);
        assert_eq!(apu.sequencer().index(), 0);
        assert_eq!(apu.sequencer().counter(), 8192);
    }

    #[test]
    fn step_to_only_moves_forward() {
        let mut apu = apu();
        apu.step_to(100);
        assert_eq!(apu.cycletime(), 100);
        apu.step_to(50);
        assert_eq!(apu.cycletime(), 100);
        apu.write_register(NR50_REG, 0x77, DEFAULT_AUTOSTEP);
        assert_eq!(apu.cycletime(), 103);
        apu.end_frame();
        assert_eq!(apu.cycletime(), 0);
    }

    #[test]
    fn reset_powers_off() {
        let mut apu = apu();
        trigger_ch1(&mut apu);
        apu.step(1000);
        apu.reset();

        assert!(!apu.is_powered_on());
        assert!(!apu.ch1.enabled());
        assert_eq!(apu.cycletime(), 0);
        assert_eq!(*apu.registers(), Registers::new());
        assert_eq!(apu.read_register(NR52_REG, 0), 0x70);
    }

    // Channel 3 playing a constant level of 15
    fn constant_wave(apu: &mut AudioProcessingUnit) {
        for i in 0..16 {
            apu.write_register(WAVE_RAM_START + i, 0xFF, 0);
        }
        write_all(
            apu,
            &[
                (NR30_REG, 0x80),
                (NR32_REG, 0x20),
                (NR33_REG, 0xFF),
                (NR34_REG, 0x87),
            ],
        );
    }

    fn drop_around(samples: &[f32], index: usize) -> f32 {
        samples[2 * (index - 10)] - samples[2 * (index + 20)]
    }

    #[test]
    fn panning_change_moves_output_level() {
        let mut apu = apu();
        constant_wave(&mut apu);
        apu.step_to(20000);
        apu.write_register(NR51_REG, 0x00, 0);
        apu.step_to(40000);
        apu.end_frame();

        let mut samples = vec![0.0f32; 2 * apu.available_samples()];
        apu.read_samples_f32(&mut samples);

        // level 15 at master volume 8 is a quarter of full scale
        let at = (20000.0 * 44100.0 / CLOCK_SPEED as f64) as usize;
        let drop = drop_around(&samples, at);
        assert!(drop > 0.2 && drop < 0.3, "drop {}", drop);
    }

    #[test]
    fn master_volume_change_moves_output_level() {
        let mut apu = apu();
        constant_wave(&mut apu);
        apu.step_to(20000);
        apu.write_register(NR50_REG, 0x33, 0);
        apu.step_to(40000);
        apu.end_frame();

        let mut samples = vec![0.0f32; 2 * apu.available_samples()];
        apu.read_samples_f32(&mut samples);

        // volume 8 -> 4 halves the level
        let at = (20000.0 * 44100.0 / CLOCK_SPEED as f64) as usize;
        let drop = drop_around(&samples, at);
        assert!(drop > 0.1 && drop < 0.15, "drop {}", drop);
    }

    #[test]
    fn zero_gain_is_silent() {
        let mut apu = apu();
        apu.set_volume(0.0);
        trigger_ch1(&mut apu);
        apu.step(10000);
        apu.end_frame();

        let mut samples = vec![1i16; 400];
        let n = apu.read_samples(&mut samples);
        assert!(n > 0);
        assert!(samples[..2 * n].iter().all(|s| *s == 0));
    }

    #[test]
    fn quality_applies_to_channels() {
        let mut apu = apu();
        assert_eq!(apu.quality(), Quality::Medium);
        apu.set_quality(Quality::High);
        assert_eq!(apu.high_quality, [true; 4]);
    }

    #[test]
    fn read_clamps_to_available_samples() {
        let mut apu = apu();
        trigger_ch1(&mut apu);
        apu.step(crate::CYCLES_PER_FRAME);
        apu.end_frame();

        let available = apu.available_samples();
        let mut samples = vec![0i16; 2 * (available + 500)];
        assert_eq!(apu.read_samples(&mut samples), available);
        assert_eq!(apu.available_samples(), 0);

        apu.step(crate::CYCLES_PER_FRAME);
        apu.end_frame();
        let available = apu.available_samples();
        apu.remove_samples(10);
        assert_eq!(apu.available_samples(), available - 10);
        apu.clear_samples();
        assert_eq!(apu.available_samples(), 0);
    }

    #[test]
    fn samples_as_wav() {
        let mut apu = apu();
        trigger_ch1(&mut apu);
        apu.step(crate::CYCLES_PER_FRAME);
        apu.end_frame();

        let mut samples = vec![0i16; 2 * apu.available_samples()];
        let n = apu.read_samples(&mut samples);

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = hound::WavWriter::new(std::io::Cursor::new(&mut bytes), spec).unwrap();
            for s in &samples[..2 * n] {
                writer.write_sample(*s).unwrap();
            }
            writer.finalize().unwrap();
        }

        let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.duration() as usize, n);
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, &samples[..2 * n]);
    }
}
