use log::{debug, warn};

use crate::apu::step_table::{PHASES, STEP_TABLE, STEP_WIDTH};
use crate::CLOCK_SPEED;

// Charge factor of the output high-pass filter, per master clock cycle.
// Same value SameBoy uses for its accurate high-pass mode.
const HIGHPASS_CHARGE: f64 = 0.999958;

// Output terminals. The value is the offset of the terminal in an
// interleaved stereo frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Terminal {
    Left = 0,
    Right = 1,
}

// Terminals a channel is routed to (NR51)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Panning {
    pub left: bool,
    pub right: bool,
}

impl Panning {
    pub const MUTE: Panning = Panning {
        left: false,
        right: false,
    };

    pub const MIDDLE: Panning = Panning {
        left: true,
        right: true,
    };

    // NR51 (0xFF25): channel terminal enables
    // - bit 7..4: channel 4..1 to the left terminal (SO2)
    // - bit 3..0: channel 4..1 to the right terminal (SO1)
    pub fn from_nr51(nr51: u8, channel: usize) -> Self {
        assert!(channel < 4);
        Panning {
            left: nr51 & (0x10 << channel) != 0,
            right: nr51 & (0x01 << channel) != 0,
        }
    }

    pub fn is_muted(&self) -> bool {
        !self.left && !self.right
    }

    pub fn pans(&self, terminal: Terminal) -> bool {
        match terminal {
            Terminal::Left => self.left,
            Terminal::Right => self.right,
        }
    }
}

// Integrator and high-pass filter for one terminal. The sample buffer
// holds the band-limited derivative of the output, so it must be summed
// up to get the actual waveform back.
#[derive(Clone, Debug, Default)]
struct Accumulator {
    sum: f32,
    highpass: f32,
}

impl Accumulator {
    fn process(&mut self, input: f32, rate: f32) -> f32 {
        self.sum += input;
        let out = self.sum - self.highpass;
        self.highpass = self.sum - out * rate;
        out
    }
}

// Band-limited stereo mixer.
//
// Channels report every change of their output as a delta at the cycle
// it happened. Instead of applying the change to a single sample, which
// would alias badly at typical host sample rates, the mixer adds a
// band-limited step (see `step_table`) centered on the exact fractional
// sample position of the change.
//
// Samples become readable once `end_frame` has been called for the
// cycles they cover. The buffer holds `buffersize` samples plus room
// for the tail of the last steps; the caller is expected to drain it at
// least once per `buffersize` samples.
pub struct Mixer {
    volume_left: f32,
    volume_right: f32,

    samplerate: u32,

    // Output samples per master clock cycle
    factor: f64,

    // Interleaved stereo frames, (buffersize + STEP_WIDTH) * 2 floats
    buffer: Vec<f32>,
    buffersize: usize,

    // Fraction of a sample between the last completed sample and the
    // start of the current frame
    sample_offset: f64,

    // Number of completed samples in the buffer
    write_index: usize,

    accumulators: [Accumulator; 2],
    highpass_rate: f32,

    // Set when a delta was dropped this frame, to only complain once
    overflowed: bool,
}

impl Mixer {
    pub fn new(samplerate: u32, buffersize: usize) -> Self {
        let mut mixer = Mixer {
            volume_left: 0.0,
            volume_right: 0.0,
            samplerate: 0,
            factor: 0.0,
            buffer: Vec::new(),
            buffersize: 0,
            sample_offset: 0.0,
            write_index: 0,
            accumulators: Default::default(),
            highpass_rate: 0.0,
            overflowed: false,
        };
        mixer.set_samplerate(samplerate);
        mixer.set_buffersize(buffersize);
        mixer
    }

    pub fn samplerate(&self) -> u32 {
        self.samplerate
    }

    pub fn buffersize(&self) -> usize {
        self.buffersize
    }

    pub fn set_samplerate(&mut self, samplerate: u32) {
        assert!(samplerate > 0, "sample rate must be non-zero");
        if self.samplerate != samplerate {
            self.samplerate = samplerate;
            self.factor = samplerate as f64 / CLOCK_SPEED as f64;
            self.highpass_rate = HIGHPASS_CHARGE.powf(1.0 / self.factor) as f32;
            debug!("mixer sample rate set to {} Hz", samplerate);
        }
    }

    // Reallocates the buffer. Any unread samples are lost.
    pub fn set_buffersize(&mut self, samples: usize) {
        assert!(samples > 0, "buffer size must be non-zero");
        if samples != self.buffersize {
            if self.write_index > 0 {
                debug!("buffer resize drops {} unread samples", self.write_index);
            }
            self.buffer = vec![0.0; (samples + STEP_WIDTH) * 2];
            self.buffersize = samples;
            debug!("mixer buffer allocated for {} samples", samples);
        }
        self.clear();
    }

    pub fn set_volume(&mut self, left: f32, right: f32) {
        self.volume_left = left;
        self.volume_right = right;
    }

    pub fn volume_left(&self) -> f32 {
        self.volume_left
    }

    pub fn volume_right(&self) -> f32 {
        self.volume_right
    }

    pub fn volume(&self, terminal: Terminal) -> f32 {
        match terminal {
            Terminal::Left => self.volume_left,
            Terminal::Right => self.volume_right,
        }
    }

    pub fn clear(&mut self) {
        self.sample_offset = 0.0;
        self.write_index = 0;
        self.overflowed = false;
        self.accumulators = Default::default();
        for s in self.buffer.iter_mut() {
            *s = 0.0;
        }
    }

    fn sampletime(&self, cycletime: u32) -> f64 {
        cycletime as f64 * self.factor + self.sample_offset
    }

    // Mix a change in a channel's 4-bit output. The delta is scaled by
    // the terminal volumes. A zero delta or a muted panning writes
    // nothing.
    pub fn mix(&mut self, panning: Panning, high_quality: bool, delta: i8, cycletime: u32) {
        if delta == 0 || panning.is_muted() {
            return;
        }

        if panning.left {
            let amplitude = delta as f32 * self.volume_left;
            self.add_step(Terminal::Left, amplitude, cycletime, high_quality);
        }

        if panning.right {
            let amplitude = delta as f32 * self.volume_right;
            self.add_step(Terminal::Right, amplitude, cycletime, high_quality);
        }
    }

    // Add an already scaled step to a single terminal. Used for
    // transitions caused by volume and panning changes.
    pub fn add_delta(&mut self, terminal: Terminal, amplitude: f32, cycletime: u32) {
        if amplitude != 0.0 {
            self.add_step(terminal, amplitude, cycletime, true);
        }
    }

    fn add_step(&mut self, terminal: Terminal, amplitude: f32, cycletime: u32, interpolate: bool) {
        let time = self.sampletime(cycletime);
        let whole = time.floor();
        let phase = (time - whole) * PHASES as f64;
        let mut row = phase as usize;
        let fract = (phase - row as f64) as f32;

        let start = whole as usize + self.write_index;
        if start > self.buffersize {
            if !self.overflowed {
                warn!(
                    "sample buffer full ({} samples), dropping output until the next frame",
                    self.buffersize
                );
                self.overflowed = true;
            }
            return;
        }

        let dest = self.buffer[start * 2..]
            .iter_mut()
            .skip(terminal as usize)
            .step_by(2);

        if interpolate {
            let a = amplitude - amplitude * fract;
            let b = amplitude * fract;
            let (s0, s1) = (&STEP_TABLE[row], &STEP_TABLE[row + 1]);
            for (i, d) in dest.take(STEP_WIDTH).enumerate() {
                *d += a * s0[i] + b * s1[i];
            }
        } else {
            if fract >= 0.5 {
                row += 1;
            }
            let steps = &STEP_TABLE[row];
            for (d, s) in dest.zip(steps.iter()) {
                *d += amplitude * s;
            }
        }
    }

    // Completes all samples up to the given cycle time. The next frame
    // starts at cycle 0 again.
    pub fn end_frame(&mut self, cycletime: u32) {
        let time = self.sampletime(cycletime);
        let whole = time.floor();
        self.sample_offset = time - whole;
        self.write_index += whole as usize;

        if self.write_index > self.buffersize {
            warn!(
                "{} samples completed but the buffer only holds {}",
                self.write_index, self.buffersize
            );
            self.write_index = self.buffersize;
        }
        self.overflowed = false;
    }

    pub fn available_samples(&self) -> usize {
        self.write_index
    }

    // Read up to `dest.len() / 2` interleaved stereo samples. Returns the
    // number of stereo samples read.
    pub fn read_samples(&mut self, dest: &mut [i16]) -> usize {
        self.read_with(dest, |s| {
            (s * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16
        })
    }

    // Same as `read_samples`, with samples normalised to -1.0..1.0
    pub fn read_samples_f32(&mut self, dest: &mut [f32]) -> usize {
        self.read_with(dest, |s| s)
    }

    fn read_with<T, F>(&mut self, dest: &mut [T], convert: F) -> usize
    where
        F: Fn(f32) -> T,
    {
        let samples = (dest.len() / 2).min(self.write_index);
        if samples == 0 {
            return 0;
        }

        let rate = self.highpass_rate;
        for (frame, out) in self.buffer[..samples * 2]
            .chunks_exact(2)
            .zip(dest.chunks_exact_mut(2))
        {
            out[0] = convert(self.accumulators[0].process(frame[0], rate));
            out[1] = convert(self.accumulators[1].process(frame[1], rate));
        }

        self.remove_samples(samples);
        samples
    }

    // Drop samples from the front of the buffer without reading them
    pub fn remove_samples(&mut self, samples: usize) {
        let samples = samples.min(self.write_index);
        if samples == 0 {
            return;
        }

        let amount = samples * 2;
        let len = self.buffer.len();
        self.buffer.copy_within(amount.., 0);
        for s in self.buffer[len - amount..].iter_mut() {
            *s = 0.0;
        }
        self.write_index -= samples;
    }
}
