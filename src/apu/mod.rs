// APU resources:
//
// Pan Doc:
// http://bgb.bircd.org/pandocs.htm#soundoverview
//
// Game Boy Sound Operation by Blargg:
// https://gist.github.com/drhelius/3652407
//
// GB Sound Emulation by Nightshade:
// https://nightshade256.github.io/2021/03/27/gb-sound-emulation.html
//
// Overview
// --------
//
// The APU is not clocked one cycle at a time. Every component is driven
// by a `Timer` that counts down to its next event, and the step loop in
// `AudioProcessingUnit::step` always advances by the distance to the
// nearest event. Between events nothing observable happens, so the
// output of a channel only changes when its own timer fires.
//
// Each change of a channel's output is handed to the `Mixer` as a delta
// at the exact cycle it happened. The mixer spreads the delta over a few
// output samples using a band-limited step, so the 4-bit transitions of
// the hardware don't alias when resampled to the host rate.

pub mod apu;
pub mod channel;
pub mod config;
pub mod envelope;
pub mod length_counter;
pub mod mixer;
pub mod noise_gen;
pub mod registers;
pub mod sequencer;
pub mod square_gen;
mod step_table;
pub mod sweep;
pub mod timer;
pub mod wave_gen;

// Highest frequency value that fits the 11-bit frequency registers
pub const MAX_FREQUENCY: u16 = 2047;
