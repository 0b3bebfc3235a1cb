extern crate log;
#[cfg(feature = "serde")]
extern crate serde;

pub mod apu;
pub mod emu;

pub use apu::apu::AudioProcessingUnit;
pub use apu::config::{ApuConfig, Quality};
pub use apu::registers::Registers;
pub use emu::Machine;

// Master clock of the DMG. All cycle counts in this crate are in
// units of this clock.
pub const CLOCK_SPEED: u32 = 4194304;
pub const CYCLES_PER_FRAME: u32 = 70224;

pub const VERSION: &str = "0.1.0";
pub const AUTHOR: &str = "Jonatan Magnusson <jonatan.magnusson@gmail.com>";
