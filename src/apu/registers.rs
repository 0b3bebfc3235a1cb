#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Sound registers, as the low byte of their 0xFFxx I/O address
pub const NR10_REG: u8 = 0x10;
pub const NR11_REG: u8 = 0x11;
pub const NR12_REG: u8 = 0x12;
pub const NR13_REG: u8 = 0x13;
pub const NR14_REG: u8 = 0x14;

// Unused, read as 0xFF
pub const NR20_REG: u8 = 0x15;
pub const NR21_REG: u8 = 0x16;
pub const NR22_REG: u8 = 0x17;
pub const NR23_REG: u8 = 0x18;
pub const NR24_REG: u8 = 0x19;

pub const NR30_REG: u8 = 0x1A;
pub const NR31_REG: u8 = 0x1B;
pub const NR32_REG: u8 = 0x1C;
pub const NR33_REG: u8 = 0x1D;
pub const NR34_REG: u8 = 0x1E;

// Unused, read as 0xFF
pub const NR40_REG: u8 = 0x1F;
pub const NR41_REG: u8 = 0x20;
pub const NR42_REG: u8 = 0x21;
pub const NR43_REG: u8 = 0x22;
pub const NR44_REG: u8 = 0x23;

pub const NR50_REG: u8 = 0x24;
pub const NR51_REG: u8 = 0x25;
pub const NR52_REG: u8 = 0x26;

pub const WAVE_RAM_START: u8 = 0x30;
pub const WAVE_RAM_END: u8 = 0x3F;

pub const REGISTER_COUNT: usize = (NR52_REG - NR10_REG) as usize + 1;

// OR-ed into the value of each register on read. Write only bits and
// unused bits read as 1.
pub const READ_MASKS: [u8; REGISTER_COUNT] = [
    0x80, 0x3F, 0x00, 0xFF, 0xBF, // NR10-NR14
    0xFF, 0x3F, 0x00, 0xFF, 0xBF, // NR20-NR24
    0x7F, 0xFF, 0x9F, 0xFF, 0xBF, // NR30-NR34
    0xFF, 0xFF, 0x00, 0x00, 0xBF, // NR40-NR44
    0x00, 0x00, 0x70, // NR50-NR52
];

pub fn register_name(reg: u8) -> &'static str {
    match reg {
        NR10_REG => "NR10",
        NR11_REG => "NR11",
        NR12_REG => "NR12",
        NR13_REG => "NR13",
        NR14_REG => "NR14",
        NR21_REG => "NR21",
        NR22_REG => "NR22",
        NR23_REG => "NR23",
        NR24_REG => "NR24",
        NR30_REG => "NR30",
        NR31_REG => "NR31",
        NR32_REG => "NR32",
        NR33_REG => "NR33",
        NR34_REG => "NR34",
        NR41_REG => "NR41",
        NR42_REG => "NR42",
        NR43_REG => "NR43",
        NR44_REG => "NR44",
        NR50_REG => "NR50",
        NR51_REG => "NR51",
        NR52_REG => "NR52",
        WAVE_RAM_START..=WAVE_RAM_END => "WAVE",
        _ => "unused",
    }
}

// Last values written to the sound registers, kept for reading them
// back. The channels hold the actual state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Registers {
    pub nr10: u8,
    pub nr11: u8,
    pub nr12: u8,
    pub nr13: u8,
    pub nr14: u8,
    pub nr20: u8,
    pub nr21: u8,
    pub nr22: u8,
    pub nr23: u8,
    pub nr24: u8,
    pub nr30: u8,
    pub nr31: u8,
    pub nr32: u8,
    pub nr33: u8,
    pub nr34: u8,
    pub nr40: u8,
    pub nr41: u8,
    pub nr42: u8,
    pub nr43: u8,
    pub nr44: u8,
    pub nr50: u8,
    pub nr51: u8,
    pub nr52: u8,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    fn field_mut(&mut self, reg: u8) -> Option<&mut u8> {
        let field = match reg {
            NR10_REG => &mut self.nr10,
            NR11_REG => &mut self.nr11,
            NR12_REG => &mut self.nr12,
            NR13_REG => &mut self.nr13,
            NR14_REG => &mut self.nr14,
            NR20_REG => &mut self.nr20,
            NR21_REG => &mut self.nr21,
            NR22_REG => &mut self.nr22,
            NR23_REG => &mut self.nr23,
            NR24_REG => &mut self.nr24,
            NR30_REG => &mut self.nr30,
            NR31_REG => &mut self.nr31,
            NR32_REG => &mut self.nr32,
            NR33_REG => &mut self.nr33,
            NR34_REG => &mut self.nr34,
            NR40_REG => &mut self.nr40,
            NR41_REG => &mut self.nr41,
            NR42_REG => &mut self.nr42,
            NR43_REG => &mut self.nr43,
            NR44_REG => &mut self.nr44,
            NR50_REG => &mut self.nr50,
            NR51_REG => &mut self.nr51,
            NR52_REG => &mut self.nr52,
            _ => return None,
        };
        Some(field)
    }

    // Stored value, without read masks. None outside NR10-NR52.
    pub fn get(&self, reg: u8) -> Option<u8> {
        self.to_bytes().get(reg.wrapping_sub(NR10_REG) as usize).copied()
    }

    // Ignored outside NR10-NR52
    pub fn set(&mut self, reg: u8, value: u8) {
        if let Some(field) = self.field_mut(reg) {
            *field = value;
        }
    }

    // Register file in address order, starting at NR10
    pub fn to_bytes(&self) -> [u8; REGISTER_COUNT] {
        [
            self.nr10, self.nr11, self.nr12, self.nr13, self.nr14, //
            self.nr20, self.nr21, self.nr22, self.nr23, self.nr24, //
            self.nr30, self.nr31, self.nr32, self.nr33, self.nr34, //
            self.nr40, self.nr41, self.nr42, self.nr43, self.nr44, //
            self.nr50, self.nr51, self.nr52,
        ]
    }
}
