#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// The hardware revision being emulated. The sound hardware of the
// two models is almost identical, but a few obscure behaviors were
// fixed in the CGB:
//
// - Wave RAM can only be accessed by the CPU on the DMG while channel 3
//   is playing if the access happens right after the channel itself
//   read the RAM. The CGB allows access at any time.
// - On the DMG, the length counters keep their values and can be
//   written while the APU is powered off. On the CGB they are cleared.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Machine {
    // The original Game Boy
    GameBoyDMG,

    // Color Game Boy
    GameBoyCGB,
}

impl Machine {
    pub fn is_dmg(self) -> bool {
        matches!(self, Machine::GameBoyDMG)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Machine::GameBoyDMG
    }
}
