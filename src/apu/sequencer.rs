use log::trace;

use crate::apu::timer::Timer;

// Frame sequencer
// ---------------
//
// Derived from the 512 Hz DIV-APU clock. Every step is 8192 cycles and
// the eight steps clock the modulators like this:
//
//   Step   Length Ctr  Vol Env     Sweep
//   ---------------------------------------
//   0      Clock       -           -
//   1      -           -           -
//   2      Clock       -           Clock
//   3      -           -           -
//   4      Clock       -           -
//   5      -           -           -
//   6      Clock       -           Clock
//   7      -           Clock       -
//   ---------------------------------------
//   Rate   256 Hz      64 Hz       128 Hz
//
// Steps that clock nothing are skipped, which leaves five events per
// sequence with uneven gaps between them.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SequencerClock {
    Length,
    LengthSweep,
    Envelope,
}

impl SequencerClock {
    pub fn clocks_length(self) -> bool {
        matches!(self, SequencerClock::Length | SequencerClock::LengthSweep)
    }

    pub fn clocks_sweep(self) -> bool {
        self == SequencerClock::LengthSweep
    }

    pub fn clocks_envelope(self) -> bool {
        self == SequencerClock::Envelope
    }
}

const STEP_CYCLES: u32 = 8192;

// What each event clocks, and the cycles until the next event
const SEQUENCE: [(SequencerClock, u32); 5] = [
    (SequencerClock::Length, 2 * STEP_CYCLES),
    (SequencerClock::LengthSweep, 2 * STEP_CYCLES),
    (SequencerClock::Length, 2 * STEP_CYCLES),
    (SequencerClock::LengthSweep, STEP_CYCLES),
    (SequencerClock::Envelope, STEP_CYCLES),
];

#[derive(Clone, Debug)]
pub struct Sequencer {
    timer: Timer,
    index: usize,
}

impl Sequencer {
    pub fn new() -> Self {
        Sequencer {
            timer: Timer::new(STEP_CYCLES),
            index: 0,
        }
    }

    // Back to the start of the sequence. The first event fires one step
    // from now.
    pub fn reset(&mut self) {
        self.timer.reset(STEP_CYCLES);
        self.index = 0;
    }

    // Cycles until the next event
    pub fn counter(&self) -> u32 {
        self.timer.counter()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    // Must not be stepped past `counter()`
    pub fn step(&mut self, cycles: u32) -> Option<SequencerClock> {
        if !self.timer.run(cycles) {
            return None;
        }

        let (clock, next) = SEQUENCE[self.index];
        trace!("frame sequencer {:?} (event {})", clock, self.index);
        self.index = (self.index + 1) % SEQUENCE.len();
        self.timer.reset(next);
        Some(clock)
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
