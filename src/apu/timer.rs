// Reloadable down-counter used as the clock source of every oscillator
// and of the frame sequencer.
//
// The counter counts the cycles left until the next event. When it
// reaches zero the event fires and the counter is reloaded with the
// period. The counter is never allowed to pass zero: callers must
// never run the timer further than `counter()`, which is what lets the
// APU step loop jump straight from one event to the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timer {
    counter: u32,
    period: u32,
}

impl Timer {
    pub fn new(period: u32) -> Self {
        Timer {
            counter: period,
            period,
        }
    }

    // Cycles left until the timer fires
    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    // Run the timer for the given number of cycles. Returns true if the
    // timer fired, in which case it has been reloaded with the period.
    pub fn run(&mut self, cycles: u32) -> bool {
        debug_assert!(
            cycles <= self.counter,
            "timer stepped past its event: {} > {}",
            cycles,
            self.counter
        );

        self.counter -= cycles;
        if self.counter == 0 {
            self.counter = self.period;
            true
        } else {
            false
        }
    }

    // Like `run`, but the cycle count may cover any number of periods.
    // Returns the number of times the timer fired.
    pub fn fastforward(&mut self, cycles: u32) -> u32 {
        if cycles < self.counter {
            self.counter -= cycles;
            return 0;
        }

        let rest = cycles - self.counter;
        self.counter = self.period - (rest % self.period);
        (rest / self.period) + 1
    }

    // The new period takes effect on the next reload
    pub fn set_period(&mut self, period: u32) {
        assert!(period > 0);
        self.period = period;
    }

    pub fn restart(&mut self) {
        self.counter = self.period;
    }

    // Reload with a new period right away
    pub fn reset(&mut self, period: u32) {
        self.set_period(period);
        self.restart();
    }
}
