/// Timer / divider unit.
///
/// A free-running 16-bit system counter advances once per T-cycle and DIV
/// exposes its upper byte. TIMA counts falling edges of one counter bit
/// selected by TAC, gated by the TAC enable bit. The register helpers in
/// `io` re-run the same edge test, so DIV resets and TAC changes can bump
/// TIMA on their own.
mod io;

use crate::interrupts::{Interrupt, InterruptController};

/// Counter bit watched for each TAC frequency select.
const INPUT_BITS: [u16; 4] = [9, 3, 5, 7];

/// System counter value at PC=0x0100 after the boot ROM (DIV reads 0xAB).
const POWER_ON_COUNTER: u16 = 0xABCC;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimerState {
    pub counter: u16,
    pub tima: u8,
    pub tma: u8,
    pub tac: u8,
    pub overflow_pending: bool,
}

pub(crate) struct Timer {
    /// Hidden system counter; DIV is bits 15:8.
    counter: u16,
    tima: u8,
    tma: u8,
    /// TAC, lower 3 bits only.
    tac: u8,
    /// TIMA wrapped on the previous cycle; the next tick reloads it from
    /// TMA and requests INT $50.
    overflow_pending: bool,
}

impl Timer {
    pub(crate) fn new() -> Self {
        Self {
            counter: 0,
            tima: 0,
            tma: 0,
            tac: 0,
            overflow_pending: false,
        }
    }

    pub(crate) fn power_on(&mut self) {
        *self = Self::new();
        self.counter = POWER_ON_COUNTER;
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// Timer input: the selected counter bit ANDed with the enable bit.
    #[inline]
    fn signal(&self) -> bool {
        let bit = INPUT_BITS[(self.tac & 0x03) as usize];
        self.enabled() && (self.counter >> bit) & 1 != 0
    }

    /// Bump TIMA when the input went from high to low.
    #[inline]
    fn detect_edge(&mut self, before: bool) {
        if before && !self.signal() {
            self.increment_tima();
        }
    }

    fn increment_tima(&mut self) {
        let (next, overflow) = self.tima.overflowing_add(1);
        // TIMA holds 0x00 for one cycle before the reload.
        self.tima = next;
        if overflow {
            self.overflow_pending = true;
        }
    }

    /// Advance by one T-cycle.
    pub(crate) fn tick(&mut self, interrupts: &mut InterruptController) {
        if self.overflow_pending {
            self.overflow_pending = false;
            self.tima = self.tma;
            interrupts.request(Interrupt::Timer);
        }

        let before = self.signal();
        self.counter = self.counter.wrapping_add(1);
        self.detect_edge(before);
    }

    pub(crate) fn state(&self) -> TimerState {
        TimerState {
            counter: self.counter,
            tima: self.tima,
            tma: self.tma,
            tac: self.tac,
            overflow_pending: self.overflow_pending,
        }
    }

    pub(crate) fn set_state(&mut self, state: &TimerState) {
        self.counter = state.counter;
        self.tima = state.tima;
        self.tma = state.tma;
        self.tac = state.tac & 0x07;
        self.overflow_pending = state.overflow_pending;
    }
}
