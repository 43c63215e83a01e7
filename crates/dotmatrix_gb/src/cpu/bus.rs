use crate::interrupts::{Interrupt, InterruptController, InterruptFlags};

/// Memory port the CPU executes against.
///
/// Every CPU-visible access goes through here. Timing is not advanced by
/// these calls; the caller replays the cycle count returned by
/// [`Cpu::step`](super::Cpu::step) into the rest of the machine.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}

/// Interrupt lines as seen by the CPU: what is pending, and acknowledging
/// the line it is about to service.
pub trait InterruptLines {
    fn pending(&self) -> InterruptFlags;
    fn acknowledge(&mut self, interrupt: Interrupt);
}

impl InterruptLines for InterruptController {
    fn pending(&self) -> InterruptFlags {
        InterruptController::pending(self)
    }

    fn acknowledge(&mut self, interrupt: Interrupt) {
        self.clear(interrupt);
    }
}
