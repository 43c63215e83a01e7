use super::{Bus, Cpu, InterruptLines};
use crate::interrupts::highest_pending_bit;

impl Cpu {
    /// Service the highest-priority pending interrupt if IME allows it.
    ///
    /// Returns the dispatch cost (20 T-cycles) when an interrupt was
    /// serviced. With IME off a pending interrupt still ends HALT, but
    /// nothing is acknowledged or pushed.
    pub(super) fn handle_interrupts<B: Bus + InterruptLines>(&mut self, bus: &mut B) -> Option<u32> {
        let interrupt = highest_pending_bit(bus.pending())?;

        if !self.state.ime {
            self.state.halted = false;
            return None;
        }

        self.state.ime = false;
        self.state.halted = false;
        bus.acknowledge(interrupt);
        let pc = self.regs.pc;
        self.push_u16(bus, pc);
        self.regs.pc = interrupt.vector();
        log::trace!(
            "GB CPU: servicing {:?} from PC=0x{:04X} -> 0x{:04X}",
            interrupt,
            pc,
            self.regs.pc
        );
        Some(20)
    }
}
