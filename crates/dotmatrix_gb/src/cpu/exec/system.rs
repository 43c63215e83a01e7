use crate::cpu::{Cpu, InterruptLines};

impl Cpu {
    /// HALT. With IME off and an interrupt already pending the CPU keeps
    /// running and the next opcode byte is read twice (the halt bug).
    pub(super) fn exec_halt<B: InterruptLines>(&mut self, bus: &mut B) {
        if !self.state.ime && !bus.pending().is_empty() {
            self.state.halt_bug = true;
        } else {
            self.state.halted = true;
        }
    }

    /// STOP. The padding byte was already consumed as the operand.
    pub(super) fn exec_stop(&mut self) {
        self.state.stopped = true;
    }

    pub(super) fn exec_di(&mut self) {
        self.state.ime = false;
        self.state.ei_pending = false;
    }

    pub(super) fn exec_ei(&mut self) {
        if !self.state.ime {
            self.state.ei_pending = true;
        }
    }
}
