use super::alu;
use super::decode::{CbInstruction, CbOp};
use super::{Bus, Cpu};

impl Cpu {
    /// Execute a CB-prefixed instruction (the second opcode byte has
    /// already been fetched).
    pub(super) fn execute_cb<B: Bus>(&mut self, bus: &mut B, cb: &CbInstruction) {
        match cb.op {
            CbOp::Rotate(op, reg) => {
                let value = self.read_r8(bus, reg);
                let out = alu::rotate(op, value, self.regs.f());
                self.write_r8(bus, reg, out.value);
                self.regs.set_f(out.f);
            }
            CbOp::Bit(n, reg) => {
                let value = self.read_r8(bus, reg);
                self.regs.set_f(alu::bit(n, value, self.regs.f()));
            }
            CbOp::Res(n, reg) => {
                let value = self.read_r8(bus, reg);
                self.write_r8(bus, reg, value & !(1 << n));
            }
            CbOp::Set(n, reg) => {
                let value = self.read_r8(bus, reg);
                self.write_r8(bus, reg, value | (1 << n));
            }
        }
    }
}
