use crate::cpu::alu;
use crate::cpu::decode::{R16, R8};
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_inc8<B: Bus>(&mut self, bus: &mut B, reg: R8) {
        let value = self.read_r8(bus, reg);
        let out = alu::inc8(value, self.regs.f());
        self.write_r8(bus, reg, out.value);
        self.regs.set_f(out.f);
    }

    pub(super) fn exec_dec8<B: Bus>(&mut self, bus: &mut B, reg: R8) {
        let value = self.read_r8(bus, reg);
        let out = alu::dec8(value, self.regs.f());
        self.write_r8(bus, reg, out.value);
        self.regs.set_f(out.f);
    }

    // 16-bit INC/DEC leave flags alone.
    pub(super) fn exec_inc16(&mut self, reg: R16) {
        let value = self.read_r16(reg).wrapping_add(1);
        self.write_r16(reg, value);
    }

    pub(super) fn exec_dec16(&mut self, reg: R16) {
        let value = self.read_r16(reg).wrapping_sub(1);
        self.write_r16(reg, value);
    }

    pub(super) fn exec_add_hl(&mut self, reg: R16) {
        let (value, f) = alu::add16(self.regs.hl(), self.read_r16(reg), self.regs.f());
        self.regs.set_hl(value);
        self.regs.set_f(f);
    }
}
