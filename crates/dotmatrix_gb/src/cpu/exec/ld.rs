use crate::cpu::alu;
use crate::cpu::decode::{Indirect, R16, R8};
use crate::cpu::{Bus, Cpu, Operand};

impl Cpu {
    pub(super) fn exec_ld8<B: Bus>(&mut self, bus: &mut B, dst: R8, src: R8) {
        let value = self.read_r8(bus, src);
        self.write_r8(bus, dst, value);
    }

    pub(super) fn exec_ld8_imm<B: Bus>(&mut self, bus: &mut B, dst: R8, operand: Operand) {
        self.write_r8(bus, dst, operand.byte());
    }

    pub(super) fn exec_ld16_imm(&mut self, dst: R16, operand: Operand) {
        self.write_r16(dst, operand.word());
    }

    /// Resolve an indirect operand, applying the HL post-increment or
    /// post-decrement.
    fn indirect_addr(&mut self, ind: Indirect) -> u16 {
        match ind {
            Indirect::Bc => self.regs.bc(),
            Indirect::De => self.regs.de(),
            Indirect::HlInc => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Indirect::HlDec => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn exec_ld_ind_a<B: Bus>(&mut self, bus: &mut B, ind: Indirect) {
        let addr = self.indirect_addr(ind);
        bus.write8(addr, self.regs.a);
    }

    pub(super) fn exec_ld_a_ind<B: Bus>(&mut self, bus: &mut B, ind: Indirect) {
        let addr = self.indirect_addr(ind);
        self.regs.a = bus.read8(addr);
    }

    /// LD (a16),SP stores SP little-endian.
    pub(super) fn exec_ld_abs_sp<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
        let addr = operand.word();
        let [lo, hi] = self.regs.sp.to_le_bytes();
        bus.write8(addr, lo);
        bus.write8(addr.wrapping_add(1), hi);
    }

    pub(super) fn exec_ld_abs_a<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
        bus.write8(operand.word(), self.regs.a);
    }

    pub(super) fn exec_ld_a_abs<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
        self.regs.a = bus.read8(operand.word());
    }

    /// LDH (n),A and LD (C),A: store A into 0xFF00 + offset.
    pub(super) fn exec_ldh_store<B: Bus>(&mut self, bus: &mut B, offset: u8) {
        bus.write8(0xFF00 | offset as u16, self.regs.a);
    }

    pub(super) fn exec_ldh_load<B: Bus>(&mut self, bus: &mut B, offset: u8) {
        self.regs.a = bus.read8(0xFF00 | offset as u16);
    }

    pub(super) fn exec_ld_sp_hl(&mut self) {
        self.regs.sp = self.regs.hl();
    }

    pub(super) fn exec_ld_hl_sp_offset(&mut self, operand: Operand) {
        let (value, f) = alu::add_sp_offset(self.regs.sp, operand.byte());
        self.regs.set_hl(value);
        self.regs.set_f(f);
    }
}
