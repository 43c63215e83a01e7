use crate::cpu::decode::Cond;
use crate::cpu::{Bus, Cpu, Operand};

impl Cpu {
    #[inline]
    fn condition_met(&self, cond: Option<Cond>) -> bool {
        cond.map_or(true, |c| self.condition(c))
    }

    /// JR [cc,]e8. The offset is relative to the address after the operand.
    pub(super) fn exec_jr(&mut self, cond: Option<Cond>, operand: Operand) -> bool {
        if !self.condition_met(cond) {
            return false;
        }
        let offset = operand.byte() as i8;
        self.regs.pc = self.regs.pc.wrapping_add(offset as i16 as u16);
        true
    }

    pub(super) fn exec_jp(&mut self, cond: Option<Cond>, operand: Operand) -> bool {
        if !self.condition_met(cond) {
            return false;
        }
        self.regs.pc = operand.word();
        true
    }

    pub(super) fn exec_jp_hl(&mut self) {
        self.regs.pc = self.regs.hl();
    }

    pub(super) fn exec_call<B: Bus>(&mut self, bus: &mut B, cond: Option<Cond>, operand: Operand) -> bool {
        if !self.condition_met(cond) {
            return false;
        }
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = operand.word();
        true
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B, cond: Option<Cond>) -> bool {
        if !self.condition_met(cond) {
            return false;
        }
        self.regs.pc = self.pop_u16(bus);
        true
    }

    /// RETI enables IME immediately, without the EI delay.
    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop_u16(bus);
        self.state.ime = true;
        self.state.ei_pending = false;
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, target: u8) {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = target as u16;
    }
}
