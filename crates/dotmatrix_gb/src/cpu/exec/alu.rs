use crate::cpu::alu;
use crate::cpu::decode::{AluOp, RotOp, R8};
use crate::cpu::{Bus, Cpu, Operand};

impl Cpu {
    fn apply_alu(&mut self, op: AluOp, value: u8) {
        let out = alu::alu8(op, self.regs.a, value, self.regs.f());
        self.regs.a = out.value;
        self.regs.set_f(out.f);
    }

    pub(super) fn exec_alu_reg<B: Bus>(&mut self, bus: &mut B, op: AluOp, src: R8) {
        let value = self.read_r8(bus, src);
        self.apply_alu(op, value);
    }

    pub(super) fn exec_alu_imm(&mut self, op: AluOp, operand: Operand) {
        self.apply_alu(op, operand.byte());
    }

    pub(super) fn exec_add_sp_offset(&mut self, operand: Operand) {
        let (value, f) = alu::add_sp_offset(self.regs.sp, operand.byte());
        self.regs.sp = value;
        self.regs.set_f(f);
    }

    pub(super) fn exec_rot_a(&mut self, op: RotOp) {
        let out = alu::rotate_a(op, self.regs.a, self.regs.f());
        self.regs.a = out.value;
        self.regs.set_f(out.f);
    }

    pub(super) fn exec_daa(&mut self) {
        let out = alu::daa(self.regs.a, self.regs.f());
        self.regs.a = out.value;
        self.regs.set_f(out.f);
    }

    pub(super) fn exec_cpl(&mut self) {
        let out = alu::cpl(self.regs.a, self.regs.f());
        self.regs.a = out.value;
        self.regs.set_f(out.f);
    }

    pub(super) fn exec_scf(&mut self) {
        self.regs.set_f(alu::scf(self.regs.f()));
    }

    pub(super) fn exec_ccf(&mut self) {
        self.regs.set_f(alu::ccf(self.regs.f()));
    }
}
