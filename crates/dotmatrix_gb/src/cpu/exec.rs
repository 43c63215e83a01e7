//! Instruction execution, one handler family per submodule.

mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use anyhow::{bail, Result};

use super::decode::{Instruction, Op, CB_TABLE};
use super::{Bus, Cpu, InterruptLines, Operand};

impl Cpu {
    /// Run a decoded instruction whose immediates have already been fetched.
    pub(super) fn execute<B: Bus + InterruptLines>(
        &mut self,
        bus: &mut B,
        opcode: u8,
        pc: u16,
        instr: &Instruction,
        operand: Operand,
    ) -> Result<u32> {
        let mut taken = false;
        match instr.op {
            Op::Nop => {}
            Op::Stop => self.exec_stop(),
            Op::Halt => self.exec_halt(bus),
            Op::Di => self.exec_di(),
            Op::Ei => self.exec_ei(),
            Op::Illegal => {
                log::warn!("GB CPU: illegal opcode 0x{opcode:02X} at PC=0x{pc:04X} treated as NOP");
            }
            Op::Undefined => {
                log::error!("GB CPU locked: undefined opcode 0x{opcode:02X} at PC=0x{pc:04X}");
                self.set_lockup(opcode, pc);
                bail!("undefined opcode 0x{opcode:02X} at PC=0x{pc:04X}");
            }
            Op::Prefix => {
                let cb_opcode = self.fetch8(bus);
                let cb = CB_TABLE[cb_opcode as usize];
                log::trace!("GB CPU: {pc:04X} CB {cb_opcode:02X} {}", cb.op);
                self.execute_cb(bus, &cb);
                return Ok(cb.cycles as u32);
            }

            Op::Ld8 { dst, src } => self.exec_ld8(bus, dst, src),
            Op::Ld8Imm(dst) => self.exec_ld8_imm(bus, dst, operand),
            Op::Ld16Imm(dst) => self.exec_ld16_imm(dst, operand),
            Op::LdIndA(ind) => self.exec_ld_ind_a(bus, ind),
            Op::LdAInd(ind) => self.exec_ld_a_ind(bus, ind),
            Op::LdAbsSp => self.exec_ld_abs_sp(bus, operand),
            Op::LdAbsA => self.exec_ld_abs_a(bus, operand),
            Op::LdAAbs => self.exec_ld_a_abs(bus, operand),
            Op::LdhImmA => self.exec_ldh_store(bus, operand.byte()),
            Op::LdhAImm => self.exec_ldh_load(bus, operand.byte()),
            Op::LdhCA => self.exec_ldh_store(bus, self.regs.c),
            Op::LdhAC => self.exec_ldh_load(bus, self.regs.c),
            Op::LdSpHl => self.exec_ld_sp_hl(),
            Op::LdHlSpOffset => self.exec_ld_hl_sp_offset(operand),

            Op::Alu(op, src) => self.exec_alu_reg(bus, op, src),
            Op::AluImm(op) => self.exec_alu_imm(op, operand),
            Op::Inc8(reg) => self.exec_inc8(bus, reg),
            Op::Dec8(reg) => self.exec_dec8(bus, reg),
            Op::Inc16(reg) => self.exec_inc16(reg),
            Op::Dec16(reg) => self.exec_dec16(reg),
            Op::AddHl(reg) => self.exec_add_hl(reg),
            Op::AddSpOffset => self.exec_add_sp_offset(operand),
            Op::RotA(op) => self.exec_rot_a(op),
            Op::Daa => self.exec_daa(),
            Op::Cpl => self.exec_cpl(),
            Op::Scf => self.exec_scf(),
            Op::Ccf => self.exec_ccf(),

            Op::Jr(cond) => taken = self.exec_jr(cond, operand),
            Op::Jp(cond) => taken = self.exec_jp(cond, operand),
            Op::JpHl => self.exec_jp_hl(),
            Op::Call(cond) => taken = self.exec_call(bus, cond, operand),
            Op::Ret(cond) => taken = self.exec_ret(bus, cond),
            Op::Reti => self.exec_reti(bus),
            Op::Rst(target) => self.exec_rst(bus, target),
            Op::Push(pair) => self.exec_push(bus, pair),
            Op::Pop(pair) => self.exec_pop(bus, pair),
        }

        let cycles = if taken {
            instr.taken_cycles
        } else {
            instr.cycles
        };
        Ok(cycles as u32)
    }
}
