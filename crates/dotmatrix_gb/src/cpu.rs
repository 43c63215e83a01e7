//! SM83 instruction engine.
//!
//! `Cpu::step` runs exactly one unit of work (an interrupt dispatch, a
//! halted idle cycle or one instruction) and returns the T-cycles it
//! took. Nothing else in the machine advances inside `step`; the caller
//! replays the returned count into the PPU, timer and DMA.

mod alu;
mod bus;
mod cb;
pub mod decode;
mod exec;
mod init;
mod interrupts;
mod operand;
mod regs;

use anyhow::{bail, Result};

pub use bus::{Bus, InterruptLines};
pub use decode::{Instruction, BASE_TABLE, CB_TABLE};
pub use operand::Operand;
pub use regs::{Flag, Registers};

use decode::{Cond, R16, R8};

/// CPU control flags outside the register file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuState {
    pub ime: bool,
    pub halted: bool,
    /// Set by HALT when it fails to halt; the next opcode fetch does not
    /// advance PC.
    pub halt_bug: bool,
    pub stopped: bool,
    /// EI was executed; IME turns on at the start of the next step.
    pub ei_pending: bool,
}

/// Opcode and address of the instruction that locked the CPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lockup {
    pub opcode: u8,
    pub pc: u16,
}

pub struct Cpu {
    pub regs: Registers,
    pub state: CpuState,
    lockup: Option<Lockup>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU in the state the DMG boot ROM leaves it at PC=0x0100.
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            state: CpuState::default(),
            lockup: None,
        };
        cpu.reset();
        cpu
    }

    pub fn lockup(&self) -> Option<Lockup> {
        self.lockup
    }

    /// Execute one instruction or interrupt dispatch and return the
    /// T-cycles it consumed.
    pub fn step<B: Bus + InterruptLines>(&mut self, bus: &mut B) -> Result<u32> {
        if let Some(Lockup { opcode, pc }) = self.lockup {
            bail!("CPU locked by opcode 0x{opcode:02X} at PC=0x{pc:04X}");
        }

        if self.state.ei_pending {
            self.state.ime = true;
            self.state.ei_pending = false;
        }

        if let Some(cycles) = self.handle_interrupts(bus) {
            return Ok(cycles);
        }

        if self.state.halted {
            return Ok(4);
        }

        if self.state.stopped {
            // Any joypad line pulled low ends STOP.
            if bus.read8(0xFF00) & 0x0F == 0x0F {
                return Ok(4);
            }
            self.state.stopped = false;
        }

        let pc = self.regs.pc;
        let opcode = self.fetch8(bus);
        let instr = BASE_TABLE[opcode as usize];
        let operand = self.fetch_operand(bus, instr.operand);
        log::trace!("GB CPU: {pc:04X} {:02X} {} {:?}", opcode, instr.op, operand);
        self.execute(bus, opcode, pc, &instr, operand)
    }

    /// Read the byte at PC and advance PC, unless the halt bug is armed, in
    /// which case PC stays put for this one fetch.
    pub(crate) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        if self.state.halt_bug {
            self.state.halt_bug = false;
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(1);
        }
        value
    }

    pub(crate) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    fn read_r8<B: Bus>(&mut self, bus: &mut B, reg: R8) -> u8 {
        match reg {
            R8::B => self.regs.b,
            R8::C => self.regs.c,
            R8::D => self.regs.d,
            R8::E => self.regs.e,
            R8::H => self.regs.h,
            R8::L => self.regs.l,
            R8::HlInd => bus.read8(self.regs.hl()),
            R8::A => self.regs.a,
        }
    }

    fn write_r8<B: Bus>(&mut self, bus: &mut B, reg: R8, value: u8) {
        match reg {
            R8::B => self.regs.b = value,
            R8::C => self.regs.c = value,
            R8::D => self.regs.d = value,
            R8::E => self.regs.e = value,
            R8::H => self.regs.h = value,
            R8::L => self.regs.l = value,
            R8::HlInd => bus.write8(self.regs.hl(), value),
            R8::A => self.regs.a = value,
        }
    }

    fn read_r16(&self, reg: R16) -> u16 {
        match reg {
            R16::Bc => self.regs.bc(),
            R16::De => self.regs.de(),
            R16::Hl => self.regs.hl(),
            R16::Sp => self.regs.sp,
        }
    }

    fn write_r16(&mut self, reg: R16, value: u16) {
        match reg {
            R16::Bc => self.regs.set_bc(value),
            R16::De => self.regs.set_de(value),
            R16::Hl => self.regs.set_hl(value),
            R16::Sp => self.regs.sp = value,
        }
    }

    fn condition(&self, cond: Cond) -> bool {
        match cond {
            Cond::Nz => !self.regs.flag(Flag::Z),
            Cond::Z => self.regs.flag(Flag::Z),
            Cond::Nc => !self.regs.flag(Flag::C),
            Cond::C => self.regs.flag(Flag::C),
        }
    }

    pub(crate) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    pub(crate) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn set_lockup(&mut self, opcode: u8, pc: u16) {
        self.lockup = Some(Lockup { opcode, pc });
    }

    pub(crate) fn clear_lockup(&mut self) {
        self.lockup = None;
    }
}

#[cfg(test)]
mod tests;
