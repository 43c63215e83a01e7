use super::decode::OperandMode;
use super::{Bus, Cpu};

/// Immediate bytes fetched after an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    None,
    Imm8(u8),
    Imm16(u16),
}

impl Operand {
    #[inline]
    pub fn byte(self) -> u8 {
        match self {
            Operand::None => 0,
            Operand::Imm8(v) => v,
            Operand::Imm16(v) => v as u8,
        }
    }

    #[inline]
    pub fn word(self) -> u16 {
        match self {
            Operand::None => 0,
            Operand::Imm8(v) => v as u16,
            Operand::Imm16(v) => v,
        }
    }
}

impl Cpu {
    pub(super) fn fetch_operand<B: Bus>(&mut self, bus: &mut B, mode: OperandMode) -> Operand {
        match mode {
            OperandMode::None => Operand::None,
            OperandMode::Imm8 => Operand::Imm8(self.fetch8(bus)),
            OperandMode::Imm16 => Operand::Imm16(self.fetch16(bus)),
        }
    }
}
