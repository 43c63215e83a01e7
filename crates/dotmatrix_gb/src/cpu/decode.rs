//! Opcode tables.
//!
//! Both the base and the CB-prefixed instruction sets are decoded at
//! compile time into 256-entry tables. Each entry names the operation,
//! how many immediate bytes it takes, and its documented cycle costs
//! (with a separate cost for taken branches).

use std::fmt;

/// 8-bit operand in encoding order. `HlInd` is the byte at (HL).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum R8 {
    B,
    C,
    D,
    E,
    H,
    L,
    HlInd,
    A,
}

impl R8 {
    const fn from_index(index: u8) -> Self {
        match index & 7 {
            0 => Self::B,
            1 => Self::C,
            2 => Self::D,
            3 => Self::E,
            4 => Self::H,
            5 => Self::L,
            6 => Self::HlInd,
            _ => Self::A,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum R16 {
    Bc,
    De,
    Hl,
    Sp,
}

impl R16 {
    const fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Self::Bc,
            1 => Self::De,
            2 => Self::Hl,
            _ => Self::Sp,
        }
    }
}

/// Register pairs addressable by PUSH/POP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPair {
    Bc,
    De,
    Hl,
    Af,
}

impl StackPair {
    const fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Self::Bc,
            1 => Self::De,
            2 => Self::Hl,
            _ => Self::Af,
        }
    }
}

/// Memory operand of `LD (rr),A` / `LD A,(rr)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indirect {
    Bc,
    De,
    HlInc,
    HlDec,
}

impl Indirect {
    const fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Self::Bc,
            1 => Self::De,
            2 => Self::HlInc,
            _ => Self::HlDec,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    Nz,
    Z,
    Nc,
    C,
}

impl Cond {
    const fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Self::Nz,
            1 => Self::Z,
            2 => Self::Nc,
            _ => Self::C,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    const fn from_index(index: u8) -> Self {
        match index & 7 {
            0 => Self::Add,
            1 => Self::Adc,
            2 => Self::Sub,
            3 => Self::Sbc,
            4 => Self::And,
            5 => Self::Xor,
            6 => Self::Or,
            _ => Self::Cp,
        }
    }
}

/// Shift/rotate group of the CB table (also reused by RLCA & co).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl RotOp {
    const fn from_index(index: u8) -> Self {
        match index & 7 {
            0 => Self::Rlc,
            1 => Self::Rrc,
            2 => Self::Rl,
            3 => Self::Rr,
            4 => Self::Sla,
            5 => Self::Sra,
            6 => Self::Swap,
            _ => Self::Srl,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    /// One of the eleven unused opcodes; executed as a 4-cycle no-op.
    Illegal,
    /// Table slot nothing decoded into. Executing it locks the CPU.
    Undefined,
    Prefix,

    Ld8 { dst: R8, src: R8 },
    Ld8Imm(R8),
    Ld16Imm(R16),
    LdIndA(Indirect),
    LdAInd(Indirect),
    LdAbsSp,
    LdAbsA,
    LdAAbs,
    LdhImmA,
    LdhAImm,
    LdhCA,
    LdhAC,
    LdSpHl,
    LdHlSpOffset,

    Alu(AluOp, R8),
    AluImm(AluOp),
    Inc8(R8),
    Dec8(R8),
    Inc16(R16),
    Dec16(R16),
    AddHl(R16),
    AddSpOffset,
    RotA(RotOp),
    Daa,
    Cpl,
    Scf,
    Ccf,

    Jr(Option<Cond>),
    Jp(Option<Cond>),
    JpHl,
    Call(Option<Cond>),
    Ret(Option<Cond>),
    Reti,
    Rst(u8),
    Push(StackPair),
    Pop(StackPair),
}

/// How many immediate bytes follow the opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandMode {
    None,
    Imm8,
    Imm16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    pub operand: OperandMode,
    /// T-cycles when no branch is taken.
    pub cycles: u8,
    /// T-cycles when a conditional branch is taken. Equal to `cycles` for
    /// everything else.
    pub taken_cycles: u8,
}

impl Instruction {
    const UNDEFINED: Self = fixed(Op::Undefined, OperandMode::None, 0);
}

const fn fixed(op: Op, operand: OperandMode, cycles: u8) -> Instruction {
    Instruction {
        op,
        operand,
        cycles,
        taken_cycles: cycles,
    }
}

const fn branch(op: Op, operand: OperandMode, not_taken: u8, taken: u8) -> Instruction {
    Instruction {
        op,
        operand,
        cycles: not_taken,
        taken_cycles: taken,
    }
}

/// Pick the (HL) cost when register index `r` is the memory operand.
const fn on_hl(r: u8, reg_cycles: u8, mem_cycles: u8) -> u8 {
    if r == 6 {
        mem_cycles
    } else {
        reg_cycles
    }
}

const fn decode_base(opcode: u8) -> Instruction {
    use OperandMode::{Imm16, Imm8, None as NoImm};

    let y = (opcode >> 3) & 7;
    let z = opcode & 7;
    let p = y >> 1;
    let q = y & 1;

    match opcode >> 6 {
        0 => match z {
            0 => match y {
                0 => fixed(Op::Nop, NoImm, 4),
                1 => fixed(Op::LdAbsSp, Imm16, 20),
                // The padding byte after STOP is consumed as an immediate.
                2 => fixed(Op::Stop, Imm8, 4),
                3 => fixed(Op::Jr(None), Imm8, 12),
                _ => branch(Op::Jr(Some(Cond::from_index(y - 4))), Imm8, 8, 12),
            },
            1 => {
                if q == 0 {
                    fixed(Op::Ld16Imm(R16::from_index(p)), Imm16, 12)
                } else {
                    fixed(Op::AddHl(R16::from_index(p)), NoImm, 8)
                }
            }
            2 => {
                if q == 0 {
                    fixed(Op::LdIndA(Indirect::from_index(p)), NoImm, 8)
                } else {
                    fixed(Op::LdAInd(Indirect::from_index(p)), NoImm, 8)
                }
            }
            3 => {
                if q == 0 {
                    fixed(Op::Inc16(R16::from_index(p)), NoImm, 8)
                } else {
                    fixed(Op::Dec16(R16::from_index(p)), NoImm, 8)
                }
            }
            4 => fixed(Op::Inc8(R8::from_index(y)), NoImm, on_hl(y, 4, 12)),
            5 => fixed(Op::Dec8(R8::from_index(y)), NoImm, on_hl(y, 4, 12)),
            6 => fixed(Op::Ld8Imm(R8::from_index(y)), Imm8, on_hl(y, 8, 12)),
            _ => match y {
                0 => fixed(Op::RotA(RotOp::Rlc), NoImm, 4),
                1 => fixed(Op::RotA(RotOp::Rrc), NoImm, 4),
                2 => fixed(Op::RotA(RotOp::Rl), NoImm, 4),
                3 => fixed(Op::RotA(RotOp::Rr), NoImm, 4),
                4 => fixed(Op::Daa, NoImm, 4),
                5 => fixed(Op::Cpl, NoImm, 4),
                6 => fixed(Op::Scf, NoImm, 4),
                _ => fixed(Op::Ccf, NoImm, 4),
            },
        },
        1 => {
            if opcode == 0x76 {
                fixed(Op::Halt, NoImm, 4)
            } else {
                let cycles = if y == 6 || z == 6 { 8 } else { 4 };
                fixed(
                    Op::Ld8 {
                        dst: R8::from_index(y),
                        src: R8::from_index(z),
                    },
                    NoImm,
                    cycles,
                )
            }
        }
        2 => fixed(
            Op::Alu(AluOp::from_index(y), R8::from_index(z)),
            NoImm,
            on_hl(z, 4, 8),
        ),
        _ => match z {
            0 => match y {
                0..=3 => branch(Op::Ret(Some(Cond::from_index(y))), NoImm, 8, 20),
                4 => fixed(Op::LdhImmA, Imm8, 12),
                5 => fixed(Op::AddSpOffset, Imm8, 16),
                6 => fixed(Op::LdhAImm, Imm8, 12),
                _ => fixed(Op::LdHlSpOffset, Imm8, 12),
            },
            1 => {
                if q == 0 {
                    fixed(Op::Pop(StackPair::from_index(p)), NoImm, 12)
                } else {
                    match p {
                        0 => fixed(Op::Ret(None), NoImm, 16),
                        1 => fixed(Op::Reti, NoImm, 16),
                        2 => fixed(Op::JpHl, NoImm, 4),
                        _ => fixed(Op::LdSpHl, NoImm, 8),
                    }
                }
            }
            2 => match y {
                0..=3 => branch(Op::Jp(Some(Cond::from_index(y))), Imm16, 12, 16),
                4 => fixed(Op::LdhCA, NoImm, 8),
                5 => fixed(Op::LdAbsA, Imm16, 16),
                6 => fixed(Op::LdhAC, NoImm, 8),
                _ => fixed(Op::LdAAbs, Imm16, 16),
            },
            3 => match y {
                0 => fixed(Op::Jp(None), Imm16, 16),
                // Cost comes from the CB table entry.
                1 => fixed(Op::Prefix, NoImm, 0),
                6 => fixed(Op::Di, NoImm, 4),
                7 => fixed(Op::Ei, NoImm, 4),
                _ => fixed(Op::Illegal, NoImm, 4),
            },
            4 => match y {
                0..=3 => branch(Op::Call(Some(Cond::from_index(y))), Imm16, 12, 24),
                _ => fixed(Op::Illegal, NoImm, 4),
            },
            5 => {
                if q == 0 {
                    fixed(Op::Push(StackPair::from_index(p)), NoImm, 16)
                } else if p == 0 {
                    fixed(Op::Call(None), Imm16, 24)
                } else {
                    fixed(Op::Illegal, NoImm, 4)
                }
            }
            6 => fixed(Op::AluImm(AluOp::from_index(y)), Imm8, 8),
            _ => fixed(Op::Rst(y * 8), NoImm, 16),
        },
    }
}

const fn build_base_table() -> [Instruction; 256] {
    let mut table = [Instruction::UNDEFINED; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode_base(i as u8);
        i += 1;
    }
    table
}

pub static BASE_TABLE: [Instruction; 256] = build_base_table();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CbOp {
    Rotate(RotOp, R8),
    Bit(u8, R8),
    Res(u8, R8),
    Set(u8, R8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CbInstruction {
    pub op: CbOp,
    /// Total T-cycles including the 0xCB prefix fetch.
    pub cycles: u8,
}

const fn decode_cb(opcode: u8) -> CbInstruction {
    let y = (opcode >> 3) & 7;
    let z = opcode & 7;
    let reg = R8::from_index(z);
    let on_hl = z == 6;

    match opcode >> 6 {
        0 => CbInstruction {
            op: CbOp::Rotate(RotOp::from_index(y), reg),
            cycles: if on_hl { 16 } else { 8 },
        },
        // BIT only reads (HL), so it skips the write-back cycle.
        1 => CbInstruction {
            op: CbOp::Bit(y, reg),
            cycles: if on_hl { 12 } else { 8 },
        },
        2 => CbInstruction {
            op: CbOp::Res(y, reg),
            cycles: if on_hl { 16 } else { 8 },
        },
        _ => CbInstruction {
            op: CbOp::Set(y, reg),
            cycles: if on_hl { 16 } else { 8 },
        },
    }
}

const fn build_cb_table() -> [CbInstruction; 256] {
    let mut table = [decode_cb(0); 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode_cb(i as u8);
        i += 1;
    }
    table
}

pub static CB_TABLE: [CbInstruction; 256] = build_cb_table();

impl fmt::Display for R8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            R8::B => "B",
            R8::C => "C",
            R8::D => "D",
            R8::E => "E",
            R8::H => "H",
            R8::L => "L",
            R8::HlInd => "(HL)",
            R8::A => "A",
        })
    }
}

impl fmt::Display for R16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            R16::Bc => "BC",
            R16::De => "DE",
            R16::Hl => "HL",
            R16::Sp => "SP",
        })
    }
}

impl fmt::Display for StackPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StackPair::Bc => "BC",
            StackPair::De => "DE",
            StackPair::Hl => "HL",
            StackPair::Af => "AF",
        })
    }
}

impl fmt::Display for Indirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Indirect::Bc => "(BC)",
            Indirect::De => "(DE)",
            Indirect::HlInc => "(HL+)",
            Indirect::HlDec => "(HL-)",
        })
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cond::Nz => "NZ",
            Cond::Z => "Z",
            Cond::Nc => "NC",
            Cond::C => "C",
        })
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        })
    }
}

impl fmt::Display for RotOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RotOp::Rlc => "RLC",
            RotOp::Rrc => "RRC",
            RotOp::Rl => "RL",
            RotOp::Rr => "RR",
            RotOp::Sla => "SLA",
            RotOp::Sra => "SRA",
            RotOp::Swap => "SWAP",
            RotOp::Srl => "SRL",
        })
    }
}

fn cond_prefix(cond: &Option<Cond>) -> String {
    match cond {
        Some(c) => format!("{c},"),
        None => String::new(),
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Nop => write!(f, "NOP"),
            Op::Stop => write!(f, "STOP"),
            Op::Halt => write!(f, "HALT"),
            Op::Di => write!(f, "DI"),
            Op::Ei => write!(f, "EI"),
            Op::Illegal => write!(f, "ILLEGAL"),
            Op::Undefined => write!(f, "???"),
            Op::Prefix => write!(f, "PREFIX CB"),
            Op::Ld8 { dst, src } => write!(f, "LD {dst},{src}"),
            Op::Ld8Imm(r) => write!(f, "LD {r},d8"),
            Op::Ld16Imm(rr) => write!(f, "LD {rr},d16"),
            Op::LdIndA(ind) => write!(f, "LD {ind},A"),
            Op::LdAInd(ind) => write!(f, "LD A,{ind}"),
            Op::LdAbsSp => write!(f, "LD (a16),SP"),
            Op::LdAbsA => write!(f, "LD (a16),A"),
            Op::LdAAbs => write!(f, "LD A,(a16)"),
            Op::LdhImmA => write!(f, "LDH (a8),A"),
            Op::LdhAImm => write!(f, "LDH A,(a8)"),
            Op::LdhCA => write!(f, "LD (C),A"),
            Op::LdhAC => write!(f, "LD A,(C)"),
            Op::LdSpHl => write!(f, "LD SP,HL"),
            Op::LdHlSpOffset => write!(f, "LD HL,SP+e8"),
            Op::Alu(op, r) => write!(f, "{op}{r}"),
            Op::AluImm(op) => write!(f, "{op}d8"),
            Op::Inc8(r) => write!(f, "INC {r}"),
            Op::Dec8(r) => write!(f, "DEC {r}"),
            Op::Inc16(rr) => write!(f, "INC {rr}"),
            Op::Dec16(rr) => write!(f, "DEC {rr}"),
            Op::AddHl(rr) => write!(f, "ADD HL,{rr}"),
            Op::AddSpOffset => write!(f, "ADD SP,e8"),
            Op::RotA(op) => write!(f, "{op}A"),
            Op::Daa => write!(f, "DAA"),
            Op::Cpl => write!(f, "CPL"),
            Op::Scf => write!(f, "SCF"),
            Op::Ccf => write!(f, "CCF"),
            Op::Jr(c) => write!(f, "JR {}e8", cond_prefix(c)),
            Op::Jp(c) => write!(f, "JP {}a16", cond_prefix(c)),
            Op::JpHl => write!(f, "JP HL"),
            Op::Call(c) => write!(f, "CALL {}a16", cond_prefix(c)),
            Op::Ret(Some(c)) => write!(f, "RET {c}"),
            Op::Ret(None) => write!(f, "RET"),
            Op::Reti => write!(f, "RETI"),
            Op::Rst(v) => write!(f, "RST {v:02X}h"),
            Op::Push(rr) => write!(f, "PUSH {rr}"),
            Op::Pop(rr) => write!(f, "POP {rr}"),
        }
    }
}

impl fmt::Display for CbOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CbOp::Rotate(op, r) => write!(f, "{op} {r}"),
            CbOp::Bit(n, r) => write!(f, "BIT {n},{r}"),
            CbOp::Res(n, r) => write!(f, "RES {n},{r}"),
            CbOp::Set(n, r) => write!(f, "SET {n},{r}"),
        }
    }
}
