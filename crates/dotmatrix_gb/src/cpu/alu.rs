//! Flag-producing arithmetic as pure functions.
//!
//! Each function takes operand values plus the incoming F register and
//! returns the result together with the new F. Nothing here touches the
//! CPU or the bus, so every operation can be checked in isolation.

use super::decode::{AluOp, RotOp};
use super::regs::Flag;

const Z: u8 = Flag::Z.mask();
const N: u8 = Flag::N.mask();
const H: u8 = Flag::H.mask();
const C: u8 = Flag::C.mask();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluOut {
    pub value: u8,
    pub f: u8,
}

#[inline]
fn flags(z: bool, n: bool, h: bool, c: bool) -> u8 {
    (if z { Z } else { 0 })
        | (if n { N } else { 0 })
        | (if h { H } else { 0 })
        | (if c { C } else { 0 })
}

/// ADD/ADC. Half carry out of bit 3, carry out of bit 7.
pub fn add8(a: u8, b: u8, carry_in: bool) -> AluOut {
    let cin = carry_in as u8;
    let full = a as u16 + b as u16 + cin as u16;
    let value = full as u8;
    let half = (a & 0x0F) + (b & 0x0F) + cin > 0x0F;
    AluOut {
        value,
        f: flags(value == 0, false, half, full > 0xFF),
    }
}

/// SUB/SBC. Flags record borrows from bit 4 and bit 8.
pub fn sub8(a: u8, b: u8, borrow_in: bool) -> AluOut {
    let bin = borrow_in as i16;
    let full = a as i16 - b as i16 - bin;
    let half = (a & 0x0F) as i16 - (b & 0x0F) as i16 - bin;
    let value = full as u8;
    AluOut {
        value,
        f: flags(value == 0, true, half < 0, full < 0),
    }
}

/// One of the eight accumulator operations of the 0x80-0xBF block.
pub fn alu8(op: AluOp, a: u8, b: u8, f: u8) -> AluOut {
    let carry = f & C != 0;
    match op {
        AluOp::Add => add8(a, b, false),
        AluOp::Adc => add8(a, b, carry),
        AluOp::Sub => sub8(a, b, false),
        AluOp::Sbc => sub8(a, b, carry),
        AluOp::And => {
            let value = a & b;
            AluOut {
                value,
                f: flags(value == 0, false, true, false),
            }
        }
        AluOp::Xor => {
            let value = a ^ b;
            AluOut {
                value,
                f: flags(value == 0, false, false, false),
            }
        }
        AluOp::Or => {
            let value = a | b;
            AluOut {
                value,
                f: flags(value == 0, false, false, false),
            }
        }
        AluOp::Cp => AluOut {
            value: a,
            f: sub8(a, b, false).f,
        },
    }
}

/// 8-bit INC; C is preserved.
pub fn inc8(value: u8, f: u8) -> AluOut {
    let result = value.wrapping_add(1);
    AluOut {
        value: result,
        f: (f & C) | flags(result == 0, false, value & 0x0F == 0x0F, false),
    }
}

/// 8-bit DEC; C is preserved.
pub fn dec8(value: u8, f: u8) -> AluOut {
    let result = value.wrapping_sub(1);
    AluOut {
        value: result,
        f: (f & C) | flags(result == 0, true, value & 0x0F == 0, false),
    }
}

/// ADD HL,rr. Z is preserved; H out of bit 11, C out of bit 15.
pub fn add16(hl: u16, value: u16, f: u8) -> (u16, u8) {
    let (result, carry) = hl.overflowing_add(value);
    let half = (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF;
    (result, (f & Z) | flags(false, false, half, carry))
}

/// SP plus a signed byte, as used by ADD SP,e8 and LD HL,SP+e8.
///
/// H and C come from adding the unsigned offset byte to the low byte of
/// SP only. Z and N are always cleared.
pub fn add_sp_offset(sp: u16, offset: u8) -> (u16, u8) {
    let result = sp.wrapping_add(offset as i8 as i16 as u16);
    let low = sp & 0x00FF;
    let off = offset as u16;
    let half = (low & 0x0F) + (off & 0x0F) > 0x0F;
    let carry = low + off > 0xFF;
    (result, flags(false, false, half, carry))
}

/// BCD adjust of A using the N/H/C flags left by the previous operation.
pub fn daa(a: u8, f: u8) -> AluOut {
    let subtract = f & N != 0;
    let half = f & H != 0;
    let mut carry = f & C != 0;
    let mut adjust = 0u8;

    let value = if subtract {
        if carry {
            adjust |= 0x60;
        }
        if half {
            adjust |= 0x06;
        }
        a.wrapping_sub(adjust)
    } else {
        if carry || a > 0x99 {
            adjust |= 0x60;
            carry = true;
        }
        if half || (a & 0x0F) > 0x09 {
            adjust |= 0x06;
        }
        a.wrapping_add(adjust)
    };

    AluOut {
        value,
        f: (f & N) | flags(value == 0, false, false, carry),
    }
}

/// CB-prefixed shifts and rotates. Z reflects the result.
pub fn rotate(op: RotOp, value: u8, f: u8) -> AluOut {
    let carry_in = f & C != 0;
    let (result, carry) = match op {
        RotOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
        RotOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
        RotOp::Rl => ((value << 1) | carry_in as u8, value & 0x80 != 0),
        RotOp::Rr => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
        RotOp::Sla => (value << 1, value & 0x80 != 0),
        RotOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        RotOp::Swap => (value.rotate_left(4), false),
        RotOp::Srl => (value >> 1, value & 0x01 != 0),
    };
    AluOut {
        value: result,
        f: flags(result == 0, false, false, carry),
    }
}

/// RLCA/RRCA/RLA/RRA: like the CB forms but Z is always cleared.
pub fn rotate_a(op: RotOp, a: u8, f: u8) -> AluOut {
    let out = rotate(op, a, f);
    AluOut {
        value: out.value,
        f: out.f & !Z,
    }
}

/// BIT n,v. C is preserved, H set.
pub fn bit(n: u8, value: u8, f: u8) -> u8 {
    (f & C) | flags(value & (1 << n) == 0, false, true, false)
}

pub fn cpl(a: u8, f: u8) -> AluOut {
    AluOut {
        value: !a,
        f: f | N | H,
    }
}

pub fn scf(f: u8) -> u8 {
    (f & Z) | C
}

pub fn ccf(f: u8) -> u8 {
    (f & Z) | ((f & C) ^ C)
}
