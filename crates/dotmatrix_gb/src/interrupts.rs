//! Interrupt request and enable lines (IF at 0xFF0F, IE at 0xFFFF).

use anyhow::{ensure, Result};
use bitflags::bitflags;

bitflags! {
    /// The five interrupt lines as they appear in IE and IF.
    ///
    /// Lower bits win when several lines are pending at once.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 0x01;
        const STAT = 0x02;
        const TIMER = 0x04;
        const SERIAL = 0x08;
        const JOYPAD = 0x10;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interrupt {
    VBlank = 0,
    Stat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl Interrupt {
    pub fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(Self::VBlank),
            1 => Some(Self::Stat),
            2 => Some(Self::Timer),
            3 => Some(Self::Serial),
            4 => Some(Self::Joypad),
            _ => None,
        }
    }

    #[inline]
    pub fn bit(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn flag(self) -> InterruptFlags {
        InterruptFlags::from_bits_truncate(1 << self.bit())
    }

    /// Address the CPU jumps to when servicing this interrupt.
    #[inline]
    pub fn vector(self) -> u16 {
        0x0040 + 8 * self.bit() as u16
    }
}

/// Lowest set bit of `bits`, which is the highest-priority pending line.
pub fn highest_pending_bit(bits: InterruptFlags) -> Option<Interrupt> {
    if bits.is_empty() {
        return None;
    }
    Interrupt::from_bit(bits.bits().trailing_zeros() as u8)
}

/// Holds IF and IE. Servicing (stack push, jump) lives in the CPU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterruptController {
    requested: InterruptFlags,
    enabled: u8,
}

impl InterruptController {
    /// IE & IF restricted to the five defined lines.
    #[inline]
    pub fn pending(&self) -> InterruptFlags {
        self.requested & InterruptFlags::from_bits_truncate(self.enabled)
    }

    #[inline]
    pub fn request(&mut self, interrupt: Interrupt) {
        self.requested |= interrupt.flag();
    }

    /// Request an interrupt by raw line number.
    pub fn request_id(&mut self, id: u8) -> Result<()> {
        ensure!(id <= 4, "interrupt id {id} out of range 0..=4");
        self.requested |= InterruptFlags::from_bits_truncate(1 << id);
        Ok(())
    }

    #[inline]
    pub fn clear(&mut self, interrupt: Interrupt) {
        self.requested.remove(interrupt.flag());
    }

    /// IF as seen by the CPU; bits 5-7 are unconnected and read as 1.
    #[inline]
    pub fn read_if(&self) -> u8 {
        self.requested.bits() | 0xE0
    }

    #[inline]
    pub fn write_if(&mut self, value: u8) {
        self.requested = InterruptFlags::from_bits_truncate(value);
    }

    #[inline]
    pub fn read_ie(&self) -> u8 {
        self.enabled
    }

    #[inline]
    pub fn write_ie(&mut self, value: u8) {
        self.enabled = value;
    }
}
