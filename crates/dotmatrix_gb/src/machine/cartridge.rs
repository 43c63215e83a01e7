mod mbc1;
mod mbc3;
mod rom_only;
mod rtc;

use std::rc::Rc;

use anyhow::{bail, ensure, Result};

pub use mbc1::Mbc1State;
pub use mbc3::Mbc3State;
pub use rtc::{FixedClock, RtcClock, RtcRegisters, RtcState, SystemClock};

use mbc1::Mbc1;
use mbc3::Mbc3;
use rom_only::RomOnly;

pub(crate) const ROM_BANK_SIZE: usize = 0x4000;
pub(crate) const RAM_BANK_SIZE: usize = 0x2000;

const HEADER_END: usize = 0x0150;
const CARTRIDGE_TYPE: usize = 0x0147;
const RAM_SIZE: usize = 0x0149;

/// Narrow view the bus has of a cartridge: the ROM window at
/// 0x0000-0x7FFF (where writes hit mapper registers) and external RAM at
/// 0xA000-0xBFFF.
pub trait Mapper {
    fn read_rom(&self, addr: u16) -> u8;
    fn write_rom(&mut self, addr: u16, value: u8);
    fn read_ram(&self, addr: u16) -> u8;
    fn write_ram(&mut self, addr: u16, value: u8);
}

/// Number of 8 KiB RAM banks announced by header byte 0x0149. The 2 KiB
/// size is rounded up to a full bank.
fn ram_banks(rom: &[u8]) -> usize {
    match rom.get(RAM_SIZE).copied().unwrap_or(0) {
        0x01 | 0x02 => 1,
        0x03 => 4,
        0x04 => 16,
        0x05 => 8,
        _ => 0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartridgeKind {
    RomOnly,
    Mbc1,
    Mbc3,
}

/// Mapper-specific part of a save state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartridgeState {
    RomOnly { ram: Vec<u8> },
    Mbc1(Mbc1State),
    Mbc3(Mbc3State),
}

impl CartridgeState {
    pub fn kind(&self) -> CartridgeKind {
        match self {
            CartridgeState::RomOnly { .. } => CartridgeKind::RomOnly,
            CartridgeState::Mbc1(_) => CartridgeKind::Mbc1,
            CartridgeState::Mbc3(_) => CartridgeKind::Mbc3,
        }
    }

    fn ram_len(&self) -> usize {
        match self {
            CartridgeState::RomOnly { ram } => ram.len(),
            CartridgeState::Mbc1(s) => s.ram.len(),
            CartridgeState::Mbc3(s) => s.ram.len(),
        }
    }
}

/// The supported mappers, chosen once from the ROM header.
pub(super) enum Cartridge {
    RomOnly(RomOnly),
    Mbc1(Mbc1),
    Mbc3(Mbc3),
}

impl Cartridge {
    /// No cartridge inserted: every read returns 0xFF.
    pub(crate) fn empty() -> Self {
        Self::RomOnly(RomOnly::new(&[]))
    }

    pub(crate) fn from_rom(rom: &[u8], clock: Rc<dyn RtcClock>) -> Result<Self> {
        ensure!(
            rom.len() >= HEADER_END,
            "ROM is {} bytes, too short to hold a cartridge header",
            rom.len()
        );

        let cart_type = rom[CARTRIDGE_TYPE];
        let cartridge = match cart_type {
            0x00 | 0x08 | 0x09 => Self::RomOnly(RomOnly::new(rom)),
            0x01..=0x03 => Self::Mbc1(Mbc1::new(rom)),
            0x0F | 0x10 => Self::Mbc3(Mbc3::new(rom, true, clock)),
            0x11..=0x13 => Self::Mbc3(Mbc3::new(rom, false, clock)),
            other => {
                log::warn!("GB cartridge: unsupported type {other:#04X}, mapping as ROM only");
                Self::RomOnly(RomOnly::new(rom))
            }
        };
        log::info!(
            "GB cartridge: type {cart_type:#04X} -> {:?}, {} KiB ROM, {} RAM banks",
            cartridge.kind(),
            rom.len() / 1024,
            ram_banks(rom)
        );
        Ok(cartridge)
    }

    pub(crate) fn kind(&self) -> CartridgeKind {
        match self {
            Cartridge::RomOnly(_) => CartridgeKind::RomOnly,
            Cartridge::Mbc1(_) => CartridgeKind::Mbc1,
            Cartridge::Mbc3(_) => CartridgeKind::Mbc3,
        }
    }

    fn ram_len(&self) -> usize {
        match self {
            Cartridge::RomOnly(m) => m.ram().len(),
            Cartridge::Mbc1(m) => m.ram_len(),
            Cartridge::Mbc3(m) => m.ram_len(),
        }
    }

    pub(crate) fn state(&self) -> CartridgeState {
        match self {
            Cartridge::RomOnly(m) => CartridgeState::RomOnly {
                ram: m.ram().to_vec(),
            },
            Cartridge::Mbc1(m) => CartridgeState::Mbc1(m.state()),
            Cartridge::Mbc3(m) => CartridgeState::Mbc3(m.state()),
        }
    }

    /// Check that `state` was captured from the same kind of mapper with
    /// the same RAM size.
    pub(crate) fn validate_state(&self, state: &CartridgeState) -> Result<()> {
        if state.kind() != self.kind() {
            bail!(
                "save state is for a {:?} cartridge, loaded cartridge is {:?}",
                state.kind(),
                self.kind()
            );
        }
        ensure!(
            state.ram_len() == self.ram_len(),
            "cartridge RAM is {} bytes in save state, expected {}",
            state.ram_len(),
            self.ram_len()
        );
        Ok(())
    }

    /// Caller runs `validate_state` first.
    pub(crate) fn set_state(&mut self, state: &CartridgeState) {
        match (self, state) {
            (Cartridge::RomOnly(m), CartridgeState::RomOnly { ram }) => m.set_ram(ram),
            (Cartridge::Mbc1(m), CartridgeState::Mbc1(s)) => m.set_state(s),
            (Cartridge::Mbc3(m), CartridgeState::Mbc3(s)) => m.set_state(s),
            _ => {}
        }
    }
}

impl Mapper for Cartridge {
    fn read_rom(&self, addr: u16) -> u8 {
        match self {
            Cartridge::RomOnly(m) => m.read_rom(addr),
            Cartridge::Mbc1(m) => m.read_rom(addr),
            Cartridge::Mbc3(m) => m.read_rom(addr),
        }
    }

    fn write_rom(&mut self, addr: u16, value: u8) {
        match self {
            Cartridge::RomOnly(m) => m.write_rom(addr, value),
            Cartridge::Mbc1(m) => m.write_rom(addr, value),
            Cartridge::Mbc3(m) => m.write_rom(addr, value),
        }
    }

    fn read_ram(&self, addr: u16) -> u8 {
        match self {
            Cartridge::RomOnly(m) => m.read_ram(addr),
            Cartridge::Mbc1(m) => m.read_ram(addr),
            Cartridge::Mbc3(m) => m.read_ram(addr),
        }
    }

    fn write_ram(&mut self, addr: u16, value: u8) {
        match self {
            Cartridge::RomOnly(m) => m.write_ram(addr, value),
            Cartridge::Mbc1(m) => m.write_ram(addr, value),
            Cartridge::Mbc3(m) => m.write_ram(addr, value),
        }
    }
}
