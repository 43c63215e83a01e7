use super::{ram_banks, Mapper, RAM_BANK_SIZE, ROM_BANK_SIZE};

/// MBC1 bank registers and external RAM.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mbc1State {
    pub ram: Vec<u8>,
    pub rom_bank_low5: u8,
    pub rom_bank_high2: u8,
    pub ram_enable: bool,
    pub banking_mode: u8,
}

/// MBC1: up to 2 MiB ROM and 32 KiB RAM.
///
/// In mode 0 the high register only extends the switchable ROM bank. In
/// mode 1 it also selects the RAM bank and the bank mapped at
/// 0x0000-0x3FFF.
pub(in super::super) struct Mbc1 {
    rom: Vec<u8>,
    ram: Vec<u8>,
    num_rom_banks: usize,
    num_ram_banks: usize,
    rom_bank_low5: u8,
    rom_bank_high2: u8,
    ram_enable: bool,
    banking_mode: u8,
}

impl Mbc1 {
    pub(super) fn new(rom: &[u8]) -> Self {
        let num_ram_banks = ram_banks(rom);
        Self {
            rom: rom.to_vec(),
            ram: vec![0xFF; num_ram_banks * RAM_BANK_SIZE],
            num_rom_banks: (rom.len() / ROM_BANK_SIZE).max(1),
            num_ram_banks,
            rom_bank_low5: 1,
            rom_bank_high2: 0,
            ram_enable: false,
            banking_mode: 0,
        }
    }

    fn rom_bank(&self, addr: u16) -> usize {
        let high = (self.rom_bank_high2 as usize) << 5;
        let bank = if addr < 0x4000 {
            if self.banking_mode == 1 {
                high
            } else {
                0
            }
        } else {
            high | self.rom_bank_low5 as usize
        };
        bank % self.num_rom_banks
    }

    fn ram_offset(&self, addr: u16) -> Option<usize> {
        if !self.ram_enable || self.num_ram_banks == 0 {
            return None;
        }
        let bank = if self.banking_mode == 1 {
            self.rom_bank_high2 as usize % self.num_ram_banks
        } else {
            0
        };
        Some(bank * RAM_BANK_SIZE + (addr as usize & 0x1FFF))
    }

    pub(super) fn state(&self) -> Mbc1State {
        Mbc1State {
            ram: self.ram.clone(),
            rom_bank_low5: self.rom_bank_low5,
            rom_bank_high2: self.rom_bank_high2,
            ram_enable: self.ram_enable,
            banking_mode: self.banking_mode,
        }
    }

    #[inline]
    pub(super) fn ram_len(&self) -> usize {
        self.ram.len()
    }

    pub(super) fn set_state(&mut self, state: &Mbc1State) {
        self.ram.copy_from_slice(&state.ram);
        self.rom_bank_low5 = state.rom_bank_low5 & 0x1F;
        self.rom_bank_high2 = state.rom_bank_high2 & 0x03;
        self.ram_enable = state.ram_enable;
        self.banking_mode = state.banking_mode & 0x01;
    }
}

impl Mapper for Mbc1 {
    fn read_rom(&self, addr: u16) -> u8 {
        let index = self.rom_bank(addr) * ROM_BANK_SIZE + (addr as usize & 0x3FFF);
        self.rom.get(index).copied().unwrap_or(0xFF)
    }

    fn write_rom(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                self.rom_bank_low5 = value & 0x1F;
                if self.rom_bank_low5 == 0 {
                    self.rom_bank_low5 = 1;
                }
            }
            0x4000..=0x5FFF => self.rom_bank_high2 = value & 0x03,
            0x6000..=0x7FFF => self.banking_mode = value & 0x01,
            _ => {}
        }
    }

    fn read_ram(&self, addr: u16) -> u8 {
        self.ram_offset(addr)
            .and_then(|i| self.ram.get(i).copied())
            .unwrap_or(0xFF)
    }

    fn write_ram(&mut self, addr: u16, value: u8) {
        if let Some(slot) = self.ram_offset(addr).and_then(|i| self.ram.get_mut(i)) {
            *slot = value;
        }
    }
}
