use super::{ram_banks, Mapper, RAM_BANK_SIZE};

/// 32 KiB of fixed ROM and, if the header asks for it, one unbanked RAM
/// bank. Writes to the ROM range are ignored.
pub(in super::super) struct RomOnly {
    rom: Vec<u8>,
    ram: Vec<u8>,
}

impl RomOnly {
    pub(super) fn new(rom: &[u8]) -> Self {
        let ram_len = ram_banks(rom).min(1) * RAM_BANK_SIZE;
        Self {
            rom: rom.to_vec(),
            ram: vec![0xFF; ram_len],
        }
    }

    pub(super) fn ram(&self) -> &[u8] {
        &self.ram
    }

    pub(super) fn set_ram(&mut self, ram: &[u8]) {
        self.ram.copy_from_slice(ram);
    }
}

impl Mapper for RomOnly {
    fn read_rom(&self, addr: u16) -> u8 {
        self.rom.get(addr as usize).copied().unwrap_or(0xFF)
    }

    fn write_rom(&mut self, _addr: u16, _value: u8) {}

    fn read_ram(&self, addr: u16) -> u8 {
        self.ram.get(addr as usize & 0x1FFF).copied().unwrap_or(0xFF)
    }

    fn write_ram(&mut self, addr: u16, value: u8) {
        if let Some(slot) = self.ram.get_mut(addr as usize & 0x1FFF) {
            *slot = value;
        }
    }
}
