use std::rc::Rc;

use super::rtc::{Rtc, RtcClock, RtcState};
use super::{ram_banks, Mapper, RAM_BANK_SIZE, ROM_BANK_SIZE};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mbc3State {
    pub ram: Vec<u8>,
    pub rom_bank: u8,
    pub ram_rtc_select: u8,
    pub ram_enable: bool,
    pub rtc: RtcState,
}

/// MBC3: 7-bit ROM banking, four RAM banks and, on timer carts, a
/// real-time clock mapped into the RAM window via selects 0x08-0x0C.
pub(in super::super) struct Mbc3 {
    rom: Vec<u8>,
    ram: Vec<u8>,
    num_rom_banks: usize,
    num_ram_banks: usize,
    rom_bank: u8,
    ram_rtc_select: u8,
    ram_enable: bool,
    has_rtc: bool,
    rtc: Rtc,
    clock: Rc<dyn RtcClock>,
}

impl Mbc3 {
    pub(super) fn new(rom: &[u8], has_rtc: bool, clock: Rc<dyn RtcClock>) -> Self {
        let num_ram_banks = ram_banks(rom);
        Self {
            rom: rom.to_vec(),
            ram: vec![0xFF; num_ram_banks * RAM_BANK_SIZE],
            num_rom_banks: (rom.len() / ROM_BANK_SIZE).max(1),
            num_ram_banks,
            rom_bank: 1,
            ram_rtc_select: 0,
            ram_enable: false,
            has_rtc,
            rtc: Rtc::new(clock.now_secs()),
            clock,
        }
    }

    fn ram_offset(&self, addr: u16) -> Option<usize> {
        let bank = self.ram_rtc_select as usize;
        if bank > 0x03 || bank >= self.num_ram_banks {
            return None;
        }
        Some(bank * RAM_BANK_SIZE + (addr as usize & 0x1FFF))
    }

    #[inline]
    fn rtc_selected(&self) -> bool {
        self.has_rtc && (0x08..=0x0C).contains(&self.ram_rtc_select)
    }

    pub(super) fn state(&self) -> Mbc3State {
        Mbc3State {
            ram: self.ram.clone(),
            rom_bank: self.rom_bank,
            ram_rtc_select: self.ram_rtc_select,
            ram_enable: self.ram_enable,
            rtc: self.rtc.state(),
        }
    }

    #[inline]
    pub(super) fn ram_len(&self) -> usize {
        self.ram.len()
    }

    pub(super) fn set_state(&mut self, state: &Mbc3State) {
        self.ram.copy_from_slice(&state.ram);
        self.rom_bank = state.rom_bank & 0x7F;
        self.ram_rtc_select = state.ram_rtc_select;
        self.ram_enable = state.ram_enable;
        self.rtc.set_state(&state.rtc);
    }
}

impl Mapper for Mbc3 {
    fn read_rom(&self, addr: u16) -> u8 {
        let bank = if addr < 0x4000 {
            0
        } else {
            self.rom_bank as usize % self.num_rom_banks
        };
        let index = bank * ROM_BANK_SIZE + (addr as usize & 0x3FFF);
        self.rom.get(index).copied().unwrap_or(0xFF)
    }

    fn write_rom(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                self.rom_bank = value & 0x7F;
                if self.rom_bank == 0 {
                    self.rom_bank = 1;
                }
            }
            0x4000..=0x5FFF => self.ram_rtc_select = value,
            0x6000..=0x7FFF => {
                if self.has_rtc {
                    let now = self.clock.now_secs();
                    self.rtc.write_latch(value, now);
                }
            }
            _ => {}
        }
    }

    fn read_ram(&self, addr: u16) -> u8 {
        if !self.ram_enable {
            return 0xFF;
        }
        if self.rtc_selected() {
            return self.rtc.read(self.ram_rtc_select);
        }
        self.ram_offset(addr)
            .and_then(|i| self.ram.get(i).copied())
            .unwrap_or(0xFF)
    }

    fn write_ram(&mut self, addr: u16, value: u8) {
        if !self.ram_enable {
            return;
        }
        if self.rtc_selected() {
            let now = self.clock.now_secs();
            self.rtc.write(self.ram_rtc_select, value, now);
            return;
        }
        if let Some(slot) = self.ram_offset(addr).and_then(|i| self.ram.get_mut(i)) {
            *slot = value;
        }
    }
}
