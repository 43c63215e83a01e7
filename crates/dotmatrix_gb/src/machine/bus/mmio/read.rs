use super::super::super::cartridge::Mapper;
use super::super::SystemBus;

impl SystemBus {
    /// CPU-visible read, honoring the PPU and DMA access locks.
    pub(in super::super) fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.cartridge.read_rom(addr),

            0x8000..=0x9FFF => {
                if self.vram_accessible() {
                    self.vram[(addr - 0x8000) as usize]
                } else {
                    0xFF
                }
            }

            0xA000..=0xBFFF => self.cartridge.read_ram(addr),

            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize],

            // Echo RAM mirrors C000..DDFF.
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize],

            0xFE00..=0xFE9F => {
                if self.oam_accessible() {
                    self.oam[(addr - 0xFE00) as usize]
                } else {
                    0xFF
                }
            }

            0xFEA0..=0xFEFF => 0xFF,

            0xFF00 => self.joypad.read(),
            0xFF01 => self.serial.sb,
            0xFF02 => self.serial.read_sc(),
            0xFF04..=0xFF07 => self.timer.read(addr),
            0xFF0F => self.interrupts.read_if(),
            0xFF40..=0xFF4B => self.lcd.read(addr),
            0xFF03 | 0xFF08..=0xFF0E | 0xFF10..=0xFF3F | 0xFF4C..=0xFF7F => {
                self.io[(addr - 0xFF00) as usize]
            }

            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],
            0xFFFF => self.interrupts.read_ie(),
        }
    }
}
