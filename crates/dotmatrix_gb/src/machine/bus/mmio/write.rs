use super::super::super::cartridge::Mapper;
use super::super::SystemBus;
use crate::interrupts::Interrupt;

impl SystemBus {
    /// CPU-visible write, honoring the PPU and DMA access locks.
    pub(in super::super) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // Mapper registers.
            0x0000..=0x7FFF => self.cartridge.write_rom(addr, value),

            0x8000..=0x9FFF => {
                if self.vram_accessible() {
                    self.vram[(addr - 0x8000) as usize] = value;
                }
            }

            0xA000..=0xBFFF => self.cartridge.write_ram(addr, value),

            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize] = value,
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize] = value,

            0xFE00..=0xFE9F => {
                if self.oam_accessible() {
                    self.oam[(addr - 0xFE00) as usize] = value;
                }
            }

            0xFEA0..=0xFEFF => {}

            0xFF00 => self.joypad.write(value),
            0xFF01 => self.serial.write_sb(value),
            0xFF02 => {
                if self.serial.write_sc(value) {
                    self.interrupts.request(Interrupt::Serial);
                }
            }
            0xFF04..=0xFF07 => self.timer.write(addr, value),
            0xFF0F => self.interrupts.write_if(value),

            0xFF46 => {
                self.lcd.write(addr, value);
                self.start_oam_dma(value);
            }
            0xFF40..=0xFF4B => self.lcd.write(addr, value),

            0xFF03 | 0xFF08..=0xFF0E | 0xFF10..=0xFF3F | 0xFF4C..=0xFF7F => {
                self.io[(addr - 0xFF00) as usize] = value;
            }

            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = value,
            0xFFFF => self.interrupts.write_ie(value),
        }
    }
}
