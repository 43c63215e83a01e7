use super::super::config::VramAccess;
use super::super::ppu::{LcdControl, PpuMode};
use super::SystemBus;

impl SystemBus {
    /// PPU mode from STAT, or `None` while the LCD is off.
    fn active_mode(&self) -> Option<PpuMode> {
        if self.lcd.control().contains(LcdControl::LCD_ENABLE) {
            Some(PpuMode::from_bits(self.lcd.mode_bits()))
        } else {
            None
        }
    }

    /// VRAM is locked during mode 3 unless the machine runs with
    /// `VramAccess::Open`.
    pub(super) fn vram_accessible(&self) -> bool {
        match self.vram_access {
            VramAccess::Open => true,
            VramAccess::Blocked => self.active_mode() != Some(PpuMode::Drawing),
        }
    }

    /// OAM is locked in modes 2 and 3 and for the whole of an OAM DMA.
    pub(super) fn oam_accessible(&self) -> bool {
        if self.dma_active() {
            return false;
        }
        !matches!(self.active_mode(), Some(PpuMode::OamScan | PpuMode::Drawing))
    }
}
