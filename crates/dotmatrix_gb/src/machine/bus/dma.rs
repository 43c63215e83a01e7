use super::{SystemBus, OAM_SIZE, WRAM_SIZE};

/// T-cycles an OAM DMA keeps OAM locked.
pub(crate) const DMA_CYCLES: u32 = 160;

impl SystemBus {
    /// OAM DMA from `value`00..`value`9F into FE00..FE9F.
    ///
    /// The bytes are copied at once; the transfer then holds OAM for
    /// `DMA_CYCLES` so the CPU sees the same lockout as on hardware.
    pub(super) fn start_oam_dma(&mut self, value: u8) {
        let base = (value as u16) << 8;
        for i in 0..OAM_SIZE {
            self.oam[i] = self.dma_source_read(base.wrapping_add(i as u16));
        }
        self.dma_cycles_remaining = DMA_CYCLES;
        log::trace!("GB DMA: OAM transfer from {base:#06X}");
    }

    /// DMA reads ignore PPU access locks. Sources at E000 and above land
    /// in work RAM.
    fn dma_source_read(&self, addr: u16) -> u8 {
        match addr {
            0x8000..=0x9FFF => self.vram[(addr - 0x8000) as usize],
            0xE000..=0xFFFF => self.wram[(addr as usize - 0xE000) & (WRAM_SIZE - 1)],
            _ => self.read(addr),
        }
    }

    #[inline]
    pub(super) fn dma_active(&self) -> bool {
        self.dma_cycles_remaining > 0
    }

    #[inline]
    pub(super) fn tick_dma(&mut self) {
        self.dma_cycles_remaining = self.dma_cycles_remaining.saturating_sub(1);
    }
}
