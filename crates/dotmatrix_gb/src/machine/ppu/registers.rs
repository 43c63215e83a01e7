use bitflags::bitflags;

bitflags! {
    /// LCDC (0xFF40).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        const BG_ENABLE = 0x01;
        const OBJ_ENABLE = 0x02;
        const OBJ_TALL = 0x04;
        const BG_TILE_MAP = 0x08;
        const TILE_DATA_UNSIGNED = 0x10;
        const WINDOW_ENABLE = 0x20;
        const WINDOW_TILE_MAP = 0x40;
        const LCD_ENABLE = 0x80;
    }
}

bitflags! {
    /// Writable and flag bits of STAT (0xFF41). Bits 0-1 hold the mode.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LcdStatus: u8 {
        const COINCIDENCE = 0x04;
        const HBLANK_INTERRUPT = 0x08;
        const VBLANK_INTERRUPT = 0x10;
        const OAM_INTERRUPT = 0x20;
        const LYC_INTERRUPT = 0x40;

        const _ = !0;
    }
}

/// LCD I/O registers 0xFF40-0xFF4B.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LcdRegisters {
    pub lcdc: u8,
    pub stat: u8,
    pub scy: u8,
    pub scx: u8,
    pub ly: u8,
    pub lyc: u8,
    pub dma: u8,
    pub bgp: u8,
    pub obp0: u8,
    pub obp1: u8,
    pub wy: u8,
    pub wx: u8,
}

impl LcdRegisters {
    /// Values the DMG boot ROM leaves behind.
    pub(crate) fn power_on() -> Self {
        Self {
            lcdc: 0x91,
            stat: 0x85,
            dma: 0xFF,
            bgp: 0xFC,
            ..Self::default()
        }
    }

    #[inline]
    pub fn control(&self) -> LcdControl {
        LcdControl::from_bits_retain(self.lcdc)
    }

    #[inline]
    pub fn status(&self) -> LcdStatus {
        LcdStatus::from_bits_retain(self.stat)
    }

    /// PPU mode as reported in STAT bits 0-1.
    #[inline]
    pub fn mode_bits(&self) -> u8 {
        self.stat & 0x03
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF40 => self.lcdc,
            // Bit 7 is unused and reads as 1.
            0xFF41 => self.stat | 0x80,
            0xFF42 => self.scy,
            0xFF43 => self.scx,
            0xFF44 => self.ly,
            0xFF45 => self.lyc,
            0xFF46 => self.dma,
            0xFF47 => self.bgp,
            0xFF48 => self.obp0,
            0xFF49 => self.obp1,
            0xFF4A => self.wy,
            0xFF4B => self.wx,
            _ => 0xFF,
        }
    }

    /// Recompute STAT bit 2 against the current LY. With the LCD off the
    /// flag stays as the PPU left it.
    fn refresh_coincidence(&mut self) {
        if !self.control().contains(LcdControl::LCD_ENABLE) {
            return;
        }
        if self.ly == self.lyc {
            self.stat |= LcdStatus::COINCIDENCE.bits();
        } else {
            self.stat &= !LcdStatus::COINCIDENCE.bits();
        }
    }

    /// CPU write. STAT keeps its read-only low three bits and LY writes
    /// reset the line counter. 0xFF46 only latches the value here; the bus
    /// starts the transfer.
    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF40 => self.lcdc = value,
            0xFF41 => self.stat = (self.stat & 0x07) | (value & 0xF8),
            0xFF42 => self.scy = value,
            0xFF43 => self.scx = value,
            0xFF44 => {
                self.ly = 0;
                self.refresh_coincidence();
            }
            0xFF45 => self.lyc = value,
            0xFF46 => self.dma = value,
            0xFF47 => self.bgp = value,
            0xFF48 => self.obp0 = value,
            0xFF49 => self.obp1 = value,
            0xFF4A => self.wy = value,
            0xFF4B => self.wx = value,
            _ => {}
        }
    }
}
