//! Scanline PPU.
//!
//! A four-mode timing state machine (OAM scan, drawing, HBlank, VBlank)
//! advanced one T-cycle per `tick`. Each visible line is rendered in one
//! go when drawing ends: background, then window, then sprites.

mod background;
mod registers;
mod sprites;
mod window;

pub use registers::{LcdControl, LcdRegisters, LcdStatus};

use anyhow::{ensure, Result};

use super::video::FrameBuffer;
use crate::interrupts::Interrupt;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub(crate) const LINE_CYCLES: u32 = 456;
pub(crate) const OAM_SCAN_CYCLES: u32 = 80;
pub(crate) const BASE_DRAWING_CYCLES: u32 = 172;
pub(crate) const SPRITE_PENALTY_CYCLES: u32 = 6;
pub(crate) const VBLANK_START_LINE: u8 = 144;
pub(crate) const LAST_LINE: u8 = 153;
pub(crate) const MAX_SPRITES_PER_LINE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PpuMode {
    #[default]
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Drawing = 3,
}

impl PpuMode {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => PpuMode::HBlank,
            1 => PpuMode::VBlank,
            2 => PpuMode::OamScan,
            _ => PpuMode::Drawing,
        }
    }
}

/// What the PPU needs from the rest of the machine: raw VRAM/OAM reads,
/// the LCD registers and a way to raise interrupts.
pub(crate) trait VideoPort {
    /// VRAM byte at `offset` (0x0000-0x1FFF), ignoring CPU access rules.
    fn vram(&self, offset: u16) -> u8;
    /// OAM byte at `offset` (0x00-0x9F), ignoring CPU access rules.
    fn oam(&self, offset: u8) -> u8;
    fn lcd(&self) -> &LcdRegisters;
    fn lcd_mut(&mut self) -> &mut LcdRegisters;
    fn request_interrupt(&mut self, interrupt: Interrupt);
}

/// Timing and frame state owned by the PPU.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PpuState {
    pub mode: PpuMode,
    pub cycles_remaining: u32,
    pub drawing_cycles: u32,
    pub lcd_was_enabled: bool,
    pub window_line: u8,
    pub pixels: Vec<u8>,
}

pub(crate) struct Ppu {
    mode: PpuMode,
    cycles_remaining: u32,
    drawing_cycles: u32,
    lcd_was_enabled: bool,
    /// Window row to fetch next; only advances on lines where the window
    /// was actually drawn.
    window_line: u8,
    frame: FrameBuffer,
    /// Background/window color ids of the line being rendered, consulted
    /// for sprite background priority.
    line_ids: [u8; SCREEN_WIDTH],
}

impl Ppu {
    pub(crate) fn new() -> Self {
        Self {
            mode: PpuMode::HBlank,
            cycles_remaining: 0,
            drawing_cycles: BASE_DRAWING_CYCLES,
            lcd_was_enabled: false,
            window_line: 0,
            frame: FrameBuffer::default(),
            line_ids: [0; SCREEN_WIDTH],
        }
    }

    /// Start at OAM scan of line 0 if the LCD is on, matching the state
    /// right after the boot ROM hands over.
    pub(crate) fn power_on<P: VideoPort>(&mut self, port: &mut P) {
        *self = Self::new();
        port.lcd_mut().ly = 0;
        if port.lcd().control().contains(LcdControl::LCD_ENABLE) {
            self.lcd_was_enabled = true;
            self.enter_mode(port, PpuMode::OamScan);
        } else {
            self.set_mode_bits(port, PpuMode::HBlank);
        }
    }

    #[inline]
    pub(crate) fn mode(&self) -> PpuMode {
        self.mode
    }

    #[inline]
    pub(crate) fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Advance by one T-cycle. Returns `true` exactly when line 143 has
    /// finished drawing, i.e. once per frame.
    pub(crate) fn tick<P: VideoPort>(&mut self, port: &mut P) -> bool {
        let enabled = port.lcd().control().contains(LcdControl::LCD_ENABLE);
        if !enabled {
            if self.lcd_was_enabled {
                self.disable(port);
            }
            return false;
        }

        if !self.lcd_was_enabled {
            log::debug!("GB PPU: LCD enabled");
            self.lcd_was_enabled = true;
            self.window_line = 0;
            self.set_ly(port, 0);
            self.enter_mode(port, PpuMode::OamScan);
        }

        self.cycles_remaining = self.cycles_remaining.saturating_sub(1);
        if self.cycles_remaining > 0 {
            return false;
        }
        self.advance(port)
    }

    fn disable<P: VideoPort>(&mut self, port: &mut P) {
        log::debug!("GB PPU: LCD disabled at LY={}", port.lcd().ly);
        self.lcd_was_enabled = false;
        self.mode = PpuMode::HBlank;
        self.cycles_remaining = 0;
        self.window_line = 0;
        let regs = port.lcd_mut();
        regs.ly = 0;
        regs.stat &= !(0x03 | LcdStatus::COINCIDENCE.bits());
    }

    fn advance<P: VideoPort>(&mut self, port: &mut P) -> bool {
        let ly = port.lcd().ly;
        match self.mode {
            PpuMode::OamScan => {
                self.enter_mode(port, PpuMode::Drawing);
                false
            }
            PpuMode::Drawing => {
                self.render_scanline(port, ly);
                self.enter_mode(port, PpuMode::HBlank);
                let frame_ready = ly == VBLANK_START_LINE - 1;
                if frame_ready {
                    log::trace!("GB PPU: frame ready");
                }
                frame_ready
            }
            PpuMode::HBlank => {
                let next = ly.wrapping_add(1);
                self.set_ly(port, next);
                if next == VBLANK_START_LINE {
                    self.enter_mode(port, PpuMode::VBlank);
                } else {
                    self.enter_mode(port, PpuMode::OamScan);
                }
                false
            }
            PpuMode::VBlank => {
                if ly >= LAST_LINE {
                    self.window_line = 0;
                    self.set_ly(port, 0);
                    self.enter_mode(port, PpuMode::OamScan);
                } else {
                    self.set_ly(port, ly + 1);
                    self.cycles_remaining = LINE_CYCLES;
                }
                false
            }
        }
    }

    fn enter_mode<P: VideoPort>(&mut self, port: &mut P, mode: PpuMode) {
        self.mode = mode;
        self.cycles_remaining = match mode {
            PpuMode::OamScan => {
                let count = self.count_line_sprites(port, port.lcd().ly) as u32;
                self.drawing_cycles = BASE_DRAWING_CYCLES + SPRITE_PENALTY_CYCLES * count;
                OAM_SCAN_CYCLES
            }
            PpuMode::Drawing => self.drawing_cycles,
            PpuMode::HBlank => {
                (LINE_CYCLES - OAM_SCAN_CYCLES).saturating_sub(self.drawing_cycles)
            }
            PpuMode::VBlank => LINE_CYCLES,
        };
        self.set_mode_bits(port, mode);

        let status = port.lcd().status();
        let stat_source = match mode {
            PpuMode::HBlank => LcdStatus::HBLANK_INTERRUPT,
            PpuMode::VBlank => LcdStatus::VBLANK_INTERRUPT,
            PpuMode::OamScan => LcdStatus::OAM_INTERRUPT,
            PpuMode::Drawing => LcdStatus::empty(),
        };
        if mode == PpuMode::VBlank {
            port.request_interrupt(Interrupt::VBlank);
        }
        if !stat_source.is_empty() && status.contains(stat_source) {
            port.request_interrupt(Interrupt::Stat);
        }
        self.update_coincidence(port);
    }

    fn set_mode_bits<P: VideoPort>(&self, port: &mut P, mode: PpuMode) {
        let regs = port.lcd_mut();
        regs.stat = (regs.stat & !0x03) | mode as u8;
    }

    fn set_ly<P: VideoPort>(&mut self, port: &mut P, ly: u8) {
        port.lcd_mut().ly = ly;
        self.update_coincidence(port);
    }

    /// Refresh STAT bit 2 and raise STAT on a false-to-true transition when
    /// the LYC source is enabled.
    fn update_coincidence<P: VideoPort>(&self, port: &mut P) {
        let regs = port.lcd_mut();
        let was = regs.status().contains(LcdStatus::COINCIDENCE);
        let now = regs.ly == regs.lyc;
        if now {
            regs.stat |= LcdStatus::COINCIDENCE.bits();
        } else {
            regs.stat &= !LcdStatus::COINCIDENCE.bits();
        }
        if now && !was && regs.status().contains(LcdStatus::LYC_INTERRUPT) {
            port.request_interrupt(Interrupt::Stat);
        }
    }

    fn render_scanline<P: VideoPort>(&mut self, port: &P, ly: u8) {
        self.render_background(port, ly);
        self.render_window(port, ly);
        self.render_sprites(port, ly);
    }

    pub(crate) fn state(&self) -> PpuState {
        PpuState {
            mode: self.mode,
            cycles_remaining: self.cycles_remaining,
            drawing_cycles: self.drawing_cycles,
            lcd_was_enabled: self.lcd_was_enabled,
            window_line: self.window_line,
            pixels: self.frame.pixels().to_vec(),
        }
    }

    pub(crate) fn validate_state(state: &PpuState) -> Result<()> {
        let expected = SCREEN_WIDTH * SCREEN_HEIGHT;
        ensure!(
            state.pixels.len() == expected,
            "frame buffer is {} pixels in save state, expected {expected}",
            state.pixels.len()
        );
        ensure!(
            state.cycles_remaining <= LINE_CYCLES,
            "PPU cycle countdown {} exceeds a scanline",
            state.cycles_remaining
        );
        let max_drawing =
            BASE_DRAWING_CYCLES + SPRITE_PENALTY_CYCLES * MAX_SPRITES_PER_LINE as u32;
        ensure!(
            (BASE_DRAWING_CYCLES..=max_drawing).contains(&state.drawing_cycles),
            "PPU drawing length {} outside {BASE_DRAWING_CYCLES}..={max_drawing}",
            state.drawing_cycles
        );
        Ok(())
    }

    /// Caller runs `validate_state` first.
    pub(crate) fn set_state(&mut self, state: &PpuState) {
        self.mode = state.mode;
        self.cycles_remaining = state.cycles_remaining;
        self.drawing_cycles = state.drawing_cycles;
        self.lcd_was_enabled = state.lcd_was_enabled;
        self.window_line = state.window_line;
        self.frame.load(&state.pixels);
    }
}

/// VRAM offset of a tile's first byte under the current LCDC addressing.
///
/// Unsigned mode indexes from 0x8000; signed mode treats the index as
/// an `i8` relative to 0x9000.
#[inline]
fn tile_data_offset(lcdc: LcdControl, tile_index: u8) -> u16 {
    if lcdc.contains(LcdControl::TILE_DATA_UNSIGNED) {
        tile_index as u16 * 16
    } else {
        (0x1000i32 + tile_index as i8 as i32 * 16) as u16
    }
}

/// Two-bit color id of pixel (`col`, `row`) of the tile starting at
/// `tile_offset`. Rows past 7 run into the following tile, which is what
/// 8x16 sprites rely on.
#[inline]
fn tile_color_id<P: VideoPort>(port: &P, tile_offset: u16, row: u8, col: u8) -> u8 {
    let row_offset = tile_offset.wrapping_add(row as u16 * 2);
    let lo = port.vram(row_offset);
    let hi = port.vram(row_offset.wrapping_add(1));
    let bit = 7 - (col & 7);
    (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1)
}

/// Color id at (`x`, `y`) of the 256x256 background plane selected by
/// `map_base` (VRAM offset 0x1800 or 0x1C00).
#[inline]
fn map_color_id<P: VideoPort>(port: &P, lcdc: LcdControl, map_base: u16, x: u8, y: u8) -> u8 {
    let map_offset = map_base + (y as u16 / 8) * 32 + x as u16 / 8;
    let tile_index = port.vram(map_offset);
    tile_color_id(port, tile_data_offset(lcdc, tile_index), y & 7, x & 7)
}

#[inline]
fn palette_shade(palette: u8, color_id: u8) -> u8 {
    (palette >> (color_id * 2)) & 0x03
}

#[cfg(test)]
mod tests;
