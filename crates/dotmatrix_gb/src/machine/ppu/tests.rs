use super::*;
use crate::machine::FRAME_CYCLES;

struct FakeVideo {
    vram: [u8; 0x2000],
    oam: [u8; 0xA0],
    lcd: LcdRegisters,
    requested: Vec<Interrupt>,
}

impl FakeVideo {
    fn new(lcdc: u8) -> Self {
        Self {
            vram: [0; 0x2000],
            oam: [0; 0xA0],
            lcd: LcdRegisters {
                lcdc,
                bgp: 0xE4,
                obp0: 0xE4,
                obp1: 0x40,
                ..LcdRegisters::default()
            },
            requested: Vec::new(),
        }
    }

    fn count(&self, interrupt: Interrupt) -> usize {
        self.requested.iter().filter(|&&i| i == interrupt).count()
    }

    /// Fill all eight rows of `tile` (unsigned addressing) with one pattern.
    fn solid_tile(&mut self, tile: u16, lo: u8, hi: u8) {
        for row in 0..8 {
            self.tile_row(tile, row, lo, hi);
        }
    }

    fn tile_row(&mut self, tile: u16, row: u16, lo: u8, hi: u8) {
        let base = (tile * 16 + row * 2) as usize;
        self.vram[base] = lo;
        self.vram[base + 1] = hi;
    }

    fn sprite(&mut self, index: usize, y: u8, x: u8, tile: u8, attrs: u8) {
        self.oam[index * 4..index * 4 + 4].copy_from_slice(&[y, x, tile, attrs]);
    }
}

impl VideoPort for FakeVideo {
    fn vram(&self, offset: u16) -> u8 {
        self.vram[(offset & 0x1FFF) as usize]
    }

    fn oam(&self, offset: u8) -> u8 {
        self.oam.get(offset as usize).copied().unwrap_or(0xFF)
    }

    fn lcd(&self) -> &LcdRegisters {
        &self.lcd
    }

    fn lcd_mut(&mut self) -> &mut LcdRegisters {
        &mut self.lcd
    }

    fn request_interrupt(&mut self, interrupt: Interrupt) {
        self.requested.push(interrupt);
    }
}

fn powered(lcdc: u8) -> (Ppu, FakeVideo) {
    let mut port = FakeVideo::new(lcdc);
    let mut ppu = Ppu::new();
    ppu.power_on(&mut port);
    (ppu, port)
}

fn run_frame(ppu: &mut Ppu, port: &mut FakeVideo) -> usize {
    (0..FRAME_CYCLES).filter(|_| ppu.tick(port)).count()
}

#[test]
fn one_frame_walks_every_line_in_order() {
    let (mut ppu, mut port) = powered(0x91);
    assert_eq!(ppu.mode(), PpuMode::OamScan);
    assert_eq!(port.lcd.ly, 0);

    let mut seen = vec![(0u8, PpuMode::OamScan)];
    let mut frames = 0;
    for _ in 0..FRAME_CYCLES {
        if ppu.tick(&mut port) {
            frames += 1;
            assert_eq!(port.lcd.ly, 143);
        }
        assert_eq!(port.lcd.mode_bits(), ppu.mode() as u8);
        let now = (port.lcd.ly, ppu.mode());
        if seen.last() != Some(&now) {
            seen.push(now);
        }
    }

    let mut expected = Vec::new();
    for ly in 0..144u8 {
        expected.push((ly, PpuMode::OamScan));
        expected.push((ly, PpuMode::Drawing));
        expected.push((ly, PpuMode::HBlank));
    }
    for ly in 144..=153u8 {
        expected.push((ly, PpuMode::VBlank));
    }
    expected.push((0, PpuMode::OamScan));

    assert_eq!(seen, expected);
    assert_eq!(frames, 1);
    assert_eq!(port.count(Interrupt::VBlank), 1);
}

#[test]
fn mode_durations_follow_sprite_count() {
    let (mut ppu, mut port) = powered(0x93);
    // Three sprites on line 1 (OAM Y = 17 covers lines 1..=8).
    for i in 0..3 {
        port.sprite(i, 17, 20 + i as u8 * 8, 0, 0);
    }

    let mut line_modes: Vec<(u8, PpuMode, u32)> = Vec::new();
    for _ in 0..(LINE_CYCLES * 3) {
        ppu.tick(&mut port);
        let key = (port.lcd.ly, ppu.mode());
        match line_modes.last_mut() {
            Some((ly, mode, n)) if (*ly, *mode) == key => *n += 1,
            _ => line_modes.push((key.0, key.1, 1)),
        }
    }

    let duration = |ly: u8, mode: PpuMode| {
        line_modes
            .iter()
            .find(|(l, m, _)| *l == ly && *m == mode)
            .map(|(_, _, n)| *n)
    };
    assert_eq!(duration(1, PpuMode::OamScan), Some(80));
    assert_eq!(duration(1, PpuMode::Drawing), Some(172 + 18));
    assert_eq!(duration(1, PpuMode::HBlank), Some(456 - 80 - 190));
    assert_eq!(duration(2, PpuMode::Drawing), Some(172 + 18));
}

#[test]
fn stat_sources_fire_on_mode_entry() {
    let (mut ppu, mut port) = powered(0x91);
    port.lcd.stat |= (LcdStatus::HBLANK_INTERRUPT | LcdStatus::OAM_INTERRUPT).bits();
    run_frame(&mut ppu, &mut port);
    // 144 HBlank entries and 144 OAM entries (lines 1..=143 plus the wrap).
    assert_eq!(port.count(Interrupt::Stat), 288);

    let (mut ppu, mut port) = powered(0x91);
    port.lcd.stat |= LcdStatus::VBLANK_INTERRUPT.bits();
    run_frame(&mut ppu, &mut port);
    assert_eq!(port.count(Interrupt::Stat), 1);
    assert_eq!(port.count(Interrupt::VBlank), 1);
}

#[test]
fn lyc_match_raises_stat_once() {
    let mut port = FakeVideo::new(0x91);
    port.lcd.lyc = 5;
    port.lcd.stat |= LcdStatus::LYC_INTERRUPT.bits();
    let mut ppu = Ppu::new();
    ppu.power_on(&mut port);

    let mut flag_lines = Vec::new();
    for _ in 0..FRAME_CYCLES {
        ppu.tick(&mut port);
        if port.lcd.status().contains(LcdStatus::COINCIDENCE) && flag_lines.last() != Some(&port.lcd.ly) {
            flag_lines.push(port.lcd.ly);
        }
    }
    assert_eq!(flag_lines, vec![5]);
    assert_eq!(port.count(Interrupt::Stat), 1);
}

#[test]
fn lcd_off_freezes_at_line_zero() {
    let (mut ppu, mut port) = powered(0x91);
    port.lcd.lyc = 0;
    for _ in 0..(LINE_CYCLES * 10 + 100) {
        ppu.tick(&mut port);
    }
    assert_eq!(port.lcd.ly, 10);

    port.lcd.lcdc &= !0x80;
    port.lcd.lyc = 0;
    ppu.tick(&mut port);
    assert_eq!(port.lcd.ly, 0);
    assert_eq!(port.lcd.mode_bits(), 0);
    assert!(!port.lcd.status().contains(LcdStatus::COINCIDENCE));

    for _ in 0..FRAME_CYCLES {
        assert!(!ppu.tick(&mut port));
    }
    assert_eq!(port.lcd.ly, 0);
    assert_eq!(ppu.mode(), PpuMode::HBlank);

    port.lcd.lcdc |= 0x80;
    ppu.tick(&mut port);
    assert_eq!(ppu.mode(), PpuMode::OamScan);
    assert_eq!(port.lcd.ly, 0);
    // The restart tick counts as the first OAM scan cycle.
    for _ in 0..79 {
        ppu.tick(&mut port);
    }
    assert_eq!(ppu.mode(), PpuMode::Drawing);
}

#[test]
fn background_scrolls_and_maps_through_bgp() {
    let mut port = FakeVideo::new(0x91);
    let mut ppu = Ppu::new();
    // Tile 1: columns 0-3 color 1, columns 4-7 color 2.
    port.solid_tile(1, 0xF0, 0x0F);
    port.vram[0x1800] = 1;

    ppu.render_scanline(&port, 0);
    let row: Vec<u8> = (0..12).map(|x| ppu.frame().pixel(x, 0)).collect();
    assert_eq!(row, vec![1, 1, 1, 1, 2, 2, 2, 2, 0, 0, 0, 0]);

    port.lcd.scx = 4;
    port.lcd.bgp = 0x1B;
    ppu.render_scanline(&port, 0);
    let row: Vec<u8> = (0..6).map(|x| ppu.frame().pixel(x, 0)).collect();
    assert_eq!(row, vec![1, 1, 1, 1, 3, 3]);

    // SCY wraps vertically through the 256-line plane.
    port.lcd.scx = 0;
    port.lcd.scy = 0xFF;
    port.lcd.bgp = 0xE4;
    ppu.render_scanline(&port, 1);
    assert_eq!(ppu.frame().pixel(0, 1), 1);
}

#[test]
fn signed_tile_addressing_reaches_below_0x9000() {
    // LCDC bit 4 clear: index 0 -> 0x9000, index 0xFF -> 0x8FF0.
    let mut port = FakeVideo::new(0x81);
    let mut ppu = Ppu::new();
    port.vram[0x1000] = 0xFF;
    port.vram[0x1001] = 0xFF;
    port.vram[0x0FF0] = 0xFF;
    port.vram[0x1801] = 0xFF;

    ppu.render_scanline(&port, 0);
    assert_eq!(ppu.frame().pixel(0, 0), 3);
    assert_eq!(ppu.frame().pixel(8, 0), 1);
}

#[test]
fn background_disabled_renders_blank() {
    let mut port = FakeVideo::new(0x90);
    let mut ppu = Ppu::new();
    port.solid_tile(0, 0xFF, 0xFF);
    ppu.render_scanline(&port, 3);
    assert!((0..SCREEN_WIDTH).all(|x| ppu.frame().pixel(x, 3) == 0));
}

#[test]
fn window_line_counter_advances_only_when_drawn() {
    let mut port = FakeVideo::new(0x91 | 0x20 | 0x40);
    let mut ppu = Ppu::new();
    // Tile 2: row 0 color 3, row 1 color 1.
    port.tile_row(2, 0, 0xFF, 0xFF);
    port.tile_row(2, 1, 0xFF, 0x00);
    for i in 0..0x400 {
        port.vram[0x1C00 + i] = 2;
    }
    port.lcd.wx = 7 + 80;
    port.lcd.wy = 0;

    ppu.render_scanline(&port, 0);
    assert_eq!(ppu.frame().pixel(79, 0), 0);
    assert_eq!(ppu.frame().pixel(80, 0), 3);
    assert_eq!(ppu.frame().pixel(159, 0), 3);

    // Window pushed off-screen: nothing drawn, counter holds.
    port.lcd.wx = 200;
    ppu.render_scanline(&port, 1);
    assert_eq!(ppu.frame().pixel(100, 1), 0);

    port.lcd.wx = 7;
    ppu.render_scanline(&port, 2);
    assert_eq!(ppu.frame().pixel(0, 2), 1);
}

#[test]
fn window_waits_for_wy() {
    let mut port = FakeVideo::new(0x91 | 0x20 | 0x40);
    let mut ppu = Ppu::new();
    // Background map points at blank tile 1, window map at solid tile 0.
    port.solid_tile(0, 0xFF, 0xFF);
    for i in 0..0x400 {
        port.vram[0x1800 + i] = 1;
    }
    port.lcd.wx = 7;
    port.lcd.wy = 10;

    ppu.render_scanline(&port, 9);
    assert_eq!(ppu.frame().pixel(0, 9), 0);
    assert_eq!(ppu.window_line, 0);
    ppu.render_scanline(&port, 10);
    assert_eq!(ppu.frame().pixel(0, 10), 3);
    assert_eq!(ppu.window_line, 1);
}

#[test]
fn sprite_overlap_prefers_lower_x_then_lower_index() {
    let mut port = FakeVideo::new(0x93);
    let mut ppu = Ppu::new();
    port.solid_tile(3, 0xFF, 0xFF);

    // Index 0 at screen x 4..=11 (OBP1 -> shade 1), index 1 at 2..=9 (OBP0 -> shade 3).
    port.sprite(0, 16, 12, 3, 0x10);
    port.sprite(1, 16, 10, 3, 0x00);
    ppu.render_scanline(&port, 0);
    let row: Vec<u8> = (0..13).map(|x| ppu.frame().pixel(x, 0)).collect();
    assert_eq!(row, vec![0, 0, 3, 3, 3, 3, 3, 3, 3, 3, 1, 1, 0]);

    // Same X: the lower OAM index wins.
    port.sprite(0, 16, 30, 3, 0x10);
    port.sprite(1, 16, 30, 3, 0x00);
    ppu.render_scanline(&port, 0);
    assert_eq!(ppu.frame().pixel(22, 0), 1);
}

#[test]
fn transparent_sprite_pixels_show_the_next_sprite() {
    let mut port = FakeVideo::new(0x93);
    let mut ppu = Ppu::new();
    port.solid_tile(3, 0xFF, 0xFF);
    // Tile 4: left half transparent, right half color 3.
    port.solid_tile(4, 0x0F, 0x0F);

    port.sprite(0, 16, 8, 4, 0x00);
    port.sprite(1, 16, 8, 3, 0x10);
    ppu.render_scanline(&port, 0);
    let row: Vec<u8> = (0..8).map(|x| ppu.frame().pixel(x, 0)).collect();
    assert_eq!(row, vec![1, 1, 1, 1, 3, 3, 3, 3]);

    // X flip moves the opaque half to the left.
    port.sprite(1, 0, 0, 0, 0);
    port.sprite(0, 16, 8, 4, 0x20);
    ppu.render_scanline(&port, 0);
    let row: Vec<u8> = (0..8).map(|x| ppu.frame().pixel(x, 0)).collect();
    assert_eq!(row, vec![3, 3, 3, 3, 0, 0, 0, 0]);
}

#[test]
fn y_flip_and_tall_sprites() {
    let mut port = FakeVideo::new(0x93);
    let mut ppu = Ppu::new();
    // Tile 5: only row 0 is opaque.
    port.tile_row(5, 0, 0xFF, 0xFF);
    port.sprite(0, 16, 8, 5, 0x40);
    ppu.render_scanline(&port, 0);
    assert_eq!(ppu.frame().pixel(0, 0), 0);
    ppu.render_scanline(&port, 7);
    assert_eq!(ppu.frame().pixel(0, 7), 3);

    // 8x16: the odd tile index is ignored, rows 8..15 come from tile 7.
    let mut port = FakeVideo::new(0x97);
    port.tile_row(7, 0, 0xFF, 0xFF);
    port.sprite(0, 16, 8, 7, 0x00);
    ppu.render_scanline(&port, 0);
    assert_eq!(ppu.frame().pixel(0, 0), 0);
    ppu.render_scanline(&port, 8);
    assert_eq!(ppu.frame().pixel(0, 8), 3);
}

#[test]
fn background_priority_hides_sprite_over_non_zero_color() {
    let mut port = FakeVideo::new(0x93);
    let mut ppu = Ppu::new();
    port.solid_tile(3, 0xFF, 0xFF);
    // Background tile 1 has color 1 in its left half only.
    port.solid_tile(1, 0xF0, 0x00);
    port.vram[0x1800] = 1;
    port.sprite(0, 16, 8, 3, 0x80);

    ppu.render_scanline(&port, 0);
    let row: Vec<u8> = (0..8).map(|x| ppu.frame().pixel(x, 0)).collect();
    assert_eq!(row, vec![1, 1, 1, 1, 3, 3, 3, 3]);
}

#[test]
fn at_most_ten_sprites_per_line() {
    let mut port = FakeVideo::new(0x93);
    let mut ppu = Ppu::new();
    port.solid_tile(3, 0xFF, 0xFF);
    for i in 0..11 {
        port.sprite(i, 16, 8 + i as u8 * 10, 3, 0x00);
    }
    ppu.render_scanline(&port, 0);
    assert_eq!(ppu.frame().pixel(90, 0), 3);
    assert_eq!(ppu.frame().pixel(100, 0), 0);
    assert_eq!(ppu.count_line_sprites(&port, 0), 10);
}

#[test]
fn sprites_disabled_are_not_drawn() {
    let mut port = FakeVideo::new(0x91);
    let mut ppu = Ppu::new();
    port.solid_tile(3, 0xFF, 0xFF);
    port.sprite(0, 16, 8, 3, 0x00);
    ppu.render_scanline(&port, 0);
    assert_eq!(ppu.frame().pixel(0, 0), 0);
}

#[test]
fn state_round_trip_restores_timing() {
    let (mut ppu, mut port) = powered(0x91);
    for _ in 0..12_345 {
        ppu.tick(&mut port);
    }
    let saved = ppu.state();
    assert_eq!(saved.pixels.len(), SCREEN_WIDTH * SCREEN_HEIGHT);

    let mut other = Ppu::new();
    other.set_state(&saved);
    let mut port2 = FakeVideo::new(0x91);
    port2.lcd = port.lcd;
    for _ in 0..FRAME_CYCLES {
        assert_eq!(ppu.tick(&mut port), other.tick(&mut port2));
        assert_eq!(port.lcd, port2.lcd);
    }
}

#[test]
fn drawing_length_out_of_range_is_rejected() {
    let (ppu, _) = powered(0x91);
    let mut state = ppu.state();
    for drawing in [BASE_DRAWING_CYCLES, BASE_DRAWING_CYCLES + 60] {
        state.drawing_cycles = drawing;
        assert!(Ppu::validate_state(&state).is_ok(), "{drawing}");
    }
    for drawing in [0, BASE_DRAWING_CYCLES - 1, BASE_DRAWING_CYCLES + 61, 1_000] {
        state.drawing_cycles = drawing;
        assert!(Ppu::validate_state(&state).is_err(), "{drawing}");
    }
}

#[test]
fn overlong_drawing_leaves_empty_hblank() {
    let (mut ppu, mut port) = powered(0x91);
    let mut state = ppu.state();
    state.mode = PpuMode::Drawing;
    state.cycles_remaining = 1;
    state.drawing_cycles = 1_000;
    ppu.set_state(&state);

    ppu.tick(&mut port);
    assert_eq!(ppu.mode(), PpuMode::HBlank);
    ppu.tick(&mut port);
    assert_eq!(ppu.mode(), PpuMode::OamScan);
    assert_eq!(port.lcd.ly, 1);
}
