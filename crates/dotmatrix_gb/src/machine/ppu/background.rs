use super::{map_color_id, palette_shade, LcdControl, Ppu, VideoPort};
use crate::SCREEN_WIDTH;

impl Ppu {
    /// Draw line `ly` of the scrolled background.
    ///
    /// With LCDC bit 0 clear the line is blank (shade 0) and every color id
    /// is 0, so sprites are never hidden behind it.
    pub(super) fn render_background<P: VideoPort>(&mut self, port: &P, ly: u8) {
        let regs = port.lcd();
        let lcdc = regs.control();
        let y = ly as usize;

        if !lcdc.contains(LcdControl::BG_ENABLE) {
            self.line_ids.fill(0);
            for x in 0..SCREEN_WIDTH {
                self.frame.set_pixel(x, y, 0);
            }
            return;
        }

        let map_base: u16 = if lcdc.contains(LcdControl::BG_TILE_MAP) {
            0x1C00
        } else {
            0x1800
        };
        let bg_y = ly.wrapping_add(regs.scy);

        for x in 0..SCREEN_WIDTH {
            let bg_x = (x as u8).wrapping_add(regs.scx);
            let id = map_color_id(port, lcdc, map_base, bg_x, bg_y);
            self.line_ids[x] = id;
            self.frame.set_pixel(x, y, palette_shade(regs.bgp, id));
        }
    }
}
