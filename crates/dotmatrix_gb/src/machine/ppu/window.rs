use super::{map_color_id, palette_shade, LcdControl, Ppu, VideoPort};
use crate::SCREEN_WIDTH;

impl Ppu {
    /// Overlay the window on line `ly`.
    ///
    /// The window is positioned at (WX-7, WY) and fetches rows from its own
    /// line counter, so hiding it for a few lines resumes where it left off.
    pub(super) fn render_window<P: VideoPort>(&mut self, port: &P, ly: u8) {
        let regs = port.lcd();
        let lcdc = regs.control();
        if !lcdc.contains(LcdControl::BG_ENABLE | LcdControl::WINDOW_ENABLE) || ly < regs.wy {
            return;
        }

        let x_start = regs.wx as i32 - 7;
        if x_start >= SCREEN_WIDTH as i32 {
            return;
        }

        let map_base: u16 = if lcdc.contains(LcdControl::WINDOW_TILE_MAP) {
            0x1C00
        } else {
            0x1800
        };
        let win_y = self.window_line;
        let y = ly as usize;

        for x in x_start.max(0) as usize..SCREEN_WIDTH {
            let win_x = (x as i32 - x_start) as u8;
            let id = map_color_id(port, lcdc, map_base, win_x, win_y);
            self.line_ids[x] = id;
            self.frame.set_pixel(x, y, palette_shade(regs.bgp, id));
        }

        self.window_line = self.window_line.wrapping_add(1);
    }
}
