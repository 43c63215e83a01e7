use bitflags::bitflags;

use super::{palette_shade, tile_color_id, LcdControl, Ppu, VideoPort, MAX_SPRITES_PER_LINE};
use crate::SCREEN_WIDTH;

const OAM_ENTRIES: u8 = 40;

bitflags! {
    /// OAM attribute byte.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SpriteAttributes: u8 {
        const PALETTE1 = 0x10;
        const X_FLIP = 0x20;
        const Y_FLIP = 0x40;
        const BEHIND_BG = 0x80;

        const _ = !0;
    }
}

/// One OAM entry with the hardware offsets (16, 8) removed.
#[derive(Clone, Copy, Debug, Default)]
struct Sprite {
    index: u8,
    y: i16,
    x: i16,
    tile: u8,
    attrs: SpriteAttributes,
}

#[inline]
fn sprite_height(lcdc: LcdControl) -> i16 {
    if lcdc.contains(LcdControl::OBJ_TALL) {
        16
    } else {
        8
    }
}

fn read_sprite<P: VideoPort>(port: &P, index: u8) -> Sprite {
    let base = index * 4;
    Sprite {
        index,
        y: port.oam(base) as i16 - 16,
        x: port.oam(base + 1) as i16 - 8,
        tile: port.oam(base + 2),
        attrs: SpriteAttributes::from_bits_retain(port.oam(base + 3)),
    }
}

/// First ten sprites in OAM order whose rows cover `ly`.
fn line_sprites<P: VideoPort>(port: &P, ly: u8, height: i16) -> ([Sprite; MAX_SPRITES_PER_LINE], usize) {
    let mut found = [Sprite::default(); MAX_SPRITES_PER_LINE];
    let mut count = 0;
    let line = ly as i16;
    for index in 0..OAM_ENTRIES {
        if count == MAX_SPRITES_PER_LINE {
            break;
        }
        let sprite = read_sprite(port, index);
        if line >= sprite.y && line < sprite.y + height {
            found[count] = sprite;
            count += 1;
        }
    }
    (found, count)
}

impl Ppu {
    /// Sprites OAM scan would select on line `ly`; drives the drawing
    /// penalty.
    pub(super) fn count_line_sprites<P: VideoPort>(&self, port: &P, ly: u8) -> usize {
        let height = sprite_height(port.lcd().control());
        line_sprites(port, ly, height).1
    }

    /// Draw the sprites of line `ly` over the background already in the
    /// frame buffer.
    ///
    /// Overlaps resolve by smaller X first, then lower OAM index. A
    /// transparent pixel lets the next sprite show through, while a
    /// background-priority sprite over a non-zero background color hides
    /// the pixel outright.
    pub(super) fn render_sprites<P: VideoPort>(&mut self, port: &P, ly: u8) {
        let regs = port.lcd();
        let lcdc = regs.control();
        if !lcdc.contains(LcdControl::OBJ_ENABLE) {
            return;
        }

        let height = sprite_height(lcdc);
        let (mut sprites, count) = line_sprites(port, ly, height);
        let sprites = &mut sprites[..count];
        sprites.sort_by_key(|s| (s.x, s.index));

        let line = ly as i16;
        for x in 0..SCREEN_WIDTH {
            let screen_x = x as i16;
            for sprite in sprites.iter() {
                if screen_x < sprite.x || screen_x >= sprite.x + 8 {
                    continue;
                }

                let mut row = line - sprite.y;
                if sprite.attrs.contains(SpriteAttributes::Y_FLIP) {
                    row = height - 1 - row;
                }
                let mut col = screen_x - sprite.x;
                if sprite.attrs.contains(SpriteAttributes::X_FLIP) {
                    col = 7 - col;
                }
                let tile = if height == 16 {
                    sprite.tile & 0xFE
                } else {
                    sprite.tile
                };

                let id = tile_color_id(port, tile as u16 * 16, row as u8, col as u8);
                if id == 0 {
                    continue;
                }
                if sprite.attrs.contains(SpriteAttributes::BEHIND_BG) && self.line_ids[x] != 0 {
                    break;
                }

                let palette = if sprite.attrs.contains(SpriteAttributes::PALETTE1) {
                    regs.obp1
                } else {
                    regs.obp0
                };
                self.frame.set_pixel(x, ly as usize, palette_shade(palette, id));
                break;
            }
        }
    }
}
