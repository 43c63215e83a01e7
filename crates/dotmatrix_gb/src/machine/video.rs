use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// DMG greyscale for shades 0 (lightest) to 3 (darkest).
const SHADES: [u8; 4] = [0xFF, 0xAA, 0x55, 0x00];

/// One frame of 2-bit shades, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<u8>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self {
            pixels: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }
}

impl FrameBuffer {
    /// Out-of-range coordinates are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, shade: u8) {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            self.pixels[y * SCREEN_WIDTH + x] = shade & 0x03;
        }
    }

    /// Out-of-range coordinates read as shade 0.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            self.pixels[y * SCREEN_WIDTH + x]
        } else {
            0
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn load(&mut self, pixels: &[u8]) {
        self.pixels.copy_from_slice(pixels);
    }

    /// Expand into an RGB24 buffer (3 bytes per pixel). Extra pixels in a
    /// short buffer are dropped.
    pub fn to_rgb24(&self, buffer: &mut [u8]) {
        for (rgb, &shade) in buffer.chunks_exact_mut(3).zip(self.pixels.iter()) {
            let grey = SHADES[(shade & 0x03) as usize];
            rgb.fill(grey);
        }
    }
}
