pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

pub type Pixels = [[u8; WIDTH]; HEIGHT];

/// The 64x32 monochrome display buffer. Pixels are only ever mutated by
/// XOR through `blit`, or wiped wholesale by `clear`.
pub struct FrameBuffer {
    pixels: Pixels,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: [[0; WIDTH]; HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[0; WIDTH]; HEIGHT];
    }

    /// Read-only view for the renderer.
    pub fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    /// XOR-blits sprite rows at `(x, y)`, most significant bit leftmost.
    ///
    /// The origin wraps once (`x % 64`, `y % 32`); rows and columns that run
    /// past the grid edge from there are clipped, not wrapped. Returns 1 when
    /// any lit pixel was toggled off.
    pub fn blit(&mut self, x: u8, y: u8, sprite: &[u8]) -> u8 {
        let ox = x as usize % WIDTH;
        let oy = y as usize % HEIGHT;
        let mut collision = 0;

        for (row, byte) in sprite.iter().enumerate() {
            let py = oy + row;
            if py >= HEIGHT {
                break;
            }
            for bit in 0..8 {
                let px = ox + bit;
                if px >= WIDTH {
                    break;
                }
                if (byte >> (7 - bit)) & 1 == 1 {
                    if self.pixels[py][px] == 1 {
                        collision = 1;
                    }
                    self.pixels[py][px] ^= 1;
                }
            }
        }
        collision
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(fb: &FrameBuffer) -> usize {
        fb.pixels().iter().flatten().filter(|&&p| p == 1).count()
    }

    #[test]
    fn blit_sets_one_row_of_pixels() {
        let mut fb = FrameBuffer::new();
        let flag = fb.blit(0, 0, &[0xFF]);
        assert_eq!(flag, 0);
        assert_eq!(lit(&fb), 8);
        assert_eq!(&fb.pixels()[0][0..9], &[1, 1, 1, 1, 1, 1, 1, 1, 0]);
    }

    #[test]
    fn blit_respects_bit_order() {
        let mut fb = FrameBuffer::new();
        fb.blit(0, 0, &[0b1010_0001]);
        assert_eq!(&fb.pixels()[0][0..8], &[1, 0, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn blit_xor_toggles_and_reports_collision() {
        let mut fb = FrameBuffer::new();
        // first draw lights pixels with no collision
        assert_eq!(fb.blit(4, 2, &[0xF0, 0x90]), 0);
        // redrawing erases everything and reports the collision
        assert_eq!(fb.blit(4, 2, &[0xF0, 0x90]), 1);
        assert_eq!(lit(&fb), 0);
        // third draw restores the original state, collision-free
        assert_eq!(fb.blit(4, 2, &[0xF0, 0x90]), 0);
        assert_eq!(lit(&fb), 6);
    }

    #[test]
    fn blit_partial_overlap_sets_flag() {
        let mut fb = FrameBuffer::new();
        fb.blit(0, 0, &[0b1000_0000]);
        // overlaps only the already-lit leftmost pixel
        assert_eq!(fb.blit(0, 0, &[0b1100_0000]), 1);
        assert_eq!(&fb.pixels()[0][0..2], &[0, 1]);
    }

    #[test]
    fn blit_origin_wraps() {
        let mut fb = FrameBuffer::new();
        fb.blit(64, 32, &[0x80]);
        assert_eq!(fb.pixels()[0][0], 1);
        assert_eq!(lit(&fb), 1);
    }

    #[test]
    fn blit_clips_columns_at_right_edge() {
        let mut fb = FrameBuffer::new();
        fb.blit(60, 0, &[0xFF]);
        // 4 columns fit, the rest must not wrap to the left side
        assert_eq!(lit(&fb), 4);
        assert_eq!(&fb.pixels()[0][60..64], &[1, 1, 1, 1]);
        assert_eq!(fb.pixels()[0][0], 0);
    }

    #[test]
    fn blit_clips_rows_at_bottom_edge() {
        let mut fb = FrameBuffer::new();
        fb.blit(0, 30, &[0x80, 0x80, 0x80, 0x80]);
        // 2 rows fit, the rest must not wrap to the top
        assert_eq!(lit(&fb), 2);
        assert_eq!(fb.pixels()[30][0], 1);
        assert_eq!(fb.pixels()[31][0], 1);
        assert_eq!(fb.pixels()[0][0], 0);
    }

    #[test]
    fn clear_wipes_everything() {
        let mut fb = FrameBuffer::new();
        fb.blit(10, 10, &[0xFF, 0xFF]);
        fb.clear();
        assert_eq!(lit(&fb), 0);
    }
}
