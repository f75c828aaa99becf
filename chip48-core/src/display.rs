pub const LORES_WIDTH: usize = 64;
pub const LORES_HEIGHT: usize = 32;
pub const HIRES_WIDTH: usize = 128;
pub const HIRES_HEIGHT: usize = 64;

/// Monochrome bitmap, indexed `(x, y)`.
///
/// Storage always covers the high resolution area. In low resolution only the
/// top-left 64x32 region is addressed by draws and scrolls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pixels: [[bool; HIRES_HEIGHT]; HIRES_WIDTH],
    hires: bool,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            pixels: [[false; HIRES_HEIGHT]; HIRES_WIDTH],
            hires: false,
        }
    }
}

impl Display {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hires(&self) -> bool {
        self.hires
    }

    pub fn set_hires(&mut self, hires: bool) {
        self.hires = hires;
    }

    pub fn width(&self) -> usize {
        if self.hires {
            HIRES_WIDTH
        } else {
            LORES_WIDTH
        }
    }

    pub fn height(&self) -> usize {
        if self.hires {
            HIRES_HEIGHT
        } else {
            LORES_HEIGHT
        }
    }

    /// Out of range coordinates read as unset.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.pixels[x][y]
    }

    /// Rows of the active area, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = Vec<bool>> + '_ {
        (0..self.height()).map(move |y| (0..self.width()).map(|x| self.pixels[x][y]).collect())
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; HIRES_HEIGHT]; HIRES_WIDTH];
    }

    /// XORs an 8-pixel wide sprite onto the bitmap, MSB leftmost.
    ///
    /// The anchor always wraps into the active area. Pixels that then run off
    /// the right or bottom edge are clipped, or wrapped when `wrap` is set.
    /// Returns whether any set pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8], wrap: bool) -> bool {
        let (width, height) = (self.width(), self.height());
        let x0 = x as usize % width;
        let y0 = y as usize % height;

        let mut collision = false;
        for (row, bits) in rows.iter().enumerate() {
            let mut py = y0 + row;
            if py >= height {
                if !wrap {
                    break;
                }
                py %= height;
            }
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let mut px = x0 + col;
                if px >= width {
                    if !wrap {
                        break;
                    }
                    px %= width;
                }
                let pixel = &mut self.pixels[px][py];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }
        collision
    }

    pub fn scroll_down(&mut self, n: usize) {
        let (width, height) = (self.width(), self.height());
        for y in (0..height).rev() {
            for x in 0..width {
                self.pixels[x][y] = y >= n && self.pixels[x][y - n];
            }
        }
    }

    pub fn scroll_left(&mut self, n: usize) {
        let (width, height) = (self.width(), self.height());
        for x in 0..width {
            for y in 0..height {
                self.pixels[x][y] = x + n < width && self.pixels[x + n][y];
            }
        }
    }

    pub fn scroll_right(&mut self, n: usize) {
        let (width, height) = (self.width(), self.height());
        for x in (0..width).rev() {
            for y in 0..height {
                self.pixels[x][y] = x >= n && self.pixels[x - n][y];
            }
        }
    }

    pub fn lit(&self) -> usize {
        self.rows().flatten().filter(|&p| p).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_bits_map_msb_first() {
        let mut display = Display::new();
        let collision = display.draw_sprite(8, 2, &[0b1010_1011], false);
        assert!(!collision);
        let row: Vec<bool> = (8..16).map(|x| display.pixel(x, 2)).collect();
        assert_eq!(
            row,
            [true, false, true, false, true, false, true, true]
        );
        assert!(!display.pixel(7, 2));
        assert!(!display.pixel(16, 2));
        assert_eq!(display.lit(), 5);
    }

    #[test]
    fn redraw_erases_and_collides() {
        let mut display = Display::new();
        let sprite = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        assert!(!display.draw_sprite(10, 10, &sprite, false));
        assert!(display.draw_sprite(10, 10, &sprite, false));
        assert_eq!(display.lit(), 0);
    }

    #[test]
    fn partial_overlap_collides() {
        let mut display = Display::new();
        display.draw_sprite(0, 0, &[0b1000_0000], false);
        assert!(display.draw_sprite(0, 0, &[0b1100_0000], false));
        assert!(!display.pixel(0, 0));
        assert!(display.pixel(1, 0));
    }

    #[test]
    fn anchor_wraps() {
        let mut display = Display::new();
        display.draw_sprite(64 + 3, 32 + 1, &[0x80], false);
        assert!(display.pixel(3, 1));
    }

    #[test]
    fn overflow_clips_by_default() {
        let mut display = Display::new();
        display.draw_sprite(60, 30, &[0xFF, 0xFF, 0xFF, 0xFF], false);
        // 4 columns x 2 rows survive
        assert_eq!(display.lit(), 8);
        assert!(display.pixel(63, 31));
        assert!(!display.pixel(0, 30));
        assert!(!display.pixel(60, 0));
    }

    #[test]
    fn overflow_wraps_when_asked() {
        let mut display = Display::new();
        display.draw_sprite(60, 30, &[0xFF, 0xFF, 0xFF, 0xFF], true);
        assert_eq!(display.lit(), 32);
        assert!(display.pixel(0, 30));
        assert!(display.pixel(3, 1));
        assert!(display.pixel(60, 0));
    }

    #[test]
    fn hires_coordinate_space() {
        let mut display = Display::new();
        display.set_hires(true);
        assert_eq!((display.width(), display.height()), (128, 64));
        display.draw_sprite(100, 50, &[0x80], false);
        assert!(display.pixel(100, 50));
        display.set_hires(false);
        assert!(!display.pixel(100, 50));
    }

    #[test]
    fn scroll_down_fills_with_blank_rows() {
        let mut display = Display::new();
        display.draw_sprite(5, 0, &[0x80], false);
        display.draw_sprite(5, 31, &[0x80], false);
        display.scroll_down(3);
        assert!(display.pixel(5, 3));
        assert!(!display.pixel(5, 0));
        // pushed off the bottom, not wrapped
        assert_eq!(display.lit(), 1);
    }

    #[test]
    fn scroll_left_and_right() {
        let mut display = Display::new();
        display.draw_sprite(10, 4, &[0x80], false);
        display.scroll_right(4);
        assert!(display.pixel(14, 4));
        display.scroll_left(4);
        assert!(display.pixel(10, 4));
        display.scroll_left(11);
        assert_eq!(display.lit(), 0);
    }

    #[test]
    fn clear_blanks_everything() {
        let mut display = Display::new();
        display.draw_sprite(1, 1, &[0xFF; 8], false);
        display.clear();
        assert_eq!(display.lit(), 0);
    }
}
