//! 8x8 monochrome frame with embedded-graphics drawing support.
//!
//! Renderers draw into a [`Frame`] with ordinary embedded-graphics primitives.
//! Pixels outside the grid are silently discarded, which is how out-of-range
//! bar heights end up clipped at the edge instead of wrapping or panicking.

use core::convert::Infallible;
use core::fmt;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};

/// Width and height of the LED matrix in pixels.
pub const MATRIX_SIZE: usize = 8;

/// Index of the bottom row; bars grow upward from here.
pub const BOTTOM_ROW: i32 = MATRIX_SIZE as i32 - 1;

/// One 8x8 frame. Row `y` is stored as a byte with bit `x` set for a lit pixel.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Frame {
    rows: [u8; MATRIX_SIZE],
}

impl Frame {
    /// An all-off frame.
    pub const fn blank() -> Self {
        Self {
            rows: [0; MATRIX_SIZE],
        }
    }

    /// Build a frame from row bitmasks (bit `x` of `rows[y]`).
    pub const fn from_rows(rows: [u8; MATRIX_SIZE]) -> Self {
        Self { rows }
    }

    pub const fn rows(&self) -> [u8; MATRIX_SIZE] {
        self.rows
    }

    /// Whether the pixel at `(x, y)` is lit. Coordinates off the grid read as off.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < MATRIX_SIZE && y < MATRIX_SIZE && self.rows[y] & (1 << x) != 0
    }

    /// Set or clear the pixel at `(x, y)`. Coordinates off the grid are ignored.
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x >= MATRIX_SIZE || y >= MATRIX_SIZE {
            return;
        }
        if on {
            self.rows[y] |= 1 << x;
        } else {
            self.rows[y] &= !(1 << x);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|row| *row == 0)
    }

    /// Number of lit pixels.
    pub fn lit_count(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }

    /// Number of lit pixels in column `x`.
    pub fn column_count(&self, x: usize) -> usize {
        (0..MATRIX_SIZE).filter(|&y| self.get(x, y)).count()
    }

    /// Every pixel in row-major order as `(x, y, on)`.
    pub fn pixels(&self) -> impl Iterator<Item = (u8, u8, bool)> + '_ {
        (0..MATRIX_SIZE).flat_map(move |y| {
            (0..MATRIX_SIZE).map(move |x| (x as u8, y as u8, self.get(x, y)))
        })
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(MATRIX_SIZE as u32, MATRIX_SIZE as u32)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0 && coord.y >= 0 {
                self.set(coord.x as usize, coord.y as usize, color.is_on());
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        for point in area.intersection(&self.bounding_box()).points() {
            self.set(point.x as usize, point.y as usize, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { u8::MAX } else { 0 };
        self.rows = [fill; MATRIX_SIZE];
        Ok(())
    }
}

/// Frames draw onto any binary display, e.g. the simulator window.
impl Drawable for Frame {
    type Color = BinaryColor;
    type Output = ();

    fn draw<D>(&self, target: &mut D) -> Result<Self::Output, D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        target.draw_iter(self.pixels().map(|(x, y, on)| {
            Pixel(Point::new(i32::from(x), i32::from(y)), BinaryColor::from(on))
        }))
    }
}

/// Renders as eight lines of `#` (on) and `.` (off), top row first.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..MATRIX_SIZE {
            for x in 0..MATRIX_SIZE {
                f.write_str(if self.get(x, y) { "#" } else { "." })?;
            }
            if y + 1 < MATRIX_SIZE {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame(\n{self}\n)")
    }
}
