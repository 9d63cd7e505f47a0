//! LED matrix driver capability

use core::fmt::Debug;

use crate::frame::Frame;

/// An 8x8 monochrome LED matrix with a staging buffer.
///
/// `clear`, `set_pixel` and `set_image` only touch the buffer; nothing is
/// visible until [`write_display`](Self::write_display) pushes it out.
pub trait MatrixDisplay {
    type Error: Debug;

    /// Turn every pixel in the buffer off.
    fn clear(&mut self);

    /// Set one buffered pixel. `(0, 0)` is the top-left corner.
    fn set_pixel(&mut self, x: u8, y: u8, on: bool);

    /// Copy a whole frame into the buffer.
    fn set_image(&mut self, frame: &Frame) {
        for (x, y, on) in frame.pixels() {
            self.set_pixel(x, y, on);
        }
    }

    /// Push the buffer to the LEDs.
    fn write_display(&mut self) -> Result<(), Self::Error>;
}

impl<D: MatrixDisplay + ?Sized> MatrixDisplay for Box<D> {
    type Error = D::Error;

    fn clear(&mut self) {
        (**self).clear()
    }

    fn set_pixel(&mut self, x: u8, y: u8, on: bool) {
        (**self).set_pixel(x, y, on)
    }

    fn set_image(&mut self, frame: &Frame) {
        (**self).set_image(frame)
    }

    fn write_display(&mut self) -> Result<(), D::Error> {
        (**self).write_display()
    }
}

/// Commit a frame: clear, stage the image, then write.
pub fn show<D: MatrixDisplay + ?Sized>(display: &mut D, frame: &Frame) -> Result<(), D::Error> {
    display.clear();
    display.set_image(frame);
    display.write_display()
}
