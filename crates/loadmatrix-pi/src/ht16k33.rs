use embedded_hal::i2c::I2c;
use loadmatrix_core::MatrixDisplay;

// =============================================================================
// I2C Address
// =============================================================================

/// Default HT16K33 address with no address jumpers bridged
pub const DEFAULT_I2C_ADDR: u8 = 0x70;

// =============================================================================
// Commands
// =============================================================================

/// System setup command, OR'd with the oscillator bit
pub const CMD_SYSTEM_SETUP: u8 = 0x20;
pub const OSCILLATOR_ON: u8 = 0x01;

/// Display setup command, OR'd with the display-on bit and a blink rate
pub const CMD_DISPLAY_SETUP: u8 = 0x80;
pub const DISPLAY_ON: u8 = 0x01;

/// Dimming command, OR'd with a 4-bit level
pub const CMD_BRIGHTNESS: u8 = 0xE0;
pub const MAX_BRIGHTNESS: u8 = 15;

/// Start of display RAM
pub const ADDR_DISPLAY_RAM: u8 = 0x00;

/// Display RAM size: 8 rows of 16 columns, two bytes per row
pub const DISPLAY_RAM_LEN: usize = 16;

// =============================================================================
// Enums
// =============================================================================

/// Hardware blink rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Blink {
    #[default]
    Off = 0b000,
    TwoHz = 0b010,
    OneHz = 0b100,
    HalfHz = 0b110,
}

// =============================================================================
// Driver Error Type
// =============================================================================

/// Errors that can occur during HT16K33 operations
#[derive(Debug)]
pub enum Error<E> {
    /// I2C communication error
    I2c(E),
    /// Brightness above [`MAX_BRIGHTNESS`]
    InvalidBrightness(u8),
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Self::I2c(e)
    }
}

// =============================================================================
// Driver Implementation
// =============================================================================

/// HT16K33 LED controller wired as an Adafruit 8x8 matrix backpack.
///
/// Pixels are staged in a RAM image and only sent by
/// [`write_display`](MatrixDisplay::write_display). Row `y` lives in RAM byte
/// `2 * y`; the backpack wires matrix column `x` to bit `(x + 7) % 8`, so
/// column 0 is the most significant bit and the rest shift down by one.
pub struct Ht16k33<I2C> {
    i2c: I2C,
    address: u8,
    buffer: [u8; DISPLAY_RAM_LEN],
}

impl<I2C> Ht16k33<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            buffer: [0; DISPLAY_RAM_LEN],
        }
    }

    /// Start the oscillator, turn the display on without blinking and set
    /// the brightness.
    pub fn init(&mut self, brightness: u8) -> Result<(), Error<I2C::Error>> {
        self.command(CMD_SYSTEM_SETUP | OSCILLATOR_ON)?;
        self.set_blink(Blink::Off)?;
        self.set_brightness(brightness)
    }

    /// Set the PWM dimming level, 0 (dimmest) to 15.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), Error<I2C::Error>> {
        if level > MAX_BRIGHTNESS {
            return Err(Error::InvalidBrightness(level));
        }
        self.command(CMD_BRIGHTNESS | level)
    }

    pub fn set_blink(&mut self, blink: Blink) -> Result<(), Error<I2C::Error>> {
        self.command(CMD_DISPLAY_SETUP | DISPLAY_ON | blink as u8)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// The staged RAM image.
    pub fn buffer(&self) -> &[u8; DISPLAY_RAM_LEN] {
        &self.buffer
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    // =========================================================================
    // Private I2C Helper Methods
    // =========================================================================

    fn command(&mut self, command: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.address, &[command])?;
        Ok(())
    }
}

impl<I2C> MatrixDisplay for Ht16k33<I2C>
where
    I2C: I2c,
{
    type Error = Error<I2C::Error>;

    fn clear(&mut self) {
        self.buffer = [0; DISPLAY_RAM_LEN];
    }

    fn set_pixel(&mut self, x: u8, y: u8, on: bool) {
        if x >= 8 || y >= 8 {
            return;
        }
        let row = &mut self.buffer[usize::from(y) * 2];
        let mask = 1 << ((x + 7) % 8);
        if on {
            *row |= mask;
        } else {
            *row &= !mask;
        }
    }

    fn write_display(&mut self) -> Result<(), Self::Error> {
        let mut frame = [0u8; DISPLAY_RAM_LEN + 1];
        frame[0] = ADDR_DISPLAY_RAM;
        frame[1..].copy_from_slice(&self.buffer);
        self.i2c.write(self.address, &frame)?;
        Ok(())
    }
}
