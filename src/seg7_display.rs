//! A device abstraction for a 4-digit, 7-segment LED backpack driven by an HT16K33 over I2C.
//!
//! See [`Seg7Display`] for usage.

#[cfg(feature = "display-trace")]
use defmt::info;
use embedded_hal_async::i2c::I2c;

use crate::bit_matrix_seg7::{Base, BitMatrixSeg7, CELL_COUNT};
use crate::font::{self, DECIMAL};
use crate::ht16k33::{BlinkRate, Brightness, DisplayRam, Ht16k33, RAM_ROW_COUNT};
use crate::{Error, Result};

/// Display RAM row for each digit cell, left to right. Row 2 drives the colon.
const CELL_ROWS: [usize; CELL_COUNT] = [0, 1, 3, 4];

/// Display RAM row wired to the colon.
const COLON_ROW: usize = 2;

/// Bit in [`COLON_ROW`] that lights the center colon.
const COLON_BITS: u16 = 0b_0000_0010;

/// A 4-digit, 7-segment display on an HT16K33 backpack.
///
/// Buffer methods (`write_*`, `clear`, `set_colon`) only change the in-memory digits; call
/// [`flush`](Self::flush) to send them. Brightness, blink and power methods act on the
/// controller immediately. Only `write_time` lights the colon; the other value writers turn it
/// off.
///
/// # Example
///
/// ```no_run
/// # async fn example<I2C: embedded_hal_async::i2c::I2c>(i2c: I2C) -> seg7_kit::Result<()> {
/// use seg7_kit::{BlinkRate, Seg7Display};
///
/// let mut display = Seg7Display::new(i2c, 0x70)?;
/// display.begin().await?;
///
/// display.write_text("12.34")?;
/// display.flush().await?;
///
/// display.write_time(9, 41)?;
/// display.set_colon(true);
/// display.flush().await?;
/// display.set_blink_rate(BlinkRate::OneHz).await?;
/// # Ok(())
/// # }
/// ```
pub struct Seg7Display<I2C> {
    ht16k33: Ht16k33<I2C>,
    bit_matrix: BitMatrixSeg7,
    colon: bool,
    display_on: bool,
    blink_rate: BlinkRate,
}

impl<I2C: I2c> Seg7Display<I2C> {
    /// Wraps the bus. No I/O happens until [`begin`](Self::begin).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `address` is outside `0x70..=0x77`.
    pub fn new(i2c: I2C, address: u8) -> Result<Self> {
        Ok(Self {
            ht16k33: Ht16k33::new(i2c, address)?,
            bit_matrix: BitMatrixSeg7::default(),
            colon: false,
            display_on: false,
            blink_rate: BlinkRate::Off,
        })
    }

    /// Starts the oscillator, turns the display on without blinking at full brightness, and
    /// blanks it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::I2c`] if any bus write fails.
    pub async fn begin(&mut self) -> Result<()> {
        #[cfg(feature = "display-trace")]
        info!("seg7 begin at {=u8:#x}", self.ht16k33.address());
        self.ht16k33.set_oscillator(true).await?;
        self.ht16k33.set_display(true, BlinkRate::Off).await?;
        self.display_on = true;
        self.blink_rate = BlinkRate::Off;
        self.set_brightness(Brightness::MAX).await?;
        self.clear();
        self.flush().await
    }

    /// Sends the digits and colon to display RAM.
    ///
    /// # Errors
    ///
    /// Returns [`Error::I2c`] if the bus write fails.
    pub async fn flush(&mut self) -> Result<()> {
        let ram = self.display_ram();
        self.ht16k33.write_ram(&ram).await
    }

    /// The display RAM image of the current digits and colon.
    #[must_use]
    pub fn display_ram(&self) -> DisplayRam {
        let mut ram = [0_u16; RAM_ROW_COUNT];
        for (&row, &bits) in CELL_ROWS.iter().zip(self.bit_matrix.iter()) {
            if let Some(slot) = ram.get_mut(row) {
                *slot = u16::from(bits);
            }
        }
        if self.colon {
            if let Some(slot) = ram.get_mut(COLON_ROW) {
                *slot |= COLON_BITS;
            }
        }
        ram
    }

    /// Blanks every digit and the colon.
    pub fn clear(&mut self) {
        self.bit_matrix = BitMatrixSeg7::default();
        self.colon = false;
    }

    /// Sets one digit's raw segment mask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index >= 4`.
    pub fn write_digit_raw(&mut self, index: usize, bits: u8) -> Result<()> {
        self.bit_matrix.set_bits(index, bits)
    }

    /// Shows a decimal digit, optionally with its decimal point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DigitOutOfRange`] if `digit > 9`, or [`Error::IndexOutOfBounds`] if
    /// `index >= 4`.
    pub fn write_digit_num(&mut self, index: usize, digit: u8, dot: bool) -> Result<()> {
        self.write_digit_in_base(index, digit, Base::Decimal, dot)
    }

    /// Shows a digit of `base` (hex digits render as `A b C d E F`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DigitOutOfRange`] if `digit` is not a digit of `base`, or
    /// [`Error::IndexOutOfBounds`] if `index >= 4`.
    pub fn write_digit_in_base(
        &mut self,
        index: usize,
        digit: u8,
        base: Base,
        dot: bool,
    ) -> Result<()> {
        let bits = font::digit_segments(digit, base).ok_or(Error::DigitOutOfRange(digit))?;
        self.write_digit_raw(index, with_dot(bits, dot))
    }

    /// Shows a character, optionally with its decimal point. Characters without a glyph are
    /// blank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index >= 4`.
    pub fn write_char(&mut self, index: usize, ch: char, dot: bool) -> Result<()> {
        self.write_digit_raw(index, with_dot(font::char_segments(ch), dot))
    }

    /// Turns the decimal point of one digit on or off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index >= 4`.
    pub fn set_decimal(&mut self, index: usize, on: bool) -> Result<()> {
        self.bit_matrix.set_decimal(index, on)
    }

    pub const fn set_colon(&mut self, on: bool) {
        self.colon = on;
    }

    #[must_use]
    pub const fn colon(&self) -> bool {
        self.colon
    }

    /// Replaces the digits with text and turns the colon off; see [`BitMatrixSeg7::from_text`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooLong`] and leaves the display unchanged if the text does not fit.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.bit_matrix = BitMatrixSeg7::from_text(text)?;
        self.colon = false;
        Ok(())
    }

    /// Replaces the digits with a decimal integer and turns the colon off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumberOverflow`] if the value does not fit; the digits then show
    /// `----`.
    pub fn write_number(&mut self, value: i32) -> Result<()> {
        self.write_number_base(value, Base::Decimal)
    }

    /// Replaces the digits with an integer in `base` and turns the colon off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumberOverflow`] if the value does not fit; the digits then show
    /// `----`.
    pub fn write_number_base(&mut self, value: i32, base: Base) -> Result<()> {
        self.show_or_error(BitMatrixSeg7::from_number(value, base))
    }

    /// Replaces the digits with a decimal value rounded to `fraction_digits` places and turns
    /// the colon off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumberOverflow`] if the value is not finite or does not fit; the digits
    /// then show `----`.
    pub fn write_float(&mut self, value: f32, fraction_digits: u8) -> Result<()> {
        self.show_or_error(BitMatrixSeg7::from_float(value, fraction_digits))
    }

    /// Replaces the digits with a clock time and lights the colon.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTime`] and leaves the display unchanged if `hours > 99` or
    /// `minutes > 59`.
    pub fn write_time(&mut self, hours: u8, minutes: u8) -> Result<()> {
        self.bit_matrix = BitMatrixSeg7::from_hours_minutes(hours, minutes)?;
        self.colon = true;
        Ok(())
    }

    /// Replaces the digits with `----`.
    pub fn write_error(&mut self) {
        self.bit_matrix = BitMatrixSeg7::error_pattern();
    }

    #[must_use]
    pub const fn buffer(&self) -> &BitMatrixSeg7 {
        &self.bit_matrix
    }

    /// # Errors
    ///
    /// Returns [`Error::I2c`] if the bus write fails.
    pub async fn set_brightness(&mut self, brightness: Brightness) -> Result<()> {
        self.ht16k33.set_brightness(brightness).await
    }

    /// # Errors
    ///
    /// Returns [`Error::I2c`] if the bus write fails.
    pub async fn set_blink_rate(&mut self, blink_rate: BlinkRate) -> Result<()> {
        self.ht16k33.set_display(self.display_on, blink_rate).await?;
        self.blink_rate = blink_rate;
        Ok(())
    }

    /// Turns the LEDs on or off. Display RAM is kept while off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::I2c`] if the bus write fails.
    pub async fn set_display_on(&mut self, on: bool) -> Result<()> {
        self.ht16k33.set_display(on, self.blink_rate).await?;
        self.display_on = on;
        Ok(())
    }

    /// Turns the display off and stops the oscillator. Call [`begin`](Self::begin) to wake.
    ///
    /// # Errors
    ///
    /// Returns [`Error::I2c`] if a bus write fails.
    pub async fn standby(&mut self) -> Result<()> {
        self.set_display_on(false).await?;
        self.ht16k33.set_oscillator(false).await
    }

    #[must_use]
    pub const fn is_display_on(&self) -> bool {
        self.display_on
    }

    #[must_use]
    pub const fn blink_rate(&self) -> BlinkRate {
        self.blink_rate
    }

    #[must_use]
    pub const fn address(&self) -> u8 {
        self.ht16k33.address()
    }

    /// Gives back the bus.
    pub fn release(self) -> I2C {
        self.ht16k33.release()
    }

    fn show_or_error(&mut self, bit_matrix: Result<BitMatrixSeg7>) -> Result<()> {
        self.colon = false;
        match bit_matrix {
            Ok(bit_matrix) => {
                self.bit_matrix = bit_matrix;
                Ok(())
            }
            Err(err) => {
                self.write_error();
                Err(err)
            }
        }
    }
}

const fn with_dot(bits: u8, dot: bool) -> u8 {
    if dot { bits | DECIMAL } else { bits }
}
