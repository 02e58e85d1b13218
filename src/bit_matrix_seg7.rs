//! Segment state for the four digit cells of a 7-segment display.
//!
//! [`BitMatrixSeg7`] is pure data: it formats text and numbers into segment masks without
//! touching the bus. [`Seg7Display`](crate::seg7_display::Seg7Display) owns one and flushes it.

use core::ops::{BitOrAssign, Index, IndexMut};

use crate::font::{self, BLANK, DECIMAL, MINUS};
use crate::{Error, Result};

/// Number of digit cells on the display.
pub const CELL_COUNT: usize = 4;

/// Number base used when rendering integers.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Base {
    Binary,
    Octal,
    #[default]
    Decimal,
    Hex,
}

impl Base {
    /// The radix of this base.
    #[must_use]
    pub const fn radix(self) -> u8 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hex => 16,
        }
    }
}

/// LED segment state for a 4-digit 7-segment display.
///
/// Cell 0 is the leftmost digit. Each cell is a segment mask as described in [`font`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrixSeg7([u8; CELL_COUNT]);

impl BitMatrixSeg7 {
    #[must_use]
    pub const fn new(bits: [u8; CELL_COUNT]) -> Self {
        Self(bits)
    }

    /// Creates a matrix with the same bits in every cell.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self([bits; CELL_COUNT])
    }

    /// The pattern shown when a value cannot be displayed: `----`.
    #[must_use]
    pub const fn error_pattern() -> Self {
        Self::from_bits(MINUS)
    }

    #[must_use]
    pub const fn bits(&self) -> &[u8; CELL_COUNT] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &u8> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, u8> {
        self.0.iter_mut()
    }

    /// Renders text, left-aligned.
    ///
    /// A `.` following a glyph lights that glyph's decimal point rather than taking a cell, so
    /// `"12.34"` fits in four cells.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooLong`] if the text needs more than [`CELL_COUNT`] cells.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut bit_matrix = Self::default();
        let mut cell_count = 0_usize;
        let mut dot_attaches = false;

        for ch in text.chars() {
            if ch == '.' && dot_attaches {
                if let Some(previous) = cell_count
                    .checked_sub(1)
                    .and_then(|index| bit_matrix.0.get_mut(index))
                {
                    *previous |= DECIMAL;
                }
                dot_attaches = false;
                continue;
            }
            let cell = bit_matrix
                .0
                .get_mut(cell_count)
                .ok_or(Error::TextTooLong)?;
            *cell = font::char_segments(ch);
            cell_count += 1;
            dot_attaches = ch != '.';
        }

        Ok(bit_matrix)
    }

    /// Renders an integer right-aligned, with a leading minus sign for negative values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumberOverflow`] if the digits (and sign) need more than
    /// [`CELL_COUNT`] cells.
    pub fn from_number(value: i32, base: Base) -> Result<Self> {
        Self::from_fixed_point(value, 0, base)
    }

    /// Renders `scaled / base^fraction_digits` right-aligned.
    ///
    /// At least `fraction_digits + 1` digits are shown (so `5` with two fraction digits is
    /// `0.05`) and the decimal point is lit on the last integer digit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumberOverflow`] if the digits (and sign) need more than
    /// [`CELL_COUNT`] cells.
    pub fn from_fixed_point(scaled: i32, fraction_digits: u8, base: Base) -> Result<Self> {
        let radix = u32::from(base.radix());
        let min_digits = usize::from(fraction_digits) + 1;
        let mut magnitude = scaled.unsigned_abs();
        let mut bit_matrix = Self::default();
        let mut next_index = CELL_COUNT;
        let mut digit_count = 0_usize;

        loop {
            next_index = next_index.checked_sub(1).ok_or(Error::NumberOverflow)?;
            #[expect(
                clippy::cast_possible_truncation,
                reason = "A remainder of a radix of at most 16 fits in a u8"
            )]
            let digit = (magnitude % radix) as u8;
            let mut bits = font::digit_segments(digit, base).ok_or(Error::DigitOutOfRange(digit))?;
            magnitude /= radix;
            digit_count += 1;
            if fraction_digits > 0 && digit_count == min_digits {
                bits |= DECIMAL;
            }
            bit_matrix[next_index] = bits;
            if magnitude == 0 && digit_count >= min_digits {
                break;
            }
        }

        if scaled < 0 {
            next_index = next_index.checked_sub(1).ok_or(Error::NumberOverflow)?;
            bit_matrix[next_index] = MINUS;
        }

        Ok(bit_matrix)
    }

    /// Renders a float in decimal with `fraction_digits` places, rounding half away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumberOverflow`] if the value is not finite or does not fit.
    pub fn from_float(value: f32, fraction_digits: u8) -> Result<Self> {
        if !value.is_finite() || usize::from(fraction_digits) >= CELL_COUNT {
            return Err(Error::NumberOverflow);
        }

        let mut scale = 1.0_f32;
        for _ in 0..fraction_digits {
            scale *= 10.0;
        }
        let scaled = value * scale;
        let rounded = if scaled < 0.0 {
            scaled - 0.5
        } else {
            scaled + 0.5
        };
        // Anything outside this range needs five or more digits.
        if !(-10_000.0..10_000.0).contains(&rounded) {
            return Err(Error::NumberOverflow);
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "Range checked above; truncation toward zero completes the rounding"
        )]
        let scaled_int = rounded as i32;
        Self::from_fixed_point(scaled_int, fraction_digits, Base::Decimal)
    }

    /// Renders a clock time as `HHMM`, blanking a leading zero hour digit.
    ///
    /// The colon between the hours and minutes belongs to the display, not to the cells.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTime`] if `hours > 99` or `minutes > 59`.
    pub fn from_hours_minutes(hours: u8, minutes: u8) -> Result<Self> {
        if hours > 99 || minutes > 59 {
            return Err(Error::InvalidTime(hours, minutes));
        }
        let decimal = |digit: u8| font::digit_segments(digit, Base::Decimal).unwrap_or(BLANK);
        let tens_of_hours = if hours < 10 {
            BLANK
        } else {
            decimal(hours / 10)
        };
        Ok(Self::new([
            tens_of_hours,
            decimal(hours % 10),
            decimal(minutes / 10),
            decimal(minutes % 10),
        ]))
    }

    /// Turns the decimal point of one cell on or off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index >= CELL_COUNT`.
    pub fn set_decimal(&mut self, index: usize, on: bool) -> Result<()> {
        let bits = self.0.get_mut(index).ok_or(Error::IndexOutOfBounds)?;
        if on {
            *bits |= DECIMAL;
        } else {
            *bits &= !DECIMAL;
        }
        Ok(())
    }

    /// Sets one cell's raw segment mask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index >= CELL_COUNT`.
    pub fn set_bits(&mut self, index: usize, bits: u8) -> Result<()> {
        *self.0.get_mut(index).ok_or(Error::IndexOutOfBounds)? = bits;
        Ok(())
    }
}

impl Default for BitMatrixSeg7 {
    fn default() -> Self {
        Self([BLANK; CELL_COUNT])
    }
}

impl BitOrAssign<u8> for BitMatrixSeg7 {
    fn bitor_assign(&mut self, rhs: u8) {
        self.iter_mut().for_each(|bits| *bits |= rhs);
    }
}

impl Index<usize> for BitMatrixSeg7 {
    type Output = u8;

    #[expect(clippy::indexing_slicing, reason = "Caller's responsibility")]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for BitMatrixSeg7 {
    #[expect(clippy::indexing_slicing, reason = "Caller's responsibility")]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl IntoIterator for BitMatrixSeg7 {
    type Item = u8;
    type IntoIter = core::array::IntoIter<u8, CELL_COUNT>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a BitMatrixSeg7 {
    type Item = &'a u8;
    type IntoIter = core::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(all(test, not(target_os = "none")))]
mod tests {
    use super::*;

    const ONE: u8 = 0b_0000_0110;
    const TWO: u8 = 0b_0101_1011;
    const THREE: u8 = 0b_0100_1111;
    const FOUR: u8 = 0b_0110_0110;
    const ZERO: u8 = 0b_0011_1111;

    #[test]
    fn test_from_bits() {
        let matrix = BitMatrixSeg7::from_bits(0b_0011_1111);
        assert!(matrix.iter().all(|&bits| bits == 0b_0011_1111));
    }

    #[test]
    fn test_from_number() {
        let matrix = BitMatrixSeg7::from_number(1234, Base::Decimal).expect("fits");
        assert_eq!(matrix.bits(), &[ONE, TWO, THREE, FOUR]);
    }

    #[test]
    fn test_from_number_is_right_aligned() {
        let matrix = BitMatrixSeg7::from_number(42, Base::Decimal).expect("fits");
        assert_eq!(matrix.bits(), &[BLANK, BLANK, FOUR, TWO]);

        let zero = BitMatrixSeg7::from_number(0, Base::Decimal).expect("fits");
        assert_eq!(zero.bits(), &[BLANK, BLANK, BLANK, ZERO]);
    }

    #[test]
    fn test_from_number_negative() {
        let matrix = BitMatrixSeg7::from_number(-123, Base::Decimal).expect("fits");
        assert_eq!(matrix.bits(), &[MINUS, ONE, TWO, THREE]);
    }

    #[test]
    fn test_from_number_overflow() {
        assert!(matches!(
            BitMatrixSeg7::from_number(12345, Base::Decimal),
            Err(Error::NumberOverflow)
        ));
        assert!(matches!(
            BitMatrixSeg7::from_number(-1000, Base::Decimal),
            Err(Error::NumberOverflow)
        ));
        assert!(matches!(
            BitMatrixSeg7::from_number(i32::MIN, Base::Hex),
            Err(Error::NumberOverflow)
        ));
    }

    #[test]
    fn test_from_number_hex_and_binary() {
        let hex = BitMatrixSeg7::from_number(0xBEEF, Base::Hex).expect("fits");
        assert_eq!(
            hex.bits(),
            &[0b_0111_1100, 0b_0111_1001, 0b_0111_1001, 0b_0111_0001]
        );

        let binary = BitMatrixSeg7::from_number(0b101, Base::Binary).expect("fits");
        assert_eq!(binary.bits(), &[BLANK, ONE, ZERO, ONE]);
    }

    #[test]
    fn test_from_fixed_point_pads_fraction() {
        let matrix = BitMatrixSeg7::from_fixed_point(5, 2, Base::Decimal).expect("fits");
        assert_eq!(
            matrix.bits(),
            &[BLANK, ZERO | DECIMAL, ZERO, 0b_0110_1101]
        );
    }

    #[test]
    fn test_from_float_rounds_half_away_from_zero() {
        let matrix = BitMatrixSeg7::from_float(1.236, 2).expect("fits");
        assert_eq!(matrix.bits(), &[BLANK, ONE | DECIMAL, TWO, FOUR]);

        let negative = BitMatrixSeg7::from_float(-1.5, 0).expect("fits");
        assert_eq!(negative.bits(), &[BLANK, BLANK, MINUS, TWO]);
    }

    #[test]
    fn test_from_float_overflow() {
        assert!(matches!(
            BitMatrixSeg7::from_float(99.99, 3),
            Err(Error::NumberOverflow)
        ));
        assert!(matches!(
            BitMatrixSeg7::from_float(f32::NAN, 1),
            Err(Error::NumberOverflow)
        ));
        assert!(matches!(
            BitMatrixSeg7::from_float(9999.6, 0),
            Err(Error::NumberOverflow)
        ));
    }

    #[test]
    fn test_from_text() {
        let matrix = BitMatrixSeg7::from_text("AbCd").expect("fits");
        assert_eq!(
            matrix.bits(),
            &[0b_0111_0111, 0b_0111_1100, 0b_0011_1001, 0b_0101_1110]
        );
    }

    #[test]
    fn test_from_text_attaches_dots() {
        let matrix = BitMatrixSeg7::from_text("12.34").expect("fits");
        assert_eq!(matrix.bits(), &[ONE, TWO | DECIMAL, THREE, FOUR]);

        let leading = BitMatrixSeg7::from_text(".5").expect("fits");
        assert_eq!(leading.bits(), &[DECIMAL, 0b_0110_1101, BLANK, BLANK]);

        let doubled = BitMatrixSeg7::from_text("1..").expect("fits");
        assert_eq!(doubled.bits(), &[ONE | DECIMAL, DECIMAL, BLANK, BLANK]);
    }

    #[test]
    fn test_from_text_too_long() {
        assert!(matches!(
            BitMatrixSeg7::from_text("12345"),
            Err(Error::TextTooLong)
        ));
    }

    #[test]
    fn test_from_hours_minutes() {
        let matrix = BitMatrixSeg7::from_hours_minutes(9, 41).expect("valid");
        assert_eq!(matrix.bits(), &[BLANK, 0b_0110_1111, FOUR, ONE]);

        let noon = BitMatrixSeg7::from_hours_minutes(12, 0).expect("valid");
        assert_eq!(noon.bits(), &[ONE, TWO, ZERO, ZERO]);

        assert!(matches!(
            BitMatrixSeg7::from_hours_minutes(12, 60),
            Err(Error::InvalidTime(12, 60))
        ));
    }

    #[test]
    fn test_set_decimal_and_bitor() {
        let mut matrix = BitMatrixSeg7::default();
        matrix.set_decimal(2, true).expect("in range");
        assert_eq!(matrix.bits(), &[BLANK, BLANK, DECIMAL, BLANK]);
        matrix.set_decimal(2, false).expect("in range");
        assert_eq!(matrix, BitMatrixSeg7::default());
        assert!(matches!(
            matrix.set_decimal(4, true),
            Err(Error::IndexOutOfBounds)
        ));

        matrix |= MINUS;
        assert_eq!(matrix, BitMatrixSeg7::error_pattern());
    }
}
