//! Segment encodings for 7-segment LED displays.
//!
//! Bit 0 is segment A, running clockwise to segment F at bit 5, segment G (the middle bar) at
//! bit 6 and the decimal point at bit 7:
//!
//! ```text
//!    AAA
//!   F   B
//!   F   B
//!    GGG
//!   E   C
//!   E   C
//!    DDD  DP
//! ```

use crate::bit_matrix_seg7::Base;

/// Segment A of the 7-segment display.
pub const SEG_A: u8 = 0b_0000_0001;
/// Segment B of the 7-segment display.
pub const SEG_B: u8 = 0b_0000_0010;
/// Segment C of the 7-segment display.
pub const SEG_C: u8 = 0b_0000_0100;
/// Segment D of the 7-segment display.
pub const SEG_D: u8 = 0b_0000_1000;
/// Segment E of the 7-segment display.
pub const SEG_E: u8 = 0b_0001_0000;
/// Segment F of the 7-segment display.
pub const SEG_F: u8 = 0b_0010_0000;
/// Segment G of the 7-segment display.
pub const SEG_G: u8 = 0b_0100_0000;
/// Decimal point of the 7-segment display.
pub const DECIMAL: u8 = 0b_1000_0000;

/// A cell with every segment off.
pub const BLANK: u8 = 0b_0000_0000;
/// The minus sign (segment G alone).
pub const MINUS: u8 = SEG_G;

/// Glyph table indexed by display code: 0 is blank, 1 through 10 are the digits '0' through '9'.
pub const SEVEN_SEG_FONT_TABLE: [u8; 11] = [
    0b_0000_0000, // (space)
    0b_0011_1111, // 0
    0b_0000_0110, // 1
    0b_0101_1011, // 2
    0b_0100_1111, // 3
    0b_0110_0110, // 4
    0b_0110_1101, // 5
    0b_0111_1101, // 6
    0b_0000_0111, // 7
    0b_0111_1111, // 8
    0b_0110_1111, // 9
];

/// Hex digits 10 through 15, rendered `A b C d E F`.
const HEX_LETTERS: [u8; 6] = [
    0b_0111_0111, // A
    0b_0111_1100, // b
    0b_0011_1001, // C
    0b_0101_1110, // d
    0b_0111_1001, // E
    0b_0111_0001, // F
];

/// ASCII table mapping characters to their 7-segment display representations.
///
/// Characters with no sensible rendering are blank.
const ASCII_TABLE: [u8; 128] = {
    let mut table = [BLANK; 128];

    table[b'!' as usize] = DECIMAL | SEG_B | SEG_C;
    table[b'"' as usize] = SEG_B | SEG_F;
    table[b'\'' as usize] = SEG_F;
    table[b'(' as usize] = SEG_A | SEG_D | SEG_E | SEG_F;
    table[b')' as usize] = SEG_A | SEG_B | SEG_C | SEG_D;
    table[b'-' as usize] = MINUS;
    table[b'.' as usize] = DECIMAL;
    table[b'=' as usize] = SEG_D | SEG_G;
    table[b'?' as usize] = SEG_A | SEG_B | SEG_E | SEG_G;
    table[b'[' as usize] = SEG_A | SEG_D | SEG_E | SEG_F;
    table[b']' as usize] = SEG_A | SEG_B | SEG_C | SEG_D;
    table[b'_' as usize] = SEG_D;
    table[b'|' as usize] = SEG_B | SEG_C;

    let mut digit = 0;
    while digit < 10 {
        table[b'0' as usize + digit] = SEVEN_SEG_FONT_TABLE[digit + 1];
        digit += 1;
    }

    // Upper and lower case share one glyph where the display can only draw one of them.
    let letters: [u8; 26] = [
        0b_0111_0111, // A
        0b_0111_1100, // b
        0b_0011_1001, // C
        0b_0101_1110, // d
        0b_0111_1001, // E
        0b_0111_0001, // F
        0b_0011_1101, // G
        0b_0111_0110, // H
        0b_0000_0110, // I
        0b_0001_1110, // J
        0b_0111_0110, // K
        0b_0011_1000, // L
        0b_0001_0101, // M
        0b_0101_0100, // n
        0b_0011_1111, // O
        0b_0111_0011, // P
        0b_0110_0111, // q
        0b_0101_0000, // r
        0b_0110_1101, // S
        0b_0111_1000, // t
        0b_0011_1110, // U
        0b_0010_1010, // V
        0b_0001_1101, // W
        0b_0111_0110, // X
        0b_0110_1110, // y
        0b_0101_1011, // Z
    ];
    let mut letter = 0;
    while letter < 26 {
        table[b'A' as usize + letter] = letters[letter];
        table[b'a' as usize + letter] = letters[letter];
        letter += 1;
    }
    // Lower case forms that read better than their capitals.
    table[b'c' as usize] = SEG_D | SEG_E | SEG_G;
    table[b'h' as usize] = SEG_C | SEG_E | SEG_F | SEG_G;
    table[b'o' as usize] = SEG_C | SEG_D | SEG_E | SEG_G;
    table[b'u' as usize] = SEG_C | SEG_D | SEG_E;

    table
};

/// Looks up a display code in [`SEVEN_SEG_FONT_TABLE`].
#[must_use]
pub fn glyph(index: usize) -> Option<u8> {
    SEVEN_SEG_FONT_TABLE.get(index).copied()
}

/// Segments for a single digit in `base`, or `None` if the digit is not valid in that base.
#[must_use]
pub fn digit_segments(digit: u8, base: Base) -> Option<u8> {
    if digit >= base.radix() {
        return None;
    }
    match digit {
        0..=9 => glyph(usize::from(digit) + 1),
        _ => HEX_LETTERS.get(usize::from(digit - 10)).copied(),
    }
}

/// Segments for a character. Non-ASCII characters and characters without a glyph are blank.
#[must_use]
pub fn char_segments(ch: char) -> u8 {
    ASCII_TABLE.get(ch as usize).copied().unwrap_or(BLANK)
}

#[cfg(all(test, not(target_os = "none")))]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_table_is_blank_then_digits() {
        assert_eq!(glyph(0), Some(BLANK));
        assert_eq!(glyph(1), Some(0b_0011_1111)); // '0'
        assert_eq!(glyph(9), Some(0b_0111_1111)); // '8'
        assert_eq!(glyph(10), Some(0b_0110_1111)); // '9'
        assert_eq!(glyph(11), None);
    }

    #[test]
    fn test_digit_segments_respects_base() {
        assert_eq!(digit_segments(7, Base::Decimal), Some(0b_0000_0111));
        assert_eq!(digit_segments(10, Base::Decimal), None);
        assert_eq!(digit_segments(10, Base::Hex), Some(0b_0111_0111)); // 'A'
        assert_eq!(digit_segments(15, Base::Hex), Some(0b_0111_0001)); // 'F'
        assert_eq!(digit_segments(2, Base::Binary), None);
        assert_eq!(digit_segments(16, Base::Hex), None);
    }

    #[test]
    fn test_char_segments_match_digit_table() {
        for (offset, ch) in ('0'..='9').enumerate() {
            assert_eq!(char_segments(ch), SEVEN_SEG_FONT_TABLE[offset + 1]);
        }
    }

    #[test]
    fn test_char_segments_special_chars() {
        assert_eq!(char_segments(' '), BLANK);
        assert_eq!(char_segments('-'), MINUS);
        assert_eq!(char_segments('_'), SEG_D);
        assert_eq!(char_segments('.'), DECIMAL);
        assert_eq!(char_segments('A'), char_segments('a'));
        assert_eq!(char_segments('é'), BLANK);
    }
}
