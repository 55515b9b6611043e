//! Built-in hexadecimal font.

/// Address the font is loaded at on reset.
pub const FONT_ADDRESS: u16 = 0x000;
/// Height in bytes (rows) of one glyph.
pub const GLYPH_HEIGHT: u16 = 5;

/// Sixteen 4x5 glyphs for `0..=F`, one byte per row, high nibble used.
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the glyph for the low nibble of `digit`.
#[must_use]
pub const fn glyph_address(digit: u8) -> u16 {
    FONT_ADDRESS + (digit & 0x0F) as u16 * GLYPH_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::{glyph_address, FONT, FONT_ADDRESS, GLYPH_HEIGHT};

    #[test]
    fn glyphs_are_laid_out_back_to_back() {
        assert_eq!(glyph_address(0), FONT_ADDRESS);
        assert_eq!(glyph_address(0xF), FONT_ADDRESS + 15 * GLYPH_HEIGHT);
        assert_eq!(FONT.len(), 16 * GLYPH_HEIGHT as usize);
    }

    #[test]
    fn only_low_nibble_selects_glyph() {
        assert_eq!(glyph_address(0x1A), glyph_address(0x0A));
    }
}
