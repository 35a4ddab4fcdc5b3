//! The character ROM shown in the middle of the screen.
//!
//! Four 32×32 glyphs, each stored as 32 rows of 4 bytes with the leftmost
//! pixel in the most significant bit. Glyph `n` starts at byte `n * 128`.

/// Bytes per glyph.
pub const GLYPH_BYTES: usize = 128;

/// Number of glyphs in the ROM.
pub const GLYPH_COUNT: usize = 4;

/// 8×8 source bitmaps, scaled 4× into the ROM.
const GLYPHS_8X8: [[u8; 8]; GLYPH_COUNT] = [
    // V
    [
        0b1100_0011,
        0b1100_0011,
        0b1100_0011,
        0b1100_0011,
        0b1100_0011,
        0b0110_0110,
        0b0011_1100,
        0b0001_1000,
    ],
    // E
    [
        0b1111_1111,
        0b1100_0000,
        0b1100_0000,
        0b1111_1100,
        0b1100_0000,
        0b1100_0000,
        0b1100_0000,
        0b1111_1111,
    ],
    // L
    [
        0b1100_0000,
        0b1100_0000,
        0b1100_0000,
        0b1100_0000,
        0b1100_0000,
        0b1100_0000,
        0b1100_0000,
        0b1111_1111,
    ],
    // A
    [
        0b0011_1100,
        0b0110_0110,
        0b1100_0011,
        0b1100_0011,
        0b1111_1111,
        0b1100_0011,
        0b1100_0011,
        0b1100_0011,
    ],
];

/// Builds the 512-byte glyph table.
pub fn font_rom() -> Vec<u8> {
    let mut rom = Vec::with_capacity(GLYPH_COUNT * GLYPH_BYTES);
    for glyph in &GLYPHS_8X8 {
        for row in 0..32 {
            let src = glyph[row / 4];
            for byte in 0..4 {
                // Each byte covers two source columns, four pixels each.
                let left = (src >> (7 - 2 * byte)) & 1;
                let right = (src >> (6 - 2 * byte)) & 1;
                rom.push((left * 0xf0) | (right * 0x0f));
            }
        }
    }
    rom
}

/// Returns whether pixel (`x`, `y`) of glyph `index` is set, both in 0..32.
pub fn glyph_pixel(index: usize, x: usize, y: usize) -> bool {
    GLYPHS_8X8[index][y / 4] & (0x80 >> (x / 4)) != 0
}
