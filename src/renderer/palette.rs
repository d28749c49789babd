/// ANSI color tables
///
/// Maps the xterm RGB values of the 16-color and 256-color palettes to their
/// terminal codes. Built once at startup, read-only afterwards. Images headed
/// for these palettes are dithered against the same tables first, so every
/// color the serializer looks up is a table member.
use lazy_static::lazy_static;
use std::collections::HashMap;

use super::grid::RgbColor;

/// ANSI foreground codes for the 16-color palette (background is fg + 10).
/// RGB triplets from xterm colors. Codes 90-97 are the bright variants.
pub const ANSI16: [(RgbColor, u8); 16] = [
    (RgbColor(0, 0, 0), 30),
    (RgbColor(205, 0, 0), 31),
    (RgbColor(0, 205, 0), 32),
    (RgbColor(205, 205, 0), 33),
    (RgbColor(0, 0, 238), 34),
    (RgbColor(205, 0, 205), 35),
    (RgbColor(0, 205, 205), 36),
    (RgbColor(229, 229, 229), 37),
    (RgbColor(127, 127, 127), 90),
    (RgbColor(255, 0, 0), 91),
    (RgbColor(0, 255, 0), 92),
    (RgbColor(255, 255, 0), 93),
    (RgbColor(92, 92, 255), 94),
    (RgbColor(255, 0, 255), 95),
    (RgbColor(0, 255, 255), 96),
    (RgbColor(255, 255, 255), 97),
];

lazy_static! {
    static ref ANSI16_CODES: HashMap<RgbColor, u8> = ANSI16.iter().copied().collect();
    static ref ANSI16_RGB: HashMap<u8, RgbColor> =
        ANSI16.iter().map(|&(c, code)| (code, c)).collect();
    static ref ANSI256: Vec<(RgbColor, u8)> = build_ansi256();
    static ref ANSI256_CODES: HashMap<RgbColor, u8> = ANSI256.iter().copied().collect();
    static ref ANSI16_COLORS: Vec<RgbColor> = ANSI16.iter().map(|&(c, _)| c).collect();
    static ref ANSI256_COLORS: Vec<RgbColor> = ANSI256.iter().map(|&(c, _)| c).collect();
}

/// 256-color palette entries with their codes.
///
/// The low 16 system colors are terminal dependent and skipped: codes 16-231
/// are the 6x6x6 cube, 232-255 the 24-step gray ramp.
fn build_ansi256() -> Vec<(RgbColor, u8)> {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let mut pal = Vec::with_capacity(240);
    for (ri, &r) in LEVELS.iter().enumerate() {
        for (gi, &g) in LEVELS.iter().enumerate() {
            for (bi, &b) in LEVELS.iter().enumerate() {
                let code = 16 + 36 * ri + 6 * gi + bi;
                pal.push((RgbColor(r, g, b), code as u8));
            }
        }
    }
    for i in 0..24u8 {
        let v = 8 + 10 * i;
        pal.push((RgbColor(v, v, v), 232 + i));
    }
    pal
}

/// SGR foreground code for a 16-color palette member.
pub fn ansi16_code(color: RgbColor) -> u8 {
    ANSI16_CODES[&color]
}

/// Reverse lookup, 16-color table only. Used by the legacy charset fallback
/// that remaps a bright background to its dim counterpart.
pub fn ansi16_rgb(code: u8) -> RgbColor {
    ANSI16_RGB[&code]
}

/// Palette index (16-255) for a 256-color palette member.
pub fn ansi256_code(color: RgbColor) -> u8 {
    ANSI256_CODES[&color]
}

/// Ordered 16-color palette, dither target.
pub fn ansi16_colors() -> &'static [RgbColor] {
    &ANSI16_COLORS
}

/// Ordered 256-color palette, dither target.
pub fn ansi256_colors() -> &'static [RgbColor] {
    &ANSI256_COLORS
}
