/// Escape sequence serialization
///
/// Walks the reduced pixel grid in block steps, row by row, and emits one
/// `<escape><glyph>` pair per cell. Color escapes are only written when the
/// cell's foreground or background differs from the previously emitted cell
/// in the same row; every row ends with an unconditional reset.
use std::io::{self, Write};

use super::glyph::{self, CP437_2X2, CP437_2X2_INV};
use super::grid::{BlockSize, PixelGrid, RgbColor, WHITE};
use super::palette;

#[derive(Copy, Clone, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum ColorDepth {
    /// Black and white
    #[value(name = "2")]
    Mono,
    /// 16-color ANSI palette
    #[value(name = "16")]
    Ansi16,
    /// 256-color palette
    #[value(name = "256")]
    Ansi256,
    /// 24-bit truecolor
    #[value(name = "16M", alias = "16m")]
    True,
}

/// Previously emitted colors within the current row. Reset at the start of
/// every row, never carried across rows.
#[derive(Default)]
struct RenderState {
    fg: Option<RgbColor>,
    bg: Option<RgbColor>,
}

/// Escape code for the 16-color palette. Foreground and background share one
/// sequence when both change and a background exists.
fn write_ansi16<W: Write>(
    out: &mut W,
    fg: RgbColor,
    bg: Option<RgbColor>,
    prev: &RenderState,
) -> io::Result<()> {
    if prev.fg != Some(fg) {
        match bg {
            Some(b) if prev.bg != bg => write!(
                out,
                "\x1b[{};{}m",
                palette::ansi16_code(fg),
                palette::ansi16_code(b) + 10
            ),
            _ => write!(out, "\x1b[{}m", palette::ansi16_code(fg)),
        }
    } else if prev.bg != bg {
        match bg {
            Some(b) => write!(out, "\x1b[{}m", palette::ansi16_code(b) + 10),
            None => Ok(()),
        }
    } else {
        Ok(())
    }
}

/// Escape code for the 256-color palette.
fn write_ansi256<W: Write>(
    out: &mut W,
    fg: RgbColor,
    bg: Option<RgbColor>,
    prev: &RenderState,
) -> io::Result<()> {
    if prev.fg != Some(fg) {
        write!(out, "\x1b[38;5;{}m", palette::ansi256_code(fg))?;
    }
    if prev.bg != bg {
        if let Some(b) = bg {
            write!(out, "\x1b[48;5;{}m", palette::ansi256_code(b))?;
        }
    }
    Ok(())
}

/// Escape code for truecolor.
fn write_truecolor<W: Write>(
    out: &mut W,
    fg: RgbColor,
    bg: Option<RgbColor>,
    prev: &RenderState,
) -> io::Result<()> {
    if prev.fg != Some(fg) {
        write!(out, "\x1b[38;2;{};{};{}m", fg.0, fg.1, fg.2)?;
    }
    if prev.bg != bg {
        if let Some(b) = bg {
            write!(out, "\x1b[48;2;{};{};{}m", b.0, b.1, b.2)?;
        }
    }
    Ok(())
}

/// Pass 2, normal color rendering: encode every block and emit minimal
/// color changes for the selected depth.
pub fn render_color<W: Write>(
    out: &mut W,
    grid: &PixelGrid,
    block: BlockSize,
    depth: ColorDepth,
    chmap: &[char; 16],
) -> io::Result<()> {
    let mut buf = [0u8; 4];
    for y in (0..grid.height()).step_by(block.h()) {
        let mut prev = RenderState::default();
        for x in (0..grid.width()).step_by(block.w()) {
            let fg = grid.pixel(x, y); // Top left is always foreground
            let bg = glyph::background(grid, x, y, block, fg);

            match depth {
                ColorDepth::Ansi16 => write_ansi16(out, fg, bg, &prev)?,
                ColorDepth::Ansi256 => write_ansi256(out, fg, bg, &prev)?,
                _ => write_truecolor(out, fg, bg, &prev)?,
            }
            let ch = glyph::encode_block(grid, x, y, block, fg, chmap);
            out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;

            prev.fg = Some(fg);
            prev.bg = bg;
        }
        out.write_all(b"\x1b[0m\n")?; // Clear colors at EOL
    }
    Ok(())
}

/// 16-color rendering under classic terminal rules. Bright backgrounds do
/// not exist there, so a cell needing one swaps its color roles and encodes
/// through the inverted glyph table; if both colors are bright the
/// background is forced to its dim equivalent, trading fidelity for a
/// representable cell.
pub fn render_cp437<W: Write>(
    out: &mut W,
    grid: &PixelGrid,
    block: BlockSize,
) -> io::Result<()> {
    let mut buf = [0u8; 4];
    for y in (0..grid.height()).step_by(block.h()) {
        let mut prev = RenderState::default();
        for x in (0..grid.width()).step_by(block.w()) {
            let mut chmap = &CP437_2X2;
            let mut fg = grid.pixel(x, y);
            let mut bg = None;

            'scan: for dy in 0..block.h() {
                for dx in 0..block.w() {
                    let p = grid.pixel(x + dx, y + dy);
                    if p == fg {
                        continue;
                    }
                    bg = Some(p);
                    if palette::ansi16_code(p) >= 90 {
                        // Can't have bright background, swap with foreground
                        let swapped = fg;
                        fg = p;
                        chmap = &CP437_2X2_INV;

                        if palette::ansi16_code(swapped) >= 90 {
                            // Both are bright. Force background to dim
                            bg = Some(palette::ansi16_rgb(palette::ansi16_code(swapped) - 60));
                        } else {
                            bg = Some(swapped);
                        }
                    }
                    break 'scan;
                }
            }

            write_ansi16(out, fg, bg, &prev)?;
            let ch = glyph::encode_block(grid, x, y, block, fg, chmap);
            out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;

            prev.fg = Some(fg);
            prev.bg = bg;
        }
        out.write_all(b"\x1b[0m\n")?; // Clear colors at EOL
    }
    Ok(())
}

/// Black and white rendering: glyphs only, no color escapes. The foreground
/// test is literal presence of pure white left behind by the binarize step.
pub fn render_bw<W: Write>(
    out: &mut W,
    grid: &PixelGrid,
    block: BlockSize,
    chmap: &[char; 16],
) -> io::Result<()> {
    let mut buf = [0u8; 4];
    for y in (0..grid.height()).step_by(block.h()) {
        for x in (0..grid.width()).step_by(block.w()) {
            let ch = glyph::encode_block_bw(grid, x, y, block, WHITE, chmap);
            out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}
