/// Block glyph encoding
///
/// The top left pixel of a block is always treated as the foreground color.
/// The remaining pixels are classified against it to form a bit pattern that
/// indexes one of the glyph tables:
///
///   [tl][tr]  [*][ ] --> ▚
///   [bl][br]  [ ][*]
use super::grid::{BlockSize, PixelGrid, RgbColor};

/// Characters ordered to form a binary code sequence from
/// (tl<<3 | tr<<2 | bl<<1 | br).
pub const UNICODE_2X2: [char; 16] = [
    ' ', '▗', '▖', '▄', '▝', '▐', '▞', '▟', '▘', '▚', '▌', '▙', '▀', '▜', '▛', '█',
];

/// CP437 carries only the half and full blocks, so quadrant patterns degrade
/// to whichever of those covers the foreground best.
pub const CP437_2X2: [char; 16] = [
    ' ', ' ', ' ', '▄', ' ', '▐', '▄', '▄', ' ', '▀', '▌', '▄', '▀', '▀', '▀', '█',
];

/// CP437 table with the foreground and background roles exchanged.
pub const CP437_2X2_INV: [char; 16] = [
    '█', '█', '█', '▀', '█', '▌', '▀', '▀', '█', '▄', '▐', '▀', '▄', '▄', '▄', ' ',
];

/// Glyph for one multi-color block. The top left bit is fixed at 1 since the
/// foreground is the top left color by construction, which is why indices
/// 0-7 are never produced in this family.
pub fn encode_block(
    grid: &PixelGrid,
    x: usize,
    y: usize,
    block: BlockSize,
    fg: RgbColor,
    chmap: &[char; 16],
) -> char {
    match block {
        BlockSize::Quad => {
            let tr = (grid.pixel(x + 1, y) == fg) as usize;
            let bl = (grid.pixel(x, y + 1) == fg) as usize;
            let br = (grid.pixel(x + 1, y + 1) == fg) as usize;
            chmap[8 | (tr << 2) | (bl << 1) | br]
        }
        BlockSize::Half => {
            // Only the bottom pixel decides: matching the foreground fills
            // the cell, otherwise the top half carries the foreground.
            if grid.pixel(x, y + 1) == fg {
                '█'
            } else {
                '▀'
            }
        }
        // A single pixel renders solid in its foreground color
        BlockSize::Single => '█',
    }
}

/// Glyph for one black and white block. Unlike the multi-color family the
/// foreground is fixed pure white and every bit is computed explicitly.
pub fn encode_block_bw(
    grid: &PixelGrid,
    x: usize,
    y: usize,
    block: BlockSize,
    fg: RgbColor,
    chmap: &[char; 16],
) -> char {
    match block {
        BlockSize::Quad => {
            let tl = (grid.pixel(x, y) == fg) as usize;
            let tr = (grid.pixel(x + 1, y) == fg) as usize;
            let bl = (grid.pixel(x, y + 1) == fg) as usize;
            let br = (grid.pixel(x + 1, y + 1) == fg) as usize;
            chmap[(tl << 3) | (tr << 2) | (bl << 1) | br]
        }
        BlockSize::Half => {
            let tl = (grid.pixel(x, y) == fg) as usize;
            let bl = (grid.pixel(x, y + 1) == fg) as usize;
            // Duplicate tl and bl to build an index into the 16-char map:
            //   00 ->   0000
            //   01 -> ▄ 0011
            //   10 -> ▀ 1100
            //   11 -> █ 1111
            chmap[(tl << 3) | (tl << 2) | (bl << 1) | bl]
        }
        BlockSize::Single => {
            if grid.pixel(x, y) == fg {
                chmap[15]
            } else {
                chmap[0]
            }
        }
    }
}

/// Background color for a cell: the first pixel in row-major block order
/// that differs from the foreground, None when the block is monochrome.
/// The scan order is part of the contract, the serializer relies on it
/// being deterministic.
pub fn background(
    grid: &PixelGrid,
    x: usize,
    y: usize,
    block: BlockSize,
    fg: RgbColor,
) -> Option<RgbColor> {
    for dy in 0..block.h() {
        for dx in 0..block.w() {
            let p = grid.pixel(x + dx, y + dy);
            if p != fg {
                return Some(p);
            }
        }
    }
    None
}
