/// Represents a 24-bit RGB color
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RgbColor(pub u8, pub u8, pub u8);

pub const WHITE: RgbColor = RgbColor(255, 255, 255);
pub const BLACK: RgbColor = RgbColor(0, 0, 0);

/// Pixels mapped to one character cell, columns x rows
#[derive(Copy, Clone, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum BlockSize {
    /// One pixel per cell
    #[value(name = "1x1")]
    Single,
    /// Two stacked pixels per cell
    #[value(name = "1x2")]
    Half,
    /// Four pixels per cell
    #[value(name = "2x2")]
    Quad,
}

impl BlockSize {
    pub fn w(self) -> usize {
        match self {
            BlockSize::Quad => 2,
            _ => 1,
        }
    }

    pub fn h(self) -> usize {
        match self {
            BlockSize::Single => 1,
            _ => 2,
        }
    }
}

/// Row-major pixel buffer owned by the render pipeline.
///
/// Blocks are addressed by their top-left pixel coordinate together with the
/// render's global `BlockSize`. The reducer copies a block's pixels out,
/// rewrites them and stores them back, so all mutations land in this buffer.
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<RgbColor>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![BLACK; width * height],
        }
    }

    /// Build a grid from packed RGB bytes (3 bytes per pixel, row-major).
    /// Short input keeps the black fill of a fresh grid.
    pub fn from_rgb_bytes(width: usize, height: usize, data: &[u8]) -> Self {
        let mut grid = Self::new(width, height);
        for (i, chunk) in data.chunks_exact(3).take(width * height).enumerate() {
            grid.pixels[i] = RgbColor(chunk[0], chunk[1], chunk[2]);
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> RgbColor {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: RgbColor) {
        self.pixels[y * self.width + x] = color;
    }
}
