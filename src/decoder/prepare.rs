/// Image preparation
///
/// Everything that happens to the picture before the renderer sees it:
/// scaling to the character grid, optional grayscale and inversion, and
/// palette quantization with error diffusion. After this stage the pixel
/// data is final; the renderer only reduces and encodes it.
use image::imageops::{self, ColorMap, FilterType};
use image::{Rgb, RgbImage};

use crate::renderer::grid::{BlockSize, RgbColor};
use crate::renderer::{palette, recolor};

/// Scale to the requested width in characters.
///
/// The pixel width is the character width times the block width. Character
/// cells are roughly twice as tall as wide, so the 2x2 and 1x1 blocks halve
/// the proportional height; 1x2 blocks already pack two pixels per cell and
/// need no correction. Block heights above one force an even line count.
pub fn scale_image(img: &RgbImage, char_width: u32, block: BlockSize) -> RgbImage {
    let (w, h) = img.dimensions();

    let new_w = char_width * block.w() as u32;
    let mut new_h = ((h as f64 / w as f64) * new_w as f64) as u32;
    if block.w() == block.h() {
        new_h /= 2;
    }
    if new_h < 1 {
        new_h = 1;
    }
    if block.h() > 1 {
        new_h = (new_h + 1) & !0x01;
    }

    imageops::resize(img, new_w, new_h, FilterType::Lanczos3)
}

/// Collapse to luma and expand back to RGB so the rest of the pipeline
/// keeps working on a single pixel type.
pub fn to_grayscale(img: &RgbImage) -> RgbImage {
    let gray = imageops::grayscale(img);
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let l = gray.get_pixel(x, y)[0];
        Rgb([l, l, l])
    })
}

/// Error-diffusion target built from one of the terminal color tables.
pub struct AnsiColorMap {
    colors: &'static [RgbColor],
}

impl AnsiColorMap {
    pub fn ansi16() -> Self {
        Self {
            colors: palette::ansi16_colors(),
        }
    }

    pub fn ansi256() -> Self {
        Self {
            colors: palette::ansi256_colors(),
        }
    }
}

impl ColorMap for AnsiColorMap {
    type Color = Rgb<u8>;

    fn index_of(&self, color: &Rgb<u8>) -> usize {
        let c = RgbColor(color[0], color[1], color[2]);
        let mut best = 0;
        let mut best_dist = i32::MAX;
        for (i, &p) in self.colors.iter().enumerate() {
            let d = recolor::color_dist(c, p);
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        best
    }

    fn map_color(&self, color: &mut Rgb<u8>) {
        let p = self.colors[self.index_of(color)];
        *color = Rgb([p.0, p.1, p.2]);
    }
}

/// Quantize in place with Floyd-Steinberg error diffusion, leaving every
/// pixel an exact palette member.
pub fn dither_to_palette(img: &mut RgbImage, map: &AnsiColorMap) {
    imageops::dither(img, map);
}

/// Binarize to pure black and white with error diffusion on the luma plane.
pub fn binarize(img: &RgbImage) -> RgbImage {
    let mut gray = imageops::grayscale(img);
    imageops::dither(&mut gray, &imageops::BiLevel);
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let l = gray.get_pixel(x, y)[0];
        Rgb([l, l, l])
    })
}
