mod decoder;
mod renderer;

use anyhow::Result;
use clap::Parser;
use std::io::{BufWriter, Write};

use crate::decoder::prepare::{self, AnsiColorMap};
use crate::renderer::{ansi, glyph, recolor, BlockSize, ColorDepth, PixelGrid};

/// Render an image as Unicode block characters with ANSI colors
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Image file
    file: String,

    /// Color depth
    #[arg(short, long, value_enum, default_value_t = ColorDepth::Ansi256)]
    colors: ColorDepth,

    /// Width in chars, defaults to the terminal width
    #[arg(short, long)]
    width: Option<u32>,

    /// Block size
    #[arg(short, long, value_enum, default_value_t = BlockSize::Quad)]
    block: BlockSize,

    /// Grayscale
    #[arg(short, long)]
    gray: bool,

    /// Invert image
    #[arg(short, long)]
    invert: bool,

    /// Restrict chars to CP437
    #[arg(long)]
    cp437: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let width = cli.width.filter(|&w| w > 0).unwrap_or_else(terminal_width);

    // Filter image: scale first, then the optional tone adjustments, then
    // quantize to the target palette. Truecolor skips quantization.
    let img = decoder::open_image(&cli.file)?;
    let mut img = prepare::scale_image(&img.to_rgb8(), width, cli.block);

    if cli.gray {
        img = prepare::to_grayscale(&img);
    }
    if cli.invert {
        image::imageops::invert(&mut img);
    }

    let img = match cli.colors {
        ColorDepth::Mono => prepare::binarize(&img),
        ColorDepth::Ansi16 => {
            prepare::dither_to_palette(&mut img, &AnsiColorMap::ansi16());
            img
        }
        ColorDepth::Ansi256 => {
            prepare::dither_to_palette(&mut img, &AnsiColorMap::ansi256());
            img
        }
        ColorDepth::True => img,
    };

    let mut grid = PixelGrid::from_rgb_bytes(
        img.width() as usize,
        img.height() as usize,
        img.as_raw(),
    );

    // 2x2 blocks can hold four colors and must be reduced to two before
    // encoding; narrower blocks never exceed two
    if cli.colors != ColorDepth::Mono && cli.block.w() > 1 {
        recolor::recolor(&mut grid, cli.colors == ColorDepth::True);
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let chmap = if cli.cp437 {
        &glyph::CP437_2X2
    } else {
        &glyph::UNICODE_2X2
    };

    if cli.colors == ColorDepth::Mono {
        ansi::render_bw(&mut out, &grid, cli.block, chmap)?;
    } else if cli.cp437 && cli.colors == ColorDepth::Ansi16 {
        // Special rendering for traditional ANSI terminals
        ansi::render_cp437(&mut out, &grid, cli.block)?;
    } else {
        ansi::render_color(&mut out, &grid, cli.block, cli.colors, chmap)?;
    }

    out.flush()?;
    Ok(())
}

fn terminal_width() -> u32 {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as u32)
        .unwrap_or(80)
}
