/// Block color reduction
///
/// A terminal cell renders two colors, one 2x2 block can carry up to four.
/// The one and two color cases need no intervention; blocks with three or
/// four unique colors are rewritten here so every block the serializer sees
/// fits a single foreground/background pair.
use super::grid::{PixelGrid, RgbColor};

/// Squared Euclidean distance between two colors. A rough estimate, not
/// perceptually weighted; the square root is skipped as it is not needed
/// for comparisons.
#[inline]
pub fn color_dist(a: RgbColor, b: RgbColor) -> i32 {
    let r = a.0 as i32 - b.0 as i32;
    let g = a.1 as i32 - b.1 as i32;
    let b = a.2 as i32 - b.2 as i32;
    r * r + g * g + b * b
}

/// Closest candidate to `test` by squared distance. Ties keep the earliest
/// listed candidate. `colors` must be non-empty.
pub fn nearest_color(test: RgbColor, colors: &[RgbColor]) -> RgbColor {
    let mut best = colors[0];
    let mut best_dist = color_dist(test, best);
    for &c in &colors[1..] {
        let d = color_dist(test, c);
        if d < best_dist {
            best = c;
            best_dist = d;
        }
    }
    best
}

#[inline]
fn channel(c: RgbColor, ix: usize) -> i32 {
    match ix {
        0 => c.0 as i32,
        1 => c.1 as i32,
        _ => c.2 as i32,
    }
}

/// Perform a single median cut on a color list.
///
/// Splits along the channel with the greatest span (first of R,G,B on ties)
/// at the median value into `<= median` and `> median` buckets. When the
/// colors cluster at one end the upper bucket can come back empty; callers
/// decide how to handle that.
pub fn median_cut(colors: &[RgbColor]) -> (Vec<RgbColor>, Vec<RgbColor>) {
    let mut cut_ix = 0;
    let mut widest = -1;
    for ix in 0..3 {
        let mut lo = 255;
        let mut hi = 0;
        for &c in colors {
            let v = channel(c, ix);
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if hi - lo > widest {
            widest = hi - lo;
            cut_ix = ix;
        }
    }

    let mut vals: Vec<i32> = colors.iter().map(|&c| channel(c, cut_ix)).collect();
    vals.sort_unstable();
    let n = vals.len();
    let med = if n % 2 == 1 {
        vals[n / 2]
    } else {
        (vals[n / 2 - 1] + vals[n / 2]) / 2
    };

    let mut below = Vec::new();
    let mut above = Vec::new();
    for &c in colors {
        if channel(c, cut_ix) <= med {
            below.push(c);
        } else {
            above.push(c);
        }
    }
    (below, above)
}

/// Component-wise mean. Sums are widened to i32 so four 8-bit channels can
/// never overflow the accumulator.
fn average_color(colors: &[RgbColor]) -> RgbColor {
    let mut r = 0i32;
    let mut g = 0i32;
    let mut b = 0i32;
    for &c in colors {
        r += c.0 as i32;
        g += c.1 as i32;
        b += c.2 as i32;
    }
    let n = colors.len() as i32;
    RgbColor((r / n) as u8, (g / n) as u8, (b / n) as u8)
}

/// Reduce one 2x2 block to at most two colors, in place.
pub fn recolor_block(grid: &mut PixelGrid, x: usize, y: usize, truecolor: bool) {
    let mut px = [
        grid.pixel(x, y),
        grid.pixel(x + 1, y),
        grid.pixel(x, y + 1),
        grid.pixel(x + 1, y + 1),
    ];

    // Unique colors in first-seen order with their pixel counts
    let mut uniq = [px[0]; 4];
    let mut count = [0u8; 4];
    let mut n = 0;
    for &p in &px {
        match uniq[..n].iter().position(|&u| u == p) {
            Some(i) => count[i] += 1,
            None => {
                uniq[n] = p;
                count[n] = 1;
                n += 1;
            }
        }
    }

    if n <= 2 {
        return; // No recoloring needed
    }

    if n == 3 {
        // One color is duplicated on two pixels. Keep it and recolor the
        // other two, dropping the candidate closest to the kept color so the
        // block retains contrast.
        let mut keep_ix = 0;
        for i in 1..n {
            if count[i] > count[keep_ix] {
                keep_ix = i;
            }
        }
        let keep = uniq[keep_ix];

        let mut candidates = [keep; 2];
        let mut m = 0;
        for i in 0..n {
            if i != keep_ix {
                candidates[m] = uniq[i];
                m += 1;
            }
        }

        let remove = nearest_color(keep, &candidates);
        let selected = if remove == candidates[0] {
            candidates[1]
        } else {
            candidates[0]
        };

        let new_colors = [keep, selected];
        for p in px.iter_mut() {
            *p = nearest_color(*p, &new_colors);
        }
    } else if !truecolor {
        // Four unique colors on a palettized image: copy the left column over
        // the right. These blocks are uncommon after dithering and the
        // horizontal resolution loss is not impactful.
        px[1] = px[0];
        px[3] = px[2];
    } else {
        // Four unique truecolor values: one median cut gives two buckets and
        // their averages become the block's replacement pair.
        let (mut below, mut above) = median_cut(&uniq);
        if below.is_empty() {
            below = above.clone();
        } else if above.is_empty() {
            above = below.clone();
        }

        let new_colors = [average_color(&below), average_color(&above)];
        for p in px.iter_mut() {
            *p = nearest_color(*p, &new_colors);
        }
    }

    grid.set_pixel(x, y, px[0]);
    grid.set_pixel(x + 1, y, px[1]);
    grid.set_pixel(x, y + 1, px[2]);
    grid.set_pixel(x + 1, y + 1, px[3]);
}

/// Pass 1 over the whole grid: clamp every 2x2 block to two colors. Runs to
/// completion before any serialization starts.
pub fn recolor(grid: &mut PixelGrid, truecolor: bool) {
    let mut y = 0;
    while y + 1 < grid.height() {
        let mut x = 0;
        while x + 1 < grid.width() {
            recolor_block(grid, x, y, truecolor);
            x += 2;
        }
        y += 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: RgbColor = RgbColor(255, 0, 0);
    const GREEN: RgbColor = RgbColor(0, 255, 0);
    const BLUE: RgbColor = RgbColor(0, 0, 255);

    fn block_of(grid: &PixelGrid, x: usize, y: usize) -> [RgbColor; 4] {
        [
            grid.pixel(x, y),
            grid.pixel(x + 1, y),
            grid.pixel(x, y + 1),
            grid.pixel(x + 1, y + 1),
        ]
    }

    fn unique_count(px: &[RgbColor]) -> usize {
        let mut seen: Vec<RgbColor> = Vec::new();
        for &p in px {
            if !seen.contains(&p) {
                seen.push(p);
            }
        }
        seen.len()
    }

    fn grid_2x2(px: [RgbColor; 4]) -> PixelGrid {
        let mut grid = PixelGrid::new(2, 2);
        grid.set_pixel(0, 0, px[0]);
        grid.set_pixel(1, 0, px[1]);
        grid.set_pixel(0, 1, px[2]);
        grid.set_pixel(1, 1, px[3]);
        grid
    }

    #[test]
    fn test_nearest_color_deterministic() {
        let candidates = [RED, GREEN, BLUE];
        let first = nearest_color(RgbColor(200, 30, 10), &candidates);
        let second = nearest_color(RgbColor(200, 30, 10), &candidates);
        assert_eq!(first, RED);
        assert_eq!(first, second);
    }

    #[test]
    fn test_nearest_color_tie_takes_first() {
        // (10,0,0) and (0,10,0) are equidistant from black
        let candidates = [RgbColor(10, 0, 0), RgbColor(0, 10, 0)];
        assert_eq!(
            nearest_color(RgbColor(0, 0, 0), &candidates),
            RgbColor(10, 0, 0)
        );
    }

    #[test]
    fn test_median_cut_sizes_sum() {
        let colors = [RED, GREEN, BLUE, RgbColor(200, 200, 0)];
        let (below, above) = median_cut(&colors);
        assert_eq!(below.len() + above.len(), colors.len());
        assert!(!below.is_empty());
    }

    #[test]
    fn test_median_cut_splits_along_widest_channel() {
        // Only blue varies, so the cut must separate low from high blue
        let colors = [
            RgbColor(100, 100, 0),
            RgbColor(100, 100, 10),
            RgbColor(100, 100, 200),
            RgbColor(100, 100, 255),
        ];
        let (below, above) = median_cut(&colors);
        assert_eq!(below.len(), 2);
        assert_eq!(above.len(), 2);
        assert!(below.iter().all(|c| c.2 <= 105));
        assert!(above.iter().all(|c| c.2 > 105));
    }

    #[test]
    fn test_median_cut_degenerate_leaves_empty_bucket() {
        // Median equals the max, everything lands in the lower bucket
        let colors = [
            RgbColor(0, 2, 0),
            RgbColor(1, 9, 0),
            RgbColor(2, 9, 0),
        ];
        let (below, above) = median_cut(&colors);
        assert_eq!(below.len(), 3);
        assert!(above.is_empty());
    }

    #[test]
    fn test_recolor_block_two_colors_untouched() {
        let mut grid = grid_2x2([RED, GREEN, RED, GREEN]);
        recolor_block(&mut grid, 0, 0, false);
        assert_eq!(block_of(&grid, 0, 0), [RED, GREEN, RED, GREEN]);
    }

    #[test]
    fn test_recolor_block_three_colors_keeps_duplicate() {
        // RED appears twice and must survive exactly; of GREEN and the
        // near-red candidate, the near-red one is dropped for contrast.
        let near_red = RgbColor(250, 10, 10);
        let mut grid = grid_2x2([RED, near_red, GREEN, RED]);
        recolor_block(&mut grid, 0, 0, false);

        let px = block_of(&grid, 0, 0);
        assert!(unique_count(&px) <= 2);
        assert!(px.contains(&RED));
        assert!(px.contains(&GREEN));
        assert!(!px.contains(&near_red));
    }

    #[test]
    fn test_recolor_block_four_colors_palettized_copies_left_column() {
        let yellow = RgbColor(255, 255, 0);
        let mut grid = grid_2x2([RED, GREEN, BLUE, yellow]);
        recolor_block(&mut grid, 0, 0, false);
        assert_eq!(block_of(&grid, 0, 0), [RED, RED, BLUE, BLUE]);
    }

    #[test]
    fn test_recolor_block_four_colors_truecolor_reduces_to_two() {
        let mut grid = grid_2x2([
            RgbColor(10, 0, 0),
            RgbColor(30, 0, 0),
            RgbColor(200, 0, 0),
            RgbColor(250, 0, 0),
        ]);
        recolor_block(&mut grid, 0, 0, true);

        let px = block_of(&grid, 0, 0);
        assert!(unique_count(&px) <= 2);
        // Cut falls between the dark and bright pair, averages land nearby
        assert_eq!(px[0], px[1]);
        assert_eq!(px[2], px[3]);
        assert_eq!(px[0], RgbColor(20, 0, 0));
        assert_eq!(px[2], RgbColor(225, 0, 0));
    }

    #[test]
    fn test_recolor_block_truecolor_degenerate_cut_collapses() {
        // Red channel has the widest spread but its median equals its
        // maximum, so the cut leaves the upper bucket empty. The collapse
        // duplicates the full bucket and the whole block lands on one mean.
        let mut grid = grid_2x2([
            RgbColor(0, 0, 0),
            RgbColor(9, 0, 1),
            RgbColor(9, 0, 2),
            RgbColor(9, 0, 3),
        ]);
        recolor_block(&mut grid, 0, 0, true);

        let px = block_of(&grid, 0, 0);
        assert_eq!(unique_count(&px), 1);
        assert_eq!(px[0], RgbColor(6, 0, 1));
    }

    #[test]
    fn test_recolor_block_idempotent() {
        let near_red = RgbColor(250, 10, 10);
        let mut grid = grid_2x2([RED, near_red, GREEN, RED]);
        recolor_block(&mut grid, 0, 0, true);
        let once = block_of(&grid, 0, 0);
        recolor_block(&mut grid, 0, 0, true);
        assert_eq!(block_of(&grid, 0, 0), once);
    }

    #[test]
    fn test_recolor_whole_grid_bound() {
        // 4x4 grid of sixteen distinct colors reduces every block to <= 2
        let mut grid = PixelGrid::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                grid.set_pixel(x, y, RgbColor((x * 60) as u8, (y * 60) as u8, 128));
            }
        }
        recolor(&mut grid, true);
        for by in [0, 2] {
            for bx in [0, 2] {
                assert!(unique_count(&block_of(&grid, bx, by)) <= 2);
            }
        }
    }
}
