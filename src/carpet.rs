// src/carpet.rs
use crate::canvas::{Canvas, Region, FOREGROUND};
use crate::error::CarpetError;
use log::{debug, trace};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Smallest square that still has a non-empty center cell.
pub const MIN_EXTENT: u32 = 3;

/// Frames at this depth or deeper always recurse inline.
pub const PARALLEL_DEPTH: u32 = 2;
/// Frames narrower than this always recurse inline.
pub const PARALLEL_MIN_EXTENT: u32 = 27;

/// One square of the subdivision, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub origin_x: u32,
    pub origin_y: u32,
    pub extent: u32,
    pub depth: u32,
}

impl Frame {
    /// The whole canvas at depth 0.
    pub fn root(size: u32) -> Self {
        Frame {
            origin_x: 0,
            origin_y: 0,
            extent: size,
            depth: 0,
        }
    }

    pub fn is_leaf(&self, max_depth: u32) -> bool {
        self.depth >= max_depth || self.extent < MIN_EXTENT
    }

    /// Grid cell `(i, j)` of this frame, `i` counting columns and `j` rows.
    pub fn child(&self, i: u32, j: u32) -> Frame {
        let sub = self.extent / 3;
        Frame {
            origin_x: self.origin_x + i * sub,
            origin_y: self.origin_y + j * sub,
            extent: sub,
            depth: self.depth + 1,
        }
    }

    fn fans_out(&self) -> bool {
        self.depth < PARALLEL_DEPTH && self.extent >= PARALLEL_MIN_EXTENT
    }
}

/// Carve the carpet into `region`, which must cover exactly `frame`.
///
/// The center ninth is painted with [`FOREGROUND`] and the eight surrounding
/// cells are carved recursively. With `parallel` set, frames near the root
/// hand their cells to the current rayon pool; deeper frames always run
/// inline. Every cell owns a disjoint [`Region`], so the result does not
/// depend on how the work is scheduled.
pub fn draw_square(mut region: Region<'_>, frame: Frame, max_depth: u32, parallel: bool) {
    if frame.is_leaf(max_depth) {
        return;
    }

    let sub = frame.extent / 3;
    region.fill_rect((sub, sub), (2 * sub - 1, 2 * sub - 1), FOREGROUND);

    let cells = region
        .split_grid(sub)
        .into_iter()
        .zip(0u32..)
        .flat_map(|(column, i)| column.into_iter().zip(0u32..).map(move |(tile, j)| (i, j, tile)))
        .filter(|(i, j, _)| *i != 1 || *j != 1);

    if parallel && frame.fans_out() {
        trace!("fan out at {:?}", frame);
        rayon::scope(|s| {
            for (i, j, tile) in cells {
                let child = frame.child(i, j);
                s.spawn(move |_| draw_square(tile, child, max_depth, parallel));
            }
        });
    } else {
        for (i, j, tile) in cells {
            draw_square(tile, frame.child(i, j), max_depth, parallel);
        }
    }
}

/// Worker pool with exactly `threads` workers.
pub fn build_pool(threads: usize) -> Result<ThreadPool, CarpetError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("carpet-worker-{}", i))
        .build()?;
    Ok(pool)
}

/// Render the whole carpet on `pool`, returning once every cell is done.
pub fn render(canvas: &mut Canvas, max_depth: u32, pool: &ThreadPool) {
    let root = Frame::root(canvas.size());
    debug!(
        "rendering {}x{} to depth {} on {} threads",
        root.extent,
        root.extent,
        max_depth,
        pool.current_num_threads()
    );
    pool.install(|| draw_square(canvas.region(), root, max_depth, true));
}

/// Single-threaded render on the calling thread.
pub fn render_sequential(canvas: &mut Canvas, max_depth: u32) {
    let root = Frame::root(canvas.size());
    draw_square(canvas.region(), root, max_depth, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BACKGROUND;
    use approx::assert_relative_eq;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn pixel_hash(canvas: &Canvas) -> u64 {
        let mut hasher = DefaultHasher::new();
        canvas.hash(&mut hasher);
        hasher.finish()
    }

    fn render_with_threads(size: u32, depth: u32, threads: usize) -> Canvas {
        let pool = build_pool(threads).unwrap();
        let mut canvas = Canvas::new(size);
        render(&mut canvas, depth, &pool);
        canvas
    }

    /// A pixel is removed when, at some level k <= levels, the k-th base-3
    /// digit (most significant first) of both coordinates is 1.
    fn in_hole(x: u32, y: u32, size: u32, levels: u32) -> bool {
        let mut cell = size;
        for _ in 0..levels {
            cell /= 3;
            if cell == 0 {
                break;
            }
            if (x / cell) % 3 == 1 && (y / cell) % 3 == 1 {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_frame_children() {
        let root = Frame::root(27);
        assert!(!root.is_leaf(1));

        let child = root.child(2, 1);
        assert_eq!(
            child,
            Frame {
                origin_x: 18,
                origin_y: 9,
                extent: 9,
                depth: 1
            }
        );
        assert!(child.is_leaf(1));
        assert!(Frame::root(2).is_leaf(10));
    }

    #[test]
    fn test_single_level_fills_center_block() {
        let mut canvas = Canvas::new(9);
        render_sequential(&mut canvas, 1);

        for y in 0..9 {
            for x in 0..9 {
                let expected = if (3..=5).contains(&x) && (3..=5).contains(&y) {
                    FOREGROUND
                } else {
                    BACKGROUND
                };
                assert_eq!(canvas.pixel(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
        assert_eq!(canvas.count_pixels(FOREGROUND), 9);
    }

    #[test]
    fn test_unit_canvas_is_untouched() {
        for depth in [1, 2, 10] {
            let canvas = render_with_threads(1, depth, 2);
            assert_eq!(canvas, Canvas::new(1));
        }
    }

    #[test]
    fn test_two_level_carpet_pattern() {
        let canvas = render_with_threads(27, 2, 4);

        for y in 0..27 {
            for x in 0..27 {
                let expected = if in_hole(x, y, 27, 2) {
                    FOREGROUND
                } else {
                    BACKGROUND
                };
                assert_eq!(canvas.pixel(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
        // 81 for the center plus 8 * 9 one level down
        assert_eq!(canvas.count_pixels(FOREGROUND), 81 + 72);
    }

    #[test]
    fn test_two_level_carpet_hash_matches_across_threads() {
        let single = render_with_threads(27, 2, 1);
        let many = render_with_threads(27, 2, 8);
        assert_eq!(pixel_hash(&single), pixel_hash(&many));
    }

    #[test]
    fn test_render_is_deterministic() {
        // 243 is wide enough for both parallel levels to fan out
        let mut reference = Canvas::new(243);
        render_sequential(&mut reference, 5);
        let expected = pixel_hash(&reference);

        for threads in [1, 2, 4, 8] {
            for _ in 0..2 {
                let canvas = render_with_threads(243, 5, threads);
                assert_eq!(pixel_hash(&canvas), expected, "{} threads", threads);
                assert!(canvas == reference, "{} threads", threads);
            }
        }
    }

    #[test]
    fn test_area_grows_with_depth() {
        // 81 = 3^4, so subdivision bottoms out after four levels
        let size = 81u32;
        let total = (size * size) as usize;
        let mut previous = 0;

        for depth in 1..=6u32 {
            let mut canvas = Canvas::new(size);
            render_sequential(&mut canvas, depth);
            let area = canvas.count_pixels(FOREGROUND);

            let levels = depth.min(4);
            let untouched = 8usize.pow(levels) * 9usize.pow(4 - levels);
            assert_eq!(area, total - untouched, "depth {}", depth);

            if depth <= 4 {
                assert!(area > previous, "depth {}", depth);
            } else {
                assert_eq!(area, previous, "depth {}", depth);
            }
            previous = area;
        }
    }

    #[test]
    fn test_area_ratio_matches_carpet() {
        let pool = build_pool(4).unwrap();
        let mut canvas = Canvas::new(729);
        render(&mut canvas, 6, &pool);

        let ratio = canvas.count_pixels(FOREGROUND) as f64 / (729.0 * 729.0);
        assert_relative_eq!(ratio, 1.0 - (8.0_f64 / 9.0).powi(6), epsilon = 1e-12);
    }
}
