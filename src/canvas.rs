// src/canvas.rs
use image::Rgb;
use ndarray::{s, Array3, ArrayViewMut3, Axis};

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const FOREGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Square RGB raster stored row-major as `(row, column, channel)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Canvas {
    pixels: Array3<u8>,
}

impl Canvas {
    /// Allocate a `size`×`size` canvas painted with [`BACKGROUND`].
    pub fn new(size: u32) -> Self {
        let side = size as usize;
        // Filled on the calling thread so no pool is started behind the caller's back
        let pixels = Array3::from_shape_fn((side, side, 3), |(_, _, channel)| BACKGROUND.0[channel]);
        Canvas { pixels }
    }

    pub fn size(&self) -> u32 {
        self.pixels.dim().0 as u32
    }

    /// Overwrite every pixel in the inclusive rectangle `top_left..=bottom_right`.
    /// Points are `(x, y)`; corners past the edge are clipped.
    pub fn fill_rect(&mut self, top_left: (u32, u32), bottom_right: (u32, u32), color: Rgb<u8>) {
        self.region().fill_rect(top_left, bottom_right, color);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        let px = self.pixels.slice(s![y as usize, x as usize, ..]);
        Rgb([px[0], px[1], px[2]])
    }

    /// Number of pixels equal to `color`.
    pub fn count_pixels(&self, color: Rgb<u8>) -> usize {
        self.pixels
            .lanes(Axis(2))
            .into_iter()
            .filter(|px| px.iter().eq(color.0.iter()))
            .count()
    }

    /// Mutable view over the whole canvas.
    pub fn region(&mut self) -> Region<'_> {
        Region {
            pixels: self.pixels.view_mut(),
        }
    }
}

/// Mutable window onto a rectangular part of a [`Canvas`].
///
/// Regions handed out by [`Region::split_grid`] never alias, so each can be
/// moved into a separate task.
pub struct Region<'a> {
    pixels: ArrayViewMut3<'a, u8>,
}

impl<'a> Region<'a> {
    /// `(width, height)` of the window.
    pub fn dim(&self) -> (u32, u32) {
        let (rows, cols, _) = self.pixels.dim();
        (cols as u32, rows as u32)
    }

    /// Same contract as [`Canvas::fill_rect`], relative to this region's origin.
    pub fn fill_rect(&mut self, top_left: (u32, u32), bottom_right: (u32, u32), color: Rgb<u8>) {
        let (width, height) = self.dim();
        if width == 0 || height == 0 {
            return;
        }
        let (x0, y0) = top_left;
        let x1 = bottom_right.0.min(width - 1);
        let y1 = bottom_right.1.min(height - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let mut block = self
            .pixels
            .slice_mut(s![y0 as usize..=y1 as usize, x0 as usize..=x1 as usize, ..]);
        for mut px in block.lanes_mut(Axis(2)) {
            px.assign(&ndarray::aview1(&color.0));
        }
    }

    /// Cut the region into a 3×3 grid of `sub`-sided tiles, indexed `[column][row]`.
    ///
    /// The region must be at least `3 * sub` on each side; any remainder is
    /// absorbed by the last row and column.
    pub fn split_grid(self, sub: u32) -> [[Region<'a>; 3]; 3] {
        let sub = sub as usize;
        let [left, middle, right] = thirds(self.pixels, Axis(1), sub);
        [left, middle, right].map(|column| thirds(column, Axis(0), sub).map(|pixels| Region { pixels }))
    }
}

fn thirds(view: ArrayViewMut3<'_, u8>, axis: Axis, sub: usize) -> [ArrayViewMut3<'_, u8>; 3] {
    let (first, rest) = view.split_at(axis, sub);
    let (second, third) = rest.split_at(axis, sub);
    [first, second, third]
}
