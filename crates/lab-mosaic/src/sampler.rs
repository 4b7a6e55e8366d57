//! Block averaging in L\*a\*b\*
//!
//! The representative color of a block is the arithmetic mean of L\*, a\*
//! and b\* over the pixels it covers. Lab is already perceptually uniform,
//! so no linearization or RMS weighting is applied.

use crate::bitmap::Bitmap;
use crate::color::{CieLab, StdRgb, StdRgba};

/// Pixel types that can be viewed in L\*a\*b\*.
pub trait ToLab: Copy {
    fn to_lab(self) -> CieLab;
}

impl ToLab for CieLab {
    #[inline]
    fn to_lab(self) -> CieLab {
        self
    }
}

impl ToLab for StdRgb {
    #[inline]
    fn to_lab(self) -> CieLab {
        CieLab::from(self)
    }
}

impl ToLab for StdRgba {
    /// Alpha is ignored; callers composite or reject translucent pixels first.
    #[inline]
    fn to_lab(self) -> CieLab {
        CieLab::from(self.rgb())
    }
}

/// Mean Lab color over `[x0, x0 + block) x [y0, y0 + block)`.
///
/// The window is clipped to the bitmap, and the sum is divided by the
/// number of pixels actually sampled. An empty window (origin outside the
/// bitmap, or `block == 0`) yields `CieLab(0, 0, 0)`.
///
/// # Example
///
/// ```
/// use lab_mosaic::{block_average, Bitmap, CieLab};
///
/// let bmp = Bitmap::filled(4, 4, CieLab::new(50.0, 10.0, -10.0));
/// // Corner block clipped to 1x1 at the bottom-right edge
/// assert_eq!(block_average(&bmp, 3, 3, 16), CieLab::new(50.0, 10.0, -10.0));
/// ```
pub fn block_average<P: ToLab>(bitmap: &Bitmap<P>, x0: usize, y0: usize, block: usize) -> CieLab {
    let x_end = x0.saturating_add(block).min(bitmap.width());
    let y_end = y0.saturating_add(block).min(bitmap.height());
    if x0 >= x_end || y0 >= y_end {
        return CieLab::default();
    }

    let (mut l, mut a, mut b) = (0.0, 0.0, 0.0);
    for y in y0..y_end {
        for &p in &bitmap.row(y)[x0..x_end] {
            let lab = p.to_lab();
            l += lab.l;
            a += lab.a;
            b += lab.b;
        }
    }

    let count = ((x_end - x0) * (y_end - y0)) as f64;
    CieLab::new(l / count, a / count, b / count)
}

/// Fixed block size sampler over a grid of blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSampler {
    block_size: usize,
}

impl BlockSampler {
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Average of the block at grid position (`col`, `row`).
    #[inline]
    pub fn average_block<P: ToLab>(&self, bitmap: &Bitmap<P>, col: usize, row: usize) -> CieLab {
        block_average(
            bitmap,
            col * self.block_size,
            row * self.block_size,
            self.block_size,
        )
    }

    /// Grid shape `(cols, rows)` for a `width x height` bitmap.
    pub fn grid_shape(&self, width: usize, height: usize) -> (usize, usize) {
        if self.block_size == 0 {
            return (0, 0);
        }
        (
            width.div_ceil(self.block_size),
            height.div_ceil(self.block_size),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_block_returns_exact_color() {
        let color = CieLab::new(53.5, 42.25, 27.0);
        let bmp = Bitmap::filled(16, 16, color);
        assert_eq!(block_average(&bmp, 0, 0, 16), color);
        assert_eq!(block_average(&bmp, 4, 4, 8), color);
    }

    #[test]
    fn test_corner_block_divides_by_sampled_count() {
        // 4x4 image, L = x + 4y; block of 3 at (3, 3) only sees (3, 3)
        let bmp = Bitmap::from_fn(4, 4, |x, y| CieLab::new((x + 4 * y) as f64, 0.0, 0.0));
        assert_eq!(block_average(&bmp, 3, 3, 3).l, 15.0);

        // Block of 3 anchored at (2, 2) covers x, y in {2, 3}: L = 10, 11, 14, 15
        let avg = block_average(&bmp, 2, 2, 3);
        assert_eq!(avg.l, (10.0 + 11.0 + 14.0 + 15.0) / 4.0);

        // Full 3x3 in the top-left corner: L = 0,1,2,4,5,6,8,9,10
        let avg = block_average(&bmp, 0, 0, 3);
        assert_eq!(avg.l, 45.0 / 9.0);
    }

    #[test]
    fn test_empty_window_is_neutral() {
        let bmp = Bitmap::filled(4, 4, CieLab::new(80.0, 5.0, 5.0));
        assert_eq!(block_average(&bmp, 4, 0, 2), CieLab::default());
        assert_eq!(block_average(&bmp, 0, 0, 0), CieLab::default());

        let empty: Bitmap<CieLab> = Bitmap::filled(0, 0, CieLab::default());
        assert_eq!(block_average(&empty, 0, 0, 16), CieLab::default());
    }

    #[test]
    fn test_rgb_pixels_average_in_lab() {
        let bmp = Bitmap::filled(2, 2, StdRgb::WHITE);
        let avg = block_average(&bmp, 0, 0, 2);
        assert!((avg.l - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_grid_shape_rounds_up() {
        let s = BlockSampler::new(16);
        assert_eq!(s.grid_shape(32, 32), (2, 2));
        assert_eq!(s.grid_shape(33, 17), (3, 2));
        assert_eq!(s.grid_shape(0, 5), (0, 1));
    }

    #[test]
    fn test_average_block_uses_grid_coordinates() {
        let bmp = Bitmap::from_fn(4, 2, |x, _| CieLab::new(if x < 2 { 10.0 } else { 30.0 }, 0.0, 0.0));
        let s = BlockSampler::new(2);
        assert_eq!(s.average_block(&bmp, 0, 0).l, 10.0);
        assert_eq!(s.average_block(&bmp, 1, 0).l, 30.0);
    }
}
