//! Generic 2D pixel grid

use rayon::prelude::*;

use crate::color::CieLab;
use crate::error::MosaicError;

/// A `width x height` grid of pixels stored row-major.
///
/// The pixel type is whatever color space the stage works in; the matching
/// pipeline uses [`LabBitmap`]. Transforms such as [`Bitmap::map`] return a
/// new bitmap rather than mutating in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap<P> {
    width: usize,
    height: usize,
    pixels: Vec<P>,
}

/// The canonical bitmap of the matching pipeline.
pub type LabBitmap = Bitmap<CieLab>;

impl<P: Copy> Bitmap<P> {
    /// A bitmap with every pixel set to `fill`.
    pub fn filled(width: usize, height: usize, fill: P) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    /// Wrap a row-major pixel buffer.
    ///
    /// # Errors
    ///
    /// [`MosaicError::BitmapSize`] if `pixels.len() != width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<P>) -> Result<Self, MosaicError> {
        if pixels.len() != width * height {
            return Err(MosaicError::BitmapSize {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a bitmap by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> P) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at (`x`, `y`).
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the bitmap.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> P {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y * self.width + x]
    }

    /// Pixel at (`x`, `y`), or `None` outside the bitmap.
    #[inline]
    pub fn get_checked(&self, x: usize, y: usize) -> Option<P> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Overwrite the pixel at (`x`, `y`).
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the bitmap.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, pixel: P) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y * self.width + x] = pixel;
    }

    /// One row of pixels.
    #[inline]
    pub fn row(&self, y: usize) -> &[P] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    /// All pixels, row-major, mutable.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [P] {
        &mut self.pixels
    }

    /// Consume the bitmap, returning its pixel buffer.
    pub fn into_pixels(self) -> Vec<P> {
        self.pixels
    }

    /// Convert every pixel with `f`.
    pub fn map<Q: Copy>(&self, f: impl Fn(P) -> Q) -> Bitmap<Q> {
        Bitmap {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&p| f(p)).collect(),
        }
    }

    /// Copy `src` into this bitmap with its top-left corner at (`x0`, `y0`).
    ///
    /// Pixels falling outside this bitmap are dropped.
    pub fn blit(&mut self, src: &Bitmap<P>, x0: usize, y0: usize) {
        if x0 >= self.width || y0 >= self.height {
            return;
        }
        let w = src.width.min(self.width - x0);
        let h = src.height.min(self.height - y0);
        for y in 0..h {
            let dst_start = (y0 + y) * self.width + x0;
            self.pixels[dst_start..dst_start + w].copy_from_slice(&src.row(y)[..w]);
        }
    }
}

impl<P: Copy + Send + Sync> Bitmap<P> {
    /// Convert every pixel with `f` on the global rayon pool.
    pub fn par_map<Q: Copy + Send>(&self, f: impl Fn(P) -> Q + Sync + Send) -> Bitmap<Q> {
        Bitmap {
            width: self.width,
            height: self.height,
            pixels: self.pixels.par_iter().map(|&p| f(p)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_set_row_major() {
        let mut bmp = Bitmap::from_fn(3, 2, |x, y| (x, y));
        assert_eq!(bmp.get(2, 1), (2, 1));
        assert_eq!(bmp.pixels()[4], (1, 1));

        bmp.set(0, 1, (9, 9));
        assert_eq!(bmp.row(1), &[(9, 9), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_get_checked() {
        let bmp = Bitmap::filled(2, 2, 7u8);
        assert_eq!(bmp.get_checked(1, 1), Some(7));
        assert_eq!(bmp.get_checked(2, 0), None);
        assert_eq!(bmp.get_checked(0, 2), None);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_out_of_bounds_panics() {
        Bitmap::filled(2, 2, 0u8).get(2, 0);
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(Bitmap::from_pixels(2, 2, vec![0u8; 4]).is_ok());
        let err = Bitmap::from_pixels(2, 2, vec![0u8; 3]).unwrap_err();
        assert!(matches!(
            err,
            MosaicError::BitmapSize {
                width: 2,
                height: 2,
                len: 3
            }
        ));
    }

    #[test]
    fn test_map_and_par_map_agree() {
        let bmp = Bitmap::from_fn(17, 9, |x, y| (x * 31 + y) as u32);
        let a = bmp.map(|p| p * 2);
        let b = bmp.par_map(|p| p * 2);
        assert_eq!(a, b);
        assert_eq!(a.width(), 17);
        assert_eq!(a.height(), 9);
    }

    #[test]
    fn test_blit_clips_to_destination() {
        let mut dst = Bitmap::filled(4, 4, 0u8);
        let src = Bitmap::filled(3, 3, 1u8);
        dst.blit(&src, 2, 2);

        let ones = dst.pixels().iter().filter(|&&p| p == 1).count();
        assert_eq!(ones, 4);
        assert_eq!(dst.get(3, 3), 1);
        assert_eq!(dst.get(1, 1), 0);

        // Entirely outside: no-op
        dst.blit(&src, 4, 0);
        assert_eq!(dst.pixels().iter().filter(|&&p| p == 1).count(), 4);
    }
}
