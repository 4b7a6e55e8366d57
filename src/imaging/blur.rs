//! Separable gaussian pre-blur.
//!
//! Smoothing the source before block averaging suppresses high-frequency
//! detail that would otherwise make neighbouring mosaic cells flicker
//! between tiles.

use lab_mosaic::{Bitmap, StdRgb};
use rayon::prelude::*;

/// Kernel width used for a requested blur strength: rounded down to odd.
/// Zero disables the blur.
pub fn kernel_size(radius: usize) -> usize {
    if radius == 0 || radius % 2 == 1 {
        radius
    } else {
        radius - 1
    }
}

/// Normalised 1D gaussian kernel of odd length `size`, σ = (size − 1) / 6.
///
/// Raw weights are quantized to `round(exp(−i²/2σ²) · 100)` before
/// normalisation.
pub fn gaussian_kernel(size: usize) -> Vec<f64> {
    if size <= 1 {
        return vec![1.0];
    }
    let sigma = (size - 1) as f64 / 6.0;
    let radius = (size / 2) as i64;

    let raw: Vec<f64> = (-radius..=radius)
        .map(|i| ((-((i * i) as f64) / (2.0 * sigma * sigma)).exp() * 100.0).round())
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Reflect `i` into `0..len` without repeating the edge pixel.
fn mirror(i: i64, len: usize) -> usize {
    let max = len as i64 - 1;
    let reflected = if i < 0 {
        -i
    } else if i > max {
        2 * max - i
    } else {
        i
    };
    reflected.clamp(0, max) as usize
}

/// Blur with a square gaussian of the given strength.
///
/// Horizontal then vertical pass, rows processed in parallel on the global
/// rayon pool. Edges are mirrored.
pub fn gaussian_blur(bitmap: &Bitmap<StdRgb>, radius: usize) -> Bitmap<StdRgb> {
    let size = kernel_size(radius);
    let (width, height) = (bitmap.width(), bitmap.height());
    if size <= 1 || width == 0 || height == 0 {
        return bitmap.clone();
    }

    let kernel = gaussian_kernel(size);
    let k_radius = (size / 2) as i64;

    // Horizontal pass keeps full precision for the vertical one
    let mut horizontal = vec![[0.0f64; 3]; width * height];
    horizontal
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let src = bitmap.row(y);
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = [0.0; 3];
                for (k, w) in (-k_radius..=k_radius).zip(&kernel) {
                    let p = src[mirror(x as i64 + k, width)];
                    acc[0] += w * p.r as f64;
                    acc[1] += w * p.g as f64;
                    acc[2] += w * p.b as f64;
                }
                *out = acc;
            }
        });

    let mut out = Bitmap::filled(width, height, StdRgb::BLACK);
    out.pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = [0.0; 3];
                for (k, w) in (-k_radius..=k_radius).zip(&kernel) {
                    let p = horizontal[mirror(y as i64 + k, height) * width + x];
                    acc[0] += w * p[0];
                    acc[1] += w * p[1];
                    acc[2] += w * p[2];
                }
                *out = StdRgb::from_u8(to_u8(acc[0]), to_u8(acc[1]), to_u8(acc[2]));
            }
        });
    out
}

#[inline]
fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_kernel_size_rounds_down_to_odd() {
        assert_eq!(kernel_size(0), 0);
        assert_eq!(kernel_size(1), 1);
        assert_eq!(kernel_size(4), 3);
        assert_eq!(kernel_size(15), 15);
        assert_eq!(kernel_size(16), 15);
    }

    #[test]
    fn test_kernel_normalised_and_symmetric() {
        for size in [3, 5, 15, 31] {
            let kernel = gaussian_kernel(size);
            assert_eq!(kernel.len(), size);
            assert!((kernel.iter().sum::<f64>() - 1.0).abs() < 1e-12);
            for i in 0..size / 2 {
                assert_eq!(kernel[i], kernel[size - 1 - i]);
                assert!(kernel[i] <= kernel[i + 1], "not increasing towards centre");
            }
        }
        assert_eq!(gaussian_kernel(1), vec![1.0]);
    }

    #[test]
    fn test_kernel_quantized_weights() {
        // size 3: sigma = 1/3, outer weights exp(-4.5) * 100 = 1.11 -> 1
        let kernel = gaussian_kernel(3);
        assert!((kernel[0] - 1.0 / 102.0).abs() < 1e-12);
        assert!((kernel[1] - 100.0 / 102.0).abs() < 1e-12);
    }

    #[test]
    fn test_mirror() {
        assert_eq!(mirror(-1, 5), 1);
        assert_eq!(mirror(-3, 5), 3);
        assert_eq!(mirror(5, 5), 3);
        assert_eq!(mirror(2, 5), 2);
        // Kernel wider than the image stays in bounds
        assert_eq!(mirror(-7, 3), 2);
        assert_eq!(mirror(4, 1), 0);
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let bitmap = Bitmap::filled(9, 7, StdRgb::from_u8(10, 120, 250));
        assert_eq!(gaussian_blur(&bitmap, 15), bitmap);
    }

    #[test]
    fn test_small_radius_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let bitmap = Bitmap::from_fn(6, 6, |_, _| StdRgb::from_u8(rng.gen(), rng.gen(), rng.gen()));
        assert_eq!(gaussian_blur(&bitmap, 0), bitmap);
        assert_eq!(gaussian_blur(&bitmap, 2), bitmap);
    }

    #[test]
    fn test_impulse_spreads_symmetrically() {
        let mut bitmap = Bitmap::filled(11, 11, StdRgb::BLACK);
        bitmap.set(5, 5, StdRgb::WHITE);
        let blurred = gaussian_blur(&bitmap, 5);

        let centre = blurred.get(5, 5).r;
        assert!(centre < 255 && centre > 0);
        assert_eq!(blurred.get(4, 5), blurred.get(6, 5));
        assert_eq!(blurred.get(5, 4), blurred.get(5, 6));
        assert_eq!(blurred.get(4, 5), blurred.get(5, 4));
        assert!(blurred.get(4, 5).r < centre);
        assert_eq!(blurred.get(0, 0), StdRgb::BLACK);
    }

    #[test]
    fn test_blur_wider_than_image() {
        let bitmap = Bitmap::from_fn(2, 2, |x, _| if x == 0 { StdRgb::BLACK } else { StdRgb::WHITE });
        let blurred = gaussian_blur(&bitmap, 31);
        assert_eq!((blurred.width(), blurred.height()), (2, 2));
    }
}
