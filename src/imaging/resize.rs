use lab_mosaic::{Bitmap, StdRgb};
use rayon::prelude::*;

/// Output length of a dimension scaled by `factor`, never below one pixel.
pub fn scaled_dim(dim: usize, factor: f64) -> usize {
    ((dim as f64 * factor).round() as usize).max(1)
}

/// Bilinear resize by `factor`.
///
/// Pixel centres are aligned (`src = (dst + 0.5) / factor - 0.5`) and
/// samples are clamped at the edges. An empty bitmap stays empty.
pub fn bilinear_resize(bitmap: &Bitmap<StdRgb>, factor: f64) -> Bitmap<StdRgb> {
    let (sw, sh) = (bitmap.width(), bitmap.height());
    if sw == 0 || sh == 0 {
        return bitmap.clone();
    }
    let (dw, dh) = (scaled_dim(sw, factor), scaled_dim(sh, factor));
    if (dw, dh) == (sw, sh) {
        return bitmap.clone();
    }

    let x_taps: Vec<(usize, usize, f64)> = (0..dw).map(|x| taps(x, sw, dw)).collect();

    let mut out = Bitmap::filled(dw, dh, StdRgb::BLACK);
    out.pixels_mut()
        .par_chunks_mut(dw)
        .enumerate()
        .for_each(|(y, row)| {
            let (y0, y1, ty) = taps(y, sh, dh);
            let (top, bottom) = (bitmap.row(y0), bitmap.row(y1));
            for (out, &(x0, x1, tx)) in row.iter_mut().zip(&x_taps) {
                let channel = |c: fn(StdRgb) -> u8| {
                    let t = lerp(c(top[x0]) as f64, c(top[x1]) as f64, tx);
                    let b = lerp(c(bottom[x0]) as f64, c(bottom[x1]) as f64, tx);
                    lerp(t, b, ty).round().clamp(0.0, 255.0) as u8
                };
                *out = StdRgb::from_u8(channel(|p| p.r), channel(|p| p.g), channel(|p| p.b));
            }
        });
    out
}

/// Source neighbours and blend factor for destination index `dst`.
fn taps(dst: usize, src_len: usize, dst_len: usize) -> (usize, usize, f64) {
    let ratio = src_len as f64 / dst_len as f64;
    let pos = ((dst as f64 + 0.5) * ratio - 0.5).clamp(0.0, (src_len - 1) as f64);
    let i0 = pos.floor() as usize;
    let i1 = (i0 + 1).min(src_len - 1);
    (i0, i1, pos - i0 as f64)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
