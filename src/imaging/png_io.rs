//! PNG decoding into RGBA bitmaps and RGB encoding of rendered output.

use std::io::Cursor;
use std::path::Path;

use lab_mosaic::{Bitmap, StdRgb, StdRgba};

use crate::error::ImageError;
use crate::fsutil::write_atomic;

/// Read a PNG file of any color type and bit depth as 8-bit RGBA.
pub fn read_png(path: &Path) -> Result<Bitmap<StdRgba>, ImageError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes, path)
}

/// Decode PNG bytes. `origin` only labels errors.
pub fn decode_png(bytes: &[u8], origin: &Path) -> Result<Bitmap<StdRgba>, ImageError> {
    let decode_err = |message: String| ImageError::Decode {
        path: origin.to_path_buf(),
        message,
    };

    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    // Palette and low bit depths expand to 8 bits, tRNS to an alpha channel
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(|e| decode_err(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| decode_err(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let pixels: Vec<StdRgba> = match info.color_type {
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .map(|p| StdRgba::from_u8(p[0], p[1], p[2], p[3]))
            .collect(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .map(|p| StdRgba::from_u8(p[0], p[1], p[2], 255))
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .map(|p| StdRgba::from_u8(p[0], p[0], p[0], p[1]))
            .collect(),
        png::ColorType::Grayscale => data
            .iter()
            .map(|&v| StdRgba::from_u8(v, v, v, 255))
            .collect(),
        png::ColorType::Indexed => {
            return Err(decode_err("indexed color was not expanded".to_string()))
        }
    };

    Ok(Bitmap::from_pixels(
        info.width as usize,
        info.height as usize,
        pixels,
    )?)
}

/// Composite RGBA over a white backdrop.
pub fn flatten(bitmap: &Bitmap<StdRgba>) -> Bitmap<StdRgb> {
    bitmap.map(|p| p.over(StdRgb::WHITE))
}

/// Encode as 8-bit RGB PNG with fast compression.
pub fn encode_png(bitmap: &Bitmap<StdRgb>) -> Result<Vec<u8>, ImageError> {
    let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
    if width == 0 || height == 0 {
        return Err(ImageError::UnsupportedDimensions { width, height });
    }

    let data: Vec<u8> = bitmap.pixels().iter().flat_map(|p| p.to_bytes()).collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Re-compress with oxipng. Returns the input unchanged if oxipng fails.
pub fn optimize_png(png_bytes: Vec<u8>) -> Vec<u8> {
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => optimized,
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping fast encoding");
            png_bytes
        }
    }
}

/// Encode and atomically write `bitmap` to `path`.
pub fn write_png(path: &Path, bitmap: &Bitmap<StdRgb>, optimize: bool) -> Result<(), ImageError> {
    let mut bytes = encode_png(bitmap)?;
    if optimize {
        bytes = optimize_png(bytes);
    }
    write_atomic(path, &bytes)?;
    tracing::debug!(
        path = %path.display(),
        width = bitmap.width(),
        height = bitmap.height(),
        bytes = bytes.len(),
        "Wrote PNG"
    );
    Ok(())
}
