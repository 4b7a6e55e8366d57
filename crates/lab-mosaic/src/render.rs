//! Paint lookup tables into output bitmaps
//!
//! Every cell of a [`LookupTable`] becomes a `tile_size x tile_size` square
//! of the output: either a solid palette color or a texture tile. Output
//! rows are filled in parallel on the global rayon pool.

use rayon::prelude::*;

use crate::bitmap::Bitmap;
use crate::color::StdRgb;
use crate::error::MosaicError;
use crate::lookup::LookupTable;
use crate::palette::Palette;
use crate::texture::TextureTile;

/// Paint each block as a solid square of its palette color.
///
/// Lab entries are converted through a gamut-clipping sRGB conversion,
/// computed once per palette entry.
///
/// # Errors
///
/// [`MosaicError::InvalidBlockSize`] if `tile_size` is 0,
/// [`MosaicError::IndexOutOfRange`] if the table refers past the palette.
pub fn render_quantized(
    table: &LookupTable,
    palette: &Palette,
    tile_size: usize,
) -> Result<Bitmap<StdRgb>, MosaicError> {
    check_tile_size(tile_size)?;
    check_indices(table, palette.len())?;

    let colors = palette.srgb_colors();
    Ok(paint(table, tile_size, |idx, _ty, out| out.fill(colors[idx])))
}

/// Replace each block by its texture tile.
///
/// # Errors
///
/// [`MosaicError::InvalidBlockSize`] if `tile_size` is 0,
/// [`MosaicError::IndexOutOfRange`] if the table refers past `tiles`,
/// [`MosaicError::TileSize`] if a referenced tile is not `tile_size` square.
pub fn render_textured(
    table: &LookupTable,
    tiles: &[TextureTile],
    tile_size: usize,
) -> Result<Bitmap<StdRgb>, MosaicError> {
    check_tile_size(tile_size)?;
    check_indices(table, tiles.len())?;
    check_tiles(tiles, tile_size)?;

    Ok(paint(table, tile_size, |idx, ty, out| {
        out.copy_from_slice(tiles[idx].pixels().row(ty))
    }))
}

/// Lay every tile out on a square grid of side `ceil(sqrt(n))`.
///
/// Tile `i` lands at column `i % side`, row `i / side`. Unused cells stay
/// black. No tiles yields an empty bitmap.
///
/// # Errors
///
/// [`MosaicError::InvalidBlockSize`] if `tile_size` is 0,
/// [`MosaicError::TileSize`] if any tile is not `tile_size` square.
pub fn render_atlas(tiles: &[TextureTile], tile_size: usize) -> Result<Bitmap<StdRgb>, MosaicError> {
    check_tile_size(tile_size)?;
    check_tiles(tiles, tile_size)?;

    let side = atlas_side(tiles.len());
    let mut atlas = Bitmap::filled(side * tile_size, side * tile_size, StdRgb::BLACK);
    for (i, tile) in tiles.iter().enumerate() {
        atlas.blit(tile.pixels(), (i % side) * tile_size, (i / side) * tile_size);
    }
    Ok(atlas)
}

/// Smallest `side` with `side * side >= n`.
pub fn atlas_side(n: usize) -> usize {
    let mut side = (n as f64).sqrt() as usize;
    while side * side < n {
        side += 1;
    }
    side
}

fn check_tile_size(tile_size: usize) -> Result<(), MosaicError> {
    if tile_size == 0 {
        return Err(MosaicError::InvalidBlockSize(tile_size));
    }
    Ok(())
}

fn check_indices(table: &LookupTable, len: usize) -> Result<(), MosaicError> {
    match table.max_index() {
        Some(index) if index >= len => Err(MosaicError::IndexOutOfRange { index, len }),
        _ => Ok(()),
    }
}

fn check_tiles(tiles: &[TextureTile], tile_size: usize) -> Result<(), MosaicError> {
    for (index, tile) in tiles.iter().enumerate() {
        let px = tile.pixels();
        if px.width() != tile_size || px.height() != tile_size {
            return Err(MosaicError::TileSize {
                index,
                width: px.width(),
                height: px.height(),
                expected: tile_size,
            });
        }
    }
    Ok(())
}

/// Fill an output bitmap one row at a time.
///
/// `span(idx, ty, out)` writes row `ty` of the square for palette index
/// `idx` into the `tile_size` wide slice `out`.
fn paint<F>(table: &LookupTable, tile_size: usize, span: F) -> Bitmap<StdRgb>
where
    F: Fn(usize, usize, &mut [StdRgb]) + Sync,
{
    let width = table.cols() * tile_size;
    let height = table.rows() * tile_size;
    let mut out = Bitmap::filled(width, height, StdRgb::BLACK);
    if width == 0 {
        return out;
    }

    out.pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let (block_row, ty) = (y / tile_size, y % tile_size);
            for (col, chunk) in row.chunks_mut(tile_size).enumerate() {
                span(table.get(col, block_row), ty, chunk);
            }
        });
    out
}
