//! Texture tile validation
//!
//! A texture tile is usable as a mosaic cell only if it is fully opaque and
//! close to flat: the summed squared Lab distance of its pixels from the
//! tile mean must not exceed a uniformity threshold. Busy tiles make the
//! mosaic illegible at a distance, so they are filtered out up front.

use crate::bitmap::Bitmap;
use crate::color::{CieLab, StdRgb, StdRgba};
use crate::error::MosaicError;
use crate::palette::Palette;
use crate::sampler::block_average;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: usize = 16;

/// Default uniformity threshold, cumulative squared Lab distance.
pub const DEFAULT_DIFF_THRESHOLD: f64 = 35.5;

/// Outcome of inspecting one candidate tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileVerdict {
    /// Opaque and uniform enough; `diff` is the measured spread.
    Accepted { average: CieLab, diff: f64 },
    /// At least one pixel has alpha below 255.
    Transparent,
    /// Spread exceeds the threshold.
    Busy { average: CieLab, diff: f64 },
    /// Tile dimensions differ from the configured tile size.
    WrongSize { width: usize, height: usize },
}

impl TileVerdict {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, TileVerdict::Accepted { .. })
    }

    /// Average color of an accepted tile.
    pub fn accepted_average(&self) -> Option<CieLab> {
        match *self {
            TileVerdict::Accepted { average, .. } => Some(average),
            _ => None,
        }
    }
}

/// Checks candidate tiles for opacity, size and uniformity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureValidator {
    tile_size: usize,
    diff_threshold: f64,
}

impl Default for TextureValidator {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            diff_threshold: DEFAULT_DIFF_THRESHOLD,
        }
    }
}

impl TextureValidator {
    /// # Errors
    ///
    /// [`MosaicError::InvalidBlockSize`] for a tile size of 0.
    pub fn new(tile_size: usize, diff_threshold: f64) -> Result<Self, MosaicError> {
        if tile_size == 0 {
            return Err(MosaicError::InvalidBlockSize(tile_size));
        }
        Ok(Self {
            tile_size,
            diff_threshold,
        })
    }

    #[inline]
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    #[inline]
    pub fn diff_threshold(&self) -> f64 {
        self.diff_threshold
    }

    /// Classify a candidate tile.
    ///
    /// Checks run in order: size, opacity, then uniformity. A tile whose
    /// spread equals the threshold is accepted.
    pub fn inspect(&self, tile: &Bitmap<StdRgba>) -> TileVerdict {
        if tile.width() != self.tile_size || tile.height() != self.tile_size {
            return TileVerdict::WrongSize {
                width: tile.width(),
                height: tile.height(),
            };
        }
        if !tile.pixels().iter().all(|p| p.is_opaque()) {
            return TileVerdict::Transparent;
        }

        let lab = tile.map(|p| CieLab::from(p.rgb()));
        let average = block_average(&lab, 0, 0, self.tile_size);
        let diff: f64 = lab
            .pixels()
            .iter()
            .map(|&p| p.distance_squared(average))
            .sum();

        if diff > self.diff_threshold {
            TileVerdict::Busy { average, diff }
        } else {
            TileVerdict::Accepted { average, diff }
        }
    }

    /// True when [`inspect`](Self::inspect) accepts the tile.
    #[inline]
    pub fn is_valid(&self, tile: &Bitmap<StdRgba>) -> bool {
        self.inspect(tile).is_accepted()
    }

    /// Inspect and, if accepted, produce a ready-to-paint tile.
    pub fn accept(&self, tile: &Bitmap<StdRgba>) -> Option<TextureTile> {
        self.inspect(tile)
            .accepted_average()
            .map(|average| TextureTile::new(tile.map(StdRgba::rgb), average))
    }
}

/// An accepted texture: opaque pixels plus the Lab average it is matched on.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureTile {
    pixels: Bitmap<StdRgb>,
    average: CieLab,
}

impl TextureTile {
    pub fn new(pixels: Bitmap<StdRgb>, average: CieLab) -> Self {
        Self { pixels, average }
    }

    #[inline]
    pub fn pixels(&self) -> &Bitmap<StdRgb> {
        &self.pixels
    }

    #[inline]
    pub fn average(&self) -> CieLab {
        self.average
    }
}

/// The matching palette of a tile set: tile `i`'s average at index `i`.
///
/// # Errors
///
/// [`MosaicError::NoValidTextures`] when `tiles` is empty.
pub fn texture_palette(tiles: &[TextureTile]) -> Result<Palette, MosaicError> {
    if tiles.is_empty() {
        return Err(MosaicError::NoValidTextures);
    }
    Ok(Palette::new(tiles.iter().map(TextureTile::average).collect())?)
}
