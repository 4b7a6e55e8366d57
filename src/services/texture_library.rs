use std::path::{Path, PathBuf};

use lab_mosaic::{MosaicError, Palette, TextureTile, TextureValidator, TileVerdict};
use rayon::prelude::*;

use crate::error::{CacheError, ImageError, PipelineError};
use crate::imaging::read_png;
use crate::services::texture_cache::{CacheRecord, TextureCache};

/// Where a loaded library came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibrarySource {
    Cache,
    Scan,
}

/// Per-verdict counts from validating a texture directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub scanned: usize,
    pub accepted: usize,
    pub transparent: usize,
    pub busy: usize,
    pub wrong_size: usize,
    pub unreadable: usize,
}

/// Accepted texture tiles in deterministic order; tile `i` is palette entry `i`.
#[derive(Debug, Clone)]
pub struct TextureLibrary {
    paths: Vec<PathBuf>,
    tiles: Vec<TextureTile>,
    report: Option<ScanReport>,
}

impl TextureLibrary {
    /// Every regular `*.png` file directly inside `dir`, sorted by path.
    pub fn scan_paths(dir: &Path) -> Result<Vec<PathBuf>, ImageError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let is_png = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            if is_png && entry.file_type()?.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Decode and validate every texture in `dir`, in parallel.
    pub fn build(dir: &Path, validator: &TextureValidator) -> Result<Self, PipelineError> {
        let paths = Self::scan_paths(dir)?;

        let verdicts: Vec<(PathBuf, Result<(TileVerdict, Option<TextureTile>), ImageError>)> =
            paths
                .into_par_iter()
                .map(|path| {
                    let result = read_png(&path).map(|bitmap| {
                        let verdict = validator.inspect(&bitmap);
                        let tile = verdict
                            .accepted_average()
                            .map(|avg| TextureTile::new(bitmap.map(|p| p.rgb()), avg));
                        (verdict, tile)
                    });
                    (path, result)
                })
                .collect();

        let mut report = ScanReport {
            scanned: verdicts.len(),
            ..Default::default()
        };
        let mut library = Self {
            paths: Vec::new(),
            tiles: Vec::new(),
            report: None,
        };

        for (path, result) in verdicts {
            match result {
                Ok((_, Some(tile))) => {
                    library.paths.push(path);
                    library.tiles.push(tile);
                }
                Ok((TileVerdict::Transparent, None)) => report.transparent += 1,
                Ok((TileVerdict::Busy { diff, .. }, None)) => {
                    tracing::trace!(path = %path.display(), diff, "Texture too busy");
                    report.busy += 1;
                }
                Ok((TileVerdict::WrongSize { width, height }, None)) => {
                    tracing::debug!(path = %path.display(), width, height, "Texture has wrong size");
                    report.wrong_size += 1;
                }
                Ok((TileVerdict::Accepted { .. }, None)) => {}
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Skipping unreadable texture");
                    report.unreadable += 1;
                }
            }
        }
        report.accepted = library.tiles.len();
        library.report = Some(report);

        tracing::info!(
            dir = %dir.display(),
            scanned = report.scanned,
            accepted = report.accepted,
            transparent = report.transparent,
            busy = report.busy,
            wrong_size = report.wrong_size,
            unreadable = report.unreadable,
            "Scanned texture library"
        );
        Ok(library)
    }

    /// Rebuild tiles from the paths and averages recorded in `cache`.
    ///
    /// Tiles that can no longer be read are skipped, after which a count
    /// that differs from the cache is reported as corruption.
    pub fn from_cache(
        cache: &TextureCache,
        cache_path: &Path,
        validator: &TextureValidator,
    ) -> Result<Self, PipelineError> {
        let loaded: Vec<Option<(PathBuf, TextureTile)>> = cache
            .records
            .par_iter()
            .map(|record| {
                let path = PathBuf::from(&record.path);
                match read_png(&path) {
                    Ok(bitmap)
                        if bitmap.width() == validator.tile_size()
                            && bitmap.height() == validator.tile_size() =>
                    {
                        let tile = TextureTile::new(bitmap.map(|p| p.rgb()), record.average);
                        Some((path, tile))
                    }
                    Ok(bitmap) => {
                        tracing::warn!(
                            path = %path.display(),
                            width = bitmap.width(),
                            height = bitmap.height(),
                            "Cached texture changed size"
                        );
                        None
                    }
                    Err(e) => {
                        tracing::warn!(%e, path = %path.display(), "Cached texture unreadable");
                        None
                    }
                }
            })
            .collect();

        let (paths, tiles): (Vec<_>, Vec<_>) = loaded.into_iter().flatten().unzip();
        if tiles.len() != cache.records.len() {
            return Err(CacheError::Corrupt {
                path: cache_path.to_path_buf(),
                reason: format!(
                    "{} textures loaded for {} cached colors",
                    tiles.len(),
                    cache.records.len()
                ),
            }
            .into());
        }

        tracing::info!(tiles = tiles.len(), "Loaded texture library from cache");
        Ok(Self {
            paths,
            tiles,
            report: None,
        })
    }

    /// Use the cache when it matches the validator, otherwise scan `dir`
    /// and write a fresh cache.
    pub fn load_or_build(
        dir: &Path,
        cache_path: &Path,
        validator: &TextureValidator,
        rebuild: bool,
    ) -> Result<(Self, LibrarySource), PipelineError> {
        if !rebuild {
            match TextureCache::load(cache_path)? {
                Some(cache) if cache.records.is_empty() => {
                    tracing::info!(path = %cache_path.display(), "Texture cache is empty, rescanning");
                }
                Some(cache) if cache.matches(validator.tile_size(), validator.diff_threshold()) => {
                    let library = Self::from_cache(&cache, cache_path, validator)?;
                    return Ok((library, LibrarySource::Cache));
                }
                Some(cache) => {
                    tracing::info!(
                        path = %cache_path.display(),
                        cached_tile_size = cache.tile_size,
                        cached_threshold = cache.diff_threshold,
                        "Texture cache is stale, rebuilding"
                    );
                }
                None => tracing::debug!(path = %cache_path.display(), "No texture cache"),
            }
        }

        let library = Self::build(dir, validator)?;
        library.to_cache(validator).save(cache_path)?;
        Ok((library, LibrarySource::Scan))
    }

    /// Cache contents describing this library.
    pub fn to_cache(&self, validator: &TextureValidator) -> TextureCache {
        let records = self
            .paths
            .iter()
            .zip(&self.tiles)
            .map(|(path, tile)| CacheRecord {
                path: path.to_string_lossy().into_owned(),
                average: tile.average(),
            })
            .collect();
        TextureCache::new(validator.tile_size(), validator.diff_threshold(), records)
    }

    /// Matching palette over the tile averages.
    pub fn palette(&self) -> Result<Palette, MosaicError> {
        lab_mosaic::texture_palette(&self.tiles)
    }

    pub fn tiles(&self) -> &[TextureTile] {
        &self.tiles
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Verdict counts, present when the library came from a scan.
    pub fn report(&self) -> Option<ScanReport> {
        self.report
    }
}
