use std::path::PathBuf;

use lab_mosaic::MosaicError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error in {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Image error: {0}")]
    Mosaic(#[from] MosaicError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(
        "Texture cache {} is corrupt ({reason}). Delete the file and run again to rebuild it.",
        path.display()
    )]
    Corrupt { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Mosaic error: {0}")]
    Mosaic(#[from] MosaicError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_mosaic::PaletteError;

    #[test]
    fn test_image_error_decode() {
        let error = ImageError::Decode {
            path: PathBuf::from("tiles/moss.png"),
            message: "unexpected EOF".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "PNG decode error in tiles/moss.png: unexpected EOF"
        );
    }

    #[test]
    fn test_image_error_unsupported_dimensions() {
        let error = ImageError::UnsupportedDimensions {
            width: 0,
            height: 480,
        };
        assert_eq!(error.to_string(), "Unsupported dimensions: 0x480");
    }

    #[test]
    fn test_cache_error_corrupt_names_file() {
        let error = CacheError::Corrupt {
            path: PathBuf::from("texture.cache"),
            reason: "checksum mismatch".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Texture cache texture.cache is corrupt (checksum mismatch). \
             Delete the file and run again to rebuild it."
        );
    }

    #[test]
    fn test_pipeline_error_from_mosaic_error() {
        let mosaic: MosaicError = PaletteError::EmptyPalette.into();
        let error: PipelineError = mosaic.into();
        match error {
            PipelineError::Mosaic(MosaicError::Palette(PaletteError::EmptyPalette)) => {}
            other => panic!("Expected Mosaic variant, got {other:?}"),
        }
    }

    #[test]
    fn test_pipeline_error_config() {
        let error = PipelineError::Config("block_size must be at least 1".to_string());
        assert_eq!(
            error.to_string(),
            "Config error: block_size must be at least 1"
        );
    }
}
