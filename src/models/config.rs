use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use lab_mosaic::{DistanceMetric, Palette, PaletteError, PresetPalette};
use serde::Deserialize;

use crate::error::PipelineError;

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "TESSERA_CONFIG";

/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tessera.yaml";

/// Application configuration loaded from tessera.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Source picture
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Directory scanned for `*.png` texture tiles
    #[serde(default = "default_texture_dir")]
    pub texture_dir: PathBuf,

    /// Where textured.png, quantized.png and atlas.png are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Texture cache location
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,

    /// Source pixels averaged into one mosaic cell
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Edge length of texture tiles, and of each output cell
    #[serde(default = "default_tile_size")]
    pub tile_size: usize,

    /// Maximum cumulative squared Lab spread of an accepted tile
    #[serde(default = "default_diff_threshold")]
    pub diff_threshold: f64,

    /// Gaussian pre-blur kernel size in pixels (0 disables)
    #[serde(default)]
    pub blur_radius: usize,

    /// Bilinear pre-resize factor
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Palette for the quantized picture
    #[serde(default)]
    pub palette: PaletteChoice,

    /// Grid spacing when `palette: grid`
    #[serde(default = "default_grid_step")]
    pub grid_step: usize,

    /// Hex colors when `palette: custom`
    #[serde(default)]
    pub colors: Vec<String>,

    /// Color distance used for matching
    #[serde(default)]
    pub distance: DistanceChoice,

    /// Worker threads for lookup table builds (0 = one per core)
    #[serde(default)]
    pub threads: usize,

    /// Re-compress written PNGs with oxipng
    #[serde(default)]
    pub optimize_png: bool,
}

fn default_texture_dir() -> PathBuf {
    PathBuf::from("textures")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_cache_file() -> PathBuf {
    PathBuf::from("texture.cache")
}

fn default_block_size() -> usize {
    16
}

fn default_tile_size() -> usize {
    lab_mosaic::DEFAULT_TILE_SIZE
}

fn default_diff_threshold() -> f64 {
    lab_mosaic::DEFAULT_DIFF_THRESHOLD
}

fn default_scale() -> f64 {
    1.0
}

fn default_grid_step() -> usize {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: None,
            texture_dir: default_texture_dir(),
            output_dir: default_output_dir(),
            cache_file: default_cache_file(),
            block_size: default_block_size(),
            tile_size: default_tile_size(),
            diff_threshold: default_diff_threshold(),
            blur_radius: 0,
            scale: default_scale(),
            palette: PaletteChoice::default(),
            grid_step: default_grid_step(),
            colors: Vec::new(),
            distance: DistanceChoice::default(),
            threads: 0,
            optimize_png: false,
        }
    }
}

/// Which palette the quantized picture is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum PaletteChoice {
    /// Every RGB triple on a `grid_step` grid
    #[default]
    Grid,
    /// A named preset
    Preset(PresetPalette),
    /// The `colors` list of the config
    Custom,
}

impl FromStr for PaletteChoice {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "custom" => Ok(Self::Custom),
            other => other.parse().map(Self::Preset),
        }
    }
}

impl TryFrom<String> for PaletteChoice {
    type Error = PaletteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for PaletteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => f.write_str("grid"),
            Self::Preset(preset) => write!(f, "{preset}"),
            Self::Custom => f.write_str("custom"),
        }
    }
}

/// Color distance selectable from config and CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DistanceChoice {
    #[default]
    Euclidean,
    Ciede2000,
}

impl From<DistanceChoice> for DistanceMetric {
    fn from(choice: DistanceChoice) -> Self {
        match choice {
            DistanceChoice::Euclidean => DistanceMetric::Euclidean,
            DistanceChoice::Ciede2000 => DistanceMetric::Ciede2000,
        }
    }
}

impl fmt::Display for DistanceChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euclidean => f.write_str("euclidean"),
            Self::Ciede2000 => f.write_str("ciede2000"),
        }
    }
}

impl AppConfig {
    /// Resolve and load the configuration.
    ///
    /// An explicit path must load; otherwise `TESSERA_CONFIG` and then
    /// `./tessera.yaml` are tried, falling back to defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self, PipelineError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        Ok(match Self::discover() {
            Some(path) => Self::load_or_default(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        })
    }

    /// The config file that would be used without `--config`.
    pub fn discover() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.is_file().then_some(local)
    }

    /// Read and parse `path`, failing on any error.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_yaml(&content).map_err(|e| match e {
            PipelineError::Config(msg) => {
                PipelineError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Like [`from_file`](Self::from_file), but warns and uses defaults on failure.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML and validate the result. An empty document yields defaults.
    pub fn from_yaml(content: &str) -> Result<Self, PipelineError> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| PipelineError::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.block_size == 0 {
            return Err(PipelineError::Config("block_size must be at least 1".into()));
        }
        if self.tile_size == 0 {
            return Err(PipelineError::Config("tile_size must be at least 1".into()));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(PipelineError::Config(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if !(self.diff_threshold.is_finite() && self.diff_threshold >= 0.0) {
            return Err(PipelineError::Config(format!(
                "diff_threshold must be non-negative, got {}",
                self.diff_threshold
            )));
        }
        if self.palette == PaletteChoice::Grid && !(1..=255).contains(&self.grid_step) {
            return Err(PipelineError::Config(format!(
                "grid_step must be in 1..=255, got {}",
                self.grid_step
            )));
        }
        if self.palette == PaletteChoice::Custom && self.colors.is_empty() {
            return Err(PipelineError::Config(
                "palette: custom needs a non-empty colors list".into(),
            ));
        }
        Ok(())
    }

    /// The quantization palette, with the configured distance metric.
    pub fn build_palette(&self) -> Result<Palette, PipelineError> {
        let palette = match self.palette {
            PaletteChoice::Grid => Palette::quantization_grid(self.grid_step),
            PaletteChoice::Preset(preset) => Ok(preset.palette()),
            PaletteChoice::Custom => Palette::from_hex(&self.colors),
        }
        .map_err(lab_mosaic::MosaicError::from)?;
        Ok(palette.with_distance_metric(self.distance.into()))
    }
}
