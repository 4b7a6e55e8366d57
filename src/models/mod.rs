pub mod config;

pub use config::{AppConfig, DistanceChoice, PaletteChoice, CONFIG_ENV, DEFAULT_CONFIG_FILE};
