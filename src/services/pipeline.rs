use std::path::{Path, PathBuf};
use std::time::Instant;

use lab_mosaic::{
    render_atlas, render_quantized, render_textured, Bitmap, CieLab, LabBitmap, LookupTable,
    LookupTableBuilder, StdRgb, StdRgba, TextureValidator,
};

use crate::error::PipelineError;
use crate::imaging::{bilinear_resize, flatten, gaussian_blur, read_png, write_png};
use crate::models::AppConfig;
use crate::services::texture_library::{LibrarySource, TextureLibrary};

pub const TEXTURED_FILE: &str = "textured.png";
pub const QUANTIZED_FILE: &str = "quantized.png";
pub const ATLAS_FILE: &str = "atlas.png";

/// Logs the wall time of a pipeline stage when dropped.
struct StageTimer {
    stage: &'static str,
    start: Instant,
}

impl StageTimer {
    fn start(stage: &'static str) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(stage = self.stage, elapsed_ms, "Stage finished");
    }
}

/// Which pictures a render writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutputs {
    pub textured: bool,
    pub quantized: bool,
    pub atlas: bool,
}

impl Default for RenderOutputs {
    fn default() -> Self {
        Self {
            textured: true,
            quantized: true,
            atlas: true,
        }
    }
}

/// What a render produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub cols: usize,
    pub rows: usize,
    pub textures: Option<usize>,
    pub written: Vec<PathBuf>,
    pub elapsed_ms: f64,
}

/// Source picture → lookup tables → mosaic pictures
pub struct MosaicPipeline {
    config: AppConfig,
    builder: LookupTableBuilder,
    validator: TextureValidator,
}

impl MosaicPipeline {
    pub fn new(config: AppConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let builder = LookupTableBuilder::with_threads(config.block_size, config.threads)?;
        let validator = TextureValidator::new(config.tile_size, config.diff_threshold)?;

        tracing::debug!(
            block_size = config.block_size,
            tile_size = config.tile_size,
            threads = builder.threads(),
            "Pipeline ready"
        );
        Ok(Self {
            config,
            builder,
            validator,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn validator(&self) -> &TextureValidator {
        &self.validator
    }

    /// Flatten, blur and resize a decoded picture, then convert it to Lab.
    pub fn prepare(&self, picture: &Bitmap<StdRgba>) -> LabBitmap {
        let mut rgb = flatten(picture);

        if self.config.blur_radius > 0 {
            let _t = StageTimer::start("blur");
            rgb = gaussian_blur(&rgb, self.config.blur_radius);
        }
        if self.config.scale != 1.0 {
            let _t = StageTimer::start("resize");
            rgb = bilinear_resize(&rgb, self.config.scale);
        }

        let _t = StageTimer::start("to_lab");
        rgb.par_map(CieLab::from)
    }

    /// Read and prepare the source picture at `path`.
    pub fn load_source(&self, path: &Path) -> Result<LabBitmap, PipelineError> {
        let picture = {
            let _t = StageTimer::start("decode");
            read_png(path)?
        };
        tracing::info!(
            path = %path.display(),
            width = picture.width(),
            height = picture.height(),
            "Loaded source picture"
        );
        Ok(self.prepare(&picture))
    }

    /// Load the texture library through the cache.
    pub fn load_textures(&self, rebuild: bool) -> Result<(TextureLibrary, LibrarySource), PipelineError> {
        let _t = StageTimer::start("textures");
        TextureLibrary::load_or_build(
            &self.config.texture_dir,
            &self.config.cache_file,
            &self.validator,
            rebuild,
        )
    }

    /// Lookup table against the configured quantization palette, and the
    /// picture painted from it.
    pub fn quantize(&self, source: &LabBitmap) -> Result<(LookupTable, Bitmap<StdRgb>), PipelineError> {
        let palette = self.config.build_palette()?;
        let table = {
            let _t = StageTimer::start("quantize_table");
            self.builder.build(source, &palette)
        };
        let _t = StageTimer::start("quantize_paint");
        let picture = render_quantized(&table, &palette, self.config.tile_size)?;
        Ok((table, picture))
    }

    /// Lookup table against the texture averages, and the mosaic painted from it.
    pub fn texture(
        &self,
        source: &LabBitmap,
        library: &TextureLibrary,
    ) -> Result<(LookupTable, Bitmap<StdRgb>), PipelineError> {
        let palette = library
            .palette()?
            .with_distance_metric(self.config.distance.into());
        let table = {
            let _t = StageTimer::start("texture_table");
            self.builder.build(source, &palette)
        };
        let _t = StageTimer::start("texture_paint");
        let picture = render_textured(&table, library.tiles(), self.config.tile_size)?;
        Ok((table, picture))
    }

    /// All valid tiles on one square sheet.
    pub fn atlas(&self, library: &TextureLibrary) -> Result<Bitmap<StdRgb>, PipelineError> {
        let _t = StageTimer::start("atlas");
        Ok(render_atlas(library.tiles(), self.config.tile_size)?)
    }

    /// Run the full pipeline on `source` and write the requested pictures
    /// into the configured output directory.
    pub fn render(&self, source: &Path, outputs: RenderOutputs) -> Result<RenderReport, PipelineError> {
        let start = Instant::now();
        let lab = self.load_source(source)?;
        let out_dir = &self.config.output_dir;
        let mut report = RenderReport {
            cols: lab.width().div_ceil(self.config.block_size),
            rows: lab.height().div_ceil(self.config.block_size),
            ..Default::default()
        };

        if outputs.textured || outputs.atlas {
            let (library, origin) = self.load_textures(false)?;
            tracing::info!(tiles = library.len(), source = ?origin, "Texture library ready");
            report.textures = Some(library.len());

            if outputs.textured {
                let (table, picture) = self.texture(&lab, &library)?;
                let used = table.histogram(library.len()).iter().filter(|&&n| n > 0).count();
                tracing::info!(distinct_tiles = used, "Textured mosaic built");
                report.written.push(self.write(out_dir.join(TEXTURED_FILE), &picture)?);
            }
            if outputs.atlas {
                let picture = self.atlas(&library)?;
                report.written.push(self.write(out_dir.join(ATLAS_FILE), &picture)?);
            }
        }

        if outputs.quantized {
            let (_, picture) = self.quantize(&lab)?;
            report.written.push(self.write(out_dir.join(QUANTIZED_FILE), &picture)?);
        }

        report.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            cols = report.cols,
            rows = report.rows,
            files = report.written.len(),
            elapsed_ms = report.elapsed_ms,
            "Render complete"
        );
        Ok(report)
    }

    /// Write `picture` to `path`, honouring `optimize_png`.
    pub fn write(&self, path: PathBuf, picture: &Bitmap<StdRgb>) -> Result<PathBuf, PipelineError> {
        let _t = StageTimer::start("write");
        write_png(&path, picture, self.config.optimize_png)?;
        tracing::info!(path = %path.display(), width = picture.width(), height = picture.height(), "Wrote picture");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_mosaic::PresetPalette;

    use crate::models::PaletteChoice;

    fn pipeline(config: AppConfig) -> MosaicPipeline {
        MosaicPipeline::new(config).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AppConfig {
            block_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            MosaicPipeline::new(config),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_prepare_flattens_and_scales() {
        let p = pipeline(AppConfig {
            scale: 0.5,
            ..Default::default()
        });
        let picture = Bitmap::filled(8, 6, StdRgba::from_u8(0, 0, 0, 0));
        let lab = p.prepare(&picture);

        assert_eq!((lab.width(), lab.height()), (4, 3));
        // Fully transparent pixels become white
        assert!((lab.get(0, 0).l - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_quantize_with_preset() {
        let p = pipeline(AppConfig {
            block_size: 4,
            tile_size: 2,
            palette: PaletteChoice::Preset(PresetPalette::Endesga32),
            ..Default::default()
        });
        let white = CieLab::from(StdRgb::WHITE);
        let source = Bitmap::filled(8, 4, white);
        let (table, picture) = p.quantize(&source).unwrap();

        assert_eq!((table.cols(), table.rows()), (2, 1));
        assert_eq!((picture.width(), picture.height()), (4, 2));
        // Endesga 32 contains pure white
        assert_eq!(picture.get(3, 1), StdRgb::WHITE);
    }

    #[test]
    fn test_stage_timer_drops_cleanly() {
        let t = StageTimer::start("noop");
        assert_eq!(t.stage, "noop");
        drop(t);
    }
}
