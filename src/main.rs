use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lab_mosaic::PresetPalette;
use tessera::models::{AppConfig, DistanceChoice, PaletteChoice, CONFIG_ENV};
use tessera::services::{LibrarySource, MosaicPipeline, RenderOutputs, TextureCache};

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Tessera - texture mosaics matched in CIE L*a*b*")]
struct Cli {
    /// Config file (defaults to $TESSERA_CONFIG, then ./tessera.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the textured mosaic, quantized picture and texture atlas
    Render {
        /// Source PNG
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip textured.png
        #[arg(long)]
        no_textured: bool,

        /// Skip quantized.png
        #[arg(long)]
        no_quantized: bool,

        /// Skip atlas.png
        #[arg(long)]
        no_atlas: bool,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Write only the quantized picture
    Quantize {
        /// Source PNG
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Scan and validate the texture library, refreshing the cache
    Textures {
        /// Texture directory
        #[arg(short, long)]
        textures: Option<PathBuf>,

        /// Tile edge length in pixels
        #[arg(long)]
        tile_size: Option<usize>,

        /// Uniformity threshold
        #[arg(long)]
        threshold: Option<f64>,

        /// Ignore the cache and rescan
        #[arg(long)]
        rebuild: bool,
    },
    /// List preset palettes
    Palettes,
    /// Manage the texture cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Delete the cache file
    Clear,
}

/// Settings shared by the rendering commands; each overrides the config file.
#[derive(Args, Debug, Default)]
struct Overrides {
    /// Texture directory
    #[arg(short, long)]
    textures: Option<PathBuf>,

    /// Source pixels per mosaic cell
    #[arg(short, long)]
    block_size: Option<usize>,

    /// Output pixels per mosaic cell (texture tile size)
    #[arg(long)]
    tile_size: Option<usize>,

    /// Uniformity threshold for texture tiles
    #[arg(long)]
    threshold: Option<f64>,

    /// Palette: grid, custom, or a preset name (see `tessera palettes`)
    #[arg(short, long)]
    palette: Option<PaletteChoice>,

    /// Gaussian pre-blur strength (0 disables)
    #[arg(long)]
    blur: Option<usize>,

    /// Bilinear pre-resize factor
    #[arg(long)]
    scale: Option<f64>,

    /// Color distance
    #[arg(long, value_enum)]
    distance: Option<DistanceChoice>,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Re-compress output PNGs with oxipng
    #[arg(long)]
    optimize: bool,
}

impl Overrides {
    fn apply(self, config: &mut AppConfig) {
        if let Some(v) = self.textures {
            config.texture_dir = v;
        }
        if let Some(v) = self.block_size {
            config.block_size = v;
        }
        if let Some(v) = self.tile_size {
            config.tile_size = v;
        }
        if let Some(v) = self.threshold {
            config.diff_threshold = v;
        }
        if let Some(v) = self.palette {
            config.palette = v;
        }
        if let Some(v) = self.blur {
            config.blur_radius = v;
        }
        if let Some(v) = self.scale {
            config.scale = v;
        }
        if let Some(v) = self.distance {
            config.distance = v;
        }
        if let Some(v) = self.threads {
            config.threads = v;
        }
        if self.optimize {
            config.optimize_png = true;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        run_status_command(cli.config.as_deref());
        return Ok(());
    };

    init_tracing();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    match command {
        Commands::Render {
            source,
            output,
            no_textured,
            no_quantized,
            no_atlas,
            overrides,
        } => {
            overrides.apply(&mut config);
            if let Some(output) = output {
                config.output_dir = output;
            }
            let source = resolve_source(source, &config)?;
            let outputs = RenderOutputs {
                textured: !no_textured,
                quantized: !no_quantized,
                atlas: !no_atlas,
            };
            run_render_command(config, &source, outputs)
        }
        Commands::Quantize {
            source,
            output,
            overrides,
        } => {
            overrides.apply(&mut config);
            let source = resolve_source(source, &config)?;
            run_quantize_command(config, &source, output)
        }
        Commands::Textures {
            textures,
            tile_size,
            threshold,
            rebuild,
        } => {
            Overrides {
                textures,
                tile_size,
                threshold,
                ..Default::default()
            }
            .apply(&mut config);
            run_textures_command(config, rebuild)
        }
        Commands::Palettes => {
            run_palettes_command();
            Ok(())
        }
        Commands::Cache {
            action: CacheAction::Clear,
        } => run_cache_clear_command(&config.cache_file),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tessera=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn resolve_source(flag: Option<PathBuf>, config: &AppConfig) -> anyhow::Result<PathBuf> {
    flag.or_else(|| config.source.clone())
        .context("no source picture: pass --source or set `source` in the config")
}

fn run_render_command(config: AppConfig, source: &Path, outputs: RenderOutputs) -> anyhow::Result<()> {
    let pipeline = MosaicPipeline::new(config)?;
    let report = pipeline
        .render(source, outputs)
        .with_context(|| format!("rendering {}", source.display()))?;

    println!(
        "Mosaic of {}x{} cells in {:.0} ms",
        report.cols, report.rows, report.elapsed_ms
    );
    for path in &report.written {
        println!("  {}", path.display());
    }
    Ok(())
}

fn run_quantize_command(config: AppConfig, source: &Path, output: PathBuf) -> anyhow::Result<()> {
    let pipeline = MosaicPipeline::new(config)?;
    let lab = pipeline
        .load_source(source)
        .with_context(|| format!("reading {}", source.display()))?;
    let (table, picture) = pipeline.quantize(&lab)?;
    let path = pipeline
        .write(output, &picture)
        .context("writing quantized picture")?;

    println!(
        "Quantized {}x{} cells into {}",
        table.cols(),
        table.rows(),
        path.display()
    );
    Ok(())
}

fn run_textures_command(config: AppConfig, rebuild: bool) -> anyhow::Result<()> {
    let pipeline = MosaicPipeline::new(config)?;
    let (library, origin) = pipeline
        .load_textures(rebuild)
        .with_context(|| format!("loading textures from {}", pipeline.config().texture_dir.display()))?;

    let from = match origin {
        LibrarySource::Cache => "cache",
        LibrarySource::Scan => "scan",
    };
    println!("{} valid textures ({from})", library.len());
    if let Some(report) = library.report() {
        println!("  scanned:     {}", report.scanned);
        println!("  transparent: {}", report.transparent);
        println!("  too busy:    {}", report.busy);
        println!("  wrong size:  {}", report.wrong_size);
        println!("  unreadable:  {}", report.unreadable);
    }
    println!("Cache: {}", pipeline.config().cache_file.display());
    Ok(())
}

fn run_palettes_command() {
    println!("Preset palettes:");
    for preset in PresetPalette::ALL {
        println!("  {:<14} {:>3} colors", preset.name(), preset.colors().len());
    }
    println!("\nAlso: grid (every RGB triple on a grid_step grid), custom (config colors)");
}

fn run_cache_clear_command(path: &Path) -> anyhow::Result<()> {
    let removed = TextureCache::clear(path)
        .with_context(|| format!("removing {}", path.display()))?;
    if removed {
        println!("Removed {}", path.display());
    } else {
        println!("No cache at {}", path.display());
    }
    Ok(())
}

/// Show version, config source and effective settings
fn run_status_command(explicit: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Tessera v{VERSION}");
    println!("Texture mosaics matched in CIE L*a*b*\n");

    println!("Environment Variables:");
    println!(
        "  {CONFIG_ENV} = {}",
        std::env::var(CONFIG_ENV).as_deref().unwrap_or("(not set)")
    );

    let (config, source) = match explicit.map(Path::to_path_buf).or_else(AppConfig::discover) {
        Some(path) => match AppConfig::from_file(&path) {
            Ok(config) => (config, path.display().to_string()),
            Err(e) => (AppConfig::default(), format!("defaults ({e})")),
        },
        None => (AppConfig::default(), "defaults".to_string()),
    };

    println!("\nConfiguration: {source}");
    let show = |p: &Option<PathBuf>| p.as_ref().map_or("(not set)".to_string(), |p| p.display().to_string());
    println!("  source:         {}", show(&config.source));
    println!("  texture_dir:    {}", config.texture_dir.display());
    println!("  output_dir:     {}", config.output_dir.display());
    println!("  cache_file:     {}", config.cache_file.display());
    println!("  block_size:     {}", config.block_size);
    println!("  tile_size:      {}", config.tile_size);
    println!("  diff_threshold: {}", config.diff_threshold);
    println!("  blur_radius:    {}", config.blur_radius);
    println!("  scale:          {}", config.scale);
    println!("  palette:        {}", config.palette);
    println!("  distance:       {}", config.distance);
    println!("  threads:        {}", config.threads);
    println!("  optimize_png:   {}", config.optimize_png);

    println!("\nCommands:");
    println!("  tessera render     Build textured, quantized and atlas pictures");
    println!("  tessera quantize   Write only the quantized picture");
    println!("  tessera textures   Validate the texture library and refresh the cache");
    println!("  tessera palettes   List preset palettes");
    println!("  tessera cache clear  Delete the texture cache");
    println!("\nRun 'tessera --help' for more details.");
}
