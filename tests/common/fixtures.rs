//! Scratch workspaces with texture libraries and source pictures.

use std::path::{Path, PathBuf};

use lab_mosaic::{Bitmap, StdRgb, StdRgba};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tempfile::TempDir;
use tessera::imaging::encode_png;
use tessera::models::AppConfig;

/// Tile edge length used throughout the integration tests
pub const TILE: usize = 4;

pub const RED: StdRgb = StdRgb::from_u8(255, 0, 0);
pub const GREEN: StdRgb = StdRgb::from_u8(0, 200, 0);
pub const BLUE: StdRgb = StdRgb::from_u8(0, 0, 255);

/// File names of the standard library, in scan order
pub mod names {
    pub const RED: &str = "a_red.png";
    pub const GREEN: &str = "b_green.png";
    pub const BLUE: &str = "c_blue.png";
    pub const GLASS: &str = "d_glass.png";
    pub const CHECKER: &str = "e_checker.png";
    pub const BIG: &str = "f_big.png";
    pub const BROKEN: &str = "g_broken.png";
}

/// A temp directory laid out like a project: textures/, output/, a cache file.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("textures")).unwrap();
        Self { dir }
    }

    /// A workspace whose texture directory holds the standard library:
    /// three solid tiles plus one tile for every rejection reason.
    pub fn with_library() -> Self {
        let ws = Self::new();
        let t = ws.textures();
        write_rgb(&t.join(names::RED), &Bitmap::filled(TILE, TILE, RED));
        write_rgb(&t.join(names::GREEN), &Bitmap::filled(TILE, TILE, GREEN));
        write_rgb(&t.join(names::BLUE), &Bitmap::filled(TILE, TILE, BLUE));

        let mut glass = Bitmap::filled(TILE, TILE, StdRgba::from_u8(90, 90, 90, 255));
        glass.set(1, 2, StdRgba::from_u8(90, 90, 90, 128));
        write_rgba(&t.join(names::GLASS), &glass);

        write_rgb(&t.join(names::CHECKER), &checkerboard(TILE));
        write_rgb(&t.join(names::BIG), &Bitmap::filled(TILE * 2, TILE * 2, RED));
        std::fs::write(t.join(names::BROKEN), b"\x89PNG but not really").unwrap();

        // Ignored entirely
        std::fs::write(t.join("notes.txt"), b"not a texture").unwrap();
        std::fs::create_dir_all(t.join("nested.png")).unwrap();
        ws
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn textures(&self) -> PathBuf {
        self.root().join("textures")
    }

    pub fn output(&self) -> PathBuf {
        self.root().join("output")
    }

    pub fn cache(&self) -> PathBuf {
        self.root().join("texture.cache")
    }

    /// Config pointing at this workspace, with 4 px blocks and tiles.
    pub fn config(&self) -> AppConfig {
        AppConfig {
            texture_dir: self.textures(),
            output_dir: self.output(),
            cache_file: self.cache(),
            block_size: TILE,
            tile_size: TILE,
            ..Default::default()
        }
    }

    /// Write a source picture and return its path.
    pub fn source(&self, name: &str, picture: &Bitmap<StdRgb>) -> PathBuf {
        let path = self.root().join(name);
        write_rgb(&path, picture);
        path
    }
}

/// Black and white alternating pixels.
pub fn checkerboard(size: usize) -> Bitmap<StdRgb> {
    Bitmap::from_fn(size, size, |x, y| {
        if (x + y) % 2 == 0 {
            StdRgb::BLACK
        } else {
            StdRgb::WHITE
        }
    })
}

/// Left half `left`, right half `right`.
pub fn split_picture(width: usize, height: usize, left: StdRgb, right: StdRgb) -> Bitmap<StdRgb> {
    Bitmap::from_fn(width, height, |x, _| if x < width / 2 { left } else { right })
}

/// Seeded random noise.
pub fn noise(width: usize, height: usize, seed: u64) -> Bitmap<StdRgb> {
    let mut rng = StdRng::seed_from_u64(seed);
    Bitmap::from_fn(width, height, |_, _| {
        StdRgb::from_u8(rng.gen(), rng.gen(), rng.gen())
    })
}

pub fn write_rgb(path: &Path, bitmap: &Bitmap<StdRgb>) {
    std::fs::write(path, encode_png(bitmap).unwrap()).unwrap();
}

pub fn write_rgba(path: &Path, bitmap: &Bitmap<StdRgba>) {
    let data: Vec<u8> = bitmap
        .pixels()
        .iter()
        .flat_map(|p| [p.r, p.g, p.b, p.a])
        .collect();
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, bitmap.width() as u32, bitmap.height() as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&data).unwrap();
    }
    std::fs::write(path, buf).unwrap();
}

/// Decode a written picture, dropping alpha.
pub fn read_rgb(path: &Path) -> Bitmap<StdRgb> {
    tessera::imaging::flatten(&tessera::imaging::read_png(path).unwrap())
}
