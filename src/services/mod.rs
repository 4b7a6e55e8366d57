pub mod pipeline;
pub mod texture_cache;
pub mod texture_library;

pub use pipeline::{MosaicPipeline, RenderOutputs, RenderReport, ATLAS_FILE, QUANTIZED_FILE, TEXTURED_FILE};
pub use texture_cache::{CacheRecord, TextureCache, CACHE_MAGIC, CACHE_VERSION};
pub use texture_library::{LibrarySource, ScanReport, TextureLibrary};
