//! LookupTableBuilder -- partitions a bitmap into blocks and matches each
//! block's average against a palette.

use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::table::LookupTable;
use crate::bitmap::Bitmap;
use crate::error::MosaicError;
use crate::palette::Palette;
use crate::sampler::{BlockSampler, ToLab};

/// Builds block -> palette index tables on a reusable worker pool.
///
/// The builder owns a rayon pool sized at construction. Each row of blocks
/// is one task; tasks write disjoint rows of the output, so no locking is
/// involved. [`build`](Self::build) takes `&self` and can be called any
/// number of times without respawning threads.
///
/// # Example
///
/// ```
/// use lab_mosaic::{Bitmap, CieLab, LookupTableBuilder, Palette, StdRgb};
///
/// let palette = Palette::from_srgb(&[StdRgb::from_u8(255, 0, 0), StdRgb::from_u8(0, 0, 255)]).unwrap();
/// let bitmap = Bitmap::filled(32, 32, CieLab::from(StdRgb::from_u8(200, 50, 50)));
///
/// let builder = LookupTableBuilder::new(16).unwrap();
/// let table = builder.build(&bitmap, &palette);
/// assert_eq!(table.indices(), &[0, 0, 0, 0]);
/// ```
#[derive(Clone)]
pub struct LookupTableBuilder {
    sampler: BlockSampler,
    pool: Arc<ThreadPool>,
}

impl std::fmt::Debug for LookupTableBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTableBuilder")
            .field("block_size", &self.sampler.block_size())
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

impl LookupTableBuilder {
    /// A builder with one worker per available hardware thread.
    ///
    /// # Errors
    ///
    /// [`MosaicError::InvalidBlockSize`] for a block size of 0,
    /// [`MosaicError::ThreadPool`] if the pool cannot be started.
    pub fn new(block_size: usize) -> Result<Self, MosaicError> {
        Self::with_threads(block_size, 0)
    }

    /// A builder with `threads` workers; 0 picks the hardware default.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_threads(block_size: usize, threads: usize) -> Result<Self, MosaicError> {
        if block_size == 0 {
            return Err(MosaicError::InvalidBlockSize(block_size));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("lookup-{i}"))
            .build()
            .map_err(|e| MosaicError::ThreadPool(e.to_string()))?;
        Ok(Self {
            sampler: BlockSampler::new(block_size),
            pool: Arc::new(pool),
        })
    }

    /// A builder that shares an existing pool.
    ///
    /// # Errors
    ///
    /// [`MosaicError::InvalidBlockSize`] for a block size of 0.
    pub fn with_pool(block_size: usize, pool: Arc<ThreadPool>) -> Result<Self, MosaicError> {
        if block_size == 0 {
            return Err(MosaicError::InvalidBlockSize(block_size));
        }
        Ok(Self {
            sampler: BlockSampler::new(block_size),
            pool,
        })
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.sampler.block_size()
    }

    /// Number of worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// The underlying pool, for sharing with other builders.
    pub fn pool(&self) -> &Arc<ThreadPool> {
        &self.pool
    }

    /// Match every block of `bitmap` against `palette`.
    ///
    /// Cell (`col`, `row`) holds the index of the palette entry nearest
    /// (under the palette's distance metric) to the mean Lab color of the
    /// block at pixel origin (`col * B`, `row * B`). Edge blocks are
    /// averaged over their in-bounds pixels only. Returns once every row is
    /// complete.
    pub fn build<P>(&self, bitmap: &Bitmap<P>, palette: &Palette) -> LookupTable
    where
        P: ToLab + Send + Sync,
    {
        let sampler = self.sampler;
        let (cols, rows) = sampler.grid_shape(bitmap.width(), bitmap.height());
        let mut indices = vec![0usize; cols * rows];

        if cols > 0 {
            self.pool.install(|| {
                indices
                    .par_chunks_mut(cols)
                    .enumerate()
                    .for_each(|(row, out)| {
                        for (col, cell) in out.iter_mut().enumerate() {
                            let average = sampler.average_block(bitmap, col, row);
                            *cell = palette.find_nearest(average).0;
                        }
                    });
            });
        }

        LookupTable::from_parts(cols, rows, sampler.block_size(), indices)
    }
}
