//! The block -> palette index grid

use crate::error::MosaicError;

/// One palette index per block of a source bitmap, row-major.
///
/// A table built with block size `B` from a `W x H` bitmap has
/// `ceil(W / B)` columns and `ceil(H / B)` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    cols: usize,
    rows: usize,
    block_size: usize,
    indices: Vec<usize>,
}

impl LookupTable {
    /// Assemble a table from a row-major index buffer.
    ///
    /// # Errors
    ///
    /// [`MosaicError::BitmapSize`] if `indices.len() != cols * rows`.
    pub fn from_indices(
        cols: usize,
        rows: usize,
        block_size: usize,
        indices: Vec<usize>,
    ) -> Result<Self, MosaicError> {
        if indices.len() != cols * rows {
            return Err(MosaicError::BitmapSize {
                width: cols,
                height: rows,
                len: indices.len(),
            });
        }
        Ok(Self {
            cols,
            rows,
            block_size,
            indices,
        })
    }

    pub(crate) fn from_parts(cols: usize, rows: usize, block_size: usize, indices: Vec<usize>) -> Self {
        debug_assert_eq!(indices.len(), cols * rows);
        Self {
            cols,
            rows,
            block_size,
            indices,
        }
    }

    /// Palette index of the block at (`col`, `row`).
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the table.
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> usize {
        assert!(col < self.cols && row < self.rows, "cell ({col}, {row}) out of bounds");
        self.indices[row * self.cols + col]
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Side length in source pixels of the blocks this table was built from.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// All indices, row-major.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// How often each of `palette_len` entries is used.
    ///
    /// Indices at or beyond `palette_len` are not counted.
    pub fn histogram(&self, palette_len: usize) -> Vec<usize> {
        let mut counts = vec![0; palette_len];
        for &idx in &self.indices {
            if let Some(count) = counts.get_mut(idx) {
                *count += 1;
            }
        }
        counts
    }

    /// Largest index in the table, `None` when empty.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.iter().copied().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_indices_checks_shape() {
        let table = LookupTable::from_indices(3, 2, 16, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(table.get(2, 0), 2);
        assert_eq!(table.get(0, 1), 3);
        assert!(LookupTable::from_indices(3, 2, 16, vec![0; 5]).is_err());
    }

    #[test]
    fn test_histogram() {
        let table = LookupTable::from_indices(2, 2, 8, vec![1, 1, 0, 7]).unwrap();
        assert_eq!(table.histogram(3), vec![1, 2, 0]);
        assert_eq!(table.max_index(), Some(7));
    }
}
