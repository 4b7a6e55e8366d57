//! On-disk cache of validated texture averages.
//!
//! Layout, little-endian:
//!
//! ```text
//! "TSRC" | u32 version | u32 tile_size | f32 diff_threshold | u32 count
//! count x ( u32 path_len | path (UTF-8) | f32 L | f32 a | f32 b )
//! 32-byte SHA-256 of everything above
//! ```

use std::path::{Path, PathBuf};

use lab_mosaic::CieLab;
use sha2::{Digest, Sha256};

use crate::error::CacheError;
use crate::fsutil::write_atomic;

pub const CACHE_MAGIC: [u8; 4] = *b"TSRC";
pub const CACHE_VERSION: u32 = 1;

const HEADER_LEN: usize = 4 + 4 + 4 + 4 + 4;
const CHECKSUM_LEN: usize = 32;

/// One accepted texture: where it lives and its Lab average.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRecord {
    pub path: String,
    pub average: CieLab,
}

/// Cached texture averages plus the settings they were computed with.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureCache {
    pub tile_size: u32,
    pub diff_threshold: f32,
    pub records: Vec<CacheRecord>,
}

impl TextureCache {
    pub fn new(tile_size: usize, diff_threshold: f64, records: Vec<CacheRecord>) -> Self {
        Self {
            tile_size: tile_size as u32,
            diff_threshold: diff_threshold as f32,
            records,
        }
    }

    /// True when this cache was written for the given validator settings.
    pub fn matches(&self, tile_size: usize, diff_threshold: f64) -> bool {
        self.tile_size as usize == tile_size && self.diff_threshold == diff_threshold as f32
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + CHECKSUM_LEN + self.records.len() * 48);
        buf.extend_from_slice(&CACHE_MAGIC);
        buf.extend_from_slice(&CACHE_VERSION.to_le_bytes());
        buf.extend_from_slice(&self.tile_size.to_le_bytes());
        buf.extend_from_slice(&self.diff_threshold.to_le_bytes());
        buf.extend_from_slice(&(self.records.len() as u32).to_le_bytes());

        for record in &self.records {
            buf.extend_from_slice(&(record.path.len() as u32).to_le_bytes());
            buf.extend_from_slice(record.path.as_bytes());
            for v in record.average.to_array() {
                buf.extend_from_slice(&(v as f32).to_le_bytes());
            }
        }

        let checksum = Sha256::digest(&buf);
        buf.extend_from_slice(&checksum);
        buf
    }

    /// Parse cache bytes. `path` only labels errors.
    pub fn decode(bytes: &[u8], path: &Path) -> Result<Self, CacheError> {
        let corrupt = |reason: String| CacheError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };

        if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
            return Err(corrupt(format!("file too short ({} bytes)", bytes.len())));
        }
        if bytes[..4] != CACHE_MAGIC {
            return Err(corrupt("bad magic".to_string()));
        }

        let (body, stored) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
        let computed = Sha256::digest(body);
        if computed.as_slice() != stored {
            return Err(corrupt(format!(
                "checksum mismatch: stored {}, computed {}",
                hex::encode(&stored[..8]),
                hex::encode(&computed[..8])
            )));
        }

        let mut reader = Reader::new(&body[4..]);
        let version = reader.u32().map_err(&corrupt)?;
        if version != CACHE_VERSION {
            return Err(corrupt(format!("unsupported version {version}")));
        }
        let tile_size = reader.u32().map_err(&corrupt)?;
        let diff_threshold = reader.f32().map_err(&corrupt)?;
        let count = reader.u32().map_err(&corrupt)? as usize;

        let mut records = Vec::with_capacity(count.min(body.len() / 16));
        for i in 0..count {
            let record = reader
                .record()
                .map_err(|e| corrupt(format!("record {i}: {e}")))?;
            records.push(record);
        }
        if !reader.is_empty() {
            return Err(corrupt(format!(
                "{} trailing bytes after {count} records",
                reader.remaining()
            )));
        }

        Ok(Self {
            tile_size,
            diff_threshold,
            records,
        })
    }

    /// Load the cache at `path`, `None` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, CacheError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let cache = Self::decode(&bytes, path)?;
        tracing::debug!(
            path = %path.display(),
            records = cache.records.len(),
            checksum = %hex::encode(&bytes[bytes.len() - CHECKSUM_LEN..]),
            "Read texture cache"
        );
        Ok(Some(cache))
    }

    /// Write atomically to `path`.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        write_atomic(path, &self.encode())?;
        tracing::debug!(path = %path.display(), records = self.records.len(), "Wrote texture cache");
        Ok(())
    }

    /// Delete the cache file. Returns whether a file was removed.
    pub fn clear(path: &Path) -> Result<bool, CacheError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Record paths as filesystem paths.
    pub fn paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.records.iter().map(|r| PathBuf::from(&r.path))
    }
}

/// Bounds-checked little-endian cursor.
struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], String> {
        if self.buf.len() < n {
            return Err(format!("truncated: wanted {n} bytes, {} left", self.buf.len()));
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], String> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u32(&mut self) -> Result<u32, String> {
        self.array().map(u32::from_le_bytes)
    }

    fn f32(&mut self) -> Result<f32, String> {
        self.array().map(f32::from_le_bytes)
    }

    fn record(&mut self) -> Result<CacheRecord, String> {
        let len = self.u32()? as usize;
        let path = std::str::from_utf8(self.take(len)?)
            .map_err(|e| format!("path is not UTF-8: {e}"))?
            .to_string();
        let l = self.f32()? as f64;
        let a = self.f32()? as f64;
        let b = self.f32()? as f64;
        Ok(CacheRecord {
            path,
            average: CieLab::new(l, a, b),
        })
    }

    fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
