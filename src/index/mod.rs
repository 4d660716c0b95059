//! Exact inner-product vector index
//!
//! Vectors live in one row-major `Vec<f32>`; the row number of a vector is
//! the order it was added in and is what `search` returns. Callers keep a
//! parallel record (see [`crate::docstore`]) addressed by the same row.

use crate::error::IndexError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Leading bytes of every persisted index
const MAGIC: [u8; 4] = *b"DVIP";

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// Similarity used to score rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    InnerProduct,
}

/// A search result: row position and its inner product with the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub score: f32,
}

/// Flat (brute-force) index scoring every row by inner product
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIpIndex {
    dimension: usize,
    data: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct IndexFile {
    magic: [u8; 4],
    version: u32,
    metric: Metric,
    dimension: u32,
    rows: u64,
    data: Vec<f32>,
}

impl FlatIpIndex {
    /// Create an empty index for vectors of `dimension` components
    pub fn new(dimension: usize) -> Result<Self, IndexError> {
        if dimension == 0 {
            return Err(IndexError::EmptyDimension);
        }
        Ok(Self {
            dimension,
            data: Vec::new(),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn metric(&self) -> Metric {
        Metric::InnerProduct
    }

    /// Number of vectors stored
    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append `vectors` in order. Nothing is added if any vector has the
    /// wrong dimension.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<(), IndexError> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.len(),
            });
        }

        self.data.reserve(vectors.len() * self.dimension);
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        Ok(())
    }

    /// The stored vector at `position`
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    /// Iterate stored vectors in row order
    pub fn vectors(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dimension)
    }

    /// Up to `k` rows with the highest inner product against `query`,
    /// best first; equal scores are ordered by position.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<Neighbor> = self
            .vectors()
            .enumerate()
            .map(|(position, row)| Neighbor {
                position,
                score: dot(row, query),
            })
            .collect();

        let by_rank = |a: &Neighbor, b: &Neighbor| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.position.cmp(&b.position))
        };

        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, by_rank);
            scored.truncate(k);
        }
        scored.sort_by(by_rank);
        Ok(scored)
    }

    /// Encode into the on-disk format
    pub fn to_bytes(&self) -> Result<Vec<u8>, IndexError> {
        let file = IndexFile {
            magic: MAGIC,
            version: FORMAT_VERSION,
            metric: self.metric(),
            dimension: self.dimension as u32,
            rows: self.len() as u64,
            data: self.data.clone(),
        };
        bincode::serialize(&file).map_err(|e| IndexError::Encode {
            path: "<memory>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Decode from the on-disk format, checking header and payload length
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IndexError> {
        if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
            return Err(IndexError::InvalidFormat("missing DVIP header".to_string()));
        }

        let file: IndexFile =
            bincode::deserialize(bytes).map_err(|e| IndexError::Corrupted(e.to_string()))?;

        if file.version != FORMAT_VERSION {
            return Err(IndexError::UnsupportedVersion(file.version));
        }
        if file.dimension == 0 {
            return Err(IndexError::EmptyDimension);
        }

        let dimension = file.dimension as usize;
        let expected = (file.rows as usize)
            .checked_mul(dimension)
            .ok_or_else(|| IndexError::Corrupted("row count overflows".to_string()))?;
        if file.data.len() != expected {
            return Err(IndexError::Corrupted(format!(
                "header says {} rows of {} but payload holds {} values",
                file.rows,
                dimension,
                file.data.len()
            )));
        }

        Ok(Self {
            dimension,
            data: file.data,
        })
    }

    /// Write the index to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let bytes = self.to_bytes().map_err(|e| match e {
            IndexError::Encode { reason, .. } => IndexError::Encode {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;

        crate::paths::write_atomic(path, &bytes).map_err(|source| IndexError::Io {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!("Wrote {} vectors to {:?}", self.len(), path);
        Ok(())
    }

    /// Read an index previously written by [`FlatIpIndex::save`]
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let bytes = std::fs::read(path).map_err(|source| IndexError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
