//! Exact nearest-neighbor index over squared L2 distance.
//!
//! Vectors are stored row-major in one contiguous buffer; a vector's
//! position is its insertion order. Search is brute force, so results are
//! exact and deterministic: ascending distance, ties by ascending position.
//!
//! On-disk layout (little-endian):
//!
//! ```text
//! magic "CXVI" | version u32 | dimension u64 | count u64 | count * dimension f32
//! ```

use std::io::{Read, Write};
use std::path::Path;

use cxbot_core::IndexError;

const MAGIC: &[u8; 4] = b"CXVI";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// An empty index for vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    /// Build an index from vectors; the first vector fixes the dimension.
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self, IndexError> {
        let dimension = vectors.first().map_or(0, Vec::len);
        let mut index = Self::new(dimension);
        index.data.reserve(dimension * vectors.len());
        for vector in vectors {
            index.add(vector)?;
        }
        Ok(index)
    }

    pub fn add(&mut self, vector: &[f32]) -> Result<(), IndexError> {
        self.check_dimension(vector)?;
        self.data.extend_from_slice(vector);
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k` nearest stored vectors as `(position, squared_distance)`.
    ///
    /// Returns fewer than `k` results when the index is smaller than `k`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, IndexError> {
        if self.is_empty() {
            return Err(IndexError::Empty);
        }
        self.check_dimension(query)?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(position, row)| (position, squared_l2(row, query)))
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        Ok(scored)
    }

    /// Serialize to `writer` in the binary layout above.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), IndexError> {
        let io = |e: std::io::Error| IndexError::Storage(format!("Failed to write index: {e}"));

        writer.write_all(MAGIC).map_err(io)?;
        writer.write_all(&FORMAT_VERSION.to_le_bytes()).map_err(io)?;
        writer
            .write_all(&(self.dimension as u64).to_le_bytes())
            .map_err(io)?;
        writer
            .write_all(&(self.len() as u64).to_le_bytes())
            .map_err(io)?;

        let mut buf = Vec::with_capacity(self.data.len() * 4);
        for value in &self.data {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        writer.write_all(&buf).map_err(io)?;
        writer.flush().map_err(io)
    }

    /// Deserialize an index written by [`FlatIndex::write_to`].
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, IndexError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| IndexError::Storage(format!("Failed to read index: {e}")))?;

        let header_len = MAGIC.len() + 4 + 8 + 8;
        if bytes.len() < header_len {
            return Err(IndexError::Corrupt(format!(
                "index file is {} bytes, shorter than its header",
                bytes.len()
            )));
        }
        if &bytes[..4] != MAGIC {
            return Err(IndexError::Corrupt("bad magic bytes".into()));
        }

        let version = u32::from_le_bytes(le_array(&bytes[4..8]));
        if version != FORMAT_VERSION {
            return Err(IndexError::Corrupt(format!(
                "unsupported index format version {version}"
            )));
        }
        let dimension = u64::from_le_bytes(le_array(&bytes[8..16])) as usize;
        let count = u64::from_le_bytes(le_array(&bytes[16..24])) as usize;

        let body = &bytes[header_len..];
        let expected = dimension
            .checked_mul(count)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| IndexError::Corrupt("index header overflows".into()))?;
        if body.len() != expected {
            return Err(IndexError::Corrupt(format!(
                "expected {expected} bytes of vectors ({count} x {dimension}), found {}",
                body.len()
            )));
        }
        if count > 0 && dimension == 0 {
            return Err(IndexError::Corrupt(
                "non-empty index with zero dimension".into(),
            ));
        }

        let data = body
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes(le_array(b)))
            .collect();
        Ok(Self { dimension, data })
    }

    pub fn persist(&self, path: &Path) -> Result<(), IndexError> {
        let file = std::fs::File::create(path).map_err(|e| {
            IndexError::Storage(format!("Failed to create {}: {e}", path.display()))
        })?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_to(&mut writer)
    }

    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let file = std::fs::File::open(path).map_err(|e| {
            IndexError::Storage(format!("Failed to open {}: {e}", path.display()))
        })?;
        Self::read_from(&mut std::io::BufReader::new(file))
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

/// Squared Euclidean distance between two equal-length vectors.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

fn le_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}
