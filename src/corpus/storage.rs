//! Integer array storage
//!
//! Corpus tokens, sentence offsets and suffix positions are all sequences of
//! 4-byte integers. They live either in memory (freshly built) or in a
//! memory-mapped file written by
//! [`IndexWriter`](crate::index::suffix_array::IndexWriter).

use crate::error::{MatchError, Result};
use crate::index::suffix_array::types::{ArrayHeader, FORMAT_VERSION};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Read-only sequence of `i32` values
pub enum IntArray {
    /// Values held in memory
    Owned(Vec<i32>),
    /// Values read lazily from a mapped file, after its header
    Mapped { mmap: Mmap, count: usize },
}

impl IntArray {
    /// Memory-map a file and validate its header against `magic`
    pub fn open(path: &Path, magic: u32) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let file = File::open(path)?;
        // The index files are written once and never modified in place.
        let mmap = unsafe { Mmap::map(&file)? };

        let header = ArrayHeader::from_bytes(&mmap)
            .ok_or_else(|| MatchError::invalid_format(&name, "file too small"))?;
        if header.magic != magic {
            return Err(MatchError::invalid_format(&name, "bad magic number"));
        }
        if header.version != FORMAT_VERSION {
            return Err(MatchError::invalid_format(
                &name,
                format!("unsupported version {}", header.version),
            ));
        }

        let count = usize::try_from(header.count)
            .ok()
            .filter(|&c| c <= i32::MAX as usize)
            .ok_or_else(|| MatchError::invalid_format(&name, format!("count {} too large", header.count)))?;
        let needed = count
            .checked_mul(4)
            .and_then(|bytes| bytes.checked_add(ArrayHeader::SIZE))
            .ok_or_else(|| MatchError::invalid_format(&name, format!("count {} too large", count)))?;
        if mmap.len() < needed {
            return Err(MatchError::invalid_format(
                &name,
                format!("expected {} bytes, found {}", needed, mmap.len()),
            ));
        }

        Ok(IntArray::Mapped { mmap, count })
    }

    /// Number of values
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            IntArray::Owned(v) => v.len(),
            IntArray::Mapped { count, .. } => *count,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at index `i`
    ///
    /// Panics if `i` is out of bounds, like slice indexing.
    #[inline]
    pub fn get(&self, i: usize) -> i32 {
        match self {
            IntArray::Owned(v) => v[i],
            IntArray::Mapped { mmap, count } => {
                assert!(i < *count, "index {} out of bounds ({})", i, count);
                let offset = ArrayHeader::SIZE + i * 4;
                i32::from_le_bytes([
                    mmap[offset],
                    mmap[offset + 1],
                    mmap[offset + 2],
                    mmap[offset + 3],
                ])
            }
        }
    }

    /// Iterate over all values
    pub fn iter(&self) -> impl ExactSizeIterator<Item = i32> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Copy the values into a vector
    pub fn to_vec(&self) -> Vec<i32> {
        match self {
            IntArray::Owned(v) => v.clone(),
            IntArray::Mapped { .. } => self.iter().collect(),
        }
    }

    /// True when backed by a memory map
    pub fn is_mapped(&self) -> bool {
        matches!(self, IntArray::Mapped { .. })
    }
}

impl From<Vec<i32>> for IntArray {
    fn from(v: Vec<i32>) -> Self {
        IntArray::Owned(v)
    }
}

impl std::fmt::Debug for IntArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntArray")
            .field("len", &self.len())
            .field("mapped", &self.is_mapped())
            .finish()
    }
}
