//! Types for suffix array indexing
//!
//! This module defines the on-disk layout shared by the corpus, sentence
//! table and suffix array files, plus the metadata stored in `meta.json`.

use serde::{Deserialize, Serialize};

/// Suffixes are compared on at most this many leading tokens
pub const MAX_COMPARISON_LENGTH: usize = 20;

/// Magic number for corpus token files
pub const CORPUS_MAGIC: u32 = 0x484d4350; // "PCMH" in little-endian

/// Magic number for sentence start tables
pub const SENTENCES_MAGIC: u32 = 0x484d5350; // "PSMH" in little-endian

/// Magic number for suffix array files
pub const SA_MAGIC: u32 = 0x484d4153; // "SAMH" in little-endian

/// Current version of the binary formats
pub const FORMAT_VERSION: u32 = 1;

/// File names inside an index directory
pub const VOCAB_FILE: &str = "vocab.json";
pub const CORPUS_FILE: &str = "corpus.bin";
pub const SENTENCES_FILE: &str = "sentences.bin";
pub const SA_FILE: &str = "sa.bin";
pub const META_FILE: &str = "meta.json";

/// Header preceding every binary integer array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayHeader {
    /// Magic number identifying the file kind
    pub magic: u32,
    /// Version number
    pub version: u32,
    /// Number of 4-byte entries following the header
    pub count: u64,
    /// Flags (reserved for future use)
    pub flags: u32,
}

impl ArrayHeader {
    /// Size of header in bytes
    pub const SIZE: usize = 4 + 4 + 8 + 4; // 20 bytes

    pub fn new(magic: u32, count: u64) -> Self {
        Self {
            magic,
            version: FORMAT_VERSION,
            count,
            flags: 0,
        }
    }

    /// Serialize to little-endian bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.magic.to_le_bytes());
        out[4..8].copy_from_slice(&self.version.to_le_bytes());
        out[8..16].copy_from_slice(&self.count.to_le_bytes());
        out[16..20].copy_from_slice(&self.flags.to_le_bytes());
        out
    }

    /// Parse from the first [`ArrayHeader::SIZE`] bytes, if there are enough
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let magic = u32::from_le_bytes(data.get(0..4)?.try_into().ok()?);
        let version = u32::from_le_bytes(data.get(4..8)?.try_into().ok()?);
        let count = u64::from_le_bytes(data.get(8..16)?.try_into().ok()?);
        let flags = u32::from_le_bytes(data.get(16..20)?.try_into().ok()?);
        Some(Self {
            magic,
            version,
            count,
            flags,
        })
    }
}

/// Index metadata stored in meta.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct IndexMeta {
    /// Binary format version
    pub version: u32,
    /// Number of corpus tokens (equals the suffix count)
    pub token_count: u64,
    /// Number of sentences
    pub sentence_count: u64,
    /// Number of distinct terminals
    pub vocab_size: u64,
    /// Truncation length used when sorting suffixes
    pub comparison_length: usize,
}
