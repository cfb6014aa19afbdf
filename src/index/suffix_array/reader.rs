//! Index reader
//!
//! Provides memory-mapped access to a compiled index. The corpus, sentence
//! table and suffix array are read straight from the mapped files; only the
//! vocabulary and metadata are parsed into memory.

use super::search::SuffixArray;
use super::types::*;
use crate::corpus::{CorpusArray, IntArray, Vocabulary};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A loaded index: vocabulary, suffix array and metadata
pub struct IndexReader {
    pub vocab: Vocabulary,
    pub suffix_array: SuffixArray,
    pub meta: IndexMeta,
}

impl IndexReader {
    /// Open an index directory written by
    /// [`IndexWriter`](super::writer::IndexWriter)
    ///
    /// Fails if any file is missing or malformed, or if the suffix array
    /// does not have exactly one entry per corpus token.
    pub fn open(dir: &Path, cache_capacity: usize) -> Result<Self> {
        if !dir.join(SA_FILE).exists() {
            anyhow::bail!("No index found at {}", dir.display());
        }

        let meta = Self::read_meta(dir)?;
        if meta.comparison_length != MAX_COMPARISON_LENGTH {
            anyhow::bail!(
                "Index sorted with comparison length {} but this build uses {}",
                meta.comparison_length,
                MAX_COMPARISON_LENGTH
            );
        }

        let vocab = Vocabulary::load(&dir.join(VOCAB_FILE)).context("Failed to load vocab.json")?;

        let words = IntArray::open(&dir.join(CORPUS_FILE), CORPUS_MAGIC)
            .context("Failed to open corpus.bin")?;
        let sentence_starts = IntArray::open(&dir.join(SENTENCES_FILE), SENTENCES_MAGIC)
            .context("Failed to open sentences.bin")?;
        let order = IntArray::open(&dir.join(SA_FILE), SA_MAGIC).context("Failed to open sa.bin")?;

        let corpus = CorpusArray::new(words, sentence_starts);
        corpus.validate()?;

        let suffix_array = SuffixArray::from_parts(corpus, order, cache_capacity)
            .context("Corrupt index")?;

        log::info!(
            "loaded index from {}: {} tokens, {} sentences",
            dir.display(),
            suffix_array.size(),
            suffix_array.corpus().num_sentences()
        );

        Ok(Self {
            vocab,
            suffix_array,
            meta,
        })
    }

    fn read_meta(dir: &Path) -> Result<IndexMeta> {
        let file = File::open(dir.join(META_FILE)).context("Failed to open meta.json")?;
        let meta: IndexMeta =
            serde_json::from_reader(BufReader::new(file)).context("Invalid meta.json")?;
        if meta.version != FORMAT_VERSION {
            anyhow::bail!("Unsupported index version: {}", meta.version);
        }
        Ok(meta)
    }

    /// Get statistics about this index
    pub fn stats(&self) -> IndexStats {
        let sa = &self.suffix_array;
        IndexStats {
            token_count: sa.size(),
            sentence_count: sa.corpus().num_sentences(),
            vocab_size: self.vocab.len(),
            mapped: sa.order().is_mapped(),
        }
    }
}

/// Statistics about a loaded index
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub token_count: usize,
    pub sentence_count: usize,
    pub vocab_size: usize,
    pub mapped: bool,
}
