//! Index writer
//!
//! Writes a built index to a directory in a format optimized for
//! memory-mapped reading.

use super::builder::BuiltIndex;
use super::types::*;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes index files to a directory
pub struct IndexWriter;

impl IndexWriter {
    /// Write all index files, creating `dir` if needed
    ///
    /// Creates:
    /// - vocab.json: Vocabulary
    /// - corpus.bin: Token ids
    /// - sentences.bin: Sentence start offsets
    /// - sa.bin: The suffix array itself
    /// - meta.json: Counts and format version
    pub fn write(dir: &Path, built: &BuiltIndex) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        built
            .vocab
            .save(&dir.join(VOCAB_FILE))
            .context("Failed to write vocab.json")?;

        write_int_array(&dir.join(CORPUS_FILE), CORPUS_MAGIC, built.corpus.words().iter())
            .context("Failed to write corpus.bin")?;

        write_int_array(
            &dir.join(SENTENCES_FILE),
            SENTENCES_MAGIC,
            built.corpus.sentence_starts().iter(),
        )
        .context("Failed to write sentences.bin")?;

        write_int_array(&dir.join(SA_FILE), SA_MAGIC, built.suffix_order.iter().copied())
            .context("Failed to write sa.bin")?;

        let meta_file = BufWriter::new(File::create(dir.join(META_FILE))?);
        serde_json::to_writer_pretty(meta_file, &built.meta())
            .context("Failed to write meta.json")?;

        log::debug!("wrote index to {}", dir.display());
        Ok(())
    }
}

/// Write a header followed by little-endian `i32` values
pub fn write_int_array(
    path: &Path,
    magic: u32,
    values: impl ExactSizeIterator<Item = i32>,
) -> std::io::Result<()> {
    let mut file = BufWriter::with_capacity(65536, File::create(path)?);

    let header = ArrayHeader::new(magic, values.len() as u64);
    file.write_all(&header.to_bytes())?;

    // Using a buffer to reduce system call overhead
    let mut buffer = Vec::with_capacity(4 * 1024); // 1024 entries at a time
    for value in values {
        buffer.extend_from_slice(&value.to_le_bytes());
        if buffer.len() >= 4 * 1024 {
            file.write_all(&buffer)?;
            buffer.clear();
        }
    }
    if !buffer.is_empty() {
        file.write_all(&buffer)?;
    }

    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::suffix_array::builder::IndexBuilder;
    use tempfile::tempdir;

    #[test]
    fn test_write_index() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("idx");

        let mut builder = IndexBuilder::new();
        builder.add_sentence("hello world");
        builder.add_sentence("foo bar");
        let built = builder.build().unwrap();

        IndexWriter::write(&dir, &built).unwrap();

        for name in [VOCAB_FILE, CORPUS_FILE, SENTENCES_FILE, SA_FILE, META_FILE] {
            assert!(dir.join(name).exists(), "{} missing", name);
        }

        let sa_data = fs::read(dir.join(SA_FILE)).unwrap();
        let header = ArrayHeader::from_bytes(&sa_data).unwrap();
        assert_eq!(header.magic, SA_MAGIC);
        assert_eq!(header.count, 4);
        assert_eq!(sa_data.len(), ArrayHeader::SIZE + 4 * 4);

        let meta: IndexMeta =
            serde_json::from_slice(&fs::read(dir.join(META_FILE)).unwrap()).unwrap();
        assert_eq!(meta, built.meta());
    }

    #[test]
    fn test_large_array_flushes_in_chunks() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("corpus.bin");
        write_int_array(&path, CORPUS_MAGIC, (0..5000).map(|v| v as i32)).unwrap();

        let data = fs::read(&path).unwrap();
        assert_eq!(data.len(), ArrayHeader::SIZE + 5000 * 4);
        let last = &data[data.len() - 4..];
        assert_eq!(i32::from_le_bytes(last.try_into().unwrap()), 4999);
    }
}
