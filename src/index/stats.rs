use crate::index::suffix_array::IndexReader;
use anyhow::Result;
use std::path::Path;

/// Display index statistics
pub fn show_stats(index_dir: &Path) -> Result<()> {
    let reader = IndexReader::open(index_dir, 0)?;
    let stats = reader.stats();
    let corpus = reader.suffix_array.corpus();

    println!("Index Statistics");
    println!("================");
    println!();
    println!("Index location:   {}", index_dir.display());
    println!("Index version:    {}", reader.meta.version);
    println!("Token count:      {}", stats.token_count);
    println!("Sentence count:   {}", stats.sentence_count);
    println!("Vocabulary size:  {}", stats.vocab_size);
    println!("Memory mapped:    {}", if stats.mapped { "yes" } else { "no" });

    let lengths = sentence_lengths(corpus);
    if let Some(longest) = lengths.iter().max() {
        println!();
        println!("Longest sentence: {} tokens", longest);
        println!(
            "Mean length:      {:.1} tokens",
            stats.token_count as f64 / stats.sentence_count.max(1) as f64
        );
    }

    // Most frequent words
    let mut counts = vec![0usize; reader.vocab.len()];
    for id in corpus.words().iter() {
        if let Some(count) = usize::try_from(id).ok().and_then(|i| counts.get_mut(i)) {
            *count += 1;
        }
    }
    let mut sorted: Vec<(usize, usize)> = counts.into_iter().enumerate().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    println!();
    println!("Most frequent words:");
    for (id, count) in sorted.iter().take(15) {
        println!("  {:15} {}", reader.vocab.word_of(*id as i32), count);
    }

    if sorted.len() > 15 {
        println!("  ... and {} more", sorted.len() - 15);
    }

    if let Ok(size) = dir_size(index_dir) {
        println!();
        println!("Index size:       {}", format_size(size));
    }

    Ok(())
}

fn sentence_lengths(corpus: &crate::corpus::CorpusArray) -> Vec<usize> {
    (0..corpus.num_sentences())
        .map(|s| corpus.sentence_end(s) - corpus.sentence_start(s))
        .collect()
}

/// Calculate directory size recursively
fn dir_size(path: &Path) -> std::io::Result<u64> {
    let mut size = 0;
    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                size += entry.metadata()?.len();
            } else if path.is_dir() {
                size += dir_size(&path)?;
            }
        }
    }
    Ok(size)
}

/// Format byte size to human readable
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusArray;
    use tempfile::tempdir;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_dir_size() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a"), [0u8; 10]).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("b"), [0u8; 5]).unwrap();
        assert_eq!(dir_size(dir.path()).unwrap(), 15);
    }

    #[test]
    fn test_sentence_lengths() {
        let corpus = CorpusArray::new(vec![0, 1, 2, 3, 4], vec![0, 2, 2]);
        assert_eq!(sentence_lengths(&corpus), vec![2, 0, 3]);
    }
}
