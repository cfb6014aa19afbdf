use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hieromatch::index::stats::show_stats;
use hieromatch::index::{FrequentPhrases, IndexBuilder, IndexReader, IndexWriter};
use hieromatch::output::{self, SentenceReport};
use hieromatch::tree::{ExtractionConfig, PrefixTree};
use hieromatch::utils::{logging, progress};
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hieromatch")]
#[command(about = "Suffix-array pattern matching for hierarchical phrases")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log more (repeat for debug and trace output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from a corpus with one tokenized sentence per line
    Compile {
        /// Corpus file
        corpus: PathBuf,

        /// Directory to write the index into
        index: PathBuf,
    },
    /// Find every occurrence of a contiguous phrase
    Lookup {
        /// Index directory
        index: PathBuf,

        /// Phrase to look up
        #[arg(required = true, trailing_var_arg = true)]
        phrase: Vec<String>,

        /// Only print the suffix-array range and count
        #[arg(short, long)]
        count: bool,
    },
    /// Build the prefix tree of one sentence
    Tree {
        /// Index directory
        index: PathBuf,

        /// Sentence to match
        #[arg(required = true, trailing_var_arg = true)]
        sentence: Vec<String>,

        /// Print the whole tree instead of its matched patterns
        #[arg(long)]
        dump: bool,

        #[command(flatten)]
        limits: Limits,
    },
    /// Match every sentence of a file against the index
    Match {
        /// Index directory
        index: PathBuf,

        /// Sentences to match, one per line
        sentences: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Prefix every line with its input line number instead of grouping by sentence
        #[arg(long)]
        no_heading: bool,

        /// Preload the pattern cache with this many frequent phrases first
        #[arg(long, default_value_t = 0)]
        warm: usize,

        #[command(flatten)]
        limits: Limits,
    },
    /// List the most frequent contiguous phrases
    Frequent {
        /// Index directory
        index: PathBuf,

        /// Minimum number of occurrences
        #[arg(long, default_value_t = 2)]
        min: usize,

        /// Maximum number of phrases to list
        #[arg(long, default_value_t = 20)]
        max: usize,

        /// Maximum phrase length in tokens
        #[arg(long, default_value_t = 3)]
        length: usize,
    },
    /// Show index statistics
    Stats {
        /// Index directory
        index: PathBuf,
    },
}

/// Extraction limits; flags override the configuration file
#[derive(clap::Args)]
struct Limits {
    /// JSON extraction configuration
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    max_phrase_span: Option<usize>,

    #[arg(long)]
    max_phrase_length: Option<usize>,

    #[arg(long)]
    max_nonterminals: Option<usize>,

    #[arg(long)]
    min_nonterminal_span: Option<usize>,
}

impl Limits {
    fn resolve(&self) -> Result<ExtractionConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractionConfig::load(path)?,
            None => ExtractionConfig::default(),
        };
        if let Some(v) = self.max_phrase_span {
            config.max_phrase_span = v;
        }
        if let Some(v) = self.max_phrase_length {
            config.max_phrase_length = v;
        }
        if let Some(v) = self.max_nonterminals {
            config.max_nonterminals = v;
        }
        if let Some(v) = self.min_nonterminal_span {
            config.min_nonterminal_span = v;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let color = !cli.no_color;

    match cli.command {
        Commands::Compile { corpus, index } => compile(&corpus, &index)?,
        Commands::Lookup { index, phrase, count } => lookup(&index, &phrase.join(" "), count, color)?,
        Commands::Tree {
            index,
            sentence,
            dump,
            limits,
        } => tree(&index, &sentence.join(" "), dump, &limits.resolve()?, color)?,
        Commands::Match {
            index,
            sentences,
            json,
            no_heading,
            warm,
            limits,
        } => match_sentences(&index, &sentences, json, !no_heading, warm, &limits.resolve()?, color)?,
        Commands::Frequent {
            index,
            min,
            max,
            length,
        } => frequent(&index, min, max, length)?,
        Commands::Stats { index } => show_stats(&index)?,
    }

    Ok(())
}

fn compile(corpus: &Path, dir: &Path) -> Result<()> {
    let text = fs::read_to_string(corpus).with_context(|| format!("Failed to read {}", corpus.display()))?;

    let spinner = progress::spinner("Sorting suffixes...");
    let mut builder = IndexBuilder::new();
    for line in text.lines() {
        builder.add_sentence(line);
    }
    let built = builder.build()?;

    spinner.set_message("Writing index...");
    IndexWriter::write(dir, &built)?;
    spinner.finish_and_clear();

    let meta = built.meta();
    println!(
        "Indexed {} sentences, {} tokens, {} distinct words into {}",
        meta.sentence_count,
        meta.token_count,
        meta.vocab_size,
        dir.display()
    );
    Ok(())
}

fn lookup(dir: &Path, phrase: &str, count_only: bool, color: bool) -> Result<()> {
    let reader = IndexReader::open(dir, 0)?;
    let sa = &reader.suffix_array;
    let words = reader.vocab.encode_lenient(phrase);

    let positions = match sa.find(&words) {
        Some(range) => sa.matching_positions(&words, range),
        None => Vec::new(),
    };
    if positions.is_empty() {
        println!("Not found: {}", phrase);
        return Ok(());
    }

    println!("{} occurrences", positions.len());
    if !count_only {
        let mut out = output::stdout(color);
        output::print_occurrences(&mut out, sa.corpus(), &reader.vocab, &positions, words.len())?;
    }
    Ok(())
}

fn tree(dir: &Path, sentence: &str, dump: bool, config: &ExtractionConfig, color: bool) -> Result<()> {
    let reader = IndexReader::open(dir, config.pattern_cache_capacity)?;
    let words = reader.vocab.encode_lenient(sentence);

    let mut tree = PrefixTree::new(&reader.suffix_array, config.clone());
    tree.add(&words)?;

    if dump {
        println!("{}", tree.dump(Some(&reader.vocab)));
    } else {
        let report = SentenceReport::from_tree(1, sentence, &tree, &reader.vocab);
        let mut out = output::stdout(color);
        output::print_reports(&mut out, &[report], true)?;
        writeln!(out, "{} nodes", tree.len())?;
    }
    Ok(())
}

fn match_sentences(
    dir: &Path,
    input: &Path,
    json: bool,
    heading: bool,
    warm: usize,
    config: &ExtractionConfig,
    color: bool,
) -> Result<()> {
    let reader = IndexReader::open(dir, config.pattern_cache_capacity)?;
    let sa = &reader.suffix_array;

    if warm > 0 {
        FrequentPhrases::compute(sa, 2, warm, config.max_phrase_length).warm(sa);
    }

    let text = fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let lines: Vec<&str> = text.lines().collect();

    let bar = progress::sentence_bar(lines.len() as u64);
    let reports: Vec<SentenceReport> = lines
        .par_iter()
        .enumerate()
        .map(|(i, line)| {
            let mut tree = PrefixTree::new(sa, config.clone());
            tree.add(&reader.vocab.encode_lenient(line))?;
            bar.inc(1);
            Ok(SentenceReport::from_tree(i + 1, line, &tree, &reader.vocab))
        })
        .collect::<hieromatch::Result<_>>()?;
    bar.finish_and_clear();

    let stats = sa.cache().stats();
    log::info!(
        "pattern cache: {} entries, {} hits, {} misses ({:.1}% hit rate)",
        stats.len,
        stats.hits,
        stats.misses,
        stats.hit_rate() * 100.0
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        let mut out = output::stdout(color);
        output::print_reports(&mut out, &reports, heading)?;
    }
    Ok(())
}

fn frequent(dir: &Path, min: usize, max: usize, length: usize) -> Result<()> {
    let reader = IndexReader::open(dir, 0)?;
    let phrases = FrequentPhrases::compute(&reader.suffix_array, min, max, length);

    if phrases.is_empty() {
        println!("No phrase occurs {} or more times", min);
        return Ok(());
    }
    for (pattern, count) in phrases.phrases() {
        println!("{:8} {}", count, pattern.display(&reader.vocab));
    }
    Ok(())
}
