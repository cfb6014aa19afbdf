//! Output formatting for phrase lookups and sentence matches

use crate::corpus::{CorpusArray, Vocabulary};
use crate::tree::PrefixTree;
use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Every matched pattern of one input sentence
#[derive(Debug, Clone, Serialize)]
pub struct SentenceReport {
    /// 1-based input line
    pub line: usize,
    pub sentence: String,
    /// Tree size, root included
    pub nodes: usize,
    pub patterns: Vec<PatternReport>,
}

/// One matched pattern and how often it occurs in the corpus
#[derive(Debug, Clone, Serialize)]
pub struct PatternReport {
    pub pattern: String,
    pub arity: usize,
    pub occurrences: usize,
}

impl SentenceReport {
    pub fn from_tree(line: usize, sentence: &str, tree: &PrefixTree<'_>, vocab: &Vocabulary) -> Self {
        let patterns = tree
            .matched_patterns()
            .into_iter()
            .map(|m| {
                let pattern = m.pattern();
                let words: Vec<&str> = pattern
                    .words()
                    .iter()
                    .map(|&t| if t < 0 { "X" } else { vocab.word_of(t) })
                    .collect();
                PatternReport {
                    pattern: words.join(" "),
                    arity: pattern.arity(),
                    occurrences: m.occurrences(),
                }
            })
            .collect();

        Self {
            line,
            sentence: sentence.to_string(),
            nodes: tree.len(),
            patterns,
        }
    }
}

/// Standard output, colored when `color` is set and the terminal allows it
pub fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print sentence reports, one pattern per line
///
/// With `heading`, each sentence is printed once above its patterns;
/// otherwise every pattern line is prefixed with the input line number.
pub fn print_reports<W: WriteColor>(out: &mut W, reports: &[SentenceReport], heading: bool) -> io::Result<()> {
    for (i, report) in reports.iter().enumerate() {
        if heading {
            if i > 0 {
                writeln!(out)?;
            }
            out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
            writeln!(out, "{}", report.sentence)?;
            out.reset()?;
        }

        for pattern in &report.patterns {
            if !heading {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
                write!(out, "{}", report.line)?;
                out.reset()?;
                write!(out, ":")?;
            }

            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(out, "{}", pattern.occurrences)?;
            out.reset()?;
            write!(out, ":")?;

            print_pattern(out, &pattern.pattern, pattern.arity > 0)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Print a pattern with its gaps highlighted
fn print_pattern<W: WriteColor>(out: &mut W, pattern: &str, has_gaps: bool) -> io::Result<()> {
    for (i, word) in pattern.split(' ').enumerate() {
        if i > 0 {
            write!(out, " ")?;
        }
        if has_gaps && word == "X" {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
            write!(out, "{}", word)?;
            out.reset()?;
        } else {
            write!(out, "{}", word)?;
        }
    }
    Ok(())
}

/// Print each occurrence of a `len`-token phrase in its sentence
///
/// Lines read `sentence:offset:text` with the phrase highlighted.
pub fn print_occurrences<W: WriteColor>(
    out: &mut W,
    corpus: &CorpusArray,
    vocab: &Vocabulary,
    positions: &[usize],
    len: usize,
) -> io::Result<()> {
    for &position in positions {
        let sentence = corpus.sentence_index_of(position);
        let start = corpus.sentence_start(sentence);
        let end = corpus.sentence_end(sentence);
        let match_end = (position + len).min(end);

        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", sentence)?;
        out.reset()?;
        write!(out, ":")?;

        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}", position - start)?;
        out.reset()?;
        write!(out, ":")?;

        let words = |range: std::ops::Range<usize>| -> String {
            let ids: Vec<i32> = range.map(|p| corpus.word_at(p)).collect();
            vocab.decode(&ids)
        };

        if position > start {
            write!(out, "{} ", words(start..position))?;
        }

        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(out, "{}", words(position..match_end))?;
        out.reset()?;

        if match_end < end {
            write!(out, " {}", words(match_end..end))?;
        }

        writeln!(out)?;
    }

    Ok(())
}
