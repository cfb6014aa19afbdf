#![no_main]

use arbitrary::Arbitrary;
use hieromatch::corpus::{CorpusArray, Vocabulary};
use hieromatch::index::SuffixArray;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    sentences: Vec<Vec<u8>>,
    phrase: Vec<u8>,
}

const WORDS: [&str; 4] = ["a", "b", "c", "d"];

fn words(tokens: &[u8]) -> String {
    tokens
        .iter()
        .map(|&t| WORDS[t as usize % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fuzz_target!(|input: Input| {
    // Every suffix-array hit must be a real occurrence, and the count must
    // match a linear scan of the corpus
    let lines: Vec<String> = input.sentences.iter().take(16).map(|s| words(s)).collect();
    let vocab = Vocabulary::with_words(WORDS);
    let Ok(corpus) = CorpusArray::from_sentences(&vocab, lines.iter().map(String::as_str)) else {
        return;
    };
    let phrase: Vec<i32> = vocab.encode_lenient(&words(&input.phrase));
    if phrase.is_empty() || phrase.len() > 8 {
        return;
    }

    let tokens: Vec<i32> = corpus.words().to_vec();
    let expected: Vec<usize> = (0..tokens.len())
        .filter(|&p| tokens[p..].starts_with(&phrase))
        .collect();

    let sa = SuffixArray::build(corpus, 0);
    let found = sa.find(&phrase).map(|r| sa.positions_for(r)).unwrap_or_default();
    assert_eq!(found, expected);
});
