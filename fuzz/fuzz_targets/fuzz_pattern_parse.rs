#![no_main]

use hieromatch::corpus::Vocabulary;
use hieromatch::pattern::Pattern;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing must never panic, and run bookkeeping must agree with the words
    let vocab = Vocabulary::from_sentences(["it makes him and it mars him"]);
    if let Ok(pattern) = Pattern::parse(&vocab, data) {
        let terminals = pattern.words().iter().filter(|&&t| t >= 0).count();
        assert_eq!(pattern.terminal_run_lengths().iter().sum::<usize>(), terminals);
        assert_eq!(pattern.arity(), pattern.len() - terminals);
    }
});
