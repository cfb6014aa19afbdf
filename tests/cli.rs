//! End-to-end tests of the hieromatch binary.
//!
//! Each test compiles a small corpus into a fresh index directory and checks
//! the plain (uncolored) output of one subcommand.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const CORPUS: &str = "it makes him and it mars him , it sets him on and it takes him off .\n";

const LIMITS: [&str; 4] = ["--max-phrase-span", "5", "--max-phrase-length", "5"];

fn hieromatch(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hieromatch"))
        .arg("--no-color")
        .args(args)
        .output()
        .expect("Failed to run hieromatch")
}

fn stdout_of(args: &[&str]) -> String {
    let output = hieromatch(args);
    assert!(
        output.status.success(),
        "hieromatch {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Compile `CORPUS` and return the temp dir and the index path inside it
fn compiled() -> (TempDir, PathBuf) {
    compiled_from(CORPUS)
}

fn compiled_from(text: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let corpus = dir.path().join("corpus.txt");
    fs::write(&corpus, text).unwrap();

    let index = dir.path().join("corpus.idx");
    let out = stdout_of(&["compile", path(&corpus), path(&index)]);
    let sentences = text.lines().count();
    assert!(out.contains(&format!("Indexed {} sentences", sentences)), "{}", out);
    (dir, index)
}

fn path(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_lookup_counts() {
    let (_dir, index) = compiled();

    let text = stdout_of(&["lookup", "--count", path(&index), "and", "it"]);
    assert!(text.contains("2 occurrences"), "{}", text);

    let text = stdout_of(&["lookup", "--count", path(&index), "it", "makes", "him"]);
    assert!(text.contains("1 occurrences"), "{}", text);
}

#[test]
fn test_lookup_prints_sentences() {
    let (_dir, index) = compiled();

    let text = stdout_of(&["lookup", path(&index), "it", "makes", "him"]);
    assert!(text.contains("0:0:it makes him and it mars him"), "{}", text);
}

#[test]
fn test_lookup_missing_phrase() {
    let (_dir, index) = compiled();

    let text = stdout_of(&["lookup", path(&index), "him", "it"]);
    assert!(text.starts_with("Not found: him it"), "{}", text);

    let text = stdout_of(&["lookup", path(&index), "persuades"]);
    assert!(text.starts_with("Not found"), "{}", text);
}

#[test]
fn test_lookup_long_phrase() {
    let zeros = vec!["0"; 20].join(" ");
    let text: String = (1..=9).map(|k| format!("{} {}\n", zeros, k)).collect();
    let (_dir, index) = compiled_from(&text);

    let mut args = vec!["lookup", "--count", path(&index)];
    args.extend(vec!["0"; 20]);
    args.push("7");
    let out = stdout_of(&args);
    assert!(out.contains("1 occurrences"), "{}", out);

    args.pop();
    args.push("9");
    let out = stdout_of(&args);
    assert!(out.contains("1 occurrences"), "{}", out);

    args.pop();
    let out = stdout_of(&args);
    assert!(out.contains("9 occurrences"), "{}", out);
}

#[test]
fn test_tree_patterns() {
    let (_dir, index) = compiled();

    let mut args = vec!["tree", path(&index)];
    args.extend(LIMITS);
    args.extend(["it", "makes", "him"]);
    let text = stdout_of(&args);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "it makes him");
    assert!(lines.contains(&"4:it"), "{}", text);
    assert!(lines.contains(&"4:it X him"), "{}", text);
    assert!(lines.contains(&"1:it makes him"), "{}", text);
    assert!(text.trim_end().ends_with("nodes"), "{}", text);
}

#[test]
fn test_tree_dump() {
    let (_dir, index) = compiled();

    let mut args = vec!["tree", "--dump", path(&index)];
    args.extend(LIMITS);
    args.extend(["it", "persuades", "him"]);
    let text = stdout_of(&args);

    assert!(text.starts_with("[id1 ROOT (0) "), "{}", text);
    // `persuades` is not in the corpus, so its node stays inactive
    assert!(text.contains('*'), "{}", text);
}

#[test]
fn test_match_without_heading() {
    let (dir, index) = compiled();
    let sentences = dir.path().join("input.txt");
    fs::write(&sentences, "it makes him\nhim and it\n").unwrap();

    let mut args = vec!["match", "--no-heading", path(&index), path(&sentences)];
    args.extend(LIMITS);
    let text = stdout_of(&args);

    let lines: Vec<&str> = text.lines().collect();
    assert!(lines.contains(&"1:4:it X him"), "{}", text);
    assert!(lines.contains(&"2:2:and it"), "{}", text);
    assert!(lines.iter().all(|l| l.starts_with("1:") || l.starts_with("2:")));
}

#[test]
fn test_match_json() {
    let (dir, index) = compiled();
    let sentences = dir.path().join("input.txt");
    fs::write(&sentences, "it makes him\n").unwrap();

    let mut args = vec!["match", "--json", "--warm", "5", path(&index), path(&sentences)];
    args.extend(LIMITS);
    let text = stdout_of(&args);

    let reports: serde_json::Value = serde_json::from_str(&text).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["line"], 1);
    assert_eq!(reports[0]["sentence"], "it makes him");

    let gapped = reports[0]["patterns"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["pattern"] == "it X him")
        .unwrap();
    assert_eq!(gapped["arity"], 1);
    assert_eq!(gapped["occurrences"], 4);
}

#[test]
fn test_frequent() {
    let (_dir, index) = compiled();

    let text = stdout_of(&["frequent", path(&index), "--min", "4", "--length", "1"]);
    let words: Vec<&str> = text.lines().filter_map(|l| l.split_whitespace().nth(1)).collect();
    assert!(words.contains(&"[it]"), "{}", text);
    assert!(words.contains(&"[him]"), "{}", text);
    assert!(!words.contains(&"[makes]"), "{}", text);

    let text = stdout_of(&["frequent", path(&index), "--min", "10"]);
    assert!(text.starts_with("No phrase occurs 10 or more times"), "{}", text);
}

#[test]
fn test_stats() {
    let (_dir, index) = compiled();

    let text = stdout_of(&["stats", path(&index)]);
    assert!(text.contains("Sentence count:   1"), "{}", text);
    assert!(text.contains("Most frequent words:"), "{}", text);
}

#[test]
fn test_missing_index_fails() {
    let dir = TempDir::new().unwrap();
    let output = hieromatch(&["stats", path(&dir.path().join("nowhere"))]);
    assert!(!output.status.success());
}
