use crate::error::SolverError;
use crate::word::Word;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Reads a whitespace/newline-separated stream of five-letter
/// lowercase words, skipping blank lines and de-duplicating. Any line
/// that fails to parse as a `Word` is a fatal I/O-adjacent error (§7:
/// loader failures have no meaningful degraded mode) rather than a
/// silently-dropped entry, so a truncated word list is never mistaken
/// for a deliberately small one.
pub fn load_list(path: impl AsRef<Path>) -> Result<Vec<Word>, SolverError> {
    let text = fs::read_to_string(path)?;
    parse_list(&text)
}

pub(crate) fn parse_list(text: &str) -> Result<Vec<Word>, SolverError> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();

    for token in text.split_whitespace() {
        let word = Word::parse(token)?;
        if seen.insert(word) {
            words.push(word);
        }
    }

    Ok(words)
}

/// Bundled curated word list shipped with the crate.
pub const DEFAULT_ALLOWED: &str = include_str!("../data/allowed.txt");
/// Bundled curated word list shipped with the crate, a subset of
/// [`DEFAULT_ALLOWED`].
pub const DEFAULT_POSSIBLE: &str = include_str!("../data/possible.txt");

static DEFAULT_ALLOWED_WORDS: Lazy<Vec<Word>> =
    Lazy::new(|| parse_list(DEFAULT_ALLOWED).expect("bundled allowed list is well-formed"));
static DEFAULT_POSSIBLE_WORDS: Lazy<Vec<Word>> =
    Lazy::new(|| parse_list(DEFAULT_POSSIBLE).expect("bundled possible list is well-formed"));

/// Parses the bundled allowed-word list once per process; cheap to
/// call repeatedly since later calls just clone the cached `Vec`.
pub fn default_allowed() -> Vec<Word> {
    DEFAULT_ALLOWED_WORDS.clone()
}

/// Parses the bundled possible-word (answer) list once per process.
pub fn default_possible() -> Vec<Word> {
    DEFAULT_POSSIBLE_WORDS.clone()
}
