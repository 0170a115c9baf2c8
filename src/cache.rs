use crate::error::SolverError;
use crate::ranker::{RankedWord, Ranker};
use crate::word::Word;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const SENTINEL: &str = "#####";

/// Parsed contents of a warm-start cache file (§6.1): the work list
/// (one `word score entropy maxEntropy` line per Allowed word) and the
/// per-Query memo (zero or more `queryKey n count` blocks).
pub struct CacheData {
    work_list: Vec<RankedWord>,
    memo: Vec<(String, usize, Vec<RankedWord>)>,
}

impl CacheData {
    pub fn into_ranker(self) -> Ranker {
        Ranker::from_cache(self.work_list, self.memo)
    }
}

/// Loads and parses a warm-start cache. Any I/O failure or malformed
/// content is treated as "absent" per §7/§9 — a cache is a strict
/// cache, corruption must never be fatal.
pub fn load(path: impl AsRef<Path>) -> Option<CacheData> {
    let text = fs::read_to_string(path).ok()?;
    parse(&text).ok()
}

/// Writes `ranker`'s current work list and memo to `path`. Returns
/// `false` (not an error) on any I/O failure, per §7's "cache-save
/// failures are surfaced as boolean false, not fatal."
pub fn save(path: impl AsRef<Path>, ranker: &Ranker) -> bool {
    let text = serialize(ranker);
    if let Some(parent) = path.as_ref().parent() {
        if fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    fs::write(path, text).is_ok()
}

fn serialize(ranker: &Ranker) -> String {
    let mut out = String::new();

    for ranked in ranker.work_list_snapshot() {
        write_tuple(&mut out, &ranked);
    }
    let _ = writeln!(out, "{SENTINEL} -1 -1 -1");

    for (key, n, results) in ranker.memo_snapshot() {
        let _ = writeln!(out, "{key} {n} {}", results.len());
        for ranked in results {
            write_tuple(&mut out, &ranked);
        }
    }

    out
}

fn write_tuple(out: &mut String, ranked: &RankedWord) {
    let _ = writeln!(
        out,
        "{} {} {} {}",
        ranked.word,
        fmt_float(ranked.score),
        fmt_float(ranked.entropy),
        fmt_float(ranked.max_entropy_bound)
    );
}

/// At least 17 significant digits, per §6.1.
fn fmt_float(value: f64) -> String {
    format!("{value:.17e}")
}

fn malformed(reason: &str) -> SolverError {
    SolverError::MalformedCache(reason.to_string())
}

fn next<'a>(tokens: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<&'a str, SolverError> {
    tokens.next().ok_or_else(|| malformed(&format!("truncated {what}")))
}

fn next_f64<'a>(tokens: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<f64, SolverError> {
    let token = next(tokens, what)?;
    f64::from_str(token).map_err(|_| malformed(&format!("bad float for {what}: {token:?}")))
}

fn parse(text: &str) -> Result<CacheData, SolverError> {
    let mut tokens = text.split_whitespace();
    let mut work_list = Vec::new();

    loop {
        let word_token = next(&mut tokens, "work list entry")?;
        if word_token == SENTINEL {
            let a = next_f64(&mut tokens, "sentinel")?;
            let b = next_f64(&mut tokens, "sentinel")?;
            let c = next_f64(&mut tokens, "sentinel")?;
            if a != -1.0 || b != -1.0 || c != -1.0 {
                return Err(malformed("sentinel line must read -1 -1 -1"));
            }
            break;
        }

        let word = Word::parse(word_token).map_err(|_| malformed("invalid word in work list"))?;
        let score = next_f64(&mut tokens, "score")?;
        let entropy = next_f64(&mut tokens, "entropy")?;
        let max_entropy_bound = next_f64(&mut tokens, "maxEntropy")?;
        work_list.push(RankedWord {
            word,
            entropy,
            max_entropy_bound,
            score,
        });
    }

    let mut memo = Vec::new();
    while let Some(query_key) = tokens.next() {
        let n: usize = next(&mut tokens, "memo n")?
            .parse()
            .map_err(|_| malformed("memo n is not a number"))?;
        let count: usize = next(&mut tokens, "memo count")?
            .parse()
            .map_err(|_| malformed("memo count is not a number"))?;

        let mut results = Vec::with_capacity(count);
        for _ in 0..count {
            let word_token = next(&mut tokens, "memo entry")?;
            let word = Word::parse(word_token).map_err(|_| malformed("invalid word in memo"))?;
            let score = next_f64(&mut tokens, "memo score")?;
            let entropy = next_f64(&mut tokens, "memo entropy")?;
            let max_entropy_bound = next_f64(&mut tokens, "memo maxEntropy")?;
            results.push(RankedWord {
                word,
                entropy,
                max_entropy_bound,
                score,
            });
        }

        memo.push((query_key.to_string(), n, results));
    }

    Ok(CacheData { work_list, memo })
}
