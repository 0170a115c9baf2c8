use crate::progress::ProgressObserver;
use crate::query::Query;
use crate::trie::{PrefixIndex, WordSet};
use crate::word::Word;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// One ranked guess: its entropy under the current Query, the
/// monotone-non-increasing upper bound that justifies skipping
/// recomputation, and an externally assignable `score` (left at
/// `entropy` by the pure entropy ranker, overridden by
/// [`RegressionRanker`]).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedWord {
    pub word: Word,
    pub entropy: f64,
    pub max_entropy_bound: f64,
    pub score: f64,
}

/// Work-list entry ordered by `max_entropy_bound`, descending, so the
/// persistent `BinaryHeap` always surfaces the guess that could still
/// beat the current top-n.
#[derive(Debug, Clone)]
struct BoundEntry(RankedWord);

impl PartialEq for BoundEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.max_entropy_bound == other.0.max_entropy_bound
    }
}
impl Eq for BoundEntry {}
impl PartialOrd for BoundEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for BoundEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .max_entropy_bound
            .partial_cmp(&other.0.max_entropy_bound)
            .unwrap_or(Ordering::Equal)
    }
}

/// Top-n entry ordered by entropy, ascending (wrapped so a max-heap
/// surfaces the *weakest* member of the current top-n at its root,
/// ready for eviction).
#[derive(Debug, Clone)]
struct EntropyEntry(RankedWord, bool);

impl PartialEq for EntropyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.entropy == other.0.entropy && self.1 == other.1
    }
}
impl Eq for EntropyEntry {}
impl PartialOrd for EntropyEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for EntropyEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so the weakest entropy (and, on a tie, the word *not*
        // in the possible set) sorts as the max-heap's root.
        other
            .0
            .entropy
            .partial_cmp(&self.0.entropy)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.1.cmp(&self.1))
    }
}

struct Memo {
    n: usize,
    results: Vec<RankedWord>,
}

/// Priority-ordered work list of `RankedWord` over the Allowed set,
/// plus a per-Query memo, both persisted across plies (and across
/// `GameState::reset()` calls — warm start).
pub struct Ranker {
    work_list: BinaryHeap<BoundEntry>,
    memo: HashMap<String, Memo>,
}

impl Ranker {
    pub fn new(allowed: &[Word]) -> Self {
        let work_list = allowed
            .iter()
            .map(|&word| {
                BoundEntry(RankedWord {
                    word,
                    entropy: 0.0,
                    max_entropy_bound: f64::INFINITY,
                    score: 0.0,
                })
            })
            .collect();
        Ranker {
            work_list,
            memo: HashMap::new(),
        }
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Rebuilds a Ranker from a previously saved warm-start cache
    /// (§6.1): the work list and per-Query memo, as exported by
    /// [`Ranker::work_list_snapshot`] / [`Ranker::memo_snapshot`].
    pub fn from_cache(
        work_list: Vec<RankedWord>,
        memo: Vec<(String, usize, Vec<RankedWord>)>,
    ) -> Self {
        Ranker {
            work_list: work_list.into_iter().map(BoundEntry).collect(),
            memo: memo
                .into_iter()
                .map(|(key, n, results)| (key, Memo { n, results }))
                .collect(),
        }
    }

    /// The current work list, in no particular order — callers persist
    /// and later restore it via [`Ranker::from_cache`], which rebuilds
    /// the priority heap from scratch.
    pub fn work_list_snapshot(&self) -> Vec<RankedWord> {
        self.work_list.iter().map(|entry| entry.0.clone()).collect()
    }

    /// The per-Query memo, as `(queryKey, storedN, results)` triples.
    pub fn memo_snapshot(&self) -> Vec<(String, usize, Vec<RankedWord>)> {
        self.memo
            .iter()
            .map(|(key, memo)| (key.clone(), memo.n, memo.results.clone()))
            .collect()
    }

    /// The pure entropy ranking of §4.5: lazily recomputes only the
    /// work-list entries whose stale bound still exceeds the current
    /// top-n's weakest threshold, then memoizes under the Query key.
    /// Reports progress via `observer` as each work-list entry is
    /// popped and recomputed (the "first-ply pre-computation of all
    /// ≈13,000 entropies" bulk pass named in §5/§6.1); a memo hit does
    /// no computation and so never touches `observer`.
    pub fn top_n_entropy(
        &mut self,
        index: &PrefixIndex,
        query: &Query,
        n: usize,
        observer: &dyn ProgressObserver,
    ) -> Vec<RankedWord> {
        let key = query.serialize();
        if let Some(memo) = self.memo.get(&key) {
            if memo.n >= n {
                return memo.results[..n.min(memo.results.len())].to_vec();
            }
        }

        let mut top_n: BinaryHeap<EntropyEntry> = BinaryHeap::with_capacity(n + 1);
        let mut recomputed: Vec<RankedWord> = Vec::new();
        let work_list_total = self.work_list.len() as u64;
        let mut done = 0u64;

        loop {
            let threshold = top_n.peek().map(|e| e.0.entropy);
            let should_pop = match (self.work_list.peek(), threshold) {
                (None, _) => false,
                (Some(_), None) => top_n.len() < n,
                (Some(top), Some(threshold)) => top.0.max_entropy_bound > threshold || top_n.len() < n,
            };
            if !should_pop {
                break;
            }

            let Some(BoundEntry(mut candidate)) = self.work_list.pop() else {
                break;
            };

            let histogram = index.partition(candidate.word, query, WordSet::Possible);
            let total: u32 = histogram.values().sum();

            done += 1;
            observer.update(done, work_list_total);

            if total == 0 {
                // No possible candidate survives this query; nothing left to rank.
                continue;
            }

            let entropy = shannon_entropy(&histogram, total);
            let distinct = histogram.len();
            let bound = (distinct as f64).log2();

            candidate.entropy = entropy;
            candidate.max_entropy_bound = bound;
            candidate.score = entropy;

            let in_possible = query.verify(candidate.word) && index.contains(candidate.word, WordSet::Possible);

            if bound <= 0.0 && !in_possible {
                // Proves nothing and cannot itself win; drop it for this query.
                continue;
            }

            recomputed.push(candidate.clone());

            if top_n.len() < n {
                top_n.push(EntropyEntry(candidate, in_possible));
            } else if let Some(worst) = top_n.peek() {
                if candidate.entropy > worst.0.entropy
                    || (candidate.entropy == worst.0.entropy && in_possible && !worst.1)
                {
                    top_n.pop();
                    top_n.push(EntropyEntry(candidate, in_possible));
                }
            }
        }

        for candidate in recomputed {
            self.work_list.push(BoundEntry(candidate));
        }

        if done > 0 {
            observer.finish();
        }

        let mut results: Vec<RankedWord> = top_n.into_iter().map(|entry| entry.0).collect();
        results.sort_by(|a, b| {
            b.entropy
                .partial_cmp(&a.entropy)
                .unwrap_or(Ordering::Equal)
        });

        self.memo.insert(
            key,
            Memo {
                n,
                results: results.clone(),
            },
        );

        results
    }
}

fn shannon_entropy(histogram: &HashMap<usize, u32>, total: u32) -> f64 {
    let total = total as f64;
    histogram.values().fold(0.0, |acc, &bucket| {
        if bucket == 0 {
            acc
        } else {
            let p = bucket as f64 / total;
            acc - p * p.log2()
        }
    })
}

/// Cubic regression recovered from the original score-over-entropy
/// model: expected additional guesses as a function of the bits of
/// information a guess *fails* to resolve this ply.
fn expected_score(remaining_after_guess_bits: f64) -> f64 {
    let x = remaining_after_guess_bits;
    0.003_238_76 * x.powi(3) - 0.064_661_7 * x.powi(2) + 0.540_225 * x + 0.989_117
}

/// A ranking pipeline; the entropy ranker is the only one that
/// touches `Ranker`'s work list directly, but every variant shares the
/// same call shape so `GameState` can hold a `Box<dyn RankingStrategy>`.
pub trait RankingStrategy {
    /// `ply` is the 1-indexed guess number about to be made; used by
    /// [`RegressionRanker`] to turn "bits short of solved" into an
    /// expected guess count. `observer` is forwarded to the bulk
    /// entropy pass (§5/§6.1).
    fn rank(
        &self,
        ranker: &mut Ranker,
        index: &PrefixIndex,
        query: &Query,
        ply: u32,
        n: usize,
        observer: &dyn ProgressObserver,
    ) -> Vec<RankedWord>;
}

/// The entropy-only ranker of §4.5.
#[derive(Debug, Default)]
pub struct EntropyRanker;

impl RankingStrategy for EntropyRanker {
    fn rank(
        &self,
        ranker: &mut Ranker,
        index: &PrefixIndex,
        query: &Query,
        _ply: u32,
        n: usize,
        observer: &dyn ProgressObserver,
    ) -> Vec<RankedWord> {
        ranker.top_n_entropy(index, query, n, observer)
    }
}

/// Wraps [`EntropyRanker`] and overrides `score` with the expected
/// total guess count, trading raw information for the chance of a
/// lucky one-shot win.
#[derive(Debug, Default)]
pub struct RegressionRanker {
    inner: EntropyRanker,
}

impl RankingStrategy for RegressionRanker {
    fn rank(
        &self,
        ranker: &mut Ranker,
        index: &PrefixIndex,
        query: &Query,
        ply: u32,
        n: usize,
        observer: &dyn ProgressObserver,
    ) -> Vec<RankedWord> {
        let mut results = self.inner.rank(ranker, index, query, ply, n, observer);

        let possible_count = index.count(query, WordSet::Possible).max(1) as f64;
        let remaining_bits = possible_count.log2();
        let guesses = ply as f64;

        for ranked in &mut results {
            let is_possible_answer =
                query.verify(ranked.word) && index.contains(ranked.word, WordSet::Possible);
            let p = if is_possible_answer {
                1.0 / possible_count
            } else {
                0.0
            };
            let unresolved_bits = (remaining_bits - ranked.entropy).max(0.0);
            ranked.score = p * guesses + (1.0 - p) * (guesses + expected_score(unresolved_bits));
        }

        results.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
        results
    }
}

/// Specialization used by [`crate::simulate::Simulator`]: for a fixed,
/// bounded target set it precomputes every `(guess, target)` pattern
/// once and serves partitions from that table instead of re-walking
/// the trie on every ply of every simulated game.
pub struct SimulationRanker {
    inner: EntropyRanker,
    patterns: HashMap<(Word, Word), crate::tile::Pattern>,
    targets: Vec<Word>,
}

impl SimulationRanker {
    pub fn build(guesses: &[Word], targets: &[Word]) -> Self {
        let mut patterns = HashMap::with_capacity(guesses.len() * targets.len());
        for &guess in guesses {
            for &target in targets {
                patterns.insert((guess, target), crate::feedback::pattern_of(guess, target));
            }
        }
        SimulationRanker {
            inner: EntropyRanker,
            patterns,
            targets: targets.to_vec(),
        }
    }

    /// Partitions the *bounded* target set via the precomputed table,
    /// restricted to targets that still satisfy `query`.
    pub fn partition_cached(&self, guess: Word, query: &Query) -> HashMap<usize, u32> {
        let mut histogram = HashMap::new();
        for &target in &self.targets {
            if !query.verify(target) {
                continue;
            }
            if let Some(pattern) = self.patterns.get(&(guess, target)) {
                *histogram.entry(pattern.code()).or_insert(0) += 1;
            }
        }
        histogram
    }
}

impl RankingStrategy for SimulationRanker {
    fn rank(
        &self,
        ranker: &mut Ranker,
        index: &PrefixIndex,
        query: &Query,
        ply: u32,
        n: usize,
        observer: &dyn ProgressObserver,
    ) -> Vec<RankedWord> {
        self.inner.rank(ranker, index, query, ply, n, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;

    fn w(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    fn small_index() -> PrefixIndex {
        let possible = [
            "beisa", "fossa", "plush", "queck", "rossa", "sputa", "squad", "camus",
        ]
        .map(w);
        PrefixIndex::build(&possible, &possible)
    }

    #[test]
    fn top_n_entropy_returns_at_most_n_results() {
        let index = small_index();
        let allowed: Vec<Word> = [
            "beisa", "fossa", "plush", "queck", "rossa", "sputa", "squad", "camus",
        ]
        .map(w)
        .to_vec();
        let mut ranker = Ranker::new(&allowed);
        let query = Query::new();
        let results = ranker.top_n_entropy(&index, &query, 3, &NullProgress);
        assert!(results.len() <= 3);
    }

    #[test]
    fn top_n_entropy_is_sorted_descending() {
        let index = small_index();
        let allowed: Vec<Word> = [
            "beisa", "fossa", "plush", "queck", "rossa", "sputa", "squad", "camus",
        ]
        .map(w)
        .to_vec();
        let mut ranker = Ranker::new(&allowed);
        let query = Query::new();
        let results = ranker.top_n_entropy(&index, &query, 8, &NullProgress);
        for window in results.windows(2) {
            assert!(window[0].entropy >= window[1].entropy - 1e-9);
        }
    }

    #[test]
    fn memo_reuses_result_for_equal_or_smaller_n() {
        let index = small_index();
        let allowed: Vec<Word> = [
            "beisa", "fossa", "plush", "queck", "rossa", "sputa", "squad", "camus",
        ]
        .map(w)
        .to_vec();
        let mut ranker = Ranker::new(&allowed);
        let query = Query::new();
        let first = ranker.top_n_entropy(&index, &query, 4, &NullProgress);
        assert_eq!(ranker.memo_len(), 1);
        let second = ranker.top_n_entropy(&index, &query, 2, &NullProgress);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0], first[0]);
    }

    #[test]
    fn regression_ranker_assigns_finite_scores() {
        let index = small_index();
        let allowed: Vec<Word> = [
            "beisa", "fossa", "plush", "queck", "rossa", "sputa", "squad", "camus",
        ]
        .map(w)
        .to_vec();
        let mut ranker = Ranker::new(&allowed);
        let query = Query::new();
        let strategy = RegressionRanker::default();
        let results = strategy.rank(&mut ranker, &index, &query, 1, 3, &NullProgress);
        for ranked in &results {
            assert!(ranked.score.is_finite());
        }
    }
}
