use crate::error::{approx_eq, SolverError};
use crate::feedback::{extend_query, pattern_of};
use crate::progress::ProgressObserver;
use crate::query::Query;
use crate::ranker::{EntropyRanker, RankedWord, Ranker, RankingStrategy};
use crate::stat::Stat;
use crate::trie::{PrefixIndex, WordSet};
use crate::word::Word;
use rand::Rng;
use rand::thread_rng;
use std::cmp::Ordering;

pub const MAX_GUESSES: u32 = 6;

/// `ONGOING` / `WON` / `LOST`, per §3. A game is `LOST` once six
/// guesses have been made without a win, never fewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Won,
    Lost,
}

/// Per-game orchestration (§4.6): owns the target, the running Query,
/// the Stat history, and a warm-started Ranker. `PrefixIndex` is
/// shared read-only state built once for the whole word universe and
/// handed in by reference.
pub struct GameState {
    target: Word,
    status: GameStatus,
    stats: Vec<Stat>,
    query: Query,
    ranker: Ranker,
    strategy: Box<dyn RankingStrategy>,
}

impl GameState {
    /// Builds a new game against `allowed`, choosing `target` (or a
    /// random Possible word if `target` is `None`). `cache` seeds the
    /// Ranker's work list and memo for a warm start (§6.2's
    /// `new(allowed, possible, optional target, optional cache)`).
    pub fn new(
        index: &PrefixIndex,
        allowed: &[Word],
        target: Option<Word>,
        ranker: Option<Ranker>,
    ) -> Result<Self, SolverError> {
        let target = match target {
            Some(word) => word,
            None => random_possible_word(index)?,
        };

        Ok(GameState {
            target,
            status: GameStatus::Ongoing,
            stats: Vec::new(),
            query: Query::new(),
            ranker: ranker.unwrap_or_else(|| Ranker::new(allowed)),
            strategy: Box::new(EntropyRanker),
        })
    }

    /// Swaps in a different ranking strategy (entropy-only vs.
    /// regression-overridden, §4.5's "Polymorphic variants").
    pub fn with_strategy(mut self, strategy: Box<dyn RankingStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn set_target(&mut self, word: Word) {
        self.target = word;
    }

    pub fn randomize_target(&mut self, index: &PrefixIndex) -> Result<(), SolverError> {
        self.target = random_possible_word(index)?;
        Ok(())
    }

    /// Restores the game to its initial state but keeps the same
    /// `Ranker`, reusing its work list and memo as a warm start (§4.6,
    /// §9's reset semantics).
    pub fn reset(&mut self) {
        self.status = GameStatus::Ongoing;
        self.stats.clear();
        self.query = Query::new();
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn guesses_made(&self) -> usize {
        self.stats.len()
    }

    pub fn target(&self) -> Word {
        self.target
    }

    pub fn current_stat(&self) -> Option<&Stat> {
        self.stats.last()
    }

    pub fn stat_at(&self, i: usize) -> Option<&Stat> {
        self.stats.get(i)
    }

    pub fn current_candidates(&self, index: &PrefixIndex) -> Vec<Word> {
        index.words_matching(&self.query, WordSet::Possible)
    }

    /// Top-n guesses under the current Query, delegating to the
    /// configured `RankingStrategy` (§6.2).
    pub fn top_n(
        &mut self,
        index: &PrefixIndex,
        n: usize,
        observer: &dyn ProgressObserver,
    ) -> Vec<RankedWord> {
        let ply = self.stats.len() as u32 + 1;
        self.strategy
            .rank(&mut self.ranker, index, &self.query, ply, n, observer)
    }

    /// Records one guess (§4.6). Returns an invalid `Stat` without
    /// mutating state if the game is already over, per §7's
    /// "game-over action" rule.
    pub fn guess(&mut self, index: &PrefixIndex, guess: Word) -> Stat {
        if self.status != GameStatus::Ongoing {
            return Stat::invalid();
        }

        let prev_count = index.count(&self.query, WordSet::Possible).max(1);
        let expected_bits = self.entropy_of(index, guess);

        let pattern = pattern_of(guess, self.target);
        extend_query(&mut self.query, guess, pattern);

        let count = index.count(&self.query, WordSet::Possible);
        let pattern_prob = count as f64 / prev_count as f64;
        let bits = (prev_count as f64).log2() - (count.max(1) as f64).log2();
        let remaining_bits = (count.max(1) as f64).log2();

        let stat = Stat::new(
            guess,
            pattern,
            count,
            pattern_prob,
            bits,
            expected_bits,
            remaining_bits,
            self.query.clone(),
        );
        self.stats.push(stat.clone());

        if pattern.is_win() {
            self.status = GameStatus::Won;
        } else if self.stats.len() as u32 >= MAX_GUESSES {
            self.status = GameStatus::Lost;
        }

        stat
    }

    /// Entropy of `guess` under the *pre-guess* Query, used to fill in
    /// `Stat.expected_bits` before the Query is extended.
    fn entropy_of(&mut self, index: &PrefixIndex, guess: Word) -> f64 {
        let histogram = index.partition(guess, &self.query, WordSet::Possible);
        let total: u32 = histogram.values().sum();
        if total == 0 {
            return 0.0;
        }
        let total_f = total as f64;
        histogram.values().fold(0.0, |acc, &bucket| {
            if bucket == 0 {
                acc
            } else {
                let p = bucket as f64 / total_f;
                acc - p * p.log2()
            }
        })
    }

    /// Writes the Ranker's work list and memo to `path` (§6.2
    /// `saveCache`). Returns `false` (not an error) on I/O failure.
    pub fn save_cache(&self, path: impl AsRef<std::path::Path>) -> bool {
        crate::cache::save(path, &self.ranker)
    }

    /// Reclaims the game's `Ranker`, e.g. to thread a warm-started
    /// work list and memo across several `GameState`s as
    /// [`crate::simulate::Simulator`] does.
    pub fn into_ranker(self) -> Ranker {
        self.ranker
    }
}

fn random_possible_word(index: &PrefixIndex) -> Result<Word, SolverError> {
    let total = index.count(&Query::new(), WordSet::Possible);
    if total == 0 {
        return Err(SolverError::EmptyPossibleSet);
    }
    let n = thread_rng().gen_range(1..=total);
    index.nth_word(n, WordSet::Possible).ok_or(SolverError::EmptyPossibleSet)
}

/// Tiebreak used by callers comparing two equally-scored `RankedWord`s
/// outside the core ranker (§4.5's "External score override" tiebreak
/// rule): prefer the guess that is itself still a possible answer.
pub fn prefer_in_possible_set(
    a: &RankedWord,
    b: &RankedWord,
    index: &PrefixIndex,
    query: &Query,
) -> Ordering {
    let a_in = query.verify(a.word) && index.contains(a.word, WordSet::Possible);
    let b_in = query.verify(b.word) && index.contains(b.word, WordSet::Possible);
    b_in.cmp(&a_in)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    fn thowl_universe() -> (PrefixIndex, Vec<Word>) {
        let words = [
            "thowl", "butyl", "hotly", "octyl", "othyl", "thurl", "tolly", "tolyl", "troll",
            "trull", "truly", "slate", "aband",
        ]
        .map(w);
        let index = PrefixIndex::build(&words, &words);
        (index, words.to_vec())
    }

    #[test]
    fn guess_against_thowl_narrows_candidates_and_wins() {
        let (index, words) = thowl_universe();
        let mut game = GameState::new(&index, &words, Some(w("thowl")), None).unwrap();

        let stat = game.guess(&index, w("truly"));
        assert!(stat.valid);
        assert_eq!(game.status(), GameStatus::Ongoing);

        let stat = game.guess(&index, w("thowl"));
        assert!(stat.pattern.is_win());
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn guess_count_is_monotone_non_increasing() {
        let (index, words) = thowl_universe();
        let mut game = GameState::new(&index, &words, Some(w("thowl")), None).unwrap();

        let first = game.guess(&index, w("troll")).count;
        let second = game.guess(&index, w("truly")).count;
        assert!(second <= first);
    }

    #[test]
    fn information_conservation_holds_within_tolerance() {
        let (index, words) = thowl_universe();
        let mut game = GameState::new(&index, &words, Some(w("thowl")), None).unwrap();

        let prev_count = words.len() as f64;
        let stat = game.guess(&index, w("troll"));
        let expected_bits = prev_count.log2() - (stat.count.max(1) as f64).log2();
        assert!(approx_eq(stat.bits, expected_bits));
    }

    #[test]
    fn six_non_winning_guesses_lose() {
        let words = ["aband", "slate", "troll", "trull", "tolly", "tolyl", "thowl"].map(w);
        let index = PrefixIndex::build(&words, &words);
        let mut game = GameState::new(&index, &words, Some(w("thowl")), None).unwrap();

        for guess in ["aband", "slate", "troll", "trull", "tolly", "tolyl"] {
            game.guess(&index, w(guess));
        }
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn guessing_after_game_over_is_a_no_op() {
        let (index, words) = thowl_universe();
        let mut game = GameState::new(&index, &words, Some(w("thowl")), None).unwrap();
        game.guess(&index, w("thowl"));
        assert_eq!(game.status(), GameStatus::Won);

        let before = game.guesses_made();
        let stat = game.guess(&index, w("truly"));
        assert!(!stat.valid);
        assert_eq!(game.guesses_made(), before);
    }

    #[test]
    fn reset_clears_history_but_keeps_ranker_memo() {
        let (index, words) = thowl_universe();
        let mut game = GameState::new(&index, &words, Some(w("thowl")), None).unwrap();
        game.top_n(&index, 2, &crate::progress::NullProgress);
        assert!(game.ranker.memo_len() > 0);

        game.guess(&index, w("troll"));
        game.reset();
        assert_eq!(game.guesses_made(), 0);
        assert_eq!(game.status(), GameStatus::Ongoing);
        assert!(game.ranker.memo_len() > 0);
    }

    #[test]
    fn current_candidates_matches_stat_count() {
        let (index, words) = thowl_universe();
        let mut game = GameState::new(&index, &words, Some(w("thowl")), None).unwrap();
        let stat = game.guess(&index, w("troll"));
        let candidates = game.current_candidates(&index);
        assert_eq!(candidates.len() as u32, stat.count);
    }
}
