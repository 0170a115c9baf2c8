use crate::query::Query;
use crate::tile::Pattern;
use crate::word::Word;
use std::fmt;

/// One record per ply: the guess made, the pattern it produced, the
/// candidate count before/after, and the Query accumulated through
/// this ply. `valid = false` marks a no-op guess attempted after the
/// game already ended (§7's "game-over action" rule) — callers should
/// ignore every other field on an invalid Stat.
#[derive(Debug, Clone)]
pub struct Stat {
    pub guess: Word,
    pub pattern: Pattern,
    pub count: u32,
    pub pattern_prob: f64,
    pub bits: f64,
    pub expected_bits: f64,
    pub remaining_bits: f64,
    pub query: Query,
    pub valid: bool,
}

impl Stat {
    pub(crate) fn invalid() -> Self {
        Stat {
            guess: Word::parse("aahed").expect("fixed sentinel word is valid"),
            pattern: Pattern::from_code(0),
            count: 0,
            pattern_prob: 0.0,
            bits: 0.0,
            expected_bits: 0.0,
            remaining_bits: 0.0,
            query: Query::new(),
            valid: false,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        guess: Word,
        pattern: Pattern,
        count: u32,
        pattern_prob: f64,
        bits: f64,
        expected_bits: f64,
        remaining_bits: f64,
        query: Query,
    ) -> Self {
        Stat {
            guess,
            pattern,
            count,
            pattern_prob,
            bits,
            expected_bits,
            remaining_bits,
            query,
            valid: true,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return write!(f, "<invalid stat>");
        }
        write!(
            f,
            "{} {} count={} p={:.4} bits={:.3} expected={:.3} remaining={:.3}",
            self.guess,
            self.pattern,
            self.count,
            self.pattern_prob,
            self.bits,
            self.expected_bits,
            self.remaining_bits
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_stat_round_trips_display() {
        let stat = Stat::invalid();
        assert!(!stat.valid);
        assert_eq!(stat.to_string(), "<invalid stat>");
    }

    #[test]
    fn valid_stat_displays_fields() {
        let guess = Word::parse("crane").unwrap();
        let stat = Stat::new(
            guess,
            Pattern::from_code(0),
            42,
            0.5,
            1.0,
            2.5,
            5.3923,
            Query::new(),
        );
        let text = stat.to_string();
        assert!(text.contains("crane"));
        assert!(text.contains("count=42"));
    }
}
