use crate::word::WORD_LENGTH;
use std::fmt;

/// One of the three feedback states a tile can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Correct,
    Misplaced,
    Wrong,
}

impl Tile {
    fn letter(self) -> char {
        match self {
            Tile::Correct => 'C',
            Tile::Misplaced => 'M',
            Tile::Wrong => 'W',
        }
    }

    fn color_code(self) -> &'static str {
        match self {
            Tile::Correct => "\x1b[48;5;34m\x1b[97m",
            Tile::Misplaced => "\x1b[48;5;178m\x1b[30m",
            Tile::Wrong => "\x1b[48;5;240m\x1b[97m",
        }
    }

    fn emoji(self) -> char {
        match self {
            Tile::Correct => '🟩',
            Tile::Misplaced => '🟨',
            Tile::Wrong => '⬛',
        }
    }
}

/// The ordered five-tile feedback a guess produces against a target.
/// There are exactly `3^5 = 243` distinct patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern([Tile; WORD_LENGTH]);

pub const PATTERN_SPACE: usize = 243;

impl Pattern {
    pub(crate) fn new(tiles: [Tile; WORD_LENGTH]) -> Self {
        Pattern(tiles)
    }

    pub fn tiles(&self) -> [Tile; WORD_LENGTH] {
        self.0
    }

    pub fn is_win(&self) -> bool {
        self.0.iter().all(|tile| *tile == Tile::Correct)
    }

    /// Encodes the pattern as a base-3 index in `0..243`, used as a
    /// compact histogram key during partitioning.
    pub fn code(&self) -> usize {
        self.0.iter().fold(0usize, |acc, tile| {
            acc * 3
                + match tile {
                    Tile::Wrong => 0,
                    Tile::Misplaced => 1,
                    Tile::Correct => 2,
                }
        })
    }

    pub fn from_code(mut code: usize) -> Self {
        let mut tiles = [Tile::Wrong; WORD_LENGTH];
        for i in (0..WORD_LENGTH).rev() {
            tiles[i] = match code % 3 {
                2 => Tile::Correct,
                1 => Tile::Misplaced,
                _ => Tile::Wrong,
            };
            code /= 3;
        }
        Pattern(tiles)
    }

    pub fn to_emoji(&self) -> String {
        self.0.iter().map(|tile| tile.emoji()).collect()
    }

    pub fn colored_string(&self, word: &crate::word::Word) -> String {
        self.0
            .iter()
            .zip(word.letters())
            .map(|(tile, letter)| {
                format!("{} {} \x1b[0m", tile.color_code(), (b'a' + letter) as char)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tile in &self.0 {
            write!(f, "{}", tile.letter())?;
        }
        Ok(())
    }
}
