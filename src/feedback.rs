use crate::query::Query;
use crate::tile::{Pattern, Tile};
use crate::word::{ALPHABET_SIZE, WORD_LENGTH, Word};

/// Scores `guess` against `target` using the standard two-pass
/// duplicate-aware Wordle rule: exact positions are marked `Correct`
/// first (consuming that target letter), then each remaining guess
/// position claims the earliest unconsumed target occurrence of its
/// letter as `Misplaced`, falling back to `Wrong`.
pub fn pattern_of(guess: Word, target: Word) -> Pattern {
    let guess_letters = guess.letters();
    let target_letters = target.letters();

    let mut tiles = [Tile::Wrong; WORD_LENGTH];
    let mut consumed = [false; WORD_LENGTH];

    for i in 0..WORD_LENGTH {
        if guess_letters[i] == target_letters[i] {
            tiles[i] = Tile::Correct;
            consumed[i] = true;
        }
    }

    let mut remaining_by_letter: [Vec<usize>; ALPHABET_SIZE] = Default::default();
    for j in 0..WORD_LENGTH {
        if !consumed[j] {
            remaining_by_letter[target_letters[j] as usize].push(j);
        }
    }
    for bucket in remaining_by_letter.iter_mut() {
        bucket.reverse();
    }

    for i in 0..WORD_LENGTH {
        if tiles[i] == Tile::Correct {
            continue;
        }
        let bucket = &mut remaining_by_letter[guess_letters[i] as usize];
        if bucket.pop().is_some() {
            tiles[i] = Tile::Misplaced;
        }
    }

    Pattern::new(tiles)
}

/// Folds one ply of (guess, pattern) into `query`, in place. `Correct`
/// and `Misplaced` each contribute one occurrence to the running
/// `minCount` of that letter; `Wrong` forbids the letter at that
/// position and bans it — a ban that only excludes the letter
/// outright if no `Correct`/`Misplaced` of the same letter raised its
/// `minCount` above zero elsewhere in this same guess, otherwise it
/// locks the count at exactly that `minCount`.
pub fn extend_query(query: &mut Query, guess: Word, pattern: Pattern) {
    let letters = guess.letters();
    let tiles = pattern.tiles();

    let mut occurrences_this_guess = [0u8; ALPHABET_SIZE];

    for pos in 0..WORD_LENGTH {
        let letter = letters[pos];
        match tiles[pos] {
            Tile::Correct => {
                query.set_fixed(letter, pos);
                occurrences_this_guess[letter as usize] += 1;
            }
            Tile::Misplaced => {
                query.forbid_at(letter, pos);
                occurrences_this_guess[letter as usize] += 1;
            }
            Tile::Wrong => {
                query.forbid_at(letter, pos);
                query.ban(letter);
            }
        }
    }

    for letter in 0..ALPHABET_SIZE {
        let count = occurrences_this_guess[letter];
        if count > 0 {
            query.require_at_least(letter as u8, count);
        }
    }
}
