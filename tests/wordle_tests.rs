//! Integration suite exercising `GameState` end to end through the
//! public API only, as a separate top-level suite from the
//! `#[cfg(test)]` unit tests colocated per module.

use wordle_solver::{GameState, GameStatus, PrefixIndex, Word, MAX_GUESSES};

fn w(s: &str) -> Word {
    Word::parse(s).unwrap()
}

fn small_universe() -> (PrefixIndex, Vec<Word>) {
    let words = [
        "hello", "world", "aahed", "bruja", "kiaat", "mahal", "shahs", "crane", "slate",
    ]
    .map(w);
    let index = PrefixIndex::build(&words, &words);
    (index, words.to_vec())
}

#[test]
fn valid_word_boundary_checks() {
    assert!(Word::is_valid("hello"));
    assert!(Word::is_valid("world"));
    assert!(Word::is_valid("aahed"));
    assert!(!Word::is_valid("worlds"));
    assert!(!Word::is_valid("12345"));
    assert!(!Word::is_valid(""));
    assert!(!Word::is_valid("...ij"));
}

#[test]
fn six_non_winning_guesses_lose_the_game() {
    let (index, words) = small_universe();
    let mut game = GameState::new(&index, &words, Some(w("aahed")), None).unwrap();

    for _ in 0..MAX_GUESSES {
        game.guess(&index, w("world"));
    }

    assert_eq!(game.guesses_made() as u32, MAX_GUESSES);
    assert_eq!(game.status(), GameStatus::Lost);
}

#[test]
fn guessing_the_target_wins_in_one() {
    let (index, words) = small_universe();
    let mut game = GameState::new(&index, &words, Some(w("hello")), None).unwrap();

    game.guess(&index, w("hello"));

    assert_eq!(game.guesses_made(), 1);
    assert_eq!(game.status(), GameStatus::Won);
}

#[test]
fn duplicate_letter_feedback_matches_the_worked_examples() {
    let (index, words) = small_universe();
    let mut game = GameState::new(&index, &words, Some(w("aahed")), None).unwrap();

    let stat = game.guess(&index, w("bruja"));
    assert_eq!(stat.pattern.to_string(), "WWWWM");

    let stat = game.guess(&index, w("kiaat"));
    assert_eq!(stat.pattern.to_string(), "WWMMW");

    let stat = game.guess(&index, w("mahal"));
    assert_eq!(stat.pattern.to_string(), "WCCMW");

    let stat = game.guess(&index, w("shahs"));
    assert_eq!(stat.pattern.to_string(), "WMMWW");
}

#[test]
fn guess_after_game_over_does_not_mutate_state() {
    let (index, words) = small_universe();
    let mut game = GameState::new(&index, &words, Some(w("hello")), None).unwrap();
    game.guess(&index, w("hello"));
    assert_eq!(game.status(), GameStatus::Won);

    let stat = game.guess(&index, w("world"));
    assert!(!stat.valid);
    assert_eq!(game.guesses_made(), 1);
}
