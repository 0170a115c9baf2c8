//! Interactive terminal loop: a thin consumer of the core engine
//! that prompts for guesses, prints the solver's top suggestion, and
//! reports the scored row after each guess.

use dirs::cache_dir;
use std::env;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use wordle_solver::{
    default_allowed, default_possible, load_cache, load_list, GameState, GameStatus,
    IndicatifProgress, PrefixIndex, ProgressObserver, Word, WORD_LENGTH,
};

const MAX_POSSIBILITIES_TO_PRINT: usize = 50;
const SUGGESTIONS_SHOWN: usize = 5;

struct Config {
    allowed_path: Option<PathBuf>,
    possible_path: Option<PathBuf>,
    target: Option<String>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = parse_args()?;

    let allowed = match &config.allowed_path {
        Some(path) => load_list(path)?,
        None => default_allowed(),
    };
    let possible = match &config.possible_path {
        Some(path) => load_list(path)?,
        None => default_possible(),
    };

    let index = PrefixIndex::build(&allowed, &possible);

    let target = config
        .target
        .as_deref()
        .map(Word::parse)
        .transpose()?;

    let cache_path = cache_file_path();
    let ranker = cache_path
        .as_ref()
        .and_then(load_cache)
        .map(|data| data.into_ranker());

    let mut game = GameState::new(&index, &allowed, target, ranker)?;

    println!("Welcome to the wordle solver!");
    println!("Guess the {WORD_LENGTH}-letter word in six tries. Type 'quit' to exit.");
    println!();

    while game.status() == GameStatus::Ongoing {
        let attempt = game.guesses_made() + 1;
        println!("GUESS {attempt}/6");

        let candidates = game.current_candidates(&index);
        println!("REMAINING WORDS: {}", candidates.len());
        if candidates.len() <= MAX_POSSIBILITIES_TO_PRINT {
            let rendered: Vec<String> = candidates.iter().map(Word::to_string).collect();
            println!("POSSIBILITIES: {{{}}}", rendered.join(", "));
        }

        let observer = IndicatifProgress::new(allowed.len() as u64);
        let suggestions = game.top_n(&index, SUGGESTIONS_SHOWN, &observer);
        if let Some(best) = suggestions.first() {
            println!(
                "SUGGESTED GUESS: {} ({:.3} bits expected)",
                best.word, best.entropy
            );
        }

        print!("Enter your guess: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            println!("\nNo input detected, exiting.");
            return Ok(());
        }

        let raw = line.trim().to_ascii_lowercase();
        if raw == "quit" {
            println!("Come back soon!");
            return Ok(());
        }

        let guess = match Word::parse(&raw) {
            Ok(word) => word,
            Err(_) => {
                println!("Please enter a {WORD_LENGTH}-letter lowercase word.");
                continue;
            }
        };

        let stat = game.guess(&index, guess);
        println!("{}", stat.pattern.to_emoji());
    }

    match game.status() {
        GameStatus::Won => println!(
            "Solved in {} guess{}!",
            game.guesses_made(),
            if game.guesses_made() == 1 { "" } else { "es" }
        ),
        GameStatus::Lost => println!("Out of guesses! The word was {}.", game.target()),
        GameStatus::Ongoing => unreachable!("loop only exits once the game is over"),
    }

    if let Some(path) = &cache_path {
        if !game.save_cache(path) {
            eprintln!("Warning: failed to save warm-start cache to {}", path.display());
        }
    }

    Ok(())
}

fn parse_args() -> Result<Config, Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut idx = 0;
    let mut allowed_path = None;
    let mut possible_path = None;
    let mut target = None;

    while idx < args.len() {
        match args[idx].as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--allowed" => {
                idx += 1;
                allowed_path = Some(PathBuf::from(
                    args.get(idx).ok_or("missing value for --allowed")?,
                ));
            }
            "--possible" => {
                idx += 1;
                possible_path = Some(PathBuf::from(
                    args.get(idx).ok_or("missing value for --possible")?,
                ));
            }
            "--target" => {
                idx += 1;
                target = Some(args.get(idx).ok_or("missing value for --target")?.clone());
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown argument: {other}").into());
            }
            other => {
                if target.is_none() {
                    target = Some(other.to_string());
                } else {
                    return Err("multiple targets provided".into());
                }
            }
        }
        idx += 1;
    }

    Ok(Config {
        allowed_path,
        possible_path,
        target,
    })
}

fn print_usage() {
    println!("Play an information-theoretic wordle solver in the terminal.");
    println!("Usage: solve [--allowed PATH] [--possible PATH] [--target WORD]");
    println!("Without --target a random answer is chosen from the possible list.");
}

fn cache_file_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("wordle-solver").join("ranker_cache.txt"))
}
