//! Batch simulation runner: runs the solver to completion against
//! every target in a word list and reports a score histogram.

use std::env;
use std::error::Error;
use std::path::PathBuf;
use wordle_solver::{
    default_allowed, default_possible, load_list, EntropyRanker, IndicatifProgress, PrefixIndex,
    ProgressObserver, Simulator, MAX_GUESSES,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let allowed = match args.first() {
        Some(path) => load_list(PathBuf::from(path))?,
        None => default_allowed(),
    };
    let targets = match args.get(1) {
        Some(path) => load_list(PathBuf::from(path))?,
        None => default_possible(),
    };

    let index = PrefixIndex::build(&allowed, &targets);
    let simulator = Simulator::new(&index, &allowed, &targets);

    let observer = IndicatifProgress::new(targets.len() as u64);
    let report = simulator.run(|| Box::new(EntropyRanker), &observer);

    println!("Average score: {:.4}", report.average_score);
    print!("Scores: ");
    for n in 1..=MAX_GUESSES {
        print!("{}={} ", n, report.scores[(n - 1) as usize]);
    }
    println!("lost={}", report.scores[MAX_GUESSES as usize]);

    if !report.lost_words.is_empty() {
        let words: Vec<String> = report.lost_words.iter().map(ToString::to_string).collect();
        println!("Lost words: {}", words.join(", "));
    }

    Ok(())
}
