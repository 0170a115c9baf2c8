use indicatif::{ProgressBar, ProgressStyle};

/// Observes a bulk entropy computation so a caller can render a
/// progress bar; entirely optional, consumed only during the first
/// ply's full-universe pass.
pub trait ProgressObserver {
    fn update(&self, done: u64, total: u64);
    fn finish(&self);
}

/// `indicatif`-backed observer rendering a terminal progress bar.
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_message("Ranking guesses");
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{msg:<24} {bar:40.cyan/blue} {pos:>5}/{len:<5} [{elapsed_precise}<{eta_precise}]",
                )
                .expect("valid template"),
        );
        IndicatifProgress { bar }
    }
}

impl ProgressObserver for IndicatifProgress {
    fn update(&self, done: u64, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(done);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// No-op observer for tests and library-only consumers.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn update(&self, _done: u64, _total: u64) {}
    fn finish(&self) {}
}
