use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use keymatch_core::{MatchObserver, Tier};

const TEMPLATE: &str = "  [{elapsed_precise}] {bar:30.green/blue} {pos}/{len} {msg}";

/// Progress bar driven by tier and row events from the engine.
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl MatchObserver for ProgressObserver {
    fn tier_started(&self, tier: Tier, pending: usize) {
        self.bar.reset();
        self.bar.set_length(pending as u64);
        self.bar
            .set_message(format!("tier {} ({})", tier.number(), tier.label()));
    }

    fn row_evaluated(&self, _tier: Tier) {
        self.bar.inc(1);
    }
}
