//! Console progress reporting built on `indicatif`, the concrete
//! [worldforge::progress::ProgressObserver] the core pipeline talks to when
//! driven from this binary.

use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use worldforge::progress::ProgressObserver;

pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self { bar: None }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ConsoleProgress {
    fn start<F: FnOnce() -> String>(&mut self, expected: Option<usize>, message: F) {
        let bar = match expected {
            Some(total) => {
                let bar = ProgressBar::new(total as u64);
                bar.set_style(
                    ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("{msg} {spinner}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar
            }
        };
        bar.set_message(message());
        self.bar = Some(bar);
    }

    fn update(&mut self, completed: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(completed as u64);
        }
    }

    fn finish<F: FnOnce() -> String>(&mut self, message: F) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(message());
        }
    }

    fn warning<F: FnOnce() -> String>(&mut self, message: F) {
        warn!("{}", message());
    }
}
