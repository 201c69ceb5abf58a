//! Progress bar for terminal output during a scan.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display over the candidate set.
///
/// Advances once per candidate file whether the file ends up recorded,
/// skipped as a duplicate, or failed. When the candidate pre-count is
/// unavailable the bar degrades to a spinner so the scan still shows life.
pub struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    pub fn new(total: Option<usize>) -> Self {
        let bar = match total {
            Some(total) => {
                let bar = ProgressBar::new(total as u64);
                bar.set_style(
                    ProgressStyle::with_template("Progress: |{bar:50}| {percent}% Complete")
                        .expect("Invalid progress bar template")
                        .progress_chars("#-"),
                );
                bar
            }
            None => ProgressBar::new_spinner(),
        };
        Self { bar }
    }

    /// One candidate finished, in whatever state.
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
