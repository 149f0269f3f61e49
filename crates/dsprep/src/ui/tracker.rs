use std::sync::Arc;
use std::time::Duration;

use dsprep_archive::ExtractProgress;
use dsprep_fetch::{FetchPhase, Progress};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use once_cell::sync::Lazy;

const BYTES_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {wide_msg}";

const ENTRIES_STYLE: &str =
    "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static BYTES_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| style(BYTES_STYLE));

static ENTRIES_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| style(ENTRIES_STYLE));

fn style(template: &str) -> Option<ProgressStyle> {
    ProgressStyle::with_template(template)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
}

/// Every visible bar hangs off this so concurrent bars don't overwrite each other.
pub fn global_multi_progress() -> MultiProgress {
    static GLOBAL_MP: Lazy<MultiProgress> = Lazy::new(|| {
        let mp = MultiProgress::new();
        mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(20));
        mp
    });
    GLOBAL_MP.clone()
}

/// A bar fed by the download or extraction callbacks.
///
/// Cloning is cheap and every clone drives the same bar.
#[derive(Clone)]
pub struct ProgressTracker {
    pb: ProgressBar,
    finish: Option<String>,
}

impl ProgressTracker {
    pub fn finish(&self) {
        if self.pb.is_finished() {
            return;
        }
        match &self.finish {
            Some(msg) => self.pb.finish_with_message(msg.clone()),
            None => self.pb.finish(),
        }
    }

    /// Remove the bar if nothing finished it, e.g. the download was skipped
    /// or failed half way.
    pub fn close(&self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }

    /// Callback for [`dsprep_fetch::FetchOptions::on_progress`].
    pub fn fetch_callback(&self) -> Arc<dyn Fn(&Progress) + Send + Sync> {
        let tracker = self.clone();
        Arc::new(move |progress: &Progress| tracker.on_fetch(progress))
    }

    /// Callback for [`dsprep_archive::ExtractOptions::on_progress`].
    pub fn extract_callback(&self) -> Arc<dyn Fn(&ExtractProgress) + Send + Sync> {
        let tracker = self.clone();
        Arc::new(move |progress: &ExtractProgress| tracker.on_extract(progress))
    }

    fn on_fetch(&self, progress: &Progress) {
        match progress.phase {
            FetchPhase::Connecting => {
                self.pb.enable_steady_tick(Duration::from_millis(100));
                self.pb.set_message("connecting");
            }
            FetchPhase::Downloading => {
                if let Some(total) = progress.total_bytes {
                    self.pb.set_length(total);
                }
                self.pb.set_position(progress.bytes_downloaded);
                self.pb.set_message("");
            }
            FetchPhase::Committing => self.pb.set_message("saving"),
            FetchPhase::Completed => {
                self.pb.set_position(progress.bytes_downloaded);
                self.finish();
            }
        }
    }

    fn on_extract(&self, progress: &ExtractProgress) {
        self.pb.set_length(progress.entries_total as u64);
        self.pb.set_position(progress.entries_done as u64);
        self.pb.set_message(progress.current.display().to_string());
        if progress.entries_done >= progress.entries_total {
            self.finish();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressTrackerBuilder {
    prefix: Option<String>,
    finish: Option<String>,
    hidden: bool,
}

impl ProgressTrackerBuilder {
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_finish(mut self, finish: &str) -> Self {
        self.finish = Some(finish.to_string());
        self
    }

    /// Never draw, used for `--quiet`.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Bar counting bytes, for downloads.
    pub fn bytes(self) -> ProgressTracker {
        self.build(&BYTES_TEMPLATE)
    }

    /// Bar counting archive entries.
    pub fn entries(self) -> ProgressTracker {
        self.build(&ENTRIES_TEMPLATE)
    }

    fn build(self, template: &Lazy<Option<ProgressStyle>>) -> ProgressTracker {
        // the length arrives with the first progress update
        let pb = ProgressBar::no_length();
        let pb = if let Some(style) = template.as_ref() {
            pb.with_style(style.clone())
        } else {
            pb
        };

        let pb = if self.hidden {
            pb.set_draw_target(ProgressDrawTarget::hidden());
            pb
        } else {
            global_multi_progress().add(pb)
        };

        if let Some(prefix) = self.prefix {
            pb.set_prefix(prefix);
        }
        ProgressTracker {
            pb,
            finish: self.finish,
        }
    }
}
