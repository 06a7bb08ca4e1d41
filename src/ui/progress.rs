use crate::import::ImportEvent;
use crate::output::is_quiet;
use crate::ui::{theme, Icons};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::{Duration, Instant};

/// Progress bar over the CSV files of an import run.
///
/// Hidden when stdout is not a terminal or quiet mode is on, so piped
/// output stays line oriented.
pub struct ImportProgress {
    pb: ProgressBar,
    started: Instant,
}

impl ImportProgress {
    pub fn new() -> Self {
        let pb = if console::Term::stdout().is_term() && !is_quiet() {
            let pb = ProgressBar::new(0);
            let template = "{spinner} [{bar:30}] {pos}/{len} {msg}";
            if let Ok(style) = ProgressStyle::with_template(template) {
                pb.set_style(style.progress_chars("=> "));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        Self {
            pb,
            started: Instant::now(),
        }
    }

    /// Feed an importer event into the bar
    pub fn observe(&self, event: &ImportEvent<'_>) {
        match event {
            ImportEvent::Discovered { total } => {
                self.pb.set_length(*total as u64);
                self.pb.enable_steady_tick(Duration::from_millis(100));
            }
            ImportEvent::Started { table, .. } => {
                self.pb.set_message(format!("Importing: {}", table));
            }
            ImportEvent::Finished { .. } => {
                self.pb.inc(1);
            }
        }
    }

    /// Run `f` with the bar temporarily cleared, for printing lines
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.pb.suspend(f)
    }

    pub fn finish_with_summary(&self, files: usize, rows: usize, inserted: usize) {
        self.pb.finish_and_clear();
        if is_quiet() {
            return;
        }
        println!();
        println!(
            "{} {}",
            Icons::CHECK.style(theme().success.clone()),
            format!("Import finished in {}", HumanDuration(self.started.elapsed()))
                .style(theme().success.clone())
        );
        println!(
            "  {} {}  {} {}  {} {}",
            Icons::FILE.style(theme().info.clone()),
            files,
            Icons::PACKAGE.style(theme().info.clone()),
            rows,
            Icons::NEW.style(theme().info.clone()),
            inserted
        );
    }
}

impl Default for ImportProgress {
    fn default() -> Self {
        Self::new()
    }
}
