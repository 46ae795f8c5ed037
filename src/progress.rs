//! Progress reporting for sync runs
//!
//! Displays progress in a cargo-like format:
//! ```text
//!      Deleted old (id 1)
//!      Syncing 12 images from ./images
//!      Created smile (id 42)
//!     Replaced wave (id 7 -> 43)
//!       Failed bad name: Invalid emoji name 'bad name' ...
//!     Finished 1 created, 1 replaced, 9 unchanged, 1 deleted, 0 skipped, 1 failed
//! ```

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write as _;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::sync::{SyncAction, SyncEvent, SyncReport};

/// Receives a status update for every emoji processed during a run.
///
/// Events for skipped duplicates and deletions arrive before `started`;
/// every event after it belongs to one image of the directory.
pub trait ProgressObserver: Send + Sync {
    fn started(&self, _directory: &Path, _images: usize) {}

    fn event(&self, event: &SyncEvent);

    fn finished(&self, _report: &SyncReport) {}
}

/// Observer that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {
    fn event(&self, _event: &SyncEvent) {}
}

/// Status verbs, right-aligned to 12 chars
struct Status;

impl Status {
    const SYNCING: &str = "Syncing";
    const CREATED: &str = "Created";
    const REPLACED: &str = "Replaced";
    const UNCHANGED: &str = "Unchanged";
    const DELETED: &str = "Deleted";
    const SKIPPED: &str = "Skipped";
    const FAILED: &str = "Failed";
    const FINISHED: &str = "Finished";
}

/// Terminal observer: one styled line per event plus a bar over the images
pub struct ConsoleProgress {
    bar: ProgressBar,
    images_started: AtomicBool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg:>12} [{bar:25.cyan/dim}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_message("Processing");
        Self {
            bar,
            images_started: AtomicBool::new(false),
        }
    }

    fn line(&self, style: Style, status: &str, message: &str) {
        self.bar.suspend(|| {
            let mut term = Term::stderr();
            let _ = writeln!(term, "{:>12} {}", style.apply_to(status), message);
        });
    }

    fn status_for(action: &SyncAction) -> (Style, &'static str) {
        match action {
            SyncAction::Created { .. } => (Style::new().green().bold(), Status::CREATED),
            SyncAction::Replaced { .. } => (Style::new().yellow().bold(), Status::REPLACED),
            SyncAction::Unchanged => (Style::new().dim(), Status::UNCHANGED),
            SyncAction::Deleted { .. } => (Style::new().red().bold(), Status::DELETED),
            SyncAction::Skipped { .. } => (Style::new().yellow(), Status::SKIPPED),
            SyncAction::Failed { .. } => (Style::new().red().bold(), Status::FAILED),
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ConsoleProgress {
    fn started(&self, directory: &Path, images: usize) {
        self.bar.set_length(images as u64);
        self.images_started.store(true, Ordering::Relaxed);
        self.line(
            Style::new().cyan().bold(),
            Status::SYNCING,
            &format!("{} images from {}", images, directory.display()),
        );
    }

    fn event(&self, event: &SyncEvent) {
        let (style, status) = Self::status_for(&event.action);
        self.line(style, status, &event.to_string());

        if self.images_started.load(Ordering::Relaxed) {
            self.bar.inc(1);
        }
    }

    fn finished(&self, report: &SyncReport) {
        self.bar.finish_and_clear();

        let style = if report.has_failures() {
            Style::new().yellow().bold()
        } else {
            Style::new().green().bold()
        };
        self.line(
            style,
            Status::FINISHED,
            &format!(
                "{} created, {} replaced, {} unchanged, {} deleted, {} skipped, {} failed",
                report.created(),
                report.replaced(),
                report.unchanged(),
                report.deleted(),
                report.skipped(),
                report.failed()
            ),
        );
    }
}
