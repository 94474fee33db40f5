//! Progress notifications for the volume fetch loop.

use log::info;

/// How far the fetch loop has come, counted in (window, sensor) requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Percentage complete, rounded to one decimal. An empty run is complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        let ratio = self.completed.min(self.total) as f64 / self.total as f64;
        (ratio * 1000.0).round() / 10.0
    }
}

/// Receives progress updates. Updates never go backwards.
pub trait ProgressObserver {
    fn on_progress(&mut self, progress: Progress);
}

impl<F: FnMut(Progress)> ProgressObserver for F {
    fn on_progress(&mut self, progress: Progress) {
        self(progress)
    }
}

/// Ignores progress.
impl ProgressObserver for () {
    fn on_progress(&mut self, _progress: Progress) {}
}

/// Logs progress at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, progress: Progress) {
        info!(
            "Downloading - {:.1}% ({}/{})",
            progress.percent(),
            progress.completed,
            progress.total
        );
    }
}

/// Wraps an observer and only forwards updates that raise the rounded percentage.
pub(crate) struct ProgressTracker<'a, P: ProgressObserver + ?Sized> {
    observer: &'a mut P,
    total: usize,
    completed: usize,
    last_percent: Option<f64>,
}

impl<'a, P: ProgressObserver + ?Sized> ProgressTracker<'a, P> {
    pub fn new(observer: &'a mut P, total: usize) -> Self {
        Self {
            observer,
            total,
            completed: 0,
            last_percent: None,
        }
    }

    pub fn start(&mut self) {
        self.emit();
    }

    pub fn advance(&mut self) {
        self.completed = (self.completed + 1).min(self.total);
        self.emit();
    }

    fn emit(&mut self) {
        let progress = Progress {
            completed: self.completed,
            total: self.total,
        };
        let percent = progress.percent();
        if self.last_percent.is_some_and(|last| percent <= last) {
            return;
        }
        self.last_percent = Some(percent);
        self.observer.on_progress(progress);
    }
}
