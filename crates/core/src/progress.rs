//! Progress reporting is an external collaborator: the pipeline only ever
//! talks to this trait, never to a concrete terminal or GUI. The CLI crate
//! supplies a console implementation; tests use [NoOpProgress].

/// Observer notified as a stage works through a loop. Stages call
/// [ProgressObserver::start] once with an expected item count (or
/// [ProgressObserver::start_unknown_endpoint] when the count isn't known up
/// front, e.g. while tracing wind paths), then [ProgressObserver::update] per
/// item, then [ProgressObserver::finish].
pub trait ProgressObserver {
    fn start<F: FnOnce() -> String>(&mut self, expected: Option<usize>, message: F);

    fn start_unknown_endpoint<F: FnOnce() -> String>(&mut self, message: F) {
        self.start(None, message);
    }

    fn update(&mut self, completed: usize);

    fn finish<F: FnOnce() -> String>(&mut self, message: F);

    /// A recoverable problem (degenerate geometry, convergence failure,
    /// habitat shortfall) that the stage handled locally but the operator
    /// should know about.
    fn warning<F: FnOnce() -> String>(&mut self, message: F);
}

/// A no-op observer for tests and library callers who don't care about
/// progress reporting.
#[derive(Default)]
pub struct NoOpProgress;

impl ProgressObserver for NoOpProgress {
    fn start<F: FnOnce() -> String>(&mut self, _expected: Option<usize>, _message: F) {}
    fn update(&mut self, _completed: usize) {}
    fn finish<F: FnOnce() -> String>(&mut self, _message: F) {}
    fn warning<F: FnOnce() -> String>(&mut self, _message: F) {}
}

/// Extension trait that lets pipeline code wrap an iterator with progress
/// notifications inline, mirroring how each stage loops over its working set.
pub trait WatchableIterator: Iterator + Sized {
    fn watch<'p, P: ProgressObserver>(
        self,
        progress: &'p mut P,
        start_message: &'static str,
        finish_message: &'static str,
    ) -> Watched<'p, Self, P> {
        progress.start(self.size_hint().1, || start_message.to_string());
        Watched {
            inner: self,
            progress,
            count: 0,
            finish_message,
        }
    }
}

impl<I: Iterator> WatchableIterator for I {}

pub struct Watched<'p, I, P> {
    inner: I,
    progress: &'p mut P,
    count: usize,
    finish_message: &'static str,
}

impl<I: Iterator, P: ProgressObserver> Iterator for Watched<'_, I, P> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next() {
            Some(item) => {
                self.count += 1;
                self.progress.update(self.count);
                Some(item)
            }
            None => {
                self.progress.finish(|| self.finish_message.to_string());
                None
            }
        }
    }
}
