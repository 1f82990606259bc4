//! Progress reporting for counted fetches.

/// Observer receiving fractional completion in `[0, 1]`.
///
/// Values are non-decreasing and end at exactly `1.0` when a counted fetch
/// runs to completion. Any `Fn(f64)` closure is an observer.
pub trait Progress: Send + Sync {
    /// Reports the completed fraction.
    fn report(&self, fraction: f64);
}

impl<F> Progress for F
where
    F: Fn(f64) + Send + Sync,
{
    fn report(&self, fraction: f64) {
        self(fraction);
    }
}

/// Running count of emitted items for one counted fetch.
///
/// Forwards fractions to an optional observer; with no observer every call
/// is a no-op apart from the count.
#[derive(Clone, Copy)]
pub struct ProgressTracker<'a> {
    observer: Option<&'a dyn Progress>,
    total: u64,
    emitted: u64,
}

impl<'a> ProgressTracker<'a> {
    /// Creates a tracker for `total` expected items.
    #[must_use]
    pub const fn new(observer: Option<&'a dyn Progress>, total: u64) -> Self {
        Self {
            observer,
            total,
            emitted: 0,
        }
    }

    /// Reports the starting point: `0.0`, or `1.0` when nothing is expected.
    pub fn start(&self) {
        if self.total == 0 {
            self.send(1.0);
        } else {
            self.send(0.0);
        }
    }

    /// Adds `count` emitted items and reports the new fraction.
    pub fn advance(&mut self, count: usize) {
        self.emitted = self.emitted.saturating_add(count as u64);
        if self.total > 0 {
            self.send(self.fraction());
        }
    }

    /// Reports completion. An empty fetch already reported `1.0` on start.
    pub fn finish(&self) {
        if self.total > 0 {
            self.send(1.0);
        }
    }

    /// Returns the number of items emitted so far.
    #[must_use]
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Returns the completed fraction, clamped to `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.emitted as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    fn send(&self, fraction: f64) {
        if let Some(observer) = self.observer {
            observer.report(fraction);
        }
    }
}

impl std::fmt::Debug for ProgressTracker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("observed", &self.observer.is_some())
            .field("total", &self.total)
            .field("emitted", &self.emitted)
            .finish()
    }
}
