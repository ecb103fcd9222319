use tracing::trace;

/// Receives the start and end of every asset load.
pub trait LoadReporter: Send + Sync {
    fn load_started(&self);
    fn load_finished(&self);
}

/// Reports a load as started on creation and as finished when dropped, so
/// the end is reported on success, on error and on cancellation alike.
#[must_use = "the load is reported finished as soon as the guard is dropped"]
pub struct LoadGuard<R: LoadReporter> {
    reporter: R,
    label: String,
}

impl<R: LoadReporter> LoadGuard<R> {
    pub fn new(reporter: R, label: impl Into<String>) -> Self {
        let label = label.into();
        trace!("load started: {}", label);
        reporter.load_started();
        Self { reporter, label }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<R: LoadReporter> Drop for LoadGuard<R> {
    fn drop(&mut self) {
        trace!("load finished: {}", self.label);
        self.reporter.load_finished();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicIsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Tally(Arc<AtomicIsize>);

    impl LoadReporter for Tally {
        fn load_started(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        fn load_finished(&self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn failing_load(tally: Tally) -> Result<(), String> {
        let _guard = LoadGuard::new(tally, "broken");
        Err("model not found".to_string())
    }

    #[test]
    fn test_guard_balances_on_error() {
        let tally = Tally::default();
        assert!(failing_load(tally.clone()).is_err());
        assert_eq!(tally.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_guard_counts_while_alive() {
        let tally = Tally::default();
        let a = LoadGuard::new(tally.clone(), "a");
        let b = LoadGuard::new(tally.clone(), "b");
        assert_eq!(tally.0.load(Ordering::SeqCst), 2);
        assert_eq!(b.label(), "b");

        drop(a);
        assert_eq!(tally.0.load(Ordering::SeqCst), 1);
        drop(b);
        assert_eq!(tally.0.load(Ordering::SeqCst), 0);
    }
}
