use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    current: AtomicUsize,
    peak: AtomicUsize,
    entered: AtomicUsize,
}

/// Tracks how many tasks are inside a section at once.
///
/// Clones share the same counters. Call [`ConcurrencyProbe::enter`] when a task
/// starts running and keep the guard alive until it finishes.
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyProbe {
    counters: Arc<Counters>,
}

impl ConcurrencyProbe {
    /// Create a probe with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one task as running until the guard is dropped
    pub fn enter(&self) -> ProbeGuard {
        let now = self.counters.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak.fetch_max(now, Ordering::SeqCst);
        self.counters.entered.fetch_add(1, Ordering::SeqCst);
        ProbeGuard {
            counters: self.counters.clone(),
        }
    }

    /// Tasks running right now
    pub fn current(&self) -> usize {
        self.counters.current.load(Ordering::SeqCst)
    }

    /// Most tasks ever running at once
    pub fn peak(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }

    /// Total number of tasks that entered
    pub fn entered(&self) -> usize {
        self.counters.entered.load(Ordering::SeqCst)
    }
}

/// Leaves the probed section when dropped
#[derive(Debug)]
pub struct ProbeGuard {
    counters: Arc<Counters>,
}

impl Drop for ProbeGuard {
    fn drop(&mut self) {
        self.counters.current.fetch_sub(1, Ordering::SeqCst);
    }
}
