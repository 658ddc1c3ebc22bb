use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-wide counters for the review service.
pub struct Metrics {
    total_requests: AtomicUsize,
    edits_applied: AtomicUsize,
    saves_completed: AtomicUsize,
    rows_appended: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            edits_applied: AtomicUsize::new(0),
            saves_completed: AtomicUsize::new(0),
            rows_appended: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_edit(&self) {
        self.edits_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_save(&self, rows: usize) {
        self.saves_completed.fetch_add(1, Ordering::Relaxed);
        self.rows_appended.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            edits_applied: self.edits_applied.load(Ordering::Relaxed),
            saves_completed: self.saves_completed.load(Ordering::Relaxed),
            rows_appended: self.rows_appended.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub edits_applied: usize,
    pub saves_completed: usize,
    pub rows_appended: usize,
}
