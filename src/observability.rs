//! Tracing setup and in-process counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "feedpub=info,tower_http=info";

/// Install the global fmt subscriber; `RUST_LOG` overrides the default filter
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Counters for the book pipeline
#[derive(Debug, Default)]
pub struct Metrics {
    feeds_fetched: AtomicU64,
    books_built: AtomicU64,
    books_failed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed_fetched(&self) {
        self.feeds_fetched.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "feeds_fetched", "Metric incremented");
    }

    pub fn book_built(&self) {
        self.books_built.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "books_built", "Metric incremented");
    }

    pub fn book_failed(&self) {
        self.books_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "books_failed", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            feeds_fetched: self.feeds_fetched.load(Ordering::Relaxed),
            books_built: self.books_built.load(Ordering::Relaxed),
            books_failed: self.books_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub feeds_fetched: u64,
    pub books_built: u64,
    pub books_failed: u64,
}
