//! Metrics and reporting for pipeline operations.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Pipeline operation metrics (thread-safe counters).
#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    /// Lookups answered from the alias cache
    pub cache_hits: Arc<AtomicU64>,
    /// Lookups that had to consult the source
    pub cache_misses: Arc<AtomicU64>,
    /// Scalar source fetches issued
    pub source_fetches: Arc<AtomicU64>,
    /// Bulk source fetches issued
    pub bulk_fetches: Arc<AtomicU64>,
    /// Lookups that waited on another caller's in-flight fetch
    pub coalesced_waits: Arc<AtomicU64>,
    /// Records written to the cache
    pub records_stored: Arc<AtomicU64>,
    /// Alias entries written to the cache
    pub aliases_stored: Arc<AtomicU64>,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self {
            cache_hits: Arc::new(AtomicU64::new(0)),
            cache_misses: Arc::new(AtomicU64::new(0)),
            source_fetches: Arc::new(AtomicU64::new(0)),
            bulk_fetches: Arc::new(AtomicU64::new(0)),
            coalesced_waits: Arc::new(AtomicU64::new(0)),
            records_stored: Arc::new(AtomicU64::new(0)),
            aliases_stored: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl PipelineMetrics {
    /// Record a cache hit.
    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss.
    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a scalar source fetch.
    pub fn record_source_fetch(&self) {
        self.source_fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a bulk source fetch.
    pub fn record_bulk_fetch(&self) {
        self.bulk_fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that waited on an in-flight fetch.
    pub fn record_coalesced_wait(&self) {
        self.coalesced_waits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a stored record and how many alias entries it produced.
    pub fn record_store(&self, aliases: u64) {
        self.records_stored.fetch_add(1, Ordering::Relaxed);
        self.aliases_stored.fetch_add(aliases, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> PipelineMetricsSnapshot {
        PipelineMetricsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            source_fetches: self.source_fetches.load(Ordering::Relaxed),
            bulk_fetches: self.bulk_fetches.load(Ordering::Relaxed),
            coalesced_waits: self.coalesced_waits.load(Ordering::Relaxed),
            records_stored: self.records_stored.load(Ordering::Relaxed),
            aliases_stored: self.aliases_stored.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.source_fetches.store(0, Ordering::Relaxed);
        self.bulk_fetches.store(0, Ordering::Relaxed);
        self.coalesced_waits.store(0, Ordering::Relaxed);
        self.records_stored.store(0, Ordering::Relaxed);
        self.aliases_stored.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of metrics (for reporting).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetricsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub source_fetches: u64,
    pub bulk_fetches: u64,
    pub coalesced_waits: u64,
    pub records_stored: u64,
    pub aliases_stored: u64,
}

impl PipelineMetricsSnapshot {
    /// Total lookups that went through the pipeline.
    pub fn total_lookups(&self) -> u64 {
        self.cache_hits + self.cache_misses
    }

    /// Fraction of lookups answered without consulting the source.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_lookups();
        if total == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / total as f64
    }

    /// Average alias entries written per stored record.
    pub fn aliases_per_record(&self) -> f64 {
        if self.records_stored == 0 {
            return 0.0;
        }
        self.aliases_stored as f64 / self.records_stored as f64
    }

    /// Format a human-readable report.
    pub fn format_report(&self) -> String {
        let mut lines = Vec::new();
        lines.push("Pipeline Metrics Report".to_string());
        lines.push("=".repeat(50));
        lines.push(format!("  Cache Hits:      {}", self.cache_hits));
        lines.push(format!("  Cache Misses:    {}", self.cache_misses));
        lines.push(format!("  Hit Rate:        {:.1}%", self.hit_rate() * 100.0));
        lines.push(format!("  Scalar Fetches:  {}", self.source_fetches));
        lines.push(format!("  Bulk Fetches:    {}", self.bulk_fetches));
        lines.push(format!("  Coalesced Waits: {}", self.coalesced_waits));
        lines.push(format!("  Records Stored:  {}", self.records_stored));
        lines.push(format!(
            "  Aliases/Record:  {:.2}",
            self.aliases_per_record()
        ));
        lines.join("\n")
    }
}
