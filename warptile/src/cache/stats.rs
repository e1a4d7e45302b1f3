//! Cache statistics tracking and reporting.

use std::time::Instant;

/// Counters for one tile cache and the fetches feeding it.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub entry_count: usize,
    pub capacity: usize,

    // Network side, recorded by the fetcher
    pub downloads: u64,
    pub download_failures: u64,
    pub bytes_downloaded: u64,

    pub created_at: Instant,
}

impl CacheStats {
    /// Create a statistics tracker for a cache bounded at `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            hits: 0,
            misses: 0,
            inserts: 0,
            evictions: 0,
            entry_count: 0,
            capacity,
            downloads: 0,
            download_failures: 0,
            bytes_downloaded: 0,
            created_at: Instant::now(),
        }
    }

    /// Hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get the uptime duration since statistics started.
    pub fn uptime(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub fn record_eviction(&mut self, count: u64) {
        self.evictions += count;
    }

    /// Record a completed download of `bytes` body bytes.
    pub fn record_download(&mut self, bytes: u64) {
        self.downloads += 1;
        self.bytes_downloaded += bytes;
    }

    pub fn record_download_failure(&mut self) {
        self.download_failures += 1;
    }

    pub fn update_entry_count(&mut self, entry_count: usize) {
        self.entry_count = entry_count;
    }

    /// Format statistics as a human-readable report.
    pub fn format(&self) -> String {
        format!(
            r#"Tile Cache Statistics

CACHE
  Entries:     {} / {}
  Hits:        {}
  Misses:      {}
  Hit Rate:    {:.1}%
  Inserts:     {}
  Evictions:   {}

DOWNLOADS
  Total:       {}
  Failures:    {}
  Bytes:       {:.2} MB

Uptime:        {}s
"#,
            self.entry_count,
            self.capacity,
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.inserts,
            self.evictions,
            self.downloads,
            self.download_failures,
            self.bytes_downloaded as f64 / (1024.0 * 1024.0),
            self.uptime().as_secs(),
        )
    }
}
