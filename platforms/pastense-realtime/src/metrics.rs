use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Approximate request counters. Relaxed ordering; a lost update is acceptable.
#[derive(Debug, Default)]
pub struct Metrics {
    requests: AtomicU64,
    rejected: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    incremental: AtomicU64,
    full_runs: AtomicU64,
    degraded: AtomicU64,
    rule_failures: AtomicU64,
    over_budget: AtomicU64,
    total_micros: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub rejected: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub incremental: u64,
    pub full_runs: u64,
    pub degraded: u64,
    pub rule_failures: u64,
    pub over_budget: u64,
    /// Mean duration of full runs
    pub average_ms: f64,
    /// Cache hits over accepted requests
    pub hit_rate: f64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl Metrics {
    pub fn record_request(&self) {
        bump(&self.requests);
    }

    pub fn record_rejected(&self) {
        bump(&self.rejected);
    }

    pub fn record_cache_hit(&self) {
        bump(&self.cache_hits);
    }

    pub fn record_cache_miss(&self) {
        bump(&self.cache_misses);
    }

    pub fn record_incremental(&self) {
        bump(&self.incremental);
    }

    pub fn record_degraded(&self) {
        bump(&self.degraded);
    }

    pub fn record_rule_failures(&self, count: usize) {
        self.rule_failures.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_full_run(&self, elapsed: Duration, budget: Duration) {
        bump(&self.full_runs);
        self.total_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
        if elapsed > budget {
            bump(&self.over_budget);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        let full_runs = load(&self.full_runs);
        let average_ms = if full_runs == 0 {
            0.0
        } else {
            load(&self.total_micros) as f64 / full_runs as f64 / 1000.0
        };
        let requests = load(&self.requests);
        let rejected = load(&self.rejected);
        let cache_hits = load(&self.cache_hits);
        let accepted = requests.saturating_sub(rejected);
        let hit_rate = if accepted == 0 {
            0.0
        } else {
            cache_hits as f64 / accepted as f64
        };
        MetricsSnapshot {
            requests,
            rejected,
            cache_hits,
            cache_misses: load(&self.cache_misses),
            incremental: load(&self.incremental),
            full_runs,
            degraded: load(&self.degraded),
            rule_failures: load(&self.rule_failures),
            over_budget: load(&self.over_budget),
            average_ms,
            hit_rate,
        }
    }
}
