//! Projection cache shared by every request.
//!
//! Entries are immutable once inserted; readers get a clone of a fully built
//! projection. Capacity is enforced on insert; expired entries are dropped
//! on read and by [`AnalysisCache::sweep`], driven from a [`Sweeper`] thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, tick, Sender};
use dashmap::DashMap;

use crate::error::RealtimeError;
use crate::projection::Projection;

struct CacheEntry {
    projection: Projection,
    created_at: Instant,
}

pub struct AnalysisCache {
    entries: DashMap<String, Arc<CacheEntry>>,
    ttl: Duration,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AnalysisCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A live entry, or `None` if absent or older than the TTL.
    pub fn get(&self, key: &str) -> Option<Projection> {
        // Clone the Arc so no shard lock is held while cloning the projection
        let entry = self.entries.get(key).map(|r| Arc::clone(r.value()));
        match entry {
            Some(entry) if entry.created_at.elapsed() < self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.projection.clone())
            }
            Some(_) => {
                self.remove_if_expired(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: String, projection: Projection) {
        let entry = CacheEntry {
            projection,
            created_at: Instant::now(),
        };
        self.entries.insert(key, Arc::new(entry));
        while self.entries.len() > self.capacity {
            if !self.evict_oldest() {
                break;
            }
        }
    }

    /// A fresh insert may have replaced the stale entry since it was read.
    fn remove_if_expired(&self, key: &str) {
        self.entries
            .remove_if(key, |_, entry| entry.created_at.elapsed() >= self.ttl);
    }

    fn evict_oldest(&self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|r| r.value().created_at)
            .map(|r| r.key().clone());
        match oldest {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Drop expired entries, then the oldest ones until within capacity.
    /// Returns the number removed.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.created_at) < self.ttl);

        if self.entries.len() > self.capacity {
            let mut by_age: Vec<(String, Instant)> = self
                .entries
                .iter()
                .map(|r| (r.key().clone(), r.value().created_at))
                .collect();
            by_age.sort_by_key(|(_, created_at)| *created_at);

            let excess = by_age.len().saturating_sub(self.capacity);
            for (key, _) in by_age.into_iter().take(excess) {
                self.entries.remove(&key);
            }
        }

        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

/// Background thread sweeping a cache on a fixed interval.
/// Stops and joins when dropped.
pub struct Sweeper {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    pub fn spawn(cache: Arc<AnalysisCache>, interval: Duration) -> Result<Self, RealtimeError> {
        let (shutdown, stop) = crossbeam_channel::bounded::<()>(1);
        let ticker = tick(interval);

        let handle = thread::Builder::new()
            .name("pastense-cache-sweeper".into())
            .spawn(move || loop {
                select! {
                    recv(ticker) -> _ => {
                        let removed = cache.sweep();
                        if removed > 0 {
                            tracing::debug!(removed, remaining = cache.len(), "cache swept");
                        }
                    }
                    recv(stop) -> _ => break,
                }
            })
            .map_err(RealtimeError::Sweeper)?;
        tracing::info!(interval_ms = interval.as_millis() as u64, "cache sweeper started");

        Ok(Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        })
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        // Disconnecting the channel wakes the thread
        self.shutdown.take();
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => tracing::info!("cache sweeper stopped"),
                Err(_) => tracing::warn!("cache sweeper panicked"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(words: usize) -> Projection {
        Projection {
            word_count: words,
            ..Projection::empty()
        }
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = AnalysisCache::new(Duration::from_secs(60), 10);
        cache.insert("a".into(), projection(1));

        assert_eq!(cache.get("a"), Some(projection(1)));
        assert_eq!(cache.get("b"), None);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_expired_entries_are_not_served() {
        let cache = AnalysisCache::new(Duration::ZERO, 10);
        cache.insert("a".into(), projection(1));
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_evicts_oldest_over_capacity() {
        let cache = AnalysisCache::new(Duration::from_secs(60), 2);
        for (i, key) in ["a", "b", "c"].iter().enumerate() {
            cache.insert(key.to_string(), projection(i));
            thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_sweep_removes_expired() {
        let cache = AnalysisCache::new(Duration::from_secs(60), 10);
        cache.insert("a".into(), projection(1));
        cache.insert("b".into(), projection(2));

        assert_eq!(cache.sweep(), 0);
        // Far in the future everything has expired
        let later = Instant::now() + Duration::from_secs(120);
        assert_eq!(cache.sweep_at(later), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expiry_spares_a_fresh_replacement() {
        let cache = AnalysisCache::new(Duration::from_millis(50), 10);
        cache.insert("a".into(), projection(1));
        thread::sleep(Duration::from_millis(80));

        cache.insert("a".into(), projection(2));
        cache.remove_if_expired("a");
        assert_eq!(cache.get("a"), Some(projection(2)));

        thread::sleep(Duration::from_millis(80));
        cache.remove_if_expired("a");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_sweeper_thread_runs_and_stops() {
        let cache = Arc::new(AnalysisCache::new(Duration::from_millis(5), 10));
        cache.insert("a".into(), projection(1));

        let sweeper = Sweeper::spawn(Arc::clone(&cache), Duration::from_millis(10)).unwrap();
        thread::sleep(Duration::from_millis(100));
        assert!(cache.is_empty());

        drop(sweeper);
        // Only the test holds the cache once the thread has exited
        assert_eq!(Arc::strong_count(&cache), 1);
    }
}
