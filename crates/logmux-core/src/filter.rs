//! Severity filtering
//!
//! A [`LevelFilter`] holds the process-wide mask table of one logger: a
//! default mask plus one mask per configured domain. Threads may layer
//! their own overrides on top, and each thread keeps a small cache of
//! resolved masks that is invalidated through a generation counter.
//!
//! Resolution order for a `(domain, level)` query on the calling thread:
//!
//! 1. the thread's override for that domain
//! 2. the thread's wildcard override
//! 3. the global mask for that domain
//! 4. the global default mask
//!
//! Per-thread state of a dropped filter is removed on the dropping thread
//! right away and swept from other threads the next time they meet a new
//! filter.

use logmux_core_types::{LevelMask, LogLevel};
use parking_lot::RwLock;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_FILTER_ID: AtomicU64 = AtomicU64::new(1);

/// Mask applied when neither the configuration nor a caller set one
pub const DEFAULT_MASK: LevelMask = LevelMask::floor(LogLevel::Warning);

#[derive(Debug)]
struct MaskTable {
    default: LevelMask,
    domains: HashMap<String, LevelMask>,
}

impl MaskTable {
    fn lookup(&self, domain: &str) -> LevelMask {
        self.domains.get(domain).copied().unwrap_or(self.default)
    }
}

#[derive(Debug)]
struct ThreadLevels {
    // Shared with the owning filter; cleared when it is dropped.
    alive: Arc<AtomicBool>,
    overrides: HashMap<String, LevelMask>,
    wildcard: Option<LevelMask>,
    generation: u64,
    cache: HashMap<String, LevelMask>,
}

impl ThreadLevels {
    fn new(alive: Arc<AtomicBool>) -> Self {
        Self {
            alive,
            overrides: HashMap::new(),
            wildcard: None,
            generation: 0,
            cache: HashMap::new(),
        }
    }

    fn is_live(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    fn override_for(&self, domain: &str) -> Option<LevelMask> {
        self.overrides.get(domain).copied().or(self.wildcard)
    }
}

thread_local! {
    // Keyed by filter id so several loggers can coexist in one process.
    static THREAD_LEVELS: RefCell<HashMap<u64, ThreadLevels>> = RefCell::new(HashMap::new());
}

/// Global and per-thread severity masks for one logger
#[derive(Debug)]
pub struct LevelFilter {
    id: u64,
    alive: Arc<AtomicBool>,
    table: RwLock<MaskTable>,
    // Starts at 1 so a fresh thread cache (generation 0) always refreshes.
    generation: AtomicU64,
}

impl LevelFilter {
    pub fn new(default: LevelMask) -> Self {
        Self {
            id: NEXT_FILTER_ID.fetch_add(1, Ordering::Relaxed),
            alive: Arc::new(AtomicBool::new(true)),
            table: RwLock::new(MaskTable {
                default,
                domains: HashMap::new(),
            }),
            generation: AtomicU64::new(1),
        }
    }

    /// Whether `level` passes for `domain` on the calling thread
    pub fn level_enabled(&self, domain: &str, level: LogLevel) -> bool {
        self.resolved_mask(domain).contains(level)
    }

    /// The effective mask for `domain` on the calling thread
    pub fn resolved_mask(&self, domain: &str) -> LevelMask {
        let resolved = THREAD_LEVELS.try_with(|cell| {
            let Ok(mut threads) = cell.try_borrow_mut() else {
                return None;
            };
            let levels = self.thread_entry(&mut threads);
            if let Some(mask) = levels.override_for(domain) {
                return Some(mask);
            }

            let current = self.generation.load(Ordering::Acquire);
            if levels.generation != current {
                levels.cache.clear();
                levels.generation = current;
            }
            if let Some(mask) = levels.cache.get(domain) {
                return Some(*mask);
            }

            let mask = self.table.read().lookup(domain);
            levels.cache.insert(domain.to_string(), mask);
            Some(mask)
        });

        match resolved {
            Ok(Some(mask)) => mask,
            // Thread is tearing down or the cell is already borrowed
            _ => self.table.read().lookup(domain),
        }
    }

    /// Global mask for `domain`, or the default mask for `None`
    ///
    /// Thread overrides are not consulted.
    pub fn mask(&self, domain: Option<&str>) -> LevelMask {
        let table = self.table.read();
        match domain {
            Some(domain) => table.lookup(domain),
            None => table.default,
        }
    }

    /// Enable `level` and every more severe level
    pub fn set_level(&self, domain: Option<&str>, level: LogLevel) {
        self.set_mask(domain, LevelMask::floor(level));
    }

    /// Replace the global mask for `domain`
    ///
    /// With `None` the default mask and every configured domain are
    /// overwritten.
    pub fn set_mask(&self, domain: Option<&str>, mask: LevelMask) {
        let mut table = self.table.write();
        match domain {
            Some(domain) => {
                table.domains.insert(domain.to_string(), mask);
            }
            None => {
                table.default = mask;
                for value in table.domains.values_mut() {
                    *value = mask;
                }
            }
        }
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Domains that have an explicit global mask, sorted by name
    pub fn domains(&self) -> Vec<(String, LevelMask)> {
        let table = self.table.read();
        let mut domains: Vec<_> = table
            .domains
            .iter()
            .map(|(name, mask)| (name.clone(), *mask))
            .collect();
        domains.sort_by(|a, b| a.0.cmp(&b.0));
        domains
    }

    /// Override the mask for `domain` on the calling thread only
    ///
    /// `None` sets the thread's wildcard, which applies to every domain
    /// without a more specific thread override.
    pub fn set_thread_level(&self, domain: Option<&str>, level: LogLevel) {
        self.with_thread_levels(|levels| {
            let mask = LevelMask::floor(level);
            match domain {
                Some(domain) => {
                    levels.overrides.insert(domain.to_string(), mask);
                }
                None => levels.wildcard = Some(mask),
            }
        });
    }

    /// Drop a thread override set by [`set_thread_level`](Self::set_thread_level)
    pub fn clear_thread_level(&self, domain: Option<&str>) {
        self.with_thread_levels(|levels| match domain {
            Some(domain) => {
                levels.overrides.remove(domain);
            }
            None => levels.wildcard = None,
        });
    }

    fn with_thread_levels(&self, f: impl FnOnce(&mut ThreadLevels)) {
        let _ = THREAD_LEVELS.try_with(|cell| {
            if let Ok(mut threads) = cell.try_borrow_mut() {
                f(self.thread_entry(&mut threads));
            }
        });
    }

    fn thread_entry<'m>(&self, threads: &'m mut HashMap<u64, ThreadLevels>) -> &'m mut ThreadLevels {
        if !threads.contains_key(&self.id) {
            threads.retain(|_, levels| levels.is_live());
        }
        threads
            .entry(self.id)
            .or_insert_with(|| ThreadLevels::new(Arc::clone(&self.alive)))
    }
}

impl Drop for LevelFilter {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
        let _ = THREAD_LEVELS.try_with(|cell| {
            if let Ok(mut threads) = cell.try_borrow_mut() {
                threads.remove(&self.id);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mask_is_warning_and_above() {
        let filter = LevelFilter::new(DEFAULT_MASK);

        assert!(filter.level_enabled("any", LogLevel::Warning));
        assert!(filter.level_enabled("any", LogLevel::Fatal));
        assert!(!filter.level_enabled("any", LogLevel::Message));
        assert!(!filter.level_enabled("any", LogLevel::Debug));
    }

    #[test]
    fn test_domain_mask_overrides_default() {
        let filter = LevelFilter::new(DEFAULT_MASK);
        filter.set_level(Some("media"), LogLevel::Debug);

        assert!(filter.level_enabled("media", LogLevel::Debug));
        assert!(!filter.level_enabled("net", LogLevel::Debug));
    }

    #[test]
    fn test_cache_invalidated_by_later_change() {
        let filter = LevelFilter::new(DEFAULT_MASK);
        assert!(!filter.level_enabled("media", LogLevel::Message));

        filter.set_level(Some("media"), LogLevel::Message);
        assert!(filter.level_enabled("media", LogLevel::Message));

        filter.set_mask(Some("media"), LevelMask::NONE);
        assert!(!filter.level_enabled("media", LogLevel::Fatal));
    }

    #[test]
    fn test_set_all_overwrites_configured_domains() {
        let filter = LevelFilter::new(DEFAULT_MASK);
        filter.set_level(Some("media"), LogLevel::Debug);
        filter.set_level(None, LogLevel::Error);

        assert_eq!(filter.mask(Some("media")), LevelMask::floor(LogLevel::Error));
        assert_eq!(filter.mask(None), LevelMask::floor(LogLevel::Error));
    }

    #[test]
    fn test_thread_wildcard_loses_to_specific_override() {
        let filter = LevelFilter::new(DEFAULT_MASK);
        filter.set_thread_level(None, LogLevel::Fatal);
        filter.set_thread_level(Some("media"), LogLevel::Debug);

        assert!(filter.level_enabled("media", LogLevel::Debug));
        assert!(!filter.level_enabled("net", LogLevel::Error));

        filter.clear_thread_level(None);
        assert!(filter.level_enabled("net", LogLevel::Error));
    }

    #[test]
    fn test_filters_do_not_share_thread_state() {
        let a = LevelFilter::new(DEFAULT_MASK);
        let b = LevelFilter::new(DEFAULT_MASK);
        a.set_thread_level(None, LogLevel::Debug);

        assert!(a.level_enabled("x", LogLevel::Debug));
        assert!(!b.level_enabled("x", LogLevel::Debug));
    }

    fn thread_entries() -> usize {
        THREAD_LEVELS.with(|cell| cell.borrow().len())
    }

    #[test]
    fn test_filters_dropped_elsewhere_are_swept() {
        // Each filter is used here and dropped on another thread.
        for _ in 0..1000 {
            let filter = LevelFilter::new(DEFAULT_MASK);
            assert!(filter.level_enabled("pool", LogLevel::Error));
            std::thread::spawn(move || drop(filter)).join().unwrap();
        }
        assert!(thread_entries() <= 1);

        let live = LevelFilter::new(DEFAULT_MASK);
        live.set_thread_level(Some("pool"), LogLevel::Debug);
        assert_eq!(thread_entries(), 1);
        assert!(live.level_enabled("pool", LogLevel::Debug));
    }

    #[test]
    fn test_drop_on_own_thread_removes_entry() {
        let filter = LevelFilter::new(DEFAULT_MASK);
        filter.level_enabled("d", LogLevel::Error);
        assert_eq!(thread_entries(), 1);

        drop(filter);
        assert_eq!(thread_entries(), 0);
    }
}
