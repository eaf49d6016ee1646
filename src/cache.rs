//! # Binding Cache
//!
//! Memoizes resolved field indices per record type so repeated scans of the
//! same type skip resolution entirely.
//!
//! ## Concurrency
//!
//! The cache is the only state shared across concurrently executing scans.
//! It is optimized for many concurrent readers and rare writers (a never-
//! seen type): the read path takes a shared `RwLock` guard and clones an
//! `Arc`. On a miss the writer re-checks under the exclusive lock (another
//! caller may have resolved the same type meanwhile), resolves, and inserts
//! a fully built `Arc` entry, so readers can never observe a partially built
//! index. No lock is held across cursor I/O or channel sends; lock scope is
//! confined to lookup and insert.
//!
//! `purge` clears all entries. Scans that already captured their index keep
//! using it; the next resolution of each type rebuilds it.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::describe::Bindable;
use crate::index::FieldIndex;

/// Concurrent memoization of [`FieldIndex`] values, keyed by record type.
#[derive(Default)]
pub struct BindingCache {
    types: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl BindingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized field index for `T`, resolving it on first use.
    ///
    /// # Panics
    ///
    /// Propagates the resolver's panic if `T` declares an embedded pointer
    /// field (a configuration error, see [`FieldIndex::resolve`]).
    pub fn resolve<T: Bindable>(&self) -> Arc<FieldIndex<T>> {
        let key = TypeId::of::<T>();
        {
            let types = self.types.read();
            if let Some(entry) = types.get(&key) {
                return downcast(entry);
            }
        }
        let mut types = self.types.write();
        if let Some(entry) = types.get(&key) {
            return downcast(entry);
        }
        let index = Arc::new(FieldIndex::<T>::resolve());
        types.insert(key, index.clone());
        index
    }

    /// Clears all memoized field indices. Safe to call concurrently with
    /// ongoing resolutions; in-flight scans keep the index they captured.
    pub fn purge(&self) {
        self.types.write().clear();
    }

    /// Number of record types currently memoized.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

fn downcast<T: Bindable>(entry: &Arc<dyn Any + Send + Sync>) -> Arc<FieldIndex<T>> {
    entry
        .clone()
        .downcast::<FieldIndex<T>>()
        .expect("cache entry keyed under a different type")
}

impl fmt::Debug for BindingCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingCache")
            .field("types", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    bindable! {
        struct Cached {
            id: i64,
            name: String,
        }
    }

    #[test]
    fn test_resolve_memoizes() {
        let cache = BindingCache::new();
        let a = cache.resolve::<Cached>();
        let b = cache.resolve::<Cached>();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_purge_then_resolve_reproduces_contents() {
        let cache = BindingCache::new();
        let before = cache.resolve::<Cached>();
        cache.purge();
        assert!(cache.is_empty());
        let after = cache.resolve::<Cached>();
        assert!(!Arc::ptr_eq(&before, &after));
        let collect = |index: &FieldIndex<Cached>| {
            let mut cols: Vec<_> = index
                .columns()
                .map(|c| (c.to_string(), index.path(c).unwrap().as_slice().to_vec()))
                .collect();
            cols.sort();
            cols
        };
        assert_eq!(collect(&before), collect(&after));
    }

    #[test]
    fn test_concurrent_resolution_yields_one_entry() {
        use std::sync::Barrier;
        use std::thread;

        let cache = Arc::new(BindingCache::new());
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let index = cache.resolve::<Cached>();
                    index.len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
        assert_eq!(cache.len(), 1);
    }
}
