//! Lazy, thread-safe memoization primitives.
//!
//! Element nodes derive nearly everything from their backing stub on first use. [`Memo`] holds
//! such per-node values (computed at most once, read lock-free afterwards), [`Deferred`] holds a
//! value that starts as a placeholder and is swapped exactly once (used to publish a node before
//! its self-referential parts are resolved), and [`KeyedMemo`] is the concurrent cache behind
//! name resolution.

use std::fmt;
use std::hash::Hash;
use std::sync::OnceLock;

use dashmap::DashMap;
use parking_lot::Mutex;

/// A value computed at most once, under a lock, and immutable afterwards.
pub struct Memo<T> {
    cell: OnceLock<T>,
    init: Mutex<()>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Double-checked initialization.
    ///
    /// `f` must not force this same memo; doing so deadlocks.
    pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        if let Some(value) = self.cell.get() {
            return value;
        }
        let _guard = self.init.lock();
        if let Some(value) = self.cell.get() {
            return value;
        }
        let value = f();
        self.cell.get_or_init(move || value)
    }
}

impl<T, E: Clone> Memo<Result<T, E>> {
    /// Like [`Memo::get_or_init`], but failures are memoized too and handed back as clones.
    pub fn get_or_try_init(&self, f: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        self.get_or_init(f).as_ref().map_err(E::clone)
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Memo").field(value).finish(),
            None => f.write_str("Memo(<pending>)"),
        }
    }
}

/// A cell that reads as `placeholder` until it is swapped, once, to its real value.
///
/// Lets a node be allocated and published into the graph before the parts that refer back to
/// it (an F-bounded type parameter's bounds, a capture variable's bounds) are computed.
pub struct Deferred<T> {
    placeholder: T,
    value: OnceLock<T>,
    init: Mutex<()>,
}

impl<T> Deferred<T> {
    pub fn new(placeholder: T) -> Self {
        Self {
            placeholder,
            value: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// The swapped value, or the placeholder.
    pub fn get(&self) -> &T {
        self.value.get().unwrap_or(&self.placeholder)
    }

    pub fn is_swapped(&self) -> bool {
        self.value.get().is_some()
    }

    /// Install the real value. Returns the rejected value if the cell was already swapped.
    pub fn swap(&self, value: T) -> Result<(), T> {
        let _guard = self.init.lock();
        self.value.set(value)
    }

    /// Swap in the value produced by `f` unless that already happened, then read it.
    pub fn get_or_swap(&self, f: impl FnOnce() -> T) -> &T {
        if let Some(value) = self.value.get() {
            return value;
        }
        let _guard = self.init.lock();
        if let Some(value) = self.value.get() {
            return value;
        }
        let value = f();
        self.value.get_or_init(move || value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("value", self.get())
            .field("swapped", &self.is_swapped())
            .finish()
    }
}

/// Concurrent keyed cache.
///
/// Values are computed outside of any map lock, so racing threads may compute the same entry;
/// the first insert wins and every caller observes that value.
pub struct KeyedMemo<K, V> {
    map: DashMap<K, V>,
}

/// Two-key variant, e.g. `(internal name, module)`.
pub type KeyedMemo2<A, B, V> = KeyedMemo<(A, B), V>;

impl<K: Eq + Hash, V: Clone> KeyedMemo<K, V> {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    pub fn get_or_insert_with(&self, key: K, f: impl FnOnce() -> V) -> V {
        if let Some(existing) = self.map.get(&key) {
            return existing.value().clone();
        }
        let value = f();
        self.map.entry(key).or_insert(value).value().clone()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Eq + Hash, V: Clone> Default for KeyedMemo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for KeyedMemo<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedMemo")
            .field("len", &self.map.len())
            .finish()
    }
}
