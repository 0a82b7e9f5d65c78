use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashSet;

/// Set of node keys whose children are shown.
///
/// Values are immutable from the outside: `with`/`without`/`extend` return a
/// new set and leave the original untouched. Clones share storage until one
/// side changes (copy-on-write), so emitting the set with every change is
/// cheap.
pub struct ExpandedSet<K> {
    keys: Arc<FxHashSet<K>>,
}

impl<K> Clone for ExpandedSet<K> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
        }
    }
}

impl<K> Default for ExpandedSet<K> {
    fn default() -> Self {
        Self {
            keys: Arc::new(FxHashSet::default()),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for ExpandedSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys.iter()).finish()
    }
}

impl<K: Eq + Hash> PartialEq for ExpandedSet<K> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.keys, &other.keys) || self.keys == other.keys
    }
}

impl<K: Eq + Hash> Eq for ExpandedSet<K> {}

impl<K: Clone + Eq + Hash> ExpandedSet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the key is expanded.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Number of expanded keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates over the expanded keys in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    /// Returns a set that also contains `key`.
    #[must_use]
    pub fn with(mut self, key: K) -> Self {
        if !self.keys.contains(&key) {
            Arc::make_mut(&mut self.keys).insert(key);
        }
        self
    }

    /// Returns a set without `key`.
    #[must_use]
    pub fn without(mut self, key: &K) -> Self {
        if self.keys.contains(key) {
            Arc::make_mut(&mut self.keys).remove(key);
        }
        self
    }

    /// Returns a set that also contains every key from `keys`.
    #[must_use]
    pub fn extend<I: IntoIterator<Item = K>>(mut self, keys: I) -> Self {
        let mut keys = keys.into_iter().peekable();
        if keys.peek().is_some() {
            Arc::make_mut(&mut self.keys).extend(keys);
        }
        self
    }

    /// Returns a set keeping only the keys for which `keep` returns `true`.
    #[must_use]
    pub fn retain<F: FnMut(&K) -> bool>(mut self, mut keep: F) -> Self {
        if self.keys.iter().any(|key| !keep(key)) {
            // `keep` is re-evaluated here; callers pass pure predicates.
            Arc::make_mut(&mut self.keys).retain(|key| keep(key));
        }
        self
    }
}

impl<K: Clone + Eq + Hash> FromIterator<K> for ExpandedSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            keys: Arc::new(iter.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_and_without_leave_original_untouched() {
        let base: ExpandedSet<&str> = ["src"].into_iter().collect();

        let grown = base.clone().with("src/ui");
        let shrunk = base.clone().without(&"src");

        assert!(base.contains(&"src"));
        assert!(!base.contains(&"src/ui"));
        assert!(grown.contains(&"src/ui"));
        assert!(grown.contains(&"src"));
        assert!(shrunk.is_empty());
    }

    #[test]
    fn unchanged_sets_share_storage() {
        let base: ExpandedSet<u32> = [1, 2].into_iter().collect();
        let same = base.clone().with(1).without(&3).extend(Vec::new());

        assert!(Arc::ptr_eq(&base.keys, &same.keys));
        assert_eq!(base, same);
    }

    #[test]
    fn retain_drops_rejected_keys() {
        let set: ExpandedSet<u32> = (0..6).collect();
        let even = set.retain(|key| key % 2 == 0);

        let mut keys: Vec<_> = even.iter().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![0, 2, 4]);
    }
}
