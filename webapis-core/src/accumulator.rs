//! Staging keyed by domain identity.

use std::collections::HashMap;
use std::hash::Hash;

/// `https://www.example.com/fr/` → `example.com`
///
/// Strips the scheme, any leading `www.` and everything from the first `/`,
/// `?` or `#`. Applying it twice gives the same key.
pub fn derive_identity_key(url: &str) -> String {
    let mut host = strip_scheme(url.trim());
    loop {
        host = host.trim_start();
        match host.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("www.") => host = &host[4..],
            _ => break,
        }
    }
    let end = host.find(['/', '?', '#']).unwrap_or(host.len());
    host[..end].trim_end().to_string()
}

/// Drop a leading `http://` or `https://`, ignoring case.
pub fn strip_scheme(url: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if let Some(prefix) = url.get(..scheme.len())
            && prefix.eq_ignore_ascii_case(scheme)
        {
            return &url[scheme.len()..];
        }
    }
    url
}

/// Last-write-wins map that remembers the order keys were first seen.
#[derive(Debug, Clone)]
pub struct DedupAccumulator<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
    replaced: usize,
}

impl<K, V> Default for DedupAccumulator<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            replaced: 0,
        }
    }
}

impl<K: Eq + Hash + Clone, V> DedupAccumulator<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&i) = self.index.get(&key) {
            self.replaced += 1;
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// The value under `key`, inserting `f()` first if there is none.
    pub fn entry_or_insert_with(&mut self, key: K, f: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, f()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    /// The final mapping, in first-seen key order.
    pub fn get_all(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many `put`s overwrote an earlier value.
    pub fn replaced(&self) -> usize {
        self.replaced
    }
}
