//! Key → node lookup.
//!
//! [`NodeIndex`] is what the builder uses to recognise a key it has already
//! materialised, and is exposed for callers that need the same lookup.
//! Inserting a second node under an existing key replaces the first.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map;
use std::hash::Hash;

use crate::gss::Gss;
use crate::node::NodeId;

#[derive(Debug, Clone)]
pub struct NodeIndex<K> {
    map: HashMap<K, NodeId>,
}

impl<K: Eq + Hash> PartialEq for NodeIndex<K> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K: Eq + Hash> Eq for NodeIndex<K> {}

impl<K> Default for NodeIndex<K> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> NodeIndex<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Index every keyed node among `ids`; later ids win on key clashes.
    pub fn from_nodes<C, I>(gss: &Gss<K, C>, ids: I) -> Self
    where
        K: Clone,
        I: IntoIterator<Item = NodeId>,
    {
        let mut index = Self::new();
        for id in ids {
            index.insert(gss, id);
        }
        index
    }

    /// Index every keyed node in the arena.
    pub fn from_gss<C>(gss: &Gss<K, C>) -> Self
    where
        K: Clone,
    {
        Self::from_nodes(gss, gss.ids())
    }

    /// Index `id` under its own key.
    ///
    /// Returns the id previously indexed under that key. Nodes without a
    /// key are not indexed.
    pub fn insert<C>(&mut self, gss: &Gss<K, C>, id: NodeId) -> Option<NodeId>
    where
        K: Clone,
    {
        let key = gss.key(id)?.clone();
        self.map.insert(key, id)
    }

    pub fn insert_key(&mut self, key: K, id: NodeId) -> Option<NodeId> {
        self.map.insert(key, id)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).copied()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, NodeId)> + '_ {
        self.map.iter().map(|(key, &id)| (key, id))
    }

    pub fn keys(&self) -> hash_map::Keys<'_, K, NodeId> {
        self.map.keys()
    }
}

impl<K: Eq + Hash> FromIterator<(K, NodeId)> for NodeIndex<K> {
    fn from_iter<I: IntoIterator<Item = (K, NodeId)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl<K: Eq + Hash> Extend<(K, NodeId)> for NodeIndex<K> {
    fn extend<I: IntoIterator<Item = (K, NodeId)>>(&mut self, iter: I) {
        self.map.extend(iter);
    }
}
