//! Graph assembly from a flat edge list.
//!
//! Each [`GraphEntry`] names a node by key, optionally carries contents, and
//! optionally names its parent by key. Entries may arrive in any order and a
//! key may appear many times: once per parent, for example.
//!
//! # Phases
//!
//! 1. **Materialise**: every distinct key gets exactly one node, created by
//!    the caller's [`NodeFactory`]. The first entry that carries contents
//!    for a key sets them; later contents for the same key are ignored.
//! 2. **Wire**: every entry with a resolvable parent key adds a
//!    parent→child edge via [`Gss::add_parent`]. Entries with no parent key,
//!    or with a parent key that no entry defines, contribute their node to
//!    the returned roots.
//!
//! The root list is not deduplicated unless
//! [`BuilderConfig::dedup_roots`] is set: a key listed twice without a
//! parent yields its node twice.

use std::hash::Hash;

use tracing::debug;

use crate::config::BuilderConfig;
use crate::gss::Gss;
use crate::index::NodeIndex;
use crate::node::NodeId;

/// One `(key, contents, parent_key)` row of builder input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEntry<K, C> {
    pub key: K,
    pub contents: Option<C>,
    pub parent_key: Option<K>,
}

impl<K, C> GraphEntry<K, C> {
    #[must_use]
    pub const fn new(key: K, contents: Option<C>, parent_key: Option<K>) -> Self {
        Self {
            key,
            contents,
            parent_key,
        }
    }

    /// An entry without a parent key.
    #[must_use]
    pub const fn root(key: K, contents: Option<C>) -> Self {
        Self::new(key, contents, None)
    }

    #[must_use]
    pub const fn child(key: K, contents: Option<C>, parent_key: K) -> Self {
        Self::new(key, contents, Some(parent_key))
    }
}

/// Produces a blank node in the arena on demand.
///
/// The returned id must belong to `gss`. Any
/// `FnMut(&mut Gss<K, C>) -> NodeId` closure is a factory, as is
/// [`blank_node`].
pub trait NodeFactory<K, C> {
    fn create_node(&mut self, gss: &mut Gss<K, C>) -> NodeId;
}

impl<K, C, F> NodeFactory<K, C> for F
where
    F: FnMut(&mut Gss<K, C>) -> NodeId,
{
    fn create_node(&mut self, gss: &mut Gss<K, C>) -> NodeId {
        self(gss)
    }
}

/// The default factory: a blank arena node.
pub fn blank_node<K, C>(gss: &mut Gss<K, C>) -> NodeId {
    gss.create_node()
}

/// Build a graph from `entries` with default options.
///
/// Returns the root list; see the module docs for its exact contents.
pub fn create_graph<K, C, F>(
    gss: &mut Gss<K, C>,
    entries: &[GraphEntry<K, C>],
    factory: F,
) -> Vec<NodeId>
where
    K: Eq + Hash + Clone,
    C: Clone,
    F: NodeFactory<K, C>,
{
    create_graph_with(gss, entries, factory, &BuilderConfig::default())
}

/// Build a graph from `entries`.
pub fn create_graph_with<K, C, F>(
    gss: &mut Gss<K, C>,
    entries: &[GraphEntry<K, C>],
    mut factory: F,
    config: &BuilderConfig,
) -> Vec<NodeId>
where
    K: Eq + Hash + Clone,
    C: Clone,
    F: NodeFactory<K, C>,
{
    let index = materialize(gss, entries, &mut factory);

    let mut roots = Vec::new();
    let mut dangling = 0_usize;
    for (position, entry) in entries.iter().enumerate() {
        let Some(id) = index.get(&entry.key) else {
            continue;
        };

        match entry.parent_key.as_ref() {
            None => push_root(&mut roots, id, config),
            Some(parent_key) => {
                if let Some(parent) = index.get(parent_key) {
                    gss.add_parent(id, parent);
                } else {
                    dangling += 1;
                    debug!(
                        entry = position,
                        node = %id,
                        "parent key not found, treating node as root"
                    );
                    push_root(&mut roots, id, config);
                }
            }
        }
    }

    debug!(
        entries = entries.len(),
        nodes = index.len(),
        roots = roots.len(),
        dangling,
        "built graph from edge list"
    );
    roots
}

fn materialize<K, C, F>(
    gss: &mut Gss<K, C>,
    entries: &[GraphEntry<K, C>],
    factory: &mut F,
) -> NodeIndex<K>
where
    K: Eq + Hash + Clone,
    C: Clone,
    F: NodeFactory<K, C>,
{
    let mut index = NodeIndex::with_capacity(entries.len());

    for entry in entries {
        let id = if let Some(id) = index.get(&entry.key) {
            id
        } else {
            let id = factory.create_node(gss);
            gss.set_key(id, entry.key.clone());
            index.insert(gss, id);
            id
        };

        if let Some(contents) = &entry.contents {
            if gss.contents(id).is_none() {
                gss.set_contents(id, contents.clone());
            }
        }
    }

    index
}

fn push_root(roots: &mut Vec<NodeId>, id: NodeId, config: &BuilderConfig) {
    if config.dedup_roots && roots.contains(&id) {
        return;
    }
    roots.push(id);
}
