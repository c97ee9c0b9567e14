//! Arena-backed graph-structured stack.
//!
//! [`Gss`] owns every node; nodes refer to each other through [`NodeId`]
//! handles. Child lists are the owning direction of the graph, parent lists
//! are back-references used for upward navigation only.
//!
//! # Link maintenance
//!
//! Every mutator goes through one of two primitives:
//!
//! - [`Gss::hook`] adds a parent→child edge. If the parent already has a
//!   child with the same key, no sibling is added: the existing child takes
//!   over the new node's contents and children instead.
//! - [`Gss::unhook_at`] removes a parent→child edge from both sides.
//!
//! Every child lists each of its parents once. A merged-away node also keeps
//! the parent it was hooked under, so the reverse direction holds by key:
//! for each `P ∈ C.parents`, `P.children` holds `C` or a node keyed like
//! `C`. Such registrations are dropped when the same-key child is unhooked.
//! See [`crate::invariants`] for the audit.
//!
//! # Acyclicity
//!
//! The graph is assumed to be acyclic. Nothing checks it on the mutation
//! path, and the recursive queries ([`Gss::descendants_count`],
//! [`Gss::find_descendant`], equality, rendering, sorting) do not terminate
//! on a cyclic graph. Use [`Gss::find_cycle`] or
//! [`Gss::checked_descendants_count`] when the input is untrusted.

use std::borrow::Borrow;
use std::collections::{HashSet, VecDeque};

use tracing::trace;

use crate::config::PathConfig;
use crate::node::{GssNode, NodeId};
use crate::view::NodeRef;

/// An arena of keyed, multi-parent nodes.
#[derive(Debug, Clone)]
pub struct Gss<K, C> {
    nodes: Vec<GssNode<K, C>>,
    /// `(parent, node)` registrations left by merges: `node` lists `parent`
    /// but `parent` holds a same-key sibling instead.
    merged_links: Vec<(NodeId, NodeId)>,
}

impl<K, C> Default for Gss<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Arena access
// ---------------------------------------------------------------------------

impl<K, C> Gss<K, C> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            merged_links: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            merged_links: Vec::new(),
        }
    }

    /// Number of nodes ever created in this arena, reachable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Create a blank node: no key, no contents, no links.
    pub fn create_node(&mut self) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(GssNode::default());
        id
    }

    /// Create a node with a key and optional contents.
    pub fn insert(&mut self, key: K, contents: Option<C>) -> NodeId {
        let id = self.create_node();
        self.set_key(id, key);
        if let Some(contents) = contents {
            self.set_contents(id, contents);
        }
        id
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&GssNode<K, C>> {
        self.nodes.get(id.index())
    }

    /// A borrowed view of `id` for equality, hashing and rendering.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, K, C>> {
        self.contains(id).then(|| NodeRef::new(self, id))
    }

    /// Every id in the arena, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::from_index)
    }

    #[must_use]
    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.node(id).and_then(GssNode::key)
    }

    #[must_use]
    pub fn contents(&self, id: NodeId) -> Option<&C> {
        self.node(id).and_then(GssNode::contents)
    }

    /// Set the key of `id`.
    ///
    /// Keys should be set before the node is linked: re-keying a linked
    /// node can make it collide with a sibling.
    pub fn set_key(&mut self, id: NodeId, key: K) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.value.set_key(key);
        }
    }

    pub fn set_contents(&mut self, id: NodeId, contents: C) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.value.set_contents(contents);
        }
    }

    pub fn take_contents(&mut self, id: NodeId) -> Option<C> {
        self.nodes
            .get_mut(id.index())
            .and_then(|node| node.value.take_contents())
    }

    /// Children of `id`; empty for an unknown id.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(GssNode::children).unwrap_or_default()
    }

    /// Parents of `id`; empty for an unknown id.
    #[must_use]
    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(GssNode::parents).unwrap_or_default()
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut GssNode<K, C>> {
        self.nodes.get_mut(id.index())
    }
}

// ---------------------------------------------------------------------------
// Structural queries
// ---------------------------------------------------------------------------

impl<K, C> Gss<K, C> {
    #[must_use]
    pub fn has_parents(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(GssNode::has_parents)
    }

    /// Whether `parent` is registered as a parent of `id`.
    #[must_use]
    pub fn has_parent(&self, id: NodeId, parent: NodeId) -> bool {
        self.parents(id).contains(&parent)
    }

    #[must_use]
    pub fn parent_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.parents(id).get(index).copied()
    }

    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Number of child edges below `id`, counted along every path.
    ///
    /// A subtree shared by two parents is counted once per parent. The
    /// graph must be acyclic; see [`Gss::checked_descendants_count`].
    #[must_use]
    pub fn descendants_count(&self, id: NodeId) -> usize {
        let children = self.children(id);
        children.len()
            + children
                .iter()
                .map(|&child| self.descendants_count(child))
                .sum::<usize>()
    }

    /// Follow the first parent up to a root.
    ///
    /// Returns the chain root first and `id` last. Only one of possibly many
    /// root paths is returned. Empty for an unknown id. The walk stops before
    /// revisiting a node, since merged registrations can close a loop on the
    /// parent side of an acyclic graph.
    #[must_use]
    pub fn first_root_path(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent_at(current, 0) {
            if path.contains(&parent) {
                break;
            }
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Every node in the arena that has no parents, in creation order.
    ///
    /// Detached garbage nodes are included: they have no parents either.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        self.ids().filter(|&id| !self.has_parents(id)).collect()
    }

    /// Distinct nodes reachable below `id`, breadth-first, excluding `id`.
    ///
    /// Safe on cyclic graphs.
    #[must_use]
    pub fn distinct_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut visited = HashSet::from([id]);
        let mut queue: VecDeque<NodeId> = self.children(id).iter().copied().collect();
        let mut ordered = Vec::new();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            ordered.push(current);
            queue.extend(self.children(current).iter().copied());
        }

        ordered
    }
}

// ---------------------------------------------------------------------------
// Key lookups
// ---------------------------------------------------------------------------

impl<K, C> Gss<K, C> {
    fn position_by_key<Q>(&self, ids: &[NodeId], key: Option<&Q>, start: usize) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        ids.iter()
            .enumerate()
            .skip(start)
            .find(|(_, candidate)| {
                self.node(**candidate)
                    .is_some_and(|node| node.is_key_equal(key))
            })
            .map(|(index, _)| index)
    }

    pub(crate) fn position_child_key<Q>(
        &self,
        parent: NodeId,
        key: Option<&Q>,
        start: usize,
    ) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position_by_key(self.children(parent), key, start)
    }

    /// Whether any parent of `id` has `key`.
    pub fn has_parent_key<Q>(&self, id: NodeId, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.index_of_parent(id, key, 0).is_some()
    }

    /// Index of the first parent at or after `start` whose key equals `key`.
    pub fn index_of_parent<Q>(&self, id: NodeId, key: &Q, start: usize) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position_by_key(self.parents(id), Some(key), start)
    }

    /// Index of the first child at or after `start` whose key equals `key`.
    pub fn index_of_child<Q>(&self, id: NodeId, key: &Q, start: usize) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position_child_key(id, Some(key), start)
    }

    pub fn parent_by_key<Q>(&self, id: NodeId, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.index_of_parent(id, key, 0)
            .and_then(|index| self.parent_at(id, index))
    }

    pub fn child_by_key<Q>(&self, id: NodeId, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.index_of_child(id, key, 0)
            .and_then(|index| self.child_at(id, index))
    }

    /// Walk down a key path that starts at `id`.
    ///
    /// The first key must be `id`'s own key; each later key resolves one
    /// child. An empty path, or a first key naming another node, yields
    /// `None`.
    pub fn descendant<'q, Q, I>(&self, id: NodeId, path: I) -> Option<NodeId>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: PartialEq + ?Sized + 'q,
    {
        let mut keys = path.into_iter();
        let first = keys.next()?;
        if !self.node(id)?.is_key_equal(Some(first)) {
            return None;
        }
        keys.try_fold(id, |current, key| self.child_by_key(current, key))
    }

    /// [`Gss::descendant`] over a `/`-separated path of string keys.
    ///
    /// `"A/B/C"` from a node keyed `A` reaches `C`. Empty segments are
    /// ignored.
    pub fn descendant_by_path(&self, id: NodeId, path: &str) -> Option<NodeId>
    where
        K: Borrow<str>,
    {
        self.descendant_by_path_with(id, path, &PathConfig::default())
    }

    /// [`Gss::descendant_by_path`] with a configured separator.
    pub fn descendant_by_path_with(
        &self,
        id: NodeId,
        path: &str,
        config: &PathConfig,
    ) -> Option<NodeId>
    where
        K: Borrow<str>,
    {
        let segments = path
            .split(config.separator())
            .filter(|segment| !segment.is_empty());
        self.descendant(id, segments)
    }

    /// Depth-first search below `id` for a node keyed `key`.
    ///
    /// Direct children are checked first; only then does the search descend
    /// into each child in order. The graph must be acyclic.
    pub fn find_descendant<Q>(&self, id: NodeId, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let children = self.children(id);
        if let Some(hit) = self.child_by_key(id, key) {
            return Some(hit);
        }
        children
            .iter()
            .find_map(|&child| self.find_descendant(child, key))
    }
}

// ---------------------------------------------------------------------------
// Hook / unhook and the mutators built on them
// ---------------------------------------------------------------------------

impl<K, C> Gss<K, C>
where
    K: PartialEq,
    C: Clone,
{
    /// Add the edge `parent → child`.
    ///
    /// If `parent` already has a different child with `child`'s key, that
    /// child stays in place and takes over `child`'s contents and children;
    /// its previous subtree is detached. `parent` is then registered on
    /// `child` unless it is already there, or unless the merge left `parent`
    /// without a child of that key. Unknown ids are ignored.
    pub fn hook(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }

        let existing = self
            .position_child_key(parent, self.key(child), 0)
            .and_then(|index| self.child_at(parent, index));

        match existing {
            None => {
                if let Some(node) = self.node_mut(parent) {
                    node.children.push(child);
                }
            }
            Some(existing) if existing == child => {}
            Some(existing) => {
                trace!(%parent, %existing, %child, "merging child into same-key sibling");
                let contents = self.contents(child).cloned();
                if let Some(node) = self.node_mut(existing) {
                    node.value.replace_contents(contents);
                }
                let children = self.children(child).to_vec();
                self.set_children(existing, children);
            }
        }

        // The merge can unhook `existing` from `parent` when they are the same node.
        let Some(held) = self
            .position_child_key(parent, self.key(child), 0)
            .and_then(|index| self.child_at(parent, index))
        else {
            return;
        };
        if self.has_parent(child, parent) {
            return;
        }
        if let Some(node) = self.node_mut(child) {
            node.parents.push(parent);
        }
        if held != child {
            self.merged_links.push((parent, child));
        }
    }

    /// Remove the edge from `parent` to its child at `index`.
    ///
    /// Both sides are updated. Unknown parent or out-of-range index: no-op.
    pub fn unhook_at(&mut self, parent: NodeId, index: usize) {
        let Some(child) = self.child_at(parent, index) else {
            return;
        };
        trace!(%parent, %child, index, "unhooking child");

        if let Some(node) = self.node_mut(child) {
            if let Some(position) = node.parents.iter().position(|&p| p == parent) {
                node.parents.remove(position);
            }
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.remove(index);
        }

        let links = std::mem::take(&mut self.merged_links);
        let (stale, kept): (Vec<_>, Vec<_>) = links
            .into_iter()
            .partition(|&(p, merged)| p == parent && self.keys_match(merged, child));
        self.merged_links = kept;
        for (_, merged) in stale {
            trace!(%parent, %merged, "dropping merged registration");
            if let Some(node) = self.node_mut(merged) {
                node.parents.retain(|&p| p != parent);
            }
        }
    }

    fn keys_match(&self, a: NodeId, b: NodeId) -> bool {
        match (self.node(a), self.node(b)) {
            (Some(x), Some(y)) => x.key() == y.key(),
            _ => false,
        }
    }

    /// Remove the edge from `parent` to the child keyed like `child`.
    pub fn unhook(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(child) {
            return;
        }
        if let Some(index) = self.position_child_key(parent, self.key(child), 0) {
            self.unhook_at(parent, index);
        }
    }

    pub fn add_parent(&mut self, id: NodeId, parent: NodeId) {
        self.hook(parent, id);
    }

    pub fn add_child(&mut self, id: NodeId, child: NodeId) {
        self.hook(id, child);
    }

    pub fn remove_parent(&mut self, id: NodeId, parent: NodeId) {
        self.unhook(parent, id);
    }

    pub fn remove_parent_at(&mut self, id: NodeId, index: usize) {
        if let Some(parent) = self.parent_at(id, index) {
            self.unhook(parent, id);
        }
    }

    /// Detach `id` from every parent keyed `key`.
    pub fn remove_parents_by_key<Q>(&mut self, id: NodeId, key: &Q)
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        for index in (0..self.parents(id).len()).rev() {
            let Some(parent) = self.parent_at(id, index) else {
                continue;
            };
            if self.node(parent).is_some_and(|p| p.is_key_equal(Some(key))) {
                self.unhook(parent, id);
            }
        }
    }

    pub fn remove_child(&mut self, id: NodeId, child: NodeId) {
        self.unhook(id, child);
    }

    pub fn remove_child_at(&mut self, id: NodeId, index: usize) {
        self.unhook_at(id, index);
    }

    /// Remove every child of `id` keyed `key`, scanning from the back.
    pub fn remove_children_by_key<Q>(&mut self, id: NodeId, key: &Q)
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        for index in (0..self.children(id).len()).rev() {
            let matches = self
                .child_at(id, index)
                .and_then(|child| self.node(child))
                .is_some_and(|child| child.is_key_equal(Some(key)));
            if matches {
                self.unhook_at(id, index);
            }
        }
    }

    /// Detach `id` from all of its parents.
    pub fn remove_all_parents(&mut self, id: NodeId) {
        let parents = self.parents(id).to_vec();
        for parent in parents {
            self.unhook(parent, id);
        }
    }

    /// Replace the children of `id`.
    ///
    /// Existing children are unhooked back to front, then each new child is
    /// hooked in order, so same-key entries in `children` merge.
    pub fn set_children<I>(&mut self, id: NodeId, children: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        if !self.contains(id) {
            return;
        }
        for index in (0..self.children(id).len()).rev() {
            self.unhook_at(id, index);
        }
        for child in children {
            self.hook(id, child);
        }
    }
}

// ---------------------------------------------------------------------------
// Value equality
// ---------------------------------------------------------------------------

impl<K, C> Gss<K, C>
where
    K: PartialEq,
    C: PartialEq,
{
    /// Value equality of two subtrees of this arena.
    ///
    /// Keys, contents and the ordered children must match recursively.
    /// Parents are not compared.
    #[must_use]
    pub fn nodes_equal(&self, a: NodeId, b: NodeId) -> bool {
        subtrees_equal(self, a, self, b)
    }
}

/// Value equality of two subtrees, possibly from different arenas.
pub fn subtrees_equal<K, C>(left: &Gss<K, C>, a: NodeId, right: &Gss<K, C>, b: NodeId) -> bool
where
    K: PartialEq,
    C: PartialEq,
{
    let (Some(x), Some(y)) = (left.node(a), right.node(b)) else {
        return false;
    };
    if std::ptr::eq(left, right) && a == b {
        return true;
    }
    x.key() == y.key()
        && x.contents() == y.contents()
        && x.children().len() == y.children().len()
        && x
            .children()
            .iter()
            .zip(y.children())
            .all(|(&ca, &cb)| subtrees_equal(left, ca, right, cb))
}
