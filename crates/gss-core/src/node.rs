//! Node records stored in a [`Gss`](crate::Gss) arena.
//!
//! A [`GraphNode`] is the data half of a node: an optional key and an
//! optional payload. A [`GssNode`] adds topology: an ordered child list and
//! an ordered parent list, both holding [`NodeId`]s into the owning arena.

use std::borrow::Borrow;
use std::fmt;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Stable handle to a node inside one [`Gss`](crate::Gss) arena.
///
/// Slots are never reused, so an id stays valid for the lifetime of the
/// arena that issued it. Ids are meaningless across arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Build an id from a raw arena slot.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// The raw arena slot.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GraphNode
// ---------------------------------------------------------------------------

/// Key + contents pair. Both halves may be absent on a freshly created node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode<K, C> {
    key: Option<K>,
    contents: Option<C>,
}

impl<K, C> Default for GraphNode<K, C> {
    fn default() -> Self {
        Self {
            key: None,
            contents: None,
        }
    }
}

impl<K, C> GraphNode<K, C> {
    /// A node with a key and optional contents.
    #[must_use]
    pub const fn new(key: K, contents: Option<C>) -> Self {
        Self {
            key: Some(key),
            contents,
        }
    }

    #[must_use]
    pub const fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    #[must_use]
    pub const fn contents(&self) -> Option<&C> {
        self.contents.as_ref()
    }

    pub fn set_key(&mut self, key: K) {
        self.key = Some(key);
    }

    pub fn set_contents(&mut self, contents: C) {
        self.contents = Some(contents);
    }

    pub(crate) fn replace_contents(&mut self, contents: Option<C>) {
        self.contents = contents;
    }

    pub fn take_contents(&mut self) -> Option<C> {
        self.contents.take()
    }

    /// Key equality. An absent `key` matches only an absent node key.
    pub fn is_key_equal<Q>(&self, key: Option<&Q>) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.key.as_ref().map(Borrow::borrow) == key
    }
}

// ---------------------------------------------------------------------------
// GssNode
// ---------------------------------------------------------------------------

/// A [`GraphNode`] with ordered child and parent links.
///
/// Links are only changed through [`Gss`](crate::Gss) so that both sides of
/// every edge stay in step.
#[derive(Debug, Clone)]
pub struct GssNode<K, C> {
    pub(crate) value: GraphNode<K, C>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parents: Vec<NodeId>,
}

impl<K, C> Default for GssNode<K, C> {
    fn default() -> Self {
        Self {
            value: GraphNode::default(),
            children: Vec::new(),
            parents: Vec::new(),
        }
    }
}

impl<K, C> GssNode<K, C> {
    #[must_use]
    pub const fn value(&self) -> &GraphNode<K, C> {
        &self.value
    }

    #[must_use]
    pub const fn key(&self) -> Option<&K> {
        self.value.key()
    }

    #[must_use]
    pub const fn contents(&self) -> Option<&C> {
        self.value.contents()
    }

    /// Children in insertion (or last sort) order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parents in registration order.
    #[must_use]
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    #[must_use]
    pub fn has_parents(&self) -> bool {
        !self.parents.is_empty()
    }

    pub fn is_key_equal<Q>(&self, key: Option<&Q>) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.value.is_key_equal(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_node_has_no_key_or_contents() {
        let node: GraphNode<String, u32> = GraphNode::default();
        assert!(node.key().is_none());
        assert!(node.contents().is_none());
        assert!(node.is_key_equal::<str>(None));
        assert!(!node.is_key_equal(Some("a")));
    }

    #[test]
    fn key_equality_borrows() {
        let node = GraphNode::new("alpha".to_string(), Some(1_u8));
        assert!(node.is_key_equal(Some("alpha")));
        assert!(!node.is_key_equal(Some("beta")));
        assert!(!node.is_key_equal::<str>(None));
    }

    #[test]
    fn take_contents_leaves_absent() {
        let mut node = GraphNode::new(1_u32, Some("x"));
        assert_eq!(node.take_contents(), Some("x"));
        assert!(node.contents().is_none());
    }

    #[test]
    fn node_id_displays_slot() {
        assert_eq!(NodeId::from_index(7).to_string(), "#7");
        assert_eq!(NodeId::from_index(7).index(), 7);
    }
}
