//! Recursive sibling ordering.
//!
//! Sorting a node list also sorts every child list reachable from it with
//! the same comparator. A subtree shared by several parents is re-sorted
//! once per parent that reaches it; the result is the same, only the work
//! grows with the number of edges rather than nodes.

use std::cmp::Ordering;

use crate::gss::Gss;
use crate::node::{GssNode, NodeId};

impl<K, C> Gss<K, C> {
    /// Sort `nodes` in place (stable), then recursively sort their children.
    ///
    /// Ids unknown to this arena sort after known ones.
    pub fn sort_node_list_by<F>(&mut self, nodes: &mut [NodeId], mut compare: F)
    where
        F: FnMut(&GssNode<K, C>, &GssNode<K, C>) -> Ordering,
    {
        self.sort_list(nodes, &mut compare);
    }

    /// Recursively sort the children of `id`.
    ///
    /// No-op for an unknown id or a node without children.
    pub fn sort_children_by<F>(&mut self, id: NodeId, mut compare: F)
    where
        F: FnMut(&GssNode<K, C>, &GssNode<K, C>) -> Ordering,
    {
        self.sort_children_with(id, &mut compare);
    }

    fn sort_list<F>(&mut self, nodes: &mut [NodeId], compare: &mut F)
    where
        F: FnMut(&GssNode<K, C>, &GssNode<K, C>) -> Ordering,
    {
        nodes.sort_by(|&a, &b| match (self.node(a), self.node(b)) {
            (Some(x), Some(y)) => compare(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        for &id in nodes.iter() {
            self.sort_children_with(id, compare);
        }
    }

    fn sort_children_with<F>(&mut self, id: NodeId, compare: &mut F)
    where
        F: FnMut(&GssNode<K, C>, &GssNode<K, C>) -> Ordering,
    {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.children.is_empty() {
            return;
        }

        let mut children = std::mem::take(&mut node.children);
        self.sort_list(&mut children, compare);
        if let Some(node) = self.node_mut(id) {
            node.children = children;
        }
    }
}

impl<K: Ord, C> Gss<K, C> {
    /// [`Gss::sort_node_list_by`] using key order; absent keys sort first.
    pub fn sort_node_list(&mut self, nodes: &mut [NodeId]) {
        self.sort_node_list_by(nodes, by_key);
    }

    /// [`Gss::sort_children_by`] using key order; absent keys sort first.
    pub fn sort_children(&mut self, id: NodeId) {
        self.sort_children_by(id, by_key);
    }
}

fn by_key<K: Ord, C>(a: &GssNode<K, C>, b: &GssNode<K, C>) -> Ordering {
    a.key().cmp(&b.key())
}

#[cfg(test)]
mod tests {
    use crate::gss::Gss;
    use crate::node::NodeId;

    fn keys(gss: &Gss<String, u32>, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .filter_map(|&id| gss.key(id).cloned())
            .collect()
    }

    #[test]
    fn sorts_list_and_nested_children() {
        let mut gss: Gss<String, u32> = Gss::new();
        let z = gss.insert("z".into(), None);
        let a = gss.insert("a".into(), None);
        for key in ["c", "b", "a"] {
            let child = gss.insert(key.into(), None);
            gss.add_child(z, child);
        }
        let mut roots = vec![z, a];

        gss.sort_node_list(&mut roots);

        assert_eq!(keys(&gss, &roots), ["a", "z"]);
        assert_eq!(keys(&gss, gss.children(z)), ["a", "b", "c"]);
    }

    #[test]
    fn custom_comparator_orders_by_contents() {
        let mut gss: Gss<String, u32> = Gss::new();
        let root = gss.insert("root".into(), None);
        for (key, weight) in [("x", 3), ("y", 1), ("w", 2)] {
            let child = gss.insert(key.into(), Some(weight));
            gss.add_child(root, child);
        }

        gss.sort_children_by(root, |a, b| a.contents().cmp(&b.contents()));

        assert_eq!(keys(&gss, gss.children(root)), ["y", "w", "x"]);
    }

    #[test]
    fn sorting_keeps_parent_links() {
        let mut gss: Gss<String, u32> = Gss::new();
        let root = gss.insert("root".into(), None);
        let b = gss.insert("b".into(), None);
        let a = gss.insert("a".into(), None);
        gss.add_child(root, b);
        gss.add_child(root, a);

        gss.sort_children(root);

        assert_eq!(gss.children(root), &[a, b]);
        assert!(gss.has_parent(a, root));
        assert!(gss.has_parent(b, root));
    }

    #[test]
    fn childless_and_unknown_nodes_are_noops() {
        let mut gss: Gss<String, u32> = Gss::new();
        let leaf = gss.insert("leaf".into(), None);
        gss.sort_children(leaf);
        gss.sort_children(NodeId::from_index(9));
        let mut list = vec![NodeId::from_index(9), leaf];
        gss.sort_node_list(&mut list);
        assert_eq!(list, vec![leaf, NodeId::from_index(9)]);
    }
}
