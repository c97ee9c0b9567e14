//! Borrowed node views and text rendering.
//!
//! [`NodeRef`] pairs an arena with an id so a node can take part in
//! `==`, hashing and `{}` formatting like an ordinary value.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::config::RenderConfig;
use crate::gss::{Gss, subtrees_equal};
use crate::node::NodeId;

/// A node together with the arena it lives in.
///
/// - `==` compares key, contents and the ordered children recursively;
///   parents are ignored.
/// - Hashing uses only the key, so equal views hash equally.
/// - `Display` renders the subtree, one indented line per node.
pub struct NodeRef<'a, K, C> {
    gss: &'a Gss<K, C>,
    id: NodeId,
}

impl<K, C> Clone for NodeRef<'_, K, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, C> Copy for NodeRef<'_, K, C> {}

impl<'a, K, C> NodeRef<'a, K, C> {
    pub(crate) const fn new(gss: &'a Gss<K, C>, id: NodeId) -> Self {
        Self { gss, id }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.gss.key(self.id)
    }

    #[must_use]
    pub fn contents(&self) -> Option<&'a C> {
        self.gss.contents(self.id)
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, K, C>> + 'a {
        let gss = self.gss;
        gss.children(self.id)
            .iter()
            .map(move |&child| NodeRef::new(gss, child))
    }

    pub fn parents(&self) -> impl Iterator<Item = NodeRef<'a, K, C>> + 'a {
        let gss = self.gss;
        gss.parents(self.id)
            .iter()
            .map(move |&parent| NodeRef::new(gss, parent))
    }
}

impl<K: PartialEq, C: PartialEq> PartialEq for NodeRef<'_, K, C> {
    fn eq(&self, other: &Self) -> bool {
        subtrees_equal(self.gss, self.id, other.gss, other.id)
    }
}

impl<K: Eq, C: Eq> Eq for NodeRef<'_, K, C> {}

/// Hashes the key alone; a keyless node hashes as `0_u64`.
impl<K: Hash, C> Hash for NodeRef<'_, K, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.key() {
            Some(key) => key.hash(state),
            None => 0_u64.hash(state),
        }
    }
}

impl<K: fmt::Debug, C: fmt::Debug> fmt::Debug for NodeRef<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key", &self.key())
            .field("contents", &self.contents())
            .field("children", &self.gss.children(self.id))
            .finish()
    }
}

impl<K: fmt::Display, C: fmt::Display> fmt::Display for NodeRef<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_subtree(f, self.gss, self.id, 0, RenderConfig::default().indent)
    }
}

impl<K: fmt::Display, C: fmt::Display> Gss<K, C> {
    /// Render the subtree under `id` with a configured indent width.
    ///
    /// Empty for an unknown id.
    #[must_use]
    pub fn render(&self, id: NodeId, config: &RenderConfig) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = write_subtree(&mut out, self, id, 0, config.indent);
        out
    }
}

struct OrNull<'a, T>(Option<&'a T>);

impl<T: fmt::Display> fmt::Display for OrNull<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("null"),
        }
    }
}

fn write_subtree<W, K, C>(
    out: &mut W,
    gss: &Gss<K, C>,
    id: NodeId,
    depth: usize,
    indent: usize,
) -> fmt::Result
where
    W: fmt::Write,
    K: fmt::Display,
    C: fmt::Display,
{
    let Some(node) = gss.node(id) else {
        return Ok(());
    };

    write!(
        out,
        "{:width$}(Key={}) (Contents={})",
        "",
        OrNull(node.key()),
        OrNull(node.contents()),
        width = depth * indent
    )?;
    if node.has_children() {
        write!(out, " ({} children)", node.children().len())?;
    }
    out.write_char('\n')?;

    for &child in node.children() {
        write_subtree(out, gss, child, depth + 1, indent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample() -> (Gss<String, u32>, NodeId) {
        let mut gss = Gss::new();
        let a = gss.insert("A".to_string(), Some(1));
        let b = gss.insert("B".to_string(), None);
        let c = gss.insert("C".to_string(), Some(3));
        let d = gss.insert("D".to_string(), Some(4));
        gss.add_child(a, b);
        gss.add_child(b, c);
        gss.add_child(a, d);
        (gss, a)
    }

    #[test]
    fn display_renders_indented_preorder() {
        let (gss, a) = sample();
        let text = gss.get(a).expect("node").to_string();
        assert_eq!(
            text,
            "(Key=A) (Contents=1) (2 children)\n\
             \x20\x20(Key=B) (Contents=null) (1 children)\n\
             \x20\x20\x20\x20(Key=C) (Contents=3)\n\
             \x20\x20(Key=D) (Contents=4)\n"
        );
    }

    #[test]
    fn render_uses_configured_indent() {
        let (gss, a) = sample();
        let text = gss.render(a, &RenderConfig { indent: 1 });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "  (Key=C) (Contents=3)");
        assert_eq!(gss.render(NodeId::from_index(50), &RenderConfig::default()), "");
    }

    #[test]
    fn blank_node_renders_null_key() {
        let mut gss: Gss<String, u32> = Gss::new();
        let blank = gss.create_node();
        assert_eq!(
            gss.get(blank).expect("node").to_string(),
            "(Key=null) (Contents=null)\n"
        );
    }

    #[test]
    fn equal_views_across_arenas() {
        let (left, a) = sample();
        let (right, b) = sample();
        assert_eq!(left.get(a), right.get(b));

        let mut set = HashSet::new();
        set.insert(left.get(a).expect("node"));
        assert!(set.contains(&right.get(b).expect("node")));
    }

    #[test]
    fn keyed_view_hashes_like_its_key_and_keyless_like_zero() {
        use std::hash::{BuildHasher, RandomState};

        let mut gss: Gss<String, u32> = Gss::new();
        let keyed = gss.insert("A".to_string(), Some(1));
        let blank = gss.create_node();
        let state = RandomState::new();

        let view = gss.get(keyed).expect("node");
        assert_eq!(state.hash_one(view), state.hash_one("A".to_string()));
        let view = gss.get(blank).expect("node");
        assert_eq!(state.hash_one(view), state.hash_one(0_u64));
    }

    #[test]
    fn views_walk_children_and_parents() {
        let (gss, a) = sample();
        let view = gss.get(a).expect("node");
        let keys: Vec<&String> = view.children().filter_map(|c| c.key()).collect();
        assert_eq!(keys, ["B", "D"]);
        let b = view.children().next().expect("child");
        assert_eq!(b.parents().next().map(|p| p.id()), Some(a));
    }
}
