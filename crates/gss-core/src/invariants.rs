//! Audit of the structural invariants every mutator must preserve.
//!
//! - every child lists its parent, exactly once;
//! - every registered parent lists the child, or a child with its key (a
//!   merge leaves the hooked node registered under the parent);
//! - no two children of one parent share a key;
//! - every stored id belongs to the arena.
//!
//! The audit is a full O(V + E·d) scan, `d` being the largest child count.
//! It is meant for tests, simulations and debug assertions.

use std::fmt;

use crate::gss::Gss;
use crate::node::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkViolation {
    /// `child` is in `parent.children` but `parent` is not in `child.parents`.
    MissingBackLink { parent: NodeId, child: NodeId },
    /// `parent` is in `child.parents` but holds neither `child` nor a child
    /// with its key.
    MissingForwardLink { parent: NodeId, child: NodeId },
    /// `parent` appears more than once in `child.parents`.
    DuplicateParent {
        parent: NodeId,
        child: NodeId,
        count: usize,
    },
    /// Two children of `parent` share a key.
    DuplicateSiblingKey {
        parent: NodeId,
        first: NodeId,
        second: NodeId,
    },
    /// `owner` links to an id the arena never issued.
    DanglingId { owner: NodeId, referenced: NodeId },
}

impl fmt::Display for LinkViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBackLink { parent, child } => {
                write!(f, "{child} is a child of {parent} but does not list it as parent")
            }
            Self::MissingForwardLink { parent, child } => {
                write!(f, "{child} lists {parent} as parent but is not among its children")
            }
            Self::DuplicateParent {
                parent,
                child,
                count,
            } => write!(f, "{child} lists parent {parent} {count} times"),
            Self::DuplicateSiblingKey {
                parent,
                first,
                second,
            } => write!(f, "children {first} and {second} of {parent} share a key"),
            Self::DanglingId { owner, referenced } => {
                write!(f, "{owner} links to unknown node {referenced}")
            }
        }
    }
}

/// Every invariant violation in `gss`, in arena order.
#[must_use]
pub fn link_violations<K: PartialEq, C>(gss: &Gss<K, C>) -> Vec<LinkViolation> {
    let mut violations = Vec::new();

    for id in gss.ids() {
        let children = gss.children(id);
        for (position, &child) in children.iter().enumerate() {
            if !gss.contains(child) {
                violations.push(LinkViolation::DanglingId {
                    owner: id,
                    referenced: child,
                });
                continue;
            }
            if !gss.has_parent(child, id) {
                violations.push(LinkViolation::MissingBackLink { parent: id, child });
            }
            for &later in &children[position + 1..] {
                if gss.contains(later) && gss.key(child) == gss.key(later) {
                    violations.push(LinkViolation::DuplicateSiblingKey {
                        parent: id,
                        first: child,
                        second: later,
                    });
                }
            }
        }

        let parents = gss.parents(id);
        for (position, &parent) in parents.iter().enumerate() {
            if !gss.contains(parent) {
                violations.push(LinkViolation::DanglingId {
                    owner: id,
                    referenced: parent,
                });
                continue;
            }
            if parents[..position].contains(&parent) {
                continue;
            }
            let count = parents.iter().filter(|&&p| p == parent).count();
            if count > 1 {
                violations.push(LinkViolation::DuplicateParent {
                    parent,
                    child: id,
                    count,
                });
            }
            if gss.position_child_key(parent, gss.key(id), 0).is_none() {
                violations.push(LinkViolation::MissingForwardLink { parent, child: id });
            }
        }
    }

    violations
}

/// `true` when [`link_violations`] finds nothing.
#[must_use]
pub fn links_are_consistent<K: PartialEq, C>(gss: &Gss<K, C>) -> bool {
    link_violations(gss).is_empty()
}
