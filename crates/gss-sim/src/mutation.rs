//! The mutation vocabulary of a campaign.
//!
//! Mutations address nodes by pool slot rather than [`NodeId`], so a
//! recorded trace stays readable and can be replayed against a fresh pool.

use gss_core::{Gss, NodeId};
use serde::{Deserialize, Serialize};

use crate::rng::DeterministicRng;

/// Graph driven by the simulator: string keys, contents are the pool slot.
pub type SimGss = Gss<String, u64>;

/// One public mutation of the arena, with pool-slot operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    AddChild { parent: usize, child: usize },
    AddParent { child: usize, parent: usize },
    RemoveChild { parent: usize, child: usize },
    RemoveChildAt { parent: usize, index: usize },
    RemoveParentAt { child: usize, index: usize },
    RemoveChildrenByKey { parent: usize, key: String },
    RemoveParentsByKey { child: usize, key: String },
    RemoveAllParents { node: usize },
    SetChildren { parent: usize, children: Vec<usize> },
    Insert { key: String },
}

impl Mutation {
    /// True for mutations that can add edges, and so may close a cycle.
    #[must_use]
    pub const fn adds_edges(&self) -> bool {
        matches!(
            self,
            Self::AddChild { .. } | Self::AddParent { .. } | Self::SetChildren { .. }
        )
    }
}

/// Relative frequency of each mutation kind. A zero weight disables it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpWeights {
    pub add_child: u32,
    pub add_parent: u32,
    pub remove_child: u32,
    pub remove_child_at: u32,
    pub remove_parent_at: u32,
    pub remove_children_by_key: u32,
    pub remove_parents_by_key: u32,
    pub remove_all_parents: u32,
    pub set_children: u32,
    pub insert: u32,
}

impl Default for OpWeights {
    fn default() -> Self {
        Self {
            add_child: 8,
            add_parent: 6,
            remove_child: 3,
            remove_child_at: 2,
            remove_parent_at: 2,
            remove_children_by_key: 1,
            remove_parents_by_key: 1,
            remove_all_parents: 1,
            set_children: 2,
            insert: 1,
        }
    }
}

impl OpWeights {
    fn as_table(&self) -> [u32; 10] {
        [
            self.add_child,
            self.add_parent,
            self.remove_child,
            self.remove_child_at,
            self.remove_parent_at,
            self.remove_children_by_key,
            self.remove_parents_by_key,
            self.remove_all_parents,
            self.set_children,
            self.insert,
        ]
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.as_table().iter().map(|&w| u64::from(w)).sum()
    }
}

/// Key for pool slot `slot` in a key space of `key_space` distinct keys.
///
/// Slots sharing a key are what exercise same-key merging.
#[must_use]
pub fn slot_key(slot: usize, key_space: usize) -> String {
    format!("k{}", slot % key_space.max(1))
}

/// A fresh arena holding `count` keyed nodes, contents set to the slot.
#[must_use]
pub fn seed_pool(count: usize, key_space: usize) -> (SimGss, Vec<NodeId>) {
    let mut gss = Gss::with_capacity(count);
    let ids = (0..count)
        .map(|slot| gss.insert(slot_key(slot, key_space), Some(slot as u64)))
        .collect();
    (gss, ids)
}

/// Draw the next mutation for a pool of `pool_len` slots.
///
/// Returns `None` when every weight is zero.
#[must_use]
pub fn generate(
    rng: &mut DeterministicRng,
    weights: &OpWeights,
    pool_len: usize,
    key_space: usize,
) -> Option<Mutation> {
    let kind = rng.weighted(&weights.as_table())?;
    let mutation = match kind {
        0 => Mutation::AddChild {
            parent: rng.index(pool_len),
            child: rng.index(pool_len),
        },
        1 => Mutation::AddParent {
            child: rng.index(pool_len),
            parent: rng.index(pool_len),
        },
        2 => Mutation::RemoveChild {
            parent: rng.index(pool_len),
            child: rng.index(pool_len),
        },
        3 => Mutation::RemoveChildAt {
            parent: rng.index(pool_len),
            index: rng.index(4),
        },
        4 => Mutation::RemoveParentAt {
            child: rng.index(pool_len),
            index: rng.index(4),
        },
        5 => Mutation::RemoveChildrenByKey {
            parent: rng.index(pool_len),
            key: slot_key(rng.index(key_space), key_space),
        },
        6 => Mutation::RemoveParentsByKey {
            child: rng.index(pool_len),
            key: slot_key(rng.index(key_space), key_space),
        },
        7 => Mutation::RemoveAllParents { node: rng.index(pool_len) },
        8 => {
            let parent = rng.index(pool_len);
            let len = rng.index(4);
            let children = (0..len).map(|_| rng.index(pool_len)).collect();
            Mutation::SetChildren { parent, children }
        }
        _ => Mutation::Insert {
            key: slot_key(rng.index(key_space), key_space),
        },
    };
    Some(mutation)
}

/// Apply `mutation` to `gss`, growing `ids` on insert.
///
/// Slots outside `ids` map to no node and the mutation becomes a no-op,
/// matching how the arena treats unknown ids.
pub fn apply(gss: &mut SimGss, ids: &mut Vec<NodeId>, mutation: &Mutation) {
    if let Mutation::Insert { key } = mutation {
        let slot = ids.len() as u64;
        let fresh = gss.insert(key.clone(), Some(slot));
        ids.push(fresh);
        return;
    }

    let id = |slot: usize| resolve(ids, slot);
    match mutation {
        Mutation::AddChild { parent, child } => gss.add_child(id(*parent), id(*child)),
        Mutation::AddParent { child, parent } => gss.add_parent(id(*child), id(*parent)),
        Mutation::RemoveChild { parent, child } => gss.remove_child(id(*parent), id(*child)),
        Mutation::RemoveChildAt { parent, index } => gss.remove_child_at(id(*parent), *index),
        Mutation::RemoveParentAt { child, index } => gss.remove_parent_at(id(*child), *index),
        Mutation::RemoveChildrenByKey { parent, key } => {
            gss.remove_children_by_key(id(*parent), key.as_str());
        }
        Mutation::RemoveParentsByKey { child, key } => {
            gss.remove_parents_by_key(id(*child), key.as_str());
        }
        Mutation::RemoveAllParents { node } => gss.remove_all_parents(id(*node)),
        Mutation::SetChildren { parent, children } => {
            let children: Vec<NodeId> = children.iter().map(|&slot| id(slot)).collect();
            gss.set_children(id(*parent), children);
        }
        Mutation::Insert { .. } => {}
    }
}

fn resolve(ids: &[NodeId], slot: usize) -> NodeId {
    ids.get(slot)
        .copied()
        .unwrap_or_else(|| NodeId::from_index(usize::MAX))
}

/// True when no node of `gss` can reach itself.
#[must_use]
pub fn is_acyclic(gss: &SimGss) -> bool {
    gss.ids().all(|id| gss.is_acyclic_from(id))
}
