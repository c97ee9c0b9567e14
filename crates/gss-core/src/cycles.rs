//! Cycle-guarded traversals.
//!
//! The default recursive queries on [`Gss`] assume an acyclic graph. The
//! entry points here walk iteratively with an on-stack marker, so they
//! terminate on any input and report the first cycle they meet.
//!
//! - [`Gss::find_cycle`]: DFS from a start node, O(V+E).
//! - [`Gss::checked_descendants_count`]: the same count as
//!   [`Gss::descendants_count`], memoised per node, or
//!   [`GssError::CycleDetected`].

use std::collections::HashMap;

use crate::error::GssError;
use crate::gss::Gss;
use crate::node::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnStack,
    Done,
}

impl<K, C> Gss<K, C> {
    /// First cycle reachable from `start`, as a path that begins and ends
    /// on the same node. `None` when the subgraph below `start` is acyclic.
    #[must_use]
    pub fn find_cycle(&self, start: NodeId) -> Option<Vec<NodeId>> {
        if !self.contains(start) {
            return None;
        }

        let mut marks: HashMap<NodeId, Mark> = HashMap::from([(start, Mark::OnStack)]);
        let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];

        while let Some(&(node, next)) = stack.last() {
            let Some(&child) = self.children(node).get(next) else {
                marks.insert(node, Mark::Done);
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            match marks.get(&child) {
                Some(Mark::OnStack) => {
                    let from = stack.iter().position(|&(n, _)| n == child).unwrap_or(0);
                    let mut cycle: Vec<NodeId> = stack[from..].iter().map(|&(n, _)| n).collect();
                    cycle.push(child);
                    return Some(cycle);
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(child, Mark::OnStack);
                    stack.push((child, 0));
                }
            }
        }

        None
    }

    #[must_use]
    pub fn is_acyclic_from(&self, start: NodeId) -> bool {
        self.find_cycle(start).is_none()
    }

    /// [`Gss::descendants_count`] that refuses cyclic input.
    ///
    /// Each node's count is computed once, so heavily shared DAGs are
    /// linear in edges. Saturates at `usize::MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`GssError::CycleDetected`] with the offending path.
    pub fn checked_descendants_count(&self, id: NodeId) -> Result<usize, GssError> {
        if let Some(path) = self.find_cycle(id) {
            return Err(GssError::CycleDetected { path });
        }

        // Post-order over an acyclic graph: children resolve before parents.
        let mut counts: HashMap<NodeId, usize> = HashMap::new();
        let mut stack: Vec<(NodeId, bool)> = vec![(id, false)];
        while let Some((node, expanded)) = stack.pop() {
            if counts.contains_key(&node) {
                continue;
            }
            let children = self.children(node);
            if expanded {
                let total = children.iter().fold(children.len(), |acc, child| {
                    acc.saturating_add(counts.get(child).copied().unwrap_or(0))
                });
                counts.insert(node, total);
            } else {
                stack.push((node, true));
                stack.extend(
                    children
                        .iter()
                        .filter(|child| !counts.contains_key(*child))
                        .map(|&child| (child, false)),
                );
            }
        }

        Ok(counts.get(&id).copied().unwrap_or(0))
    }
}
