use std::fmt;

use gss_core::{LinkViolation, NodeId, NodeIndex, link_violations};

use crate::mutation::SimGss;

/// Plain descendant counts grow with the number of paths; above this the
/// exponential walk is skipped and only the checked count is taken.
const PLAIN_COUNT_LIMIT: usize = 4096;

// ── Result types ──────────────────────────────────────────────────────────────

/// Outcome of running every check against one arena state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleResult {
    pub passed: bool,
    pub violations: Vec<InvariantViolation>,
}

impl OracleResult {
    fn from_violations(violations: Vec<InvariantViolation>) -> Self {
        Self {
            passed: violations.is_empty(),
            violations,
        }
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Parent/child links out of step, or siblings sharing a key.
    Link(LinkViolation),
    /// The cycle-guarded count disagrees with the recursive one, or
    /// rejected an acyclic graph.
    DescendantCount {
        node: NodeId,
        plain: usize,
        checked: Option<usize>,
    },
    /// `roots()` disagrees with the nodes that have no parents.
    Roots { listed: Vec<NodeId>, expected: Vec<NodeId> },
    /// A child key lookup found a different node than the child index.
    KeyLookup {
        parent: NodeId,
        key: String,
        found: Option<NodeId>,
        indexed: Option<NodeId>,
    },
    /// Walking a node's first-root path by key did not lead back to it.
    PathRoundTrip {
        node: NodeId,
        path: Vec<NodeId>,
        reached: Option<NodeId>,
    },
    /// Sorting left some child list out of key order, or a second sort
    /// changed the result.
    Sort { node: NodeId },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(violation) => write!(f, "Link: {violation}"),
            Self::DescendantCount {
                node,
                plain,
                checked,
            } => write!(
                f,
                "DescendantCount: {node} counts {plain} recursively but {checked:?} when checked"
            ),
            Self::Roots { listed, expected } => {
                write!(f, "Roots: listed {listed:?}, expected {expected:?}")
            }
            Self::KeyLookup {
                parent,
                key,
                found,
                indexed,
            } => write!(
                f,
                "KeyLookup: child {key:?} of {parent} resolves to {found:?}, index has {indexed:?}"
            ),
            Self::PathRoundTrip {
                node,
                path,
                reached,
            } => write!(
                f,
                "PathRoundTrip: path {path:?} to {node} reaches {reached:?}"
            ),
            Self::Sort { node } => write!(f, "Sort: children of {node} not in key order"),
        }
    }
}

// ── Oracle ────────────────────────────────────────────────────────────────────

/// Run every check against `gss`. The arena must be acyclic.
#[must_use]
pub fn check_all(gss: &SimGss) -> OracleResult {
    let mut violations: Vec<InvariantViolation> = link_violations(gss)
        .into_iter()
        .map(InvariantViolation::Link)
        .collect();

    // Remaining checks assume sound links.
    if violations.is_empty() {
        violations.extend(check_roots(gss));
        violations.extend(check_key_lookups(gss));
        violations.extend(check_paths(gss));
        violations.extend(check_counts(gss));
        violations.extend(check_sort(gss));
    }

    OracleResult::from_violations(violations)
}

/// `roots()` lists exactly the parentless nodes, in arena order.
#[must_use]
pub fn check_roots(gss: &SimGss) -> Vec<InvariantViolation> {
    let listed = gss.roots();
    let expected: Vec<NodeId> = gss.ids().filter(|&id| gss.parents(id).is_empty()).collect();
    if listed == expected {
        Vec::new()
    } else {
        vec![InvariantViolation::Roots { listed, expected }]
    }
}

/// `child_by_key` agrees with a [`NodeIndex`] built over each child list.
#[must_use]
pub fn check_key_lookups(gss: &SimGss) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    for parent in gss.ids() {
        let index = NodeIndex::from_nodes(gss, gss.children(parent).iter().copied());
        for (key, indexed) in index.iter() {
            let found = gss.child_by_key(parent, key.as_str());
            if found != Some(indexed) {
                violations.push(InvariantViolation::KeyLookup {
                    parent,
                    key: key.clone(),
                    found,
                    indexed: Some(indexed),
                });
            }
        }
    }
    violations
}

/// Following the keys along `first_root_path(node)` from its root lands
/// on `node` again.
///
/// Paths that climb through a merged registration rather than a child edge
/// are skipped.
#[must_use]
pub fn check_paths(gss: &SimGss) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    for node in gss.ids() {
        let path = gss.first_root_path(node);
        let Some(&root) = path.first() else {
            continue;
        };
        let follows_edges = path
            .windows(2)
            .all(|pair| gss.children(pair[0]).contains(&pair[1]));
        let keys: Vec<&String> = path.iter().filter_map(|&id| gss.key(id)).collect();
        if !follows_edges || keys.len() != path.len() {
            continue;
        }
        let reached = gss.descendant(root, keys);
        let loops_back = gss.parent_at(root, 0).is_some_and(|parent| path.contains(&parent));
        if reached != Some(node) || (gss.has_parents(root) && !loops_back) {
            violations.push(InvariantViolation::PathRoundTrip {
                node,
                path,
                reached,
            });
        }
    }
    violations
}

/// The memoised, cycle-guarded count matches the recursive definition.
#[must_use]
pub fn check_counts(gss: &SimGss) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    for node in gss.ids() {
        let Ok(checked) = gss.checked_descendants_count(node) else {
            violations.push(InvariantViolation::DescendantCount {
                node,
                plain: 0,
                checked: None,
            });
            continue;
        };
        if checked > PLAIN_COUNT_LIMIT {
            continue;
        }
        let plain = gss.descendants_count(node);
        if plain != checked {
            violations.push(InvariantViolation::DescendantCount {
                node,
                plain,
                checked: Some(checked),
            });
        }
    }
    violations
}

/// Sorting a copy by key orders every child list, keeps the links sound,
/// and is idempotent.
#[must_use]
pub fn check_sort(gss: &SimGss) -> Vec<InvariantViolation> {
    let mut sorted = gss.clone();
    let mut roots = sorted.roots();
    sorted.sort_node_list(&mut roots);
    let once: Vec<Vec<NodeId>> = sorted.ids().map(|id| sorted.children(id).to_vec()).collect();

    let mut violations: Vec<InvariantViolation> = link_violations(&sorted)
        .into_iter()
        .map(InvariantViolation::Link)
        .collect();

    for node in sorted.ids() {
        let keys: Vec<Option<&String>> =
            sorted.children(node).iter().map(|&c| sorted.key(c)).collect();
        if keys.windows(2).any(|pair| pair[0] > pair[1]) {
            violations.push(InvariantViolation::Sort { node });
        }
    }

    sorted.sort_node_list(&mut roots);
    for (node, children) in sorted.ids().zip(&once) {
        if sorted.children(node) != children.as_slice() {
            violations.push(InvariantViolation::Sort { node });
        }
    }

    violations
}
