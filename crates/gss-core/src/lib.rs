//! gss-core library.
//!
//! A graph-structured stack: keyed nodes with any number of parents, kept
//! in an arena ([`Gss`]) and addressed by [`NodeId`]. Parent and child
//! links are kept in step, siblings are unique by key, and
//! re-adding a known key merges into the existing child.
//!
//! # Modules
//!
//! - [`node`]: [`NodeId`], [`GraphNode`], [`GssNode`].
//! - [`gss`]: the arena, hook/unhook, key lookups and path traversal.
//! - [`view`]: [`NodeRef`] for value equality, hashing and rendering.
//! - [`builder`]: [`create_graph`] from flat `(key, contents, parent_key)` rows.
//! - [`index`]: [`NodeIndex`] key → node lookup.
//! - [`sort`]: recursive sibling ordering.
//! - [`cycles`]: cycle-guarded traversals.
//! - [`invariants`]: link symmetry and sibling-key audit.
//! - [`config`]: TOML-loadable options.
//!
//! # Conventions
//!
//! - **Errors**: lookups return `Option`, invalid mutations are no-ops;
//!   [`GssError`] only where absence is not enough.
//! - **Logging**: `tracing` macros (`debug!` for builder summaries, `trace!`
//!   for link changes). No subscriber is installed here.

pub mod builder;
pub mod config;
pub mod cycles;
pub mod error;
pub mod gss;
pub mod index;
pub mod invariants;
pub mod node;
pub mod sort;
pub mod view;

pub use builder::{GraphEntry, NodeFactory, blank_node, create_graph, create_graph_with};
pub use config::{BuilderConfig, GssConfig, PathConfig, RenderConfig, load_config};
pub use error::{ErrorCode, GssError};
pub use gss::{Gss, subtrees_equal};
pub use index::NodeIndex;
pub use invariants::{LinkViolation, link_violations, links_are_consistent};
pub use node::{GraphNode, GssNode, NodeId};
pub use view::NodeRef;
