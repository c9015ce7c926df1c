//! Phylgebra is a library for structural operations on rooted phylogenetic trees.
//!
//! Trees come from Newick strings, from an NCBI taxonomy dump, or are built by
//! hand; every node may carry a name, a branch length and a support value.
//! Core functionality provided:
//! - Labels: decode compound labels like `"95:Bacteria"` into support and name,
//!   see [model::label].
//! - Unpacking: remove nodes (e.g. poorly supported ones) while keeping
//!   root-to-leaf distances, see [unpack](algebra::unpack()) and
//!   [unpack_by_func](algebra::unpack_by_func).
//! - Comparison: topology and branch lengths up to the order of siblings,
//!   see [algebra::compare].
//! - Pruning: restrict trees to a leaf set or to their shared leaves,
//!   see [algebra::prune].
//! - Rerooting: walk the tree from any node, root above a node or by
//!   outgroup, see [algebra::reroot].
//! - Ordering and clades: sort children by clade size, classify a set of
//!   taxa as uni-, mono- or polyphyletic.
//! - Taxonomy: build trees from NCBI `nodes.dmp` / `names.dmp`, see [taxdump].
//!
//! Trees are stored with the arena pattern ([PhyloTree]), so no node
//! references are held, only node indices.
//!
//! # Usage patterns
//! Parse a tree, reroot it and compare:
//! ```
//! use phylgebra::algebra::{compare_branch_lengths, root_above};
//! use phylgebra::parse_newick_str;
//!
//! let tree = parse_newick_str("((a:1,b:1)c:1,(d:1,e:1)f:1);").unwrap();
//! let a = tree.find("a").unwrap();
//! let rerooted = root_above(&tree, a, None).unwrap();
//!
//! let f = rerooted.find("f").unwrap();
//! let back = root_above(&rerooted, f, None).unwrap();
//! assert!(compare_branch_lengths(&tree, &back));
//! ```
//!
//! # Logging
//! Operations report summaries at `debug` and per-node detail at `trace`
//! level through the [log] facade; install any logger to see them.

pub mod algebra;
pub mod error;
pub mod model;
pub mod newick;
pub mod parser;
pub mod taxdump;

pub use algebra::EPSILON;
pub use error::{Result, TreeError};
pub use model::{BranchLength, Node, NodeIndex, PhyloTree};
pub use newick::{parse_newick_file, parse_newick_str};
pub use parser::ParsingError;
