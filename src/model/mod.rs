//! Data model for rooted phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [PhyloTree], which uses the arena pattern to store
//! [Node]s referenced by [NodeIndex]. Nodes may have any number of children;
//! a root with a single child is allowed (the degenerate "basal" case).
//!
//! Every node may carry a name, a [BranchLength] and a support value.
//! Tree files usually embed supports in the names of internal nodes;
//! the [label] module decodes and extracts them.
//!
//! # Building trees
//! Trees are typically constructed via the [TreeBuilder] trait, which
//! decouples producers (the Newick parser, the taxonomy builder) from
//! concrete tree types. [PhyloTreeBuilder] builds a [PhyloTree].
//!
//! You can implement [TreeBuilder] to construct your own tree representation
//! while reusing the library's parsers.

pub mod label;
pub mod node;
pub mod tree;
pub mod tree_builder;

pub use label::Label;
pub use node::{BranchLength, Node};
pub use tree::{NodeIndex, PhyloTree};
pub use tree_builder::{PhyloTreeBuilder, TreeBuilder};
