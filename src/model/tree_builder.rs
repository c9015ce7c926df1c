//! Trait for constructing phylogenetic trees bottom-up.
//!
//! The [`TreeBuilder`] trait decouples producers of trees from concrete tree
//! representations. The Newick parser calls builder methods as it reads the
//! string and the taxonomy builder calls them while walking a [Taxdump](crate::taxdump::Taxdump),
//! and the builder assembles whatever tree structure it wants.
//!
//! # Built-in implementation
//! * [`PhyloTreeBuilder`] - Builds [`PhyloTree`], the arena tree all
//!   operations in [crate::algebra] work on
//!
//! # Custom implementations
//! You can implement [`TreeBuilder`] to construct your own tree representation,
//! allowing you to reuse the parsing logic without adopting this library's tree model.
//!
//! # Builder lifecycle
//! A builder can construct multiple trees sequentially:
//!
//! ```text
//! Empty ──→ init_next() ──→ Building ──→ add_* ──→ finish_tree() ──→ Empty
//!   ↑                                                                  │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```

use crate::model::node::BranchLength;
use crate::model::tree::{NodeIndex, PhyloTree};

// =#========================================================================#=
// TREE BUILDER (trait)
// =#========================================================================T=
/// Abstraction for constructing trees children-first.
///
/// Producers are generic over this trait, calling its methods as they
/// complete leaves, internal nodes, and roots. This allows the same parser
/// to build different tree representations.
///
/// # Implementing this trait
/// Implementors typically maintain internal state for the tree under construction.
/// The producer drives the lifecycle:
///
/// 1. [`init_next`](Self::init_next) -> prepare for a new tree
/// 2. [`add_leaf`](Self::add_leaf), [`add_internal`](Self::add_internal),
///    [`add_root`](Self::add_root) -> build structure
/// 3. [`finish_tree`](Self::finish_tree) -> finalize and return the tree
///
/// After `finish_tree`, the builder returns to an empty state,
/// ready for `init_next` again.
pub trait TreeBuilder {
    /// The type used to identify nodes during construction.
    ///
    /// Returned by the `add_*` methods, then passed to subsequent calls to
    /// connect parent-child relationships.
    type NodeIdx: Copy;

    /// The tree type produced by this builder.
    type Tree;

    /// Prepares the builder for constructing a new tree.
    ///
    /// Called before each tree. Implementations should reset
    /// internal state and optionally pre-allocate based on `num_nodes`.
    ///
    /// # Arguments
    /// * `num_nodes` — Expected number of nodes (hint for allocation)
    fn init_next(&mut self, num_nodes: usize);

    /// Adds a leaf to the tree under construction.
    ///
    /// # Arguments
    /// * `label` — Raw label, `None` if the leaf is unlabeled
    /// * `branch_len` — Branch length to parent (non-negative), if specified
    fn add_leaf(&mut self, label: Option<String>, branch_len: Option<f64>) -> Self::NodeIdx;

    /// Adds an internal (non-root) node with the given children, in order.
    ///
    /// The children are node indices returned by previous `add_*` calls.
    ///
    /// # Arguments
    /// * `children` — Indices of the child nodes
    /// * `label` — Raw label, possibly a support value or `"support:name"`
    /// * `branch_len` — Branch length to parent (non-negative), if specified
    fn add_internal(
        &mut self,
        children: &[Self::NodeIdx],
        label: Option<String>,
        branch_len: Option<f64>,
    ) -> Self::NodeIdx;

    /// Adds the root, completing the tree structure.
    ///
    /// The root may have no children (single-node tree) or only one.
    /// After this, only [`finish_tree`](Self::finish_tree) remains.
    ///
    /// # Arguments
    /// * `children` — Indices of the root's child nodes
    /// * `label` — Raw label of the root
    /// * `branch_len` — Root branch length (rare, but allowed in Newick)
    fn add_root(
        &mut self,
        children: &[Self::NodeIdx],
        label: Option<String>,
        branch_len: Option<f64>,
    ) -> Self::NodeIdx;

    /// Finalizes the building process and returns the resulting tree.
    ///
    /// Transitions builder from a "construction" state to an "empty" state.
    /// Returns `None` if no tree (or no root) was built.
    fn finish_tree(&mut self) -> Option<Self::Tree>;
}

// =#========================================================================#=
// PHYLO TREE BUILDER
// =#========================================================================#=
/// Builder for [PhyloTree], storing labels verbatim as node names.
///
/// Support values embedded in internal labels are left in the name;
/// see [assign_supports](crate::model::label::assign_supports) to move them.
#[derive(Debug, Default)]
pub struct PhyloTreeBuilder {
    tree: Option<PhyloTree>,
}

impl PhyloTreeBuilder {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> &mut PhyloTree {
        self.tree.get_or_insert_with(PhyloTree::new)
    }

    fn add_node(&mut self, children: &[NodeIndex], label: Option<String>, branch_len: Option<f64>) -> NodeIndex {
        let tree = self.current();
        let index = tree.add_node(label, branch_len.map(BranchLength::new));
        for &child in children {
            tree.add_child(index, child);
        }
        index
    }
}

impl TreeBuilder for PhyloTreeBuilder {
    type NodeIdx = NodeIndex;
    type Tree = PhyloTree;

    fn init_next(&mut self, num_nodes: usize) {
        self.tree = Some(PhyloTree::with_capacity(num_nodes));
    }

    fn add_leaf(&mut self, label: Option<String>, branch_len: Option<f64>) -> NodeIndex {
        self.add_node(&[], label, branch_len)
    }

    fn add_internal(&mut self, children: &[NodeIndex], label: Option<String>, branch_len: Option<f64>) -> NodeIndex {
        self.add_node(children, label, branch_len)
    }

    fn add_root(&mut self, children: &[NodeIndex], label: Option<String>, branch_len: Option<f64>) -> NodeIndex {
        let root = self.add_node(children, label, branch_len);
        self.current().set_root(root);
        root
    }

    fn finish_tree(&mut self) -> Option<PhyloTree> {
        self.tree.take().filter(|tree| tree.is_root_set())
    }
}
