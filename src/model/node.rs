//! Node module for phylogenetic tree representation.

use crate::model::tree::NodeIndex;
use std::ops::Deref;

// =#========================================================================#=
// NODE
// =#========================================================================$=
/// Represents a node (vertex) in a phylogenetic tree.
///
/// Nodes live in the arena of a [PhyloTree](crate::model::PhyloTree) and
/// refer to each other only by [NodeIndex]. Any node may carry a name,
/// a branch length and a support value; whether a node is a leaf, an internal
/// node or the root follows from its links.
///
/// # Invariants
/// - `index` is the position of this node in the arena
/// - `branch_length` is non-negative and finite (enforced by [BranchLength]);
///   `None` means unspecified, which is distinct from zero
/// - `parent` is `None` exactly for the root and for detached arena slots
/// - `children` is ordered; the order carries no meaning for comparisons,
///   but rerooting preserves and relies on it
#[derive(PartialEq, Debug, Clone)]
pub struct Node {
    /// Index of this node in the tree arena
    index: NodeIndex,
    /// Name (taxon name for leaves, optional label for internal nodes)
    name: Option<String>,
    /// Distance to parent node (optional, non-negative if present)
    branch_length: Option<BranchLength>,
    /// Support of the branch above this node, once extracted from the label
    support: Option<f64>,
    /// Index of the parent node
    parent: Option<NodeIndex>,
    /// Indices of the child nodes, in order
    children: Vec<NodeIndex>,
}

impl Node {
    /// Creates a new detached node without children.
    ///
    /// # Arguments
    /// * `index` - The unique index of this node in the tree (arena)
    /// * `name` - Optional name of the node
    /// * `branch_length` - Distance to parent node (non-negative)
    pub fn new(index: NodeIndex, name: Option<String>, branch_length: Option<BranchLength>) -> Self {
        Node {
            index,
            name,
            branch_length,
            support: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Returns the index of this node.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the name of this node, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets (or clears) the name of this node.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Returns the branch length as plain `f64`, if set.
    pub fn length(&self) -> Option<f64> {
        self.branch_length.map(|bl| *bl)
    }

    /// Returns the [BranchLength], if set.
    pub fn branch_length(&self) -> Option<BranchLength> {
        self.branch_length
    }

    /// Returns whether this node has a [BranchLength].
    pub fn has_branch_length(&self) -> bool {
        self.branch_length.is_some()
    }

    /// Sets (or clears) the branch length.
    pub fn set_branch_length(&mut self, branch_length: Option<BranchLength>) {
        self.branch_length = branch_length;
    }

    /// Returns the support value stored on this node.
    ///
    /// This is only populated once [assign_supports](crate::model::label::assign_supports)
    /// has moved it out of the label; use [support](crate::model::label::support)
    /// to also read supports still embedded in the name.
    pub fn assigned_support(&self) -> Option<f64> {
        self.support
    }

    /// Sets (or clears) the support value.
    pub fn set_support(&mut self, support: Option<f64>) {
        self.support = support;
    }

    /// Returns the index of the parent, or `None` for the root and detached nodes.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns `true` if this node has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns the indices of the children, in order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Returns the number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this node has at least one child.
    pub fn is_internal(&self) -> bool {
        !self.children.is_empty()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeIndex>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeIndex> {
        &mut self.children
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================$=
/// Branch length in a phylogenetic tree, enforced non-negative.
///
/// Represents the evolutionary distance between a node and its parent.
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Arguments
    /// * `length` - The branch length value (must be non-negative)
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(length >= 0.0, "Branch length must be non-negative, got {}", length);
        assert!(length.is_finite(), "Branch length must be finite, got {}", length);
        BranchLength(length)
    }

    /// Creates a new branch length, or `None` if `length` is negative or not finite.
    pub fn try_new(length: f64) -> Option<Self> {
        if length >= 0.0 && length.is_finite() {
            Some(BranchLength(length))
        } else {
            None
        }
    }

    /// Adds two optional branch lengths, treating a missing side as zero.
    ///
    /// The result is `None` only if both sides are `None`.
    pub fn add_optional(a: Option<BranchLength>, b: Option<BranchLength>) -> Option<BranchLength> {
        match (a, b) {
            (None, None) => None,
            (a, b) => {
                let sum = a.map_or(0.0, |x| x.0) + b.map_or(0.0, |x| x.0);
                Some(BranchLength(sum))
            }
        }
    }

    /// Returns half of this branch length.
    pub fn halved(self) -> Self {
        BranchLength(self.0 / 2.0)
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl std::fmt::Display for BranchLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
