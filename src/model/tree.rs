//! Provides the arena tree representation.
//!
//! Provides core data structures for representing phylogenetic trees:
//! * [PhyloTree] - Main tree structure using the arena pattern
//! * [NodeIndex] as type used to index nodes in tree
//! * [PreOrderIter], [PostOrderIter] and [AncestorIter] for traversal

use crate::model::node::{BranchLength, Node};
use crate::newick::{self, NewickStyle};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: NodeIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree with any number of children per node,
/// represented using the arena pattern on [Node].
///
/// Nodes are stored in a contiguous vector and referenced by [NodeIndex].
/// Parents are non-owning indices, so there are no reference cycles and a
/// tree can be cloned or moved freely.
///
/// # Structure
/// - All nodes (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained.
/// - No assumption on order of indices is maintained.
/// - Operations that remove nodes in place (e.g. [unpack](crate::algebra::unpack))
///   leave the removed node as a detached slot, so that indices held by the
///   caller stay valid. Traversals always start from the root and never see
///   detached slots; [compact](Self::compact) drops them.
///
/// # Construction
/// Add nodes with [add_node](Self::add_node), link them with
/// [add_child](Self::add_child) and mark the root with
/// [set_root](Self::set_root). Trees are usually obtained from a Newick string
/// (see [crate::newick]) or a taxonomy (see [crate::taxdump]) instead.
/// Test validity with [`PhyloTree::is_valid()`].
///
/// # Example
/// ```
/// use phylgebra::model::{BranchLength, PhyloTree};
///
/// let mut tree = PhyloTree::new();
/// let root = tree.add_node(None, None);
/// let a = tree.add_node(Some("A".to_string()), Some(BranchLength::new(1.0)));
/// let b = tree.add_node(Some("B".to_string()), Some(BranchLength::new(2.0)));
/// tree.add_child(root, a);
/// tree.add_child(root, b);
/// tree.set_root(root);
///
/// assert!(tree.is_valid());
/// assert_eq!(tree.to_string(), "(A:1,B:2);");
/// ```
#[derive(Debug, Clone)]
pub struct PhyloTree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,

    /// Index of the root of this tree
    root_index: NodeIndex,

    /// Name of tree; optional
    name: Option<String>,
}

// ============================================================================
// New, Getters / Accessors, Construction (pub)
// ============================================================================
impl PhyloTree {
    /// Creates a new empty tree; the root has to be set during construction.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty tree with capacity for `num_nodes` nodes.
    pub fn with_capacity(num_nodes: usize) -> Self {
        PhyloTree {
            nodes: Vec::with_capacity(num_nodes),
            root_index: NO_ROOT_SET_INDEX,
            name: None,
        }
    }

    /// Attaches a name to this tree.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set a name for this tree.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Adds a detached node to the arena, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `name` - Optional name of the node
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    pub fn add_node(&mut self, name: Option<String>, branch_length: Option<BranchLength>) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(Node::new(index, name, branch_length));
        index
    }

    /// Appends `child` as last child of `parent`.
    ///
    /// # Panics
    /// Panics if `child` already has a parent or is the root.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        assert!(!self[child].has_parent(), "Node {child} is already attached to a parent");
        assert!(child != self.root_index, "Cannot attach the root as child");
        self[parent].children_mut().push(child);
        self[child].set_parent(Some(parent));
    }

    /// Marks the node at `index` as root of this tree.
    ///
    /// # Panics
    /// Panics if the node has a parent.
    pub fn set_root(&mut self, index: NodeIndex) {
        assert!(!self[index].has_parent(), "Root must not have a parent");
        self.root_index = index;
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root node.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Node {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> NodeIndex {
        self.root_index
    }

    /// Returns `true` if the node at `index` is the root.
    pub fn is_root(&self, index: NodeIndex) -> bool {
        index == self.root_index
    }

    /// Returns `true` if the root has exactly two children.
    pub fn is_bifurcating_root(&self) -> bool {
        self.root().num_children() == 2
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self[index]
    }

    /// Returns a mutable reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index]
    }

    /// Returns whether the node at `index` is reachable from the root.
    pub fn is_attached(&self, index: NodeIndex) -> bool {
        if index >= self.nodes.len() || !self.is_root_set() {
            return false;
        }
        let top = self.ancestors(index).last().unwrap_or(index);
        top == self.root_index
    }

    /// Returns the number of nodes reachable from the root.
    pub fn num_nodes(&self) -> usize {
        self.pre_order_iter().count()
    }

    /// Returns the number of slots in the arena, including detached ones.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.pre_order_iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the number of internal (non-leaf, non-root) nodes in this tree.
    pub fn num_internal(&self) -> usize {
        self.pre_order_iter()
            .filter(|n| n.is_internal() && n.index() != self.root_index)
            .count()
    }

    /// Returns the indices of all leaves, in pre-order.
    pub fn leaves(&self) -> Vec<NodeIndex> {
        self.leaves_under(self.root_index)
    }

    /// Returns the indices of all leaves in the subtree of `index`, in pre-order.
    pub fn leaves_under(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.pre_order_from(index)
            .filter(|n| n.is_leaf())
            .map(|n| n.index())
            .collect()
    }

    /// Returns the (non-empty) leaf names in the subtree of `index`.
    pub fn leaf_names_under(&self, index: NodeIndex) -> HashSet<&str> {
        self.pre_order_from(index)
            .filter(|n| n.is_leaf())
            .filter_map(|n| n.name())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Returns the set of (non-empty) leaf names of this tree.
    pub fn leaf_name_set(&self) -> HashSet<&str> {
        self.pre_order_iter()
            .filter(|n| n.is_leaf())
            .filter_map(|n| n.name())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Returns the first node (in pre-order) with the given name.
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.pre_order_iter()
            .find(|n| n.name() == Some(name))
            .map(|n| n.index())
    }

    /// Returns the first leaf (in pre-order) with the given name.
    pub fn find_leaf(&self, name: &str) -> Option<NodeIndex> {
        self.pre_order_iter()
            .find(|n| n.is_leaf() && n.name() == Some(name))
            .map(|n| n.index())
    }

    /// Returns the number of edges between the node at `index` and the top of its tree.
    pub fn depth(&self, index: NodeIndex) -> usize {
        self.ancestors(index).count()
    }

    /// Returns the lowest common ancestor of the given nodes,
    /// or `None` if `nodes` is empty or they share no ancestor.
    ///
    /// The lowest common ancestor of a single node is the node itself.
    pub fn lca(&self, nodes: &[NodeIndex]) -> Option<NodeIndex> {
        let (&first, rest) = nodes.split_first()?;

        // Path from first node up to the top, with position of each node on it
        let path: Vec<NodeIndex> = std::iter::once(first).chain(self.ancestors(first)).collect();
        let position: HashMap<NodeIndex, usize> = path.iter().enumerate().map(|(i, &n)| (n, i)).collect();

        let mut lowest = 0;
        for &node in rest {
            let hit = std::iter::once(node)
                .chain(self.ancestors(node))
                .find_map(|n| position.get(&n).copied())?;
            lowest = lowest.max(hit);
        }

        Some(path[lowest])
    }

    /// Returns for each arena slot the number of leaves in its subtree
    /// (`0` for detached slots).
    pub fn subtree_leaf_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.nodes.len()];
        for node in self.post_order_iter() {
            counts[node.index()] = if node.is_leaf() {
                1
            } else {
                node.children().iter().map(|&c| counts[c]).sum()
            };
        }
        counts
    }

    /// Returns the sum of all branch lengths reachable from the root
    /// (missing lengths count as zero).
    pub fn total_branch_length(&self) -> f64 {
        self.pre_order_iter().filter_map(|n| n.length()).sum()
    }

    /// Returns the distance from the node at `index` to the root,
    /// summing branch lengths along the path (missing lengths count as zero).
    pub fn distance_to_root(&self, index: NodeIndex) -> f64 {
        std::iter::once(index)
            .chain(self.ancestors(index))
            .filter(|&n| n != self.root_index)
            .filter_map(|n| self[n].length())
            .sum()
    }

    /// Returns a copy of the subtree rooted at `index` as a new tree.
    ///
    /// The new root keeps its name, branch length and support.
    /// Nodes are laid out in pre-order, so the new root has index `0`.
    pub fn subtree(&self, index: NodeIndex) -> PhyloTree {
        let mut target = PhyloTree::with_capacity(self.nodes.len());
        let new_root = self.copy_subtree_into(index, &mut target);
        target.set_root(new_root);
        target
    }

    /// Returns a copy of this tree without detached arena slots.
    pub fn compact(&self) -> PhyloTree {
        let mut tree = self.subtree(self.root_index);
        tree.name = self.name.clone();
        tree
    }

    /// Returns the Newick representation of this tree in the given style.
    pub fn to_newick(&self, style: NewickStyle) -> String {
        newick::to_newick(self, style)
    }
}

impl Default for PhyloTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<NodeIndex> for PhyloTree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

impl std::ops::IndexMut<NodeIndex> for PhyloTree {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index]
    }
}

impl fmt::Display for PhyloTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_newick(NewickStyle::Full))
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl PhyloTree {
    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is set, within bounds and has no parent
    /// - All node indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - No node is reachable twice (no cycles, no shared children)
    /// - All branch lengths are non-negative (guaranteed by [BranchLength])
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if !self.is_root_set() || self.root_index >= self.nodes.len() {
            return false;
        }

        if self.root().has_parent() {
            return false;
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.root_index];
        while let Some(index) = stack.pop() {
            if seen[index] {
                return false;
            }
            seen[index] = true;

            let node = &self.nodes[index];
            if node.index() != index {
                return false;
            }

            for &child in node.children() {
                if child >= self.nodes.len() || self.nodes[child].parent() != Some(index) {
                    return false;
                }
                stack.push(child);
            }
        }

        true
    }
}

// ============================================================================
// Structural editing (crate)
// ============================================================================
impl PhyloTree {
    /// Removes the node at `index` from the child list of its parent.
    ///
    /// # Returns
    /// The former parent and the position the node occupied there,
    /// or `None` if the node had no parent.
    pub(crate) fn detach(&mut self, index: NodeIndex) -> Option<(NodeIndex, usize)> {
        let parent = self[index].parent()?;
        let position = self[parent].children().iter().position(|&c| c == index)?;
        self[parent].children_mut().remove(position);
        self[index].set_parent(None);
        Some((parent, position))
    }

    /// Inserts `children` into the child list of `parent` starting at `position`.
    ///
    /// The children must be detached.
    pub(crate) fn splice_children(&mut self, parent: NodeIndex, position: usize, children: &[NodeIndex]) {
        for &child in children {
            self[child].set_parent(Some(parent));
        }
        self[parent]
            .children_mut()
            .splice(position..position, children.iter().copied());
    }

    /// Takes all children of the node at `index`, detaching them.
    pub(crate) fn take_children(&mut self, index: NodeIndex) -> Vec<NodeIndex> {
        let children = std::mem::take(self[index].children_mut());
        for &child in &children {
            self[child].set_parent(None);
        }
        children
    }

    /// Replaces the root by the detached node at `index`.
    pub(crate) fn replace_root(&mut self, index: NodeIndex) {
        self[index].set_parent(None);
        self.root_index = index;
    }

    /// Copies the subtree rooted at `index` into `target` (without attaching it),
    /// returning the index of the copy there.
    pub(crate) fn copy_subtree_into(&self, index: NodeIndex, target: &mut PhyloTree) -> NodeIndex {
        let top = target.copy_node_from(&self[index]);

        // (original, copy of its parent)
        let mut stack: Vec<(NodeIndex, NodeIndex)> =
            self[index].children().iter().rev().map(|&c| (c, top)).collect();
        while let Some((original, parent_copy)) = stack.pop() {
            let copy = target.copy_node_from(&self[original]);
            target.add_child(parent_copy, copy);
            stack.extend(self[original].children().iter().rev().map(|&c| (c, copy)));
        }

        top
    }

    /// Adds a detached copy of `node` (name, branch length and support, no links).
    pub(crate) fn copy_node_from(&mut self, node: &Node) -> NodeIndex {
        let index = self.add_node(node.name().map(str::to_string), node.branch_length());
        self[index].set_support(node.assigned_support());
        index
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl PhyloTree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Post-order traversal visits each node's children before visiting the node itself.
    /// This is useful for computing subtree sizes, aggregating data from leaves upward, etc.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self, self.root_index)
    }

    /// Returns a post-order iterator over the subtree rooted at `index`.
    pub fn post_order_from(&self, index: NodeIndex) -> PostOrderIter<'_> {
        PostOrderIter::new(self, index)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Pre-order traversal visits each node before visiting its children,
    /// children in their stored order.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self, self.root_index)
    }

    /// Returns a pre-order iterator over the subtree rooted at `index`.
    pub fn pre_order_from(&self, index: NodeIndex) -> PreOrderIter<'_> {
        PreOrderIter::new(self, index)
    }

    /// Returns an iterator over the ancestors of `index`
    /// (parent first, excluding the node itself).
    pub fn ancestors(&self, index: NodeIndex) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            current: self[index].parent(),
        }
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a PhyloTree, start: NodeIndex) -> Self {
        let mut stack = Vec::new();
        if start < tree.nodes.len() {
            stack.push((start, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree[index];

            if children_visited || node.is_leaf() {
                return Some(node);
            }

            self.stack.push((index, true));
            // Push children in reverse, so first child is processed first
            for &child in node.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<NodeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a PhyloTree, start: NodeIndex) -> Self {
        let mut stack = Vec::new();
        if start < tree.nodes.len() {
            stack.push(start);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree[index];
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Iterator over the ancestors of a node, walking up towards the root.
pub struct AncestorIter<'a> {
    tree: &'a PhyloTree,
    current: Option<NodeIndex>,
}

impl Iterator for AncestorIter<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current?;
        self.current = self.tree[index].parent();
        Some(index)
    }
}
