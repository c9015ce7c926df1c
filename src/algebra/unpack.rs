//! Removing nodes while keeping root-to-leaf distances.

use crate::error::{Result, TreeError};
use crate::model::{BranchLength, Node, NodeIndex, PhyloTree};
use log::{debug, trace};

/// Removes the node at `index`, attaching its children to its parent.
///
/// The children take the position the node occupied among its siblings,
/// in their original order. Each child's branch length becomes its own
/// length plus the removed node's length, where a missing length counts
/// as zero (the sum stays missing only if both are missing). Unpacking a
/// leaf simply removes it.
///
/// The removed node stays in the arena as detached slot, so other indices
/// remain valid; use [PhyloTree::compact] to drop it.
///
/// # Errors
/// [TreeError::InvalidOperation] if the node is the root or not attached to
/// the tree. The tree is left untouched in that case.
///
/// # Example
/// ```
/// use phylgebra::algebra::unpack;
/// use phylgebra::parse_newick_str;
///
/// let mut tree = parse_newick_str("((c,d)a,(e,f)b);").unwrap();
/// let b = tree.find("b").unwrap();
/// unpack(&mut tree, b).unwrap();
/// assert_eq!(tree.to_string(), "((c,d)a,e,f);");
/// ```
pub fn unpack(tree: &mut PhyloTree, index: NodeIndex) -> Result<()> {
    if tree.is_root(index) {
        return Err(TreeError::invalid_operation("Cannot unpack root"));
    }
    if !tree.is_attached(index) {
        return Err(TreeError::invalid_operation(format!("Node {index} is not part of the tree")));
    }

    let length = tree[index].branch_length();
    let (parent, position) = tree
        .detach(index)
        .ok_or_else(|| TreeError::invalid_operation(format!("Node {index} has no parent")))?;

    let children = tree.take_children(index);
    for &child in &children {
        let summed = BranchLength::add_optional(tree[child].branch_length(), length);
        tree[child].set_branch_length(summed);
    }
    trace!("Unpacked node {} into parent {} ({} children)", index, parent, children.len());
    tree.splice_children(parent, position, &children);

    Ok(())
}

/// Unpacks every internal, non-root node for which `predicate` holds.
///
/// The predicate sees each candidate exactly once, all before any node is
/// removed. Matches are then unpacked deepest first, so lengths of nested
/// matches add up along the path. Returns the tree, compacted.
///
/// # Example
/// ```
/// use phylgebra::algebra::unpack_by_func;
/// use phylgebra::model::label::support;
/// use phylgebra::parse_newick_str;
///
/// let tree = parse_newick_str("(((a,b)85,(c,d)78)75,(e,(f,g)64)80);").unwrap();
/// let tree = unpack_by_func(tree, |n| support(n).is_some_and(|s| s < 75.0));
/// assert_eq!(tree.to_string(), "(((a,b)85,(c,d)78)75,(e,f,g)80);");
/// ```
pub fn unpack_by_func<F>(mut tree: PhyloTree, predicate: F) -> PhyloTree
where
    F: Fn(&Node) -> bool,
{
    let root = tree.root_index();
    let mut matches: Vec<(usize, NodeIndex)> = tree
        .pre_order_iter()
        .filter(|n| n.is_internal() && n.index() != root)
        .filter(|n| predicate(n))
        .map(|n| (tree.depth(n.index()), n.index()))
        .collect();

    // Deepest first; stable so siblings keep their relative order
    matches.sort_by(|a, b| b.0.cmp(&a.0));

    for &(_, index) in &matches {
        // Matches are non-root and attached; removing deeper ones keeps it so
        let unpacked = unpack(&mut tree, index);
        debug_assert!(unpacked.is_ok(), "unpacking matched node {} failed: {:?}", index, unpacked);
    }
    debug!("Unpacked {} nodes by predicate", matches.len());

    tree.compact()
}
