//! Canonical child order by subtree size.

use crate::model::PhyloTree;
use log::debug;

/// Returns a copy of `tree` with the children of every node sorted by the
/// number of leaves below them.
///
/// With `ascending`, smaller clades come first, otherwise larger ones.
/// The sort is stable: children with equally many leaves keep their order.
///
/// # Example
/// ```
/// use phylgebra::algebra::order_nodes;
/// use phylgebra::parse_newick_str;
///
/// let tree = parse_newick_str("((a,(b,c)),d);").unwrap();
/// assert_eq!(order_nodes(&tree, true).to_string(), "(d,(a,(b,c)));");
/// assert_eq!(order_nodes(&tree, false).to_string(), "(((b,c),a),d);");
/// ```
pub fn order_nodes(tree: &PhyloTree, ascending: bool) -> PhyloTree {
    let mut ordered = tree.compact();
    let counts = ordered.subtree_leaf_counts();

    let internal: Vec<_> = ordered
        .pre_order_iter()
        .filter(|n| n.is_internal())
        .map(|n| n.index())
        .collect();
    for &index in &internal {
        let children = ordered.node_mut(index).children_mut();
        if ascending {
            children.sort_by_key(|&c| counts[c]);
        } else {
            children.sort_by_key(|&c| std::cmp::Reverse(counts[c]));
        }
    }
    debug!("Ordered children of {} nodes", internal.len());

    ordered
}

/// Returns whether the children of every node are sorted by leaf count,
/// non-decreasing with `ascending`, non-increasing otherwise.
///
/// Nodes whose children all have the same number of leaves are ordered
/// both ways.
pub fn is_ordered(tree: &PhyloTree, ascending: bool) -> bool {
    let counts = tree.subtree_leaf_counts();
    tree.pre_order_iter().all(|node| {
        node.children().windows(2).all(|pair| {
            let (first, second) = (counts[pair[0]], counts[pair[1]]);
            if ascending { first <= second } else { first >= second }
        })
    })
}
