//! Restricting trees to a set of leaves.

use crate::algebra::compare::has_duplicates;
use crate::algebra::unpack::unpack;
use crate::error::{Result, TreeError};
use crate::model::{NodeIndex, PhyloTree};
use log::debug;
use std::collections::HashSet;

/// Returns the subtree induced by the leaves named in `names`.
///
/// Keeps the named leaves and their ancestors, removes every other node,
/// and then unpacks each remaining non-root node with a single child
/// (its length is added to the child's). If the root is left with a single
/// child, that child becomes the new root.
///
/// # Errors
/// [TreeError::NotFound] if a name does not belong to a leaf of `tree`.
///
/// # Example
/// ```
/// use phylgebra::algebra::shear;
/// use phylgebra::parse_newick_str;
///
/// let tree = parse_newick_str("((a:1,b:1):1,(c:1,d:1):1);").unwrap();
/// let sheared = shear(&tree, &["a", "b", "c"]).unwrap();
/// assert_eq!(sheared.to_string(), "((a:1,b:1):1,c:2);");
/// ```
pub fn shear<S: AsRef<str>>(tree: &PhyloTree, names: &[S]) -> Result<PhyloTree> {
    let wanted: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();
    let leaf_names = tree.leaf_name_set();
    if let Some(missing) = wanted.iter().find(|name| !leaf_names.contains(*name)) {
        return Err(TreeError::not_found(format!("Leaf '{}' is not in the tree", missing)));
    }

    // Kept leaves and all their ancestors
    let mut keep = vec![false; tree.arena_len()];
    for leaf in tree.leaves() {
        if tree[leaf].name().is_some_and(|name| wanted.contains(name)) {
            keep[leaf] = true;
            for ancestor in tree.ancestors(leaf) {
                if keep[ancestor] {
                    break;
                }
                keep[ancestor] = true;
            }
        }
    }

    let mut sheared = copy_kept(tree, &keep);

    let unary: Vec<NodeIndex> = sheared
        .pre_order_iter()
        .filter(|n| n.num_children() == 1 && n.index() != sheared.root_index())
        .map(|n| n.index())
        .collect();
    for &index in &unary {
        unpack(&mut sheared, index)?;
    }

    while sheared.root().num_children() == 1 {
        let child = sheared.root().children()[0];
        sheared.detach(child);
        sheared.replace_root(child);
    }

    debug!(
        "Sheared tree to {} of {} leaves, collapsing {} unary nodes",
        wanted.len(),
        leaf_names.len(),
        unary.len()
    );
    Ok(sheared.compact())
}

/// Restricts two trees to the leaves they have in common.
///
/// # Errors
/// * [TreeError::MalformedInput] if either tree has duplicate or empty leaf names
/// * [TreeError::NoOverlap] if the trees share no leaf
///
/// # Example
/// ```
/// use phylgebra::algebra::intersect_trees;
/// use phylgebra::parse_newick_str;
///
/// let a = parse_newick_str("((a,b),(c,d));").unwrap();
/// let b = parse_newick_str("((a,b),(c,e));").unwrap();
/// let (a, b) = intersect_trees(&a, &b).unwrap();
/// assert_eq!(a.to_string(), "((a,b),c);");
/// assert_eq!(b.to_string(), "((a,b),c);");
/// ```
pub fn intersect_trees(a: &PhyloTree, b: &PhyloTree) -> Result<(PhyloTree, PhyloTree)> {
    if has_duplicates(a)? {
        return Err(TreeError::malformed_input("First tree has duplicate taxa"));
    }
    if has_duplicates(b)? {
        return Err(TreeError::malformed_input("Second tree has duplicate taxa"));
    }

    let names_b = b.leaf_name_set();
    let mut shared: Vec<&str> = a
        .leaf_name_set()
        .into_iter()
        .filter(|name| names_b.contains(name))
        .collect();
    if shared.is_empty() {
        return Err(TreeError::NoOverlap);
    }
    shared.sort_unstable();
    debug!("Trees share {} taxa", shared.len());

    Ok((shear(a, &shared)?, shear(b, &shared)?))
}

/// Copies the nodes marked in `keep`, starting from the root.
fn copy_kept(tree: &PhyloTree, keep: &[bool]) -> PhyloTree {
    let mut target = PhyloTree::with_capacity(tree.arena_len());
    let root = target.copy_node_from(tree.root());
    target.set_root(root);

    let mut stack: Vec<(NodeIndex, NodeIndex)> = tree
        .root()
        .children()
        .iter()
        .rev()
        .filter(|&&c| keep[c])
        .map(|&c| (c, root))
        .collect();
    while let Some((original, parent_copy)) = stack.pop() {
        let copy = target.copy_node_from(&tree[original]);
        target.add_child(parent_copy, copy);
        stack.extend(
            tree[original]
                .children()
                .iter()
                .rev()
                .filter(|&&c| keep[c])
                .map(|&c| (c, copy)),
        );
    }

    target.set_name(tree.name().map(str::to_string));
    target
}
