//! Rerooting by walking edges.
//!
//! All rerooting builds on [walk_copy], which copies a tree as seen from one
//! node looking away from one of its neighbors. Walking reverses the direction
//! of the edges it passes, so branch lengths and supports have to move with
//! the edges they describe:
//!
//! | Move   | From                                   | Length             | Support    |
//! |--------|----------------------------------------|--------------------|------------|
//! | down   | parent into child                      | own                | own        |
//! | up     | child into parent                      | neighbor's         | neighbor's |
//! | top    | child into a basal node (rooted tree)  | neighbor's         | neighbor's |
//! | bottom | basal node into its sibling            | neighbor's + own   | own        |
//!
//! A tree counts as rooted if its root has exactly two children; the two
//! root edges then form one edge of the unrooted tree, and the root itself
//! is never copied.

use crate::algebra::compare::has_duplicates;
use crate::error::{Result, TreeError};
use crate::model::{BranchLength, NodeIndex, PhyloTree};
use log::{debug, trace};
use std::collections::HashSet;

/// Direction of a step of [walk_copy], see the module documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Down,
    Up,
    Top,
    Bottom,
}

/// Returns a copy of `tree` rooted at `source`, walking away from `neighbor`.
///
/// The copy of `source` keeps its name and gets as children its original
/// children except `neighbor`, followed by its parent (if walking up) or its
/// sibling (if walking between the two children of a rooted root). The
/// result is a new, detached tree.
///
/// # Errors
/// [TreeError::InvalidOperation] if
/// * `source` is the root of a rooted tree,
/// * `source` and `neighbor` are not adjacent, or
/// * either node is not part of the tree.
pub fn walk_copy(tree: &PhyloTree, source: NodeIndex, neighbor: NodeIndex) -> Result<PhyloTree> {
    check_attached(tree, source)?;
    check_attached(tree, neighbor)?;

    let mut target = PhyloTree::with_capacity(tree.num_nodes());
    let top = copy_walking(tree, source, neighbor, &mut target)?;
    target.set_root(top);
    Ok(target)
}

/// Returns a copy of `tree` rooted on the branch above `node`.
///
/// The new root gets two children: `node` (walking down) and its parent
/// (walking up), each with half of the length of `node`. If `node` is a
/// child of the root of a rooted tree, the two root edges are fused into one
/// and the new root sits in its middle, between `node` and its sibling.
///
/// The new root is named `root_name` and has no support.
///
/// # Errors
/// [TreeError::InvalidOperation] if `node` is the root or not part of the tree.
///
/// # Example
/// ```
/// use phylgebra::algebra::root_above;
/// use phylgebra::parse_newick_str;
///
/// let tree = parse_newick_str("((a:1,b:1)c:1,(d:1,e:1)f:1);").unwrap();
/// let a = tree.find("a").unwrap();
/// let rerooted = root_above(&tree, a, Some("root")).unwrap();
/// assert_eq!(rerooted.to_string(), "(a:0.5,(b:1,(d:1,e:1)f:2)c:0.5)root;");
/// ```
pub fn root_above(tree: &PhyloTree, node: NodeIndex, root_name: Option<&str>) -> Result<PhyloTree> {
    check_attached(tree, node)?;
    let parent = tree[node]
        .parent()
        .ok_or_else(|| TreeError::invalid_operation("Cannot root above the root"))?;

    // A basal node of a rooted tree has its sibling as other neighbor
    let (other, length) = if tree.is_root(parent) && tree.is_bifurcating_root() {
        let sibling = sibling_of(tree, node, parent);
        let fused = BranchLength::add_optional(tree[node].branch_length(), tree[sibling].branch_length());
        (sibling, fused)
    } else {
        (parent, tree[node].branch_length())
    };
    let half = length.map(BranchLength::halved);
    debug!("Rooting above node {} (other side: {})", node, other);

    let mut target = PhyloTree::with_capacity(tree.num_nodes() + 1);
    let left = copy_walking(tree, node, other, &mut target)?;
    let right = copy_walking(tree, other, node, &mut target)?;
    target[left].set_branch_length(half);
    target[right].set_branch_length(half);

    let root = target.add_node(root_name.map(str::to_string), None);
    target.add_child(root, left);
    target.add_child(root, right);
    target.set_root(root);

    Ok(target.compact())
}

/// Returns a copy of `tree` rerooted such that `outgroup` is separated from
/// the other leaves.
///
/// Roots above the lowest common ancestor of the outgroup. If that is the
/// root itself, the tree is first rooted above the first other leaf (in
/// pre-order), and then above the lowest common ancestor of the outgroup in
/// that tree. The outgroup needs not be monophyletic; use
/// [root_by_outgroup_strict] to reject such outgroups.
///
/// # Errors
/// [TreeError::MalformedInput] if
/// * `outgroup` is empty or not a subset of the leaf names,
/// * the tree has duplicate or empty leaf names, or
/// * `outgroup` contains every leaf.
///
/// # Example
/// ```
/// use phylgebra::algebra::root_by_outgroup;
/// use phylgebra::parse_newick_str;
///
/// let tree = parse_newick_str("(((a:1,b:1)c:2,(d:1,e:1)f:1)g:1,(h:1,i:1)j:1)k;").unwrap();
/// let rerooted = root_by_outgroup(&tree, &["a", "b"]).unwrap();
/// assert_eq!(rerooted.to_string(), "((a:1,b:1)c:1,((d:1,e:1)f:1,(h:1,i:1)j:2)g:1);");
/// ```
pub fn root_by_outgroup<S: AsRef<str>>(tree: &PhyloTree, outgroup: &[S]) -> Result<PhyloTree> {
    let (rerooted, _) = reroot_outgroup(tree, outgroup)?;
    Ok(rerooted)
}

/// Like [root_by_outgroup], but returns `None` if the outgroup does not form
/// a clade of the rerooted tree.
pub fn root_by_outgroup_strict<S: AsRef<str>>(tree: &PhyloTree, outgroup: &[S]) -> Result<Option<PhyloTree>> {
    let (rerooted, monophyletic) = reroot_outgroup(tree, outgroup)?;
    Ok(monophyletic.then_some(rerooted))
}

/// Reroots on the outgroup, also reporting whether it is monophyletic.
fn reroot_outgroup<S: AsRef<str>>(tree: &PhyloTree, outgroup: &[S]) -> Result<(PhyloTree, bool)> {
    let outgroup: HashSet<&str> = outgroup.iter().map(AsRef::as_ref).collect();
    if outgroup.is_empty() {
        return Err(TreeError::malformed_input("Outgroup is empty"));
    }
    if has_duplicates(tree)? {
        return Err(TreeError::malformed_input("Tree has duplicate taxa"));
    }
    let tips = tree.leaf_name_set();
    if !outgroup.is_subset(&tips) {
        return Err(TreeError::malformed_input("Outgroup is not a subset of tree tips"));
    }
    if outgroup.len() == tips.len() {
        return Err(TreeError::malformed_input("Outgroup constitutes the entire tree"));
    }

    let outgroup_lca = |tree: &PhyloTree| -> Result<NodeIndex> {
        let members = outgroup_leaves(tree, &outgroup);
        tree.lca(&members)
            .ok_or_else(|| TreeError::invalid_operation("Outgroup has no common ancestor"))
    };

    let lca = outgroup_lca(tree)?;
    let (base, lca) = if tree.is_root(lca) {
        // Detour over an ingroup leaf so that the outgroup forms a subtree
        let ingroup = tree
            .leaves()
            .into_iter()
            .find(|&leaf| tree[leaf].name().is_some_and(|name| !outgroup.contains(name)))
            .ok_or_else(|| TreeError::malformed_input("Outgroup constitutes the entire tree"))?;
        debug!("Outgroup spans the root; rooting above ingroup leaf {} first", ingroup);
        let detour = root_above(tree, ingroup, None)?;
        let lca = outgroup_lca(&detour)?;
        (detour, lca)
    } else {
        (tree.clone(), lca)
    };

    let monophyletic = base.leaves_under(lca).len() == outgroup.len();
    debug!("Rooting above outgroup (monophyletic: {})", monophyletic);
    let rerooted = root_above(&base, lca, None)?;
    Ok((rerooted, monophyletic))
}

fn outgroup_leaves(tree: &PhyloTree, outgroup: &HashSet<&str>) -> Vec<NodeIndex> {
    tree.leaves()
        .into_iter()
        .filter(|&leaf| tree[leaf].name().is_some_and(|name| outgroup.contains(name)))
        .collect()
}

// ============================================================================
// Walking (private)
// ============================================================================
/// Copies `tree` as seen from `source` away from `neighbor` into `target`,
/// returning the (detached) copy of `source`.
fn copy_walking(
    tree: &PhyloTree,
    source: NodeIndex,
    neighbor: NodeIndex,
    target: &mut PhyloTree,
) -> Result<NodeIndex> {
    let mut top = None;
    // (node, walked from, copy of parent)
    let mut stack: Vec<(NodeIndex, NodeIndex, Option<NodeIndex>)> = vec![(source, neighbor, None)];

    while let Some((node, from, parent_copy)) = stack.pop() {
        let (step, sibling) = classify(tree, node, from)?;
        trace!("Walking {:?} from {} into {}", step, from, node);

        let original = &tree[node];
        let (length, support) = match step {
            Move::Down => (original.branch_length(), original.assigned_support()),
            Move::Bottom => (
                BranchLength::add_optional(tree[from].branch_length(), original.branch_length()),
                original.assigned_support(),
            ),
            Move::Up | Move::Top => (tree[from].branch_length(), tree[from].assigned_support()),
        };
        let copy = target.add_node(original.name().map(str::to_string), length);
        target[copy].set_support(support);
        match parent_copy {
            Some(parent) => target.add_child(parent, copy),
            None => top = Some(copy),
        }

        let mut next: Vec<NodeIndex> = original.children().iter().copied().filter(|&c| c != from).collect();
        if step == Move::Up
            && let Some(parent) = original.parent()
        {
            next.push(parent);
        }
        if step == Move::Top
            && let Some(sibling) = sibling
        {
            next.push(sibling);
        }
        stack.extend(next.into_iter().rev().map(|n| (n, node, Some(copy))));
    }

    top.ok_or_else(|| TreeError::invalid_operation("Nothing to walk"))
}

/// Determines how `node` is entered when coming from `from`.
///
/// Also returns the sibling of `node` if it is a basal node of a rooted tree.
fn classify(tree: &PhyloTree, node: NodeIndex, from: NodeIndex) -> Result<(Move, Option<NodeIndex>)> {
    let parent = tree[node].parent();
    let rooted = tree.is_bifurcating_root();
    let is_child = tree[node].children().contains(&from);

    if rooted && tree.is_root(node) {
        return Err(TreeError::invalid_operation("Cannot walk from root of a rooted tree"));
    }

    if rooted && let Some(root) = parent.filter(|&p| tree.is_root(p)) {
        let sibling = sibling_of(tree, node, root);
        return if from == sibling {
            Ok((Move::Bottom, Some(sibling)))
        } else if is_child {
            Ok((Move::Top, Some(sibling)))
        } else {
            Err(not_neighbors(node, from))
        };
    }

    if parent == Some(from) {
        Ok((Move::Down, None))
    } else if is_child {
        Ok((Move::Up, None))
    } else {
        Err(not_neighbors(node, from))
    }
}

/// Returns the other child of a root with two children.
fn sibling_of(tree: &PhyloTree, node: NodeIndex, root: NodeIndex) -> NodeIndex {
    tree[root]
        .children()
        .iter()
        .copied()
        .find(|&c| c != node)
        .unwrap_or(node)
}

fn not_neighbors(node: NodeIndex, from: NodeIndex) -> TreeError {
    TreeError::invalid_operation(format!("Nodes {} and {} are not neighbors", from, node))
}

fn check_attached(tree: &PhyloTree, index: NodeIndex) -> Result<()> {
    if tree.is_attached(index) {
        Ok(())
    } else {
        Err(TreeError::invalid_operation(format!("Node {index} is not part of the tree")))
    }
}
