//! Equivalence tests between trees.
//!
//! * [compare_topology] - same shape, ignoring everything but structure
//! * [compare_branch_lengths] - same shape and matching branch lengths
//! * [compare_labeled_topology] - same parent relation between named nodes
//! * [exact_compare] - identical trees including child order
//!
//! All comparisons are invariant under permutation of siblings,
//! except [exact_compare].

use crate::error::{Result, TreeError};
use crate::model::label::{decode_label, support, Label};
use crate::model::{Node, NodeIndex, PhyloTree};
use log::trace;
use std::collections::{HashMap, HashSet};

/// Absolute tolerance for comparing branch lengths and support values.
pub const EPSILON: f64 = 1e-6;

/// Returns whether any leaf name occurs more than once.
///
/// # Errors
/// [TreeError::MalformedInput] if a leaf has no name or an empty one.
pub fn has_duplicates(tree: &PhyloTree) -> Result<bool> {
    let mut seen = HashSet::new();
    let mut duplicates = false;
    for leaf in tree.pre_order_iter().filter(|n| n.is_leaf()) {
        match leaf.name() {
            Some(name) if !name.is_empty() => duplicates |= !seen.insert(name),
            _ => {
                return Err(TreeError::malformed_input(format!(
                    "Leaf {} has an empty name",
                    leaf.index()
                )));
            }
        }
    }
    Ok(duplicates)
}

/// Compares two optional values (branch lengths, supports) with tolerance [EPSILON].
///
/// Two missing values are equal, a missing and a present one are not.
pub fn compare_length(x: Option<f64>, y: Option<f64>) -> bool {
    match (x, y) {
        (None, None) => true,
        (Some(x), Some(y)) => (x - y).abs() <= EPSILON,
        _ => false,
    }
}

/// Returns whether two trees have the same shape up to the order of siblings.
///
/// Names, branch lengths and supports are ignored.
///
/// # Example
/// ```
/// use phylgebra::algebra::compare_topology;
/// use phylgebra::parse_newick_str;
///
/// let a = parse_newick_str("((a,b),(c,d,e));").unwrap();
/// let b = parse_newick_str("((x,y,z),(w,v));").unwrap();
/// assert!(compare_topology(&a, &b));
/// ```
pub fn compare_topology(a: &PhyloTree, b: &PhyloTree) -> bool {
    let mut interner = ShapeInterner::default();
    let shapes_a = interner.shapes_of(a);
    let shapes_b = interner.shapes_of(b);
    shapes_a[a.root_index()] == shapes_b[b.root_index()]
}

/// Returns whether two trees have the same shape and branch lengths up to
/// the order of siblings.
///
/// Nodes are matched regardless of names; two trees are equal if some
/// correspondence between their nodes preserves the structure and pairs up
/// equal lengths (with tolerance [EPSILON], roots included).
pub fn compare_branch_lengths(a: &PhyloTree, b: &PhyloTree) -> bool {
    let mut interner = ShapeInterner::default();
    let shapes_a = interner.shapes_of(a);
    let shapes_b = interner.shapes_of(b);
    if shapes_a[a.root_index()] != shapes_b[b.root_index()] {
        return false;
    }

    let mut matcher = LengthMatcher {
        a,
        b,
        shapes_a: &shapes_a,
        shapes_b: &shapes_b,
        memo: HashMap::new(),
    };
    matcher.matches(a.root_index(), b.root_index())
}

/// Returns whether two trees relate their named nodes the same way.
///
/// Builds for each tree the map from node name to parent name and compares
/// them. Meant for trees whose nodes carry unique names, e.g. taxonomy trees
/// named by taxid; unnamed nodes are ignored.
pub fn compare_labeled_topology(a: &PhyloTree, b: &PhyloTree) -> bool {
    a.num_nodes() == b.num_nodes() && parent_map(a) == parent_map(b)
}

/// Returns whether two trees are identical, including the order of children.
///
/// Names must be equal, branch lengths and supports equal within [EPSILON].
/// Internal supports are read via [support], so a support still in the label
/// equals the same support already assigned to the node. Leaf names are
/// compared literally, so numeric taxon names like `1` and `1.0` differ.
pub fn exact_compare(a: &PhyloTree, b: &PhyloTree) -> bool {
    let mut stack = vec![(a.root_index(), b.root_index())];
    while let Some((u, v)) = stack.pop() {
        let (x, y) = (&a[u], &b[v]);
        if x.num_children() != y.num_children() || !compare_length(x.length(), y.length()) {
            return false;
        }
        let same = if x.is_leaf() {
            x.name() == y.name() && compare_length(x.assigned_support(), y.assigned_support())
        } else {
            // Names equal, or equal up to their support prefix
            compare_length(support(x), support(y))
                && (x.name() == y.name() || stripped_name(x) == stripped_name(y))
        };
        if !same {
            return false;
        }
        stack.extend(x.children().iter().copied().zip(y.children().iter().copied()));
    }
    true
}

fn stripped_name(node: &Node) -> Option<String> {
    match node.name().map(decode_label) {
        Some(Label::Name(name)) | Some(Label::Both(_, name)) => Some(name),
        _ => None,
    }
}

fn parent_map(tree: &PhyloTree) -> HashMap<&str, Option<&str>> {
    tree.pre_order_iter()
        .filter_map(|n| {
            let name = n.name()?;
            let parent = n.parent().and_then(|p| tree[p].name());
            Some((name, parent))
        })
        .collect()
}

// =#========================================================================#=
// SHAPES
// =#========================================================================#=
/// Assigns each distinct unordered shape a small integer id.
///
/// All leaves share id `0`; an internal node's id is determined by the
/// sorted ids of its children. Ids are shared between all trees passed
/// to the same interner, so equal ids mean isomorphic subtrees.
#[derive(Default)]
struct ShapeInterner {
    ids: HashMap<Vec<usize>, usize>,
}

impl ShapeInterner {
    const LEAF: usize = 0;

    /// Returns the shape id of each arena slot of `tree` (`LEAF` for detached slots).
    fn shapes_of(&mut self, tree: &PhyloTree) -> Vec<usize> {
        let mut shapes = vec![Self::LEAF; tree.arena_len()];
        for node in tree.post_order_iter() {
            if node.is_leaf() {
                continue;
            }
            let mut signature: Vec<usize> = node.children().iter().map(|&c| shapes[c]).collect();
            signature.sort_unstable();
            let next = self.ids.len() + 1;
            shapes[node.index()] = *self.ids.entry(signature).or_insert(next);
        }
        shapes
    }
}

// =#========================================================================#=
// BRANCH LENGTH MATCHING
// =#========================================================================#=
/// Decides whether two isomorphic subtrees can be matched with equal lengths.
///
/// Children are grouped by shape id; within a group, a perfect bipartite
/// matching of length-equal children is searched with augmenting paths.
struct LengthMatcher<'a> {
    a: &'a PhyloTree,
    b: &'a PhyloTree,
    shapes_a: &'a [usize],
    shapes_b: &'a [usize],
    memo: HashMap<(NodeIndex, NodeIndex), bool>,
}

impl LengthMatcher<'_> {
    /// Requires `u` and `v` to have the same shape id.
    fn matches(&mut self, u: NodeIndex, v: NodeIndex) -> bool {
        if let Some(&known) = self.memo.get(&(u, v)) {
            return known;
        }

        let result = compare_length(self.a[u].length(), self.b[v].length()) && self.children_match(u, v);
        trace!("Length match of {} and {}: {}", u, v, result);
        self.memo.insert((u, v), result);
        result
    }

    fn children_match(&mut self, u: NodeIndex, v: NodeIndex) -> bool {
        let mut groups: HashMap<usize, (Vec<NodeIndex>, Vec<NodeIndex>)> = HashMap::new();
        for &c in self.a[u].children() {
            groups.entry(self.shapes_a[c]).or_default().0.push(c);
        }
        for &d in self.b[v].children() {
            groups.entry(self.shapes_b[d]).or_default().1.push(d);
        }

        groups
            .into_values()
            .all(|(left, right)| left.len() == right.len() && self.perfect_matching(&left, &right))
    }

    /// Kuhn's algorithm on the graph of length-equal pairs.
    fn perfect_matching(&mut self, left: &[NodeIndex], right: &[NodeIndex]) -> bool {
        let mut edges: Vec<Vec<usize>> = Vec::with_capacity(left.len());
        for &c in left {
            let adjacent = (0..right.len()).filter(|&j| self.matches(c, right[j])).collect();
            edges.push(adjacent);
        }

        let mut matched_to: Vec<Option<usize>> = vec![None; right.len()];
        (0..left.len()).all(|i| {
            let mut visited = vec![false; right.len()];
            augment(i, &edges, &mut visited, &mut matched_to)
        })
    }
}

fn augment(i: usize, edges: &[Vec<usize>], visited: &mut [bool], matched_to: &mut [Option<usize>]) -> bool {
    for &j in &edges[i] {
        if visited[j] {
            continue;
        }
        visited[j] = true;
        let free = match matched_to[j] {
            None => true,
            Some(k) => augment(k, edges, visited, matched_to),
        };
        if free {
            matched_to[j] = Some(i);
            return true;
        }
    }
    false
}
