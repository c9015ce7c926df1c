use phylgebra::algebra::{compare_labeled_topology, compare_topology, intersect_trees, shear};
use phylgebra::model::PhyloTree;
use phylgebra::{TreeError, parse_newick_str};
use std::collections::HashSet;

fn tree(newick: &str) -> PhyloTree {
    parse_newick_str(newick).unwrap()
}

fn leaf_set(tree: &PhyloTree) -> HashSet<String> {
    tree.leaf_name_set().into_iter().map(str::to_string).collect()
}

// --- SHEARING ---
#[test]
fn test_shear_collapses_unary_nodes() {
    let t = tree("((a:1,b:1)x:1,(c:1,d:1)y:1)r;");
    let sheared = shear(&t, &["a", "b", "c"]).unwrap();
    assert_eq!(sheared.to_string(), "((a:1,b:1)x:1,c:2)r;");
    assert!(sheared.is_valid());
    assert_eq!(sheared.arena_len(), sheared.num_nodes());
}

#[test]
fn test_shear_replaces_unary_root() {
    let t = tree("((a:1,b:2)x:3,(c:1,d:1)y:1)r;");
    let sheared = shear(&t, &["a", "b"]).unwrap();
    assert_eq!(sheared.to_string(), "(a:1,b:2)x:3;");
}

#[test]
fn test_shear_single_leaf() {
    let t = tree("((a,b),(c,d));");
    let sheared = shear(&t, &["c"]).unwrap();
    assert_eq!(sheared.num_nodes(), 1);
    assert_eq!(sheared.root().name(), Some("c"));
}

#[test]
fn test_shear_all_leaves_is_identity() {
    let t = tree("((a:1,b:2)x:3,(c:1,d:1)y:1)r;");
    let sheared = shear(&t, &["d", "c", "b", "a"]).unwrap();
    assert_eq!(sheared.to_string(), t.to_string());
}

#[test]
fn test_shear_unknown_leaf() {
    let t = tree("((a,b)x,(c,d)y);");
    assert!(matches!(shear(&t, &["a", "z"]), Err(TreeError::NotFound(_))));
    // Internal names are not leaves
    assert!(matches!(shear(&t, &["a", "x"]), Err(TreeError::NotFound(_))));
}

// --- INTERSECTING ---
#[test]
fn test_intersect_identical_taxa() {
    let a = tree("((a,b),(c,d));");
    let b = tree("(a,(b,c,d));");
    let (a2, b2) = intersect_trees(&a, &b).unwrap();
    assert_eq!(a2.to_string(), a.to_string());
    assert_eq!(b2.to_string(), b.to_string());
}

#[test]
fn test_intersect_partially_different_taxa() {
    let (a, b) = intersect_trees(&tree("((a,b),(c,d));"), &tree("((a,b),(c,e));")).unwrap();

    let expected: HashSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    assert_eq!(leaf_set(&a), expected);
    assert_eq!(leaf_set(&b), expected);
    assert!(compare_topology(&a, &tree("((a,b),c);")));
    assert!(compare_topology(&b, &tree("((a,b),c);")));
}

#[test]
fn test_intersect_larger_trees() {
    let a = tree("(((a,b)p,(c,d)q)s,((e,f,g)t,h)u)r;");
    let b = tree("(a,((b,x)p,(d,y,(f,g,h)t)q)s)r;");
    let (a2, b2) = intersect_trees(&a, &b).unwrap();

    assert!(compare_labeled_topology(&a2, &tree("(((a,b)p,d)s,((f,g)t,h)u)r;")));
    assert!(compare_labeled_topology(&b2, &tree("(a,(b,(d,(f,g,h)t)q)s)r;")));
}

#[test]
fn test_intersect_no_overlap() {
    let err = intersect_trees(&tree("((a,b),(c,d));"), &tree("((e,f),(g,h));")).unwrap_err();
    assert!(matches!(err, TreeError::NoOverlap));
}

#[test]
fn test_intersect_duplicates() {
    let err = intersect_trees(&tree("((a,b),(c,d));"), &tree("((a,a),(b,c));")).unwrap_err();
    assert!(matches!(err, TreeError::MalformedInput(_)));
}
