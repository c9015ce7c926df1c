use phylgebra::algebra::{compare_topology, is_ordered, order_nodes};
use phylgebra::model::PhyloTree;
use phylgebra::parse_newick_str;

fn tree(newick: &str) -> PhyloTree {
    parse_newick_str(newick).unwrap()
}

#[test]
fn test_order_nodes() {
    let t = tree("(((a,b),(c,d,i)j),((e,g),h));");

    let increasing = order_nodes(&t, true);
    assert!(is_ordered(&increasing, true));
    assert_eq!(increasing.to_string(), "((h,(e,g)),((a,b),(c,d,i)j));");

    let decreasing = order_nodes(&t, false);
    assert!(is_ordered(&decreasing, false));
    assert_eq!(decreasing.to_string(), "(((c,d,i)j,(a,b)),((e,g),h));");

    // Same tree up to sibling order
    assert!(compare_topology(&t, &increasing));
    assert!(compare_topology(&t, &decreasing));
}

#[test]
fn test_order_nodes_is_stable() {
    let t = tree("((b,a),(d,c),e);");
    assert_eq!(order_nodes(&t, true).to_string(), "(e,(b,a),(d,c));");
    assert_eq!(order_nodes(&t, false).to_string(), "((b,a),(d,c),e);");
}

#[test]
fn test_is_ordered() {
    let t1 = tree("(b,(i,j)a)c;");
    assert!(is_ordered(&t1, true));
    assert!(!is_ordered(&t1, false));

    // Equal clade sizes are ordered both ways
    let t2 = tree("(a, b);");
    assert!(is_ordered(&t2, true));
    assert!(is_ordered(&t2, false));

    let t3 = tree("(((a,b),(c,d,x,y,z)),((e,g),h));");
    assert!(!is_ordered(&t3, true));
    assert!(!is_ordered(&t3, false));

    let t5 = tree("(((c,d,i)j,(a,b)),((e,g),h));");
    assert!(is_ordered(&t5, false));
    assert!(!is_ordered(&t5, true));
}
