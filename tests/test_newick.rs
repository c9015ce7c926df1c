use phylgebra::model::{PhyloTree, TreeBuilder};
use phylgebra::newick::{NewickParser, NewickStyle, parse_newick_file, parse_newick_str, to_newick, write_newick_file};
use phylgebra::parser::{ByteParser, ParsingErrorType};
use std::fs;

fn names_in_pre_order(tree: &PhyloTree) -> Vec<Option<&str>> {
    tree.pre_order_iter().map(|n| n.name()).collect()
}

// --- TESTS NEWICK STRING PARSING ---
#[test]
fn test_basic_tree() {
    let newick = "((A:1.0,B:2.0):3.0,C:4.0):0.5;";
    let mut parser = ByteParser::for_str(newick);
    let mut newick_parser = NewickParser::default().with_capacity_hint(5);
    let tree = newick_parser.parse_str(&mut parser).unwrap();

    // Test counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 1);
    assert_eq!(tree.num_nodes(), 5);
    assert!(tree.is_valid());

    // Test relationships
    // - Root has children (internal, C)
    let root = tree.root();
    assert_eq!(root.length(), Some(0.5));
    assert_eq!(root.num_children(), 2);
    let internal = tree.node(root.children()[0]);
    let leaf_c = tree.node(root.children()[1]);
    assert!(internal.is_internal());
    assert_eq!(internal.length(), Some(3.0));
    assert_eq!(leaf_c.name(), Some("C"));
    assert_eq!(leaf_c.length(), Some(4.0));

    // - Internal node has children (A, B)
    let leaf_a = tree.node(internal.children()[0]);
    let leaf_b = tree.node(internal.children()[1]);
    assert_eq!(leaf_a.name(), Some("A"));
    assert_eq!(leaf_b.name(), Some("B"));
    assert_eq!(leaf_b.length(), Some(2.0));

    // - Parent relationships
    assert_eq!(internal.parent(), Some(tree.root_index()));
    assert_eq!(leaf_a.parent(), Some(internal.index()));
    assert_eq!(leaf_c.parent(), Some(tree.root_index()));
}

#[test]
fn test_multifurcating_tree_with_internal_labels() {
    let tree = parse_newick_str("((a,b,c)x,(d,e)75,(f)'80:Bacteria')root;").unwrap();

    assert_eq!(tree.num_leaves(), 6);
    assert_eq!(tree.root().name(), Some("root"));
    assert_eq!(tree.root().num_children(), 3);
    assert_eq!(
        names_in_pre_order(&tree),
        vec![
            Some("root"),
            Some("x"),
            Some("a"),
            Some("b"),
            Some("c"),
            Some("75"),
            Some("d"),
            Some("e"),
            Some("80:Bacteria"),
            Some("f"),
        ]
    );
}

#[test]
fn test_missing_labels_and_lengths() {
    let tree = parse_newick_str("((,):1,B,'');").unwrap();

    assert_eq!(tree.num_leaves(), 4);
    assert_eq!(tree.leaf_name_set().len(), 1);
    let unnamed = tree.pre_order_iter().filter(|n| n.name().is_none()).count();
    assert_eq!(unnamed, 5);
    assert_eq!(tree.pre_order_iter().filter(|n| n.has_branch_length()).count(), 1);
}

#[test]
fn test_single_node_tree() {
    let tree = parse_newick_str("A:2;").unwrap();
    assert_eq!(tree.num_nodes(), 1);
    assert!(tree.root().is_leaf());
    assert_eq!(tree.root().name(), Some("A"));
    assert_eq!(tree.root().length(), Some(2.0));
    assert_eq!(tree.to_string(), "A:2;");
}

#[test]
fn test_comments_and_whitespace() {
    let newick = "[leading comment]\n ( A [about A] : 1.5 ,\n\t'B b' :[len] 2e-1 ) [root] root ;";
    let tree = parse_newick_str(newick).unwrap();

    assert_eq!(tree.root().name(), Some("root"));
    let b = tree.find("B b").unwrap();
    assert_eq!(tree[b].length(), Some(0.2));
    let a = tree.find("A").unwrap();
    assert_eq!(tree[a].length(), Some(1.5));
}

#[test]
fn test_quoted_labels() {
    let tree = parse_newick_str("('Wilson''s Storm-petrel','a,b':1,'(x)');").unwrap();
    let names: Vec<_> = tree.leaves().into_iter().filter_map(|l| tree[l].name()).collect();
    assert_eq!(names, vec!["Wilson's Storm-petrel", "a,b", "(x)"]);
}

#[test]
fn test_deep_nesting() {
    // Deeper than a recursive parser could handle on a small stack
    let depth = 20_000;
    let newick = format!("{}x{};", "(".repeat(depth), ")".repeat(depth));
    let tree = parse_newick_str(&newick).unwrap();
    assert_eq!(tree.num_nodes(), depth + 1);
    assert_eq!(tree.num_leaves(), 1);
    assert_eq!(tree.to_string(), newick);
}

// --- TESTS PARSING ERRORS ---
#[test]
fn test_negative_branch_length() {
    let err = parse_newick_str("(A:-1,B:1);").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidBranchLength(_)));
}

#[test]
fn test_malformed_branch_length() {
    let err = parse_newick_str("(A:1.2.3,B);").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidBranchLength(_)));

    let err = parse_newick_str("(A:,B);").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidBranchLength(_)));
}

#[test]
fn test_unclosed_structures() {
    let err = parse_newick_str("((A,B),C;").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidNewickString(_)));

    let err = parse_newick_str("((A,B),C").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEOF);

    let err = parse_newick_str("(A,'B);").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnclosedQuote);

    let err = parse_newick_str("(A,B)[unclosed;").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnclosedComment);
}

#[test]
fn test_missing_semicolon() {
    let err = parse_newick_str("(A,B)").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEOF);

    let err = parse_newick_str("(A,B)C D;").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidNewickString(_)));
}

#[test]
fn test_error_reports_position() {
    let err = parse_newick_str("(A:1,B:-2);").unwrap_err();
    assert!(err.position() > 0);
    assert!(err.to_string().contains("position"));
}

// --- TESTS MULTIPLE TREES ---
#[test]
fn test_parse_all() {
    let input = "(A,B);\n[second]\n((A,B),C);  (D);\n";
    let mut newick_parser = NewickParser::default();
    let trees = newick_parser.parse_all(ByteParser::for_str(input)).unwrap();

    assert_eq!(trees.len(), 3);
    assert_eq!(trees[0].num_leaves(), 2);
    assert_eq!(trees[1].num_leaves(), 3);
    assert_eq!(trees[2].num_nodes(), 2);
}

#[test]
fn test_iterator_stops_after_error() {
    let input = "(A,B);(C,;(D,E);";
    let mut iter = NewickParser::default().into_iter(ByteParser::for_str(input));

    assert!(iter.next().unwrap().is_ok());
    assert!(iter.next().unwrap().is_err());
    assert!(iter.next().is_none());
}

#[test]
fn test_iterator_over_all_trees() {
    let input = "(A,B);(C,D);(E,F);";
    let trees: Result<Vec<_>, _> = NewickParser::default().into_iter(ByteParser::for_str(input)).collect();
    let trees = trees.unwrap();
    assert_eq!(trees.len(), 3);
    assert_eq!(trees[2].to_string(), "(E,F);");
}

/// Builder only counting nodes, to exercise the parser with a foreign tree type.
#[derive(Default)]
struct CountingBuilder {
    leaves: usize,
    internal: usize,
}

impl TreeBuilder for CountingBuilder {
    type NodeIdx = ();
    type Tree = (usize, usize);

    fn init_next(&mut self, _num_nodes: usize) {
        self.leaves = 0;
        self.internal = 0;
    }

    fn add_leaf(&mut self, _label: Option<String>, _branch_len: Option<f64>) {
        self.leaves += 1;
    }

    fn add_internal(&mut self, _children: &[()], _label: Option<String>, _branch_len: Option<f64>) {
        self.internal += 1;
    }

    fn add_root(&mut self, _children: &[()], _label: Option<String>, _branch_len: Option<f64>) {}

    fn finish_tree(&mut self) -> Option<(usize, usize)> {
        Some((self.leaves, self.internal))
    }
}

#[test]
fn test_custom_builder() {
    let mut newick_parser = NewickParser::new(CountingBuilder::default());
    let counts = newick_parser
        .parse_all(ByteParser::for_str("((A,B),(C,D,E));(A,B);"))
        .unwrap();
    assert_eq!(counts, vec![(5, 2), (2, 0)]);
}

// --- TESTS WRITING ---
#[test]
fn test_write_styles() {
    let tree = parse_newick_str("((A:1,B:2)95:0.5,C:1.5)root;").unwrap();
    assert_eq!(to_newick(&tree, NewickStyle::Full), "((A:1,B:2)95:0.5,C:1.5)root;");
    assert_eq!(to_newick(&tree, NewickStyle::NoLengths), "((A,B)95,C)root;");
    assert_eq!(to_newick(&tree, NewickStyle::TopologyOnly), "((A,B),C);");
}

#[test]
fn test_write_escapes_labels() {
    let tree = parse_newick_str("('Wilson''s petrel','a:b',plain);").unwrap();
    let written = tree.to_string();
    assert_eq!(written, "('Wilson''s petrel','a:b',plain);");

    let reparsed = parse_newick_str(&written).unwrap();
    assert_eq!(names_in_pre_order(&reparsed), names_in_pre_order(&tree));
}

#[test]
fn test_write_assigned_supports() {
    let mut tree = parse_newick_str("((a,b)75,(c,d)'90:X');").unwrap();
    phylgebra::model::label::assign_supports(&mut tree);
    assert_eq!(tree.to_string(), "((a,b)75,(c,d)'90:X');");
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trees.nwk");

    let trees = vec![
        parse_newick_str("((A:1,B:2):3,C:4);").unwrap(),
        parse_newick_str("(D,(E,F)x);").unwrap(),
    ];
    write_newick_file(&path, &trees, NewickStyle::Full).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "((A:1,B:2):3,C:4);\n(D,(E,F)x);\n");

    let parsed = parse_newick_file(&path).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].to_string(), trees[0].to_string());
    assert_eq!(parsed[1].to_string(), trees[1].to_string());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_newick_file(dir.path().join("missing.nwk")).unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::IoError(_)));
}
