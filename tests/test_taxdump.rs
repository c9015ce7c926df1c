use phylgebra::algebra::{compare_labeled_topology, compare_topology};
use phylgebra::model::PhyloTree;
use phylgebra::taxdump::{Taxdump, build_taxdump_tree, read_taxdump};
use phylgebra::{TreeError, parse_newick_str};
use std::fs;
use std::path::{Path, PathBuf};

const NODES: &[(u64, u64, &str)] = &[
    (1, 1, "order"),
    (2, 1, "family"),
    (3, 1, "family"),
    (4, 2, "genus"),
    (5, 2, "genus"),
    (6, 3, "genus"),
    (7, 3, "genus"),
    (8, 3, "genus"),
    (9, 4, "species"),
    (10, 4, "species"),
    (11, 5, "species"),
    (12, 5, "species"),
    (13, 5, "species"),
    (14, 6, "species"),
    (15, 7, "species"),
    (16, 7, "species"),
    (17, 7, "species"),
    (18, 7, "species"),
    (19, 8, "species"),
    (20, 8, "species"),
];

const NAMES: &[(u64, &str)] = &[
    (1, "root"),
    (2, "Eukaryota"),
    (3, "Bacteria"),
    (4, "Plantae"),
    (5, "Animalia"),
    (6, "Bacteroidetes"),
    (7, "Proteobacteria"),
    (8, "Firmicutes"),
    (9, "Gymnosperms"),
    (10, "Angiosperms"),
    (11, "Chordata"),
    (12, "Arthropoda"),
    (13, "Mollusca"),
    (14, "Prevotella"),
    (15, "Escherichia"),
    (16, "Vibrio"),
    (17, "Rhizobium"),
    (18, "Helicobacter"),
    (19, "Bacillus"),
    (20, "Clostridia"),
];

/// Writes `nodes.dmp` and `names.dmp` in NCBI layout, with a few extra rows
/// and columns as found in real dumps.
fn write_fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let mut nodes = String::new();
    for (taxid, parent, rank) in NODES {
        nodes.push_str(&format!("{}\t|\t{}\t|\t{}\t|\t\t|\t0\t|\n", taxid, parent, rank));
    }

    let mut names = String::new();
    for (taxid, name) in NAMES {
        names.push_str(&format!("{}\t|\t{}\t|\t\t|\tscientific name\t|\n", taxid, name));
        names.push_str(&format!("{}\t|\t{} (synonym)\t|\t\t|\tsynonym\t|\n", taxid, name));
    }

    let nodes_path = dir.join("nodes.dmp");
    let names_path = dir.join("names.dmp");
    fs::write(&nodes_path, nodes).unwrap();
    fs::write(&names_path, names).unwrap();
    (nodes_path, names_path)
}

fn tree(newick: &str) -> PhyloTree {
    parse_newick_str(newick).unwrap()
}

// --- READING ---
#[test]
fn test_read_taxdump() {
    let dir = tempfile::tempdir().unwrap();
    let (nodes_path, names_path) = write_fixture(dir.path());

    let taxdump = read_taxdump(&nodes_path, Some(&names_path)).unwrap();
    assert_eq!(taxdump.len(), 20);
    assert_eq!(taxdump.root(), Some(1));

    let record = taxdump.get(7).unwrap();
    assert_eq!(record.parent, 3);
    assert_eq!(record.rank, "genus");
    assert_eq!(record.name, "Proteobacteria");
    assert_eq!(record.children.iter().copied().collect::<Vec<_>>(), vec![15, 16, 17, 18]);

    let root = taxdump.get(1).unwrap();
    assert_eq!(root.parent, 1);
    assert_eq!(root.name, "root");
    assert_eq!(taxdump.iter().map(|(id, _)| id).collect::<Vec<_>>(), (1..=20).collect::<Vec<_>>());
}

#[test]
fn test_read_taxdump_without_names() {
    let dir = tempfile::tempdir().unwrap();
    let (nodes_path, _) = write_fixture(dir.path());

    let taxdump = read_taxdump(&nodes_path, None).unwrap();
    assert_eq!(taxdump.len(), 20);
    assert!(taxdump.iter().all(|(_, record)| record.name.is_empty()));
}

#[test]
fn test_read_taxdump_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_taxdump(dir.path().join("nodes.dmp"), None).unwrap_err();
    assert!(matches!(err, TreeError::Io(_)));
}

#[test]
fn test_malformed_rows() {
    let short = vec![vec!["1", "1"]];
    assert!(matches!(Taxdump::from_rows(short), Err(TreeError::MalformedInput(_))));

    let bad_taxid = vec![vec!["1", "1", "no rank"], vec!["x", "1", "genus"]];
    assert!(matches!(Taxdump::from_rows(bad_taxid), Err(TreeError::MalformedInput(_))));

    let twice = vec![vec!["1", "1", "no rank"], vec!["2", "1", "genus"], vec!["2", "1", "genus"]];
    assert!(matches!(Taxdump::from_rows(twice), Err(TreeError::MalformedInput(_))));

    let orphan = vec![vec!["1", "1", "no rank"], vec!["2", "5", "genus"]];
    assert!(matches!(Taxdump::from_rows(orphan), Err(TreeError::MalformedInput(_))));

    let two_roots = vec![vec!["1", "1", "no rank"], vec!["2", "2", "no rank"]];
    assert!(matches!(Taxdump::from_rows(two_roots), Err(TreeError::MalformedInput(_))));
}

#[test]
fn test_names_of_unknown_taxa_are_skipped() {
    let nodes = vec![vec!["1", "1", "no rank"], vec!["2", "1", "genus"]];
    let names = vec![
        vec!["2", "Bacteria", "", "scientific name"],
        vec!["99", "Nowhere", "", "scientific name"],
        vec!["1", "Everything", "", "common name"],
    ];
    let taxdump = Taxdump::from_rows(nodes).unwrap().with_names(names).unwrap();
    assert_eq!(taxdump.get(2).unwrap().name, "Bacteria");
    assert_eq!(taxdump.get(1).unwrap().name, "");
    assert!(taxdump.get(99).is_none());
}

// --- BUILDING ---
#[test]
fn test_build_taxdump_tree() {
    let dir = tempfile::tempdir().unwrap();
    let (nodes_path, names_path) = write_fixture(dir.path());
    let taxdump = read_taxdump(&nodes_path, Some(&names_path)).unwrap();

    let obs = build_taxdump_tree(&taxdump, false).unwrap();
    assert_eq!(obs.to_string(), "(((9,10)4,(11,12,13)5)2,((14)6,(15,16,17,18)7,(19,20)8)3)1;");
    assert!(obs.is_valid());

    let exp = tree("(((9,10)4,(11,12,13)5)2,((14)6,(15,16,17,18)7,(19,20)8)3)1;");
    assert!(compare_topology(&obs, &exp));
    assert!(compare_labeled_topology(&obs, &exp));
}

#[test]
fn test_build_taxdump_tree_with_names() {
    let dir = tempfile::tempdir().unwrap();
    let (nodes_path, names_path) = write_fixture(dir.path());
    let taxdump = read_taxdump(&nodes_path, Some(&names_path)).unwrap();

    let obs = build_taxdump_tree(&taxdump, true).unwrap();
    assert_eq!(obs.root().name(), Some("root"));
    let bacteria = obs.find("Bacteria").unwrap();
    let genera: Vec<_> = obs[bacteria].children().iter().filter_map(|&c| obs[c].name()).collect();
    assert_eq!(genera, vec!["Bacteroidetes", "Proteobacteria", "Firmicutes"]);
}

#[test]
fn test_build_orders_children_numerically() {
    let nodes = vec![
        vec!["1", "1", "no rank"],
        vec!["100", "1", "genus"],
        vec!["20", "1", "genus"],
        vec!["3", "1", "genus"],
    ];
    let taxdump = Taxdump::from_rows(nodes).unwrap();
    assert_eq!(build_taxdump_tree(&taxdump, false).unwrap().to_string(), "(3,20,100)1;");
}

#[test]
fn test_build_without_root() {
    let taxdump = Taxdump::default();
    assert!(matches!(build_taxdump_tree(&taxdump, false), Err(TreeError::MalformedInput(_))));
}
