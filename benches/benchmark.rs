use criterion::{Criterion, criterion_group, criterion_main};
use phylgebra::algebra::{compare_branch_lengths, compare_topology, order_nodes, root_above, root_by_outgroup};
use phylgebra::model::PhyloTree;
use phylgebra::newick::NewickParser;
use phylgebra::parse_newick_str;
use phylgebra::parser::ByteParser;
use std::hint::black_box;

const TREE_SIZES: &[(&str, usize)] = &[("n128", 7), ("n1024", 10), ("n8192", 13)];

/// Balanced binary Newick tree with `2^depth` leaves and lengths.
fn balanced_newick(depth: usize) -> String {
    fn write(out: &mut String, depth: usize, next_leaf: &mut usize) {
        if depth == 0 {
            out.push_str(&format!("t{}:{}", next_leaf, (*next_leaf % 7) as f64 * 0.25));
            *next_leaf += 1;
            return;
        }
        out.push('(');
        write(out, depth - 1, next_leaf);
        out.push(',');
        write(out, depth - 1, next_leaf);
        out.push_str(&format!("):{}", depth as f64 * 0.5));
    }

    let mut out = String::new();
    write(&mut out, depth, &mut 0);
    out.push(';');
    out
}

/// Caterpillar Newick tree with `num_leaves` leaves.
fn caterpillar_newick(num_leaves: usize) -> String {
    let mut out = "(".repeat(num_leaves - 1);
    out.push_str("t0:1");
    for i in 1..num_leaves {
        out.push_str(&format!(",t{}:1):1", i));
    }
    out.push(';');
    out
}

fn trees() -> Vec<(&'static str, PhyloTree)> {
    TREE_SIZES
        .iter()
        .map(|&(name, depth)| (name, parse_newick_str(balanced_newick(depth)).unwrap()))
        .collect()
}

fn newick_parsing(c: &mut Criterion) {
    for &(name, depth) in TREE_SIZES {
        let newick = format!("{}\n", balanced_newick(depth)).repeat(10);
        c.bench_function(&format!("parse_{}", name), |b| {
            b.iter(|| {
                let mut parser = NewickParser::default();
                black_box(parser.parse_all(ByteParser::for_str(&newick)).unwrap())
            });
        });
    }

    let deep = caterpillar_newick(10_000);
    c.bench_function("parse_caterpillar_n10000", |b| {
        b.iter(|| black_box(parse_newick_str(&deep).unwrap()));
    });
}

fn comparing(c: &mut Criterion) {
    for (name, tree) in trees() {
        let mirrored = order_nodes(&tree, false);
        c.bench_function(&format!("compare_topology_{}", name), |b| {
            b.iter(|| black_box(compare_topology(&tree, &mirrored)));
        });
        c.bench_function(&format!("compare_branch_lengths_{}", name), |b| {
            b.iter(|| black_box(compare_branch_lengths(&tree, &mirrored)));
        });
    }
}

fn rerooting(c: &mut Criterion) {
    for (name, tree) in trees() {
        let leaves = tree.leaves();
        let Some(&deepest) = leaves.last() else {
            continue;
        };
        c.bench_function(&format!("root_above_{}", name), |b| {
            b.iter(|| black_box(root_above(&tree, deepest, None).unwrap()));
        });
        c.bench_function(&format!("root_by_outgroup_{}", name), |b| {
            b.iter(|| black_box(root_by_outgroup(&tree, &["t0", "t1", "t2"]).unwrap()));
        });
    }
}

criterion_group!(regression, newick_parsing, comparing);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = rerooting
}
criterion_main!(regression, reporting);
