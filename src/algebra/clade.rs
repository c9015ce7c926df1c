//! Classifying a set of taxa relative to a tree.

use crate::error::{Result, TreeError};
use crate::model::PhyloTree;
use log::debug;
use std::collections::HashSet;
use std::fmt;

/// Relation of a set of taxa to the clades of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cladistic {
    /// A single taxon
    Uni,
    /// The taxa form exactly the leaf set of some clade
    Mono,
    /// The taxa do not form a clade
    Poly,
}

impl fmt::Display for Cladistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Cladistic::Uni => "uni",
            Cladistic::Mono => "mono",
            Cladistic::Poly => "poly",
        };
        f.write_str(s)
    }
}

/// Determines whether the leaves named by `taxa` form a clade of `tree`.
///
/// Repeated names count once. A single taxon is [Cladistic::Uni]; several
/// taxa are [Cladistic::Mono] if no other leaf lies below their lowest common
/// ancestor, and [Cladistic::Poly] otherwise.
///
/// # Errors
/// * [TreeError::MalformedInput] if `taxa` is empty
/// * [TreeError::NotFound] if a name is not a leaf of `tree`
///
/// # Example
/// ```
/// use phylgebra::algebra::{cladistic, Cladistic};
/// use phylgebra::parse_newick_str;
///
/// let tree = parse_newick_str("((a,b),(c,d));").unwrap();
/// assert_eq!(cladistic(&tree, &["a"]).unwrap(), Cladistic::Uni);
/// assert_eq!(cladistic(&tree, &["a", "b"]).unwrap(), Cladistic::Mono);
/// assert_eq!(cladistic(&tree, &["a", "c"]).unwrap(), Cladistic::Poly);
/// ```
pub fn cladistic<S: AsRef<str>>(tree: &PhyloTree, taxa: &[S]) -> Result<Cladistic> {
    let query: HashSet<&str> = taxa.iter().map(AsRef::as_ref).collect();
    if query.is_empty() {
        return Err(TreeError::malformed_input("No taxa given"));
    }

    let members: Vec<_> = tree
        .leaves()
        .into_iter()
        .filter(|&leaf| tree[leaf].name().is_some_and(|name| query.contains(name)))
        .collect();
    let found: HashSet<&str> = members.iter().filter_map(|&leaf| tree[leaf].name()).collect();
    if let Some(missing) = query.iter().find(|name| !found.contains(*name)) {
        return Err(TreeError::not_found(format!("Taxon '{}' is not in the tree", missing)));
    }

    if query.len() == 1 {
        return Ok(Cladistic::Uni);
    }

    let lca = tree
        .lca(&members)
        .ok_or_else(|| TreeError::invalid_operation("Taxa have no common ancestor"))?;
    let clade_size = tree.leaves_under(lca).len();
    debug!("LCA of {} taxa spans {} leaves", members.len(), clade_size);

    if clade_size == members.len() {
        Ok(Cladistic::Mono)
    } else {
        Ok(Cladistic::Poly)
    }
}
