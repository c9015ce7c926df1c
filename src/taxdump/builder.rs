//! Building trees from a [Taxdump].

use crate::error::{Result, TreeError};
use crate::model::{PhyloTree, PhyloTreeBuilder, TreeBuilder};
use crate::taxdump::reader::{TaxId, Taxdump};
use log::debug;
use std::collections::HashMap;

/// Builds the taxonomy tree of `taxdump` as [PhyloTree].
///
/// See [build_taxdump_tree_with] for details.
///
/// # Example
/// ```
/// use phylgebra::taxdump::{build_taxdump_tree, Taxdump};
///
/// let nodes = vec![
///     vec!["1", "1", "no rank"],
///     vec!["10", "1", "genus"],
///     vec!["9", "1", "genus"],
///     vec!["11", "10", "species"],
/// ];
/// let taxdump = Taxdump::from_rows(nodes).unwrap();
/// let tree = build_taxdump_tree(&taxdump, false).unwrap();
/// assert_eq!(tree.to_string(), "(9,(11)10)1;");
/// ```
pub fn build_taxdump_tree(taxdump: &Taxdump, use_names: bool) -> Result<PhyloTree> {
    build_taxdump_tree_with(taxdump, &mut PhyloTreeBuilder::new(), use_names)
}

/// Builds the taxonomy tree of `taxdump` with the given [TreeBuilder].
///
/// Starts from the self-parented root; children are ordered by increasing
/// taxid. Nodes are labeled with their taxid, or with their scientific name
/// if `use_names` is set and the name is not empty. Taxa not connected to the
/// root are left out. The tree carries no branch lengths.
///
/// # Errors
/// [TreeError::MalformedInput] if the taxdump has no root.
pub fn build_taxdump_tree_with<T: TreeBuilder>(
    taxdump: &Taxdump,
    builder: &mut T,
    use_names: bool,
) -> Result<T::Tree> {
    let root = taxdump
        .root()
        .ok_or_else(|| TreeError::malformed_input("Taxdump has no root"))?;

    let label = |taxid: TaxId| -> Result<String> {
        let record = taxdump
            .get(taxid)
            .ok_or_else(|| TreeError::not_found(format!("Taxid {}", taxid)))?;
        Ok(if use_names && !record.name.is_empty() {
            record.name.clone()
        } else {
            taxid.to_string()
        })
    };

    builder.init_next(taxdump.len());

    // Post-order: children are built before their parent
    let mut built: HashMap<TaxId, T::NodeIdx> = HashMap::new();
    let mut stack = vec![(root, false)];
    while let Some((taxid, children_built)) = stack.pop() {
        let children = taxdump
            .get(taxid)
            .map(|record| &record.children)
            .ok_or_else(|| TreeError::not_found(format!("Taxid {}", taxid)))?;

        if !children_built && !children.is_empty() {
            stack.push((taxid, true));
            stack.extend(children.iter().rev().map(|&c| (c, false)));
            continue;
        }

        let child_indices: Vec<T::NodeIdx> = children
            .iter()
            .filter_map(|c| built.remove(c))
            .collect();
        let index = if taxid == root {
            builder.add_root(&child_indices, Some(label(taxid)?), None)
        } else if child_indices.is_empty() {
            builder.add_leaf(Some(label(taxid)?), None)
        } else {
            builder.add_internal(&child_indices, Some(label(taxid)?), None)
        };
        built.insert(taxid, index);
    }

    debug!("Built taxonomy tree from {} taxa", taxdump.len());
    builder
        .finish_tree()
        .ok_or_else(|| TreeError::malformed_input("Taxonomy tree could not be built"))
}
