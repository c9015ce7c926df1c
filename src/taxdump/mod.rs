//! NCBI taxonomy ("taxdump") ingestion.
//!
//! NCBI distributes its taxonomy as `nodes.dmp` (taxid, parent taxid, rank, ...)
//! and `names.dmp` (taxid, name, unique name, name class). Fields are separated
//! by `"\t|\t"` and rows end with `"\t|"`.
//!
//! * [read_taxdump] - reads both files into a [Taxdump]
//! * [Taxdump::from_rows], [Taxdump::with_names] - same from already split rows
//! * [build_taxdump_tree] - builds the taxonomy as [PhyloTree](crate::model::PhyloTree)
//! * [build_taxdump_tree_with] - same with any [TreeBuilder](crate::model::TreeBuilder)

mod builder;
mod reader;

pub use builder::{build_taxdump_tree, build_taxdump_tree_with};
pub use reader::{TaxId, Taxdump, TaxonRecord, read_taxdump};
