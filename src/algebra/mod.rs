//! Structural operations on [PhyloTree](crate::model::PhyloTree)s.
//!
//! | Module | Operations |
//! |--------|------------|
//! | [compare] | [has_duplicates], [compare_topology], [compare_branch_lengths], [compare_labeled_topology], [exact_compare] |
//! | [unpack] | [unpack()], [unpack_by_func] |
//! | [order] | [order_nodes], [is_ordered] |
//! | [prune] | [shear], [intersect_trees] |
//! | [clade] | [cladistic] |
//! | [reroot] | [walk_copy], [root_above], [root_by_outgroup], [root_by_outgroup_strict] |
//!
//! [unpack()], [unpack_by_func] and
//! [assign_supports](crate::model::label::assign_supports) modify a tree in
//! place; all other operations leave their input untouched and return new trees.
//! Errors are reported as [TreeError](crate::error::TreeError) before anything
//! is modified.

pub mod clade;
pub mod compare;
pub mod order;
pub mod prune;
pub mod reroot;
pub mod unpack;

pub use clade::{Cladistic, cladistic};
pub use compare::{
    EPSILON, compare_branch_lengths, compare_labeled_topology, compare_length, compare_topology,
    exact_compare, has_duplicates,
};
pub use order::{is_ordered, order_nodes};
pub use prune::{intersect_trees, shear};
pub use reroot::{root_above, root_by_outgroup, root_by_outgroup_strict, walk_copy};
pub use unpack::{unpack, unpack_by_func};
