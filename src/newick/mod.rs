//! Newick format parser and writer for phylogenetic trees.
//!
//! This module provides [NewickParser] to parse Newick format strings
//! into tree structures. The parser uses a
//! [TreeBuilder](crate::model::TreeBuilder) internally, so it can build
//! trees of any representation.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_newick_file`] - parses all trees of a file as [PhyloTree]s
//! * [`parse_newick_str`] - parses a single string, returns a [PhyloTree]
//! * [`to_newick`] / [`write_newick_file`] - writes trees back
//!
//! # Full API
//! For more control, configure a [NewickParser] and
//! provide data via a [ByteParser]:
//! * [`NewickParser::parse_str`] - parse a single tree
//! * [`NewickParser::parse_all`] - parse all trees until EOF
//! * [`NewickParser::into_iter`] - obtain an iterator over trees
//!
//! # Format
//! The Newick format has the following simple grammar:
//! * `tree ::= node ';'`
//! * `node ::= [ '(' node { ',' node } ')' ] [label] [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Any node may carry a label, leaves included; an empty label is no label
//! * Labels containing punctuation or whitespace are enclosed in single quotes,
//!   a single quote inside is written as two (`'Wilson''s Storm-petrel'`)
//! * Branch lengths are non-negative decimal numbers,
//!   scientific notation included (`1.5e-10`)
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch length
//! * Comments are square brackets and can occur anywhere whitespace is allowed

mod defs;
pub mod parser;
pub mod writer;

pub use parser::{NewickIterator, NewickParser};
pub use writer::{NewickStyle, to_newick, write_newick_file};

use crate::model::PhyloTree;
use crate::parser::ParsingError;
use crate::parser::byte_parser::ByteParser;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a Newick file eagerly and returns all trees.
///
/// This is a convenience function to parse a file containing
/// semicolon-separated list of Newick strings,
/// using default settings and thus not requiring configuration of a parser.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///
/// # Format
/// Expects standard Newick format with trees separated by semicolons.
/// Multiple trees can appear on the same line or across multiple lines,
/// and `[...]` comments and whitespace are fine.
///
/// # Example
/// ```no_run
/// use phylgebra::newick::parse_newick_file;
///
/// let trees = parse_newick_file("gene_trees.nwk")?;
/// println!("Parsed {} trees", trees.len());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> Result<Vec<PhyloTree>, ParsingError> {
    let byte_parser = ByteParser::for_file(path)?;
    NewickParser::default().parse_all(byte_parser)
}

/// Parses a single Newick string to obtain a [PhyloTree].
///
/// Internal labels are kept verbatim as names; use
/// [assign_supports](crate::model::label::assign_supports) to turn numeric
/// ones into support values.
///
/// # Example
/// ```
/// use phylgebra::newick::parse_newick_str;
///
/// let tree = parse_newick_str("((a,b)75,(c,d)90);")?;
/// assert_eq!(tree.num_leaves(), 4);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<PhyloTree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    NewickParser::default().parse_str(&mut byte_parser)
}
