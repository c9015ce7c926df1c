//! Basic low-level byte parser functionality.
//!
//! This module provides the infrastructure the [Newick](crate::newick)
//! parser is built on: a byte parser over in-memory input,
//! contextual parse errors, and label escaping.

pub mod byte_parser;
pub mod parsing_error;
pub mod utils;

pub use byte_parser::ByteParser;
pub use parsing_error::{ParsingError, ParsingErrorType};
