//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which offers methods
//! to parse files or single strings, as well as lazy parsing via a
//! [NewickIterator].

use crate::model::tree_builder::{PhyloTreeBuilder, TreeBuilder};
use crate::newick::defs::{DEFAULT_NUM_NODES_GUESS, NEWICK_LABEL_DELIMITERS};
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use log::trace;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for single/multiple Newick format phylogenetic trees
/// with any number of children per node.
///
/// Generic over [TreeBuilder] (construction). Labels are handed to the
/// builder verbatim; internal labels may hold support values.
///
/// # Construction
/// * [`new(tree_builder)`](Self::new) — generic constructor
/// * [`default()`](Self::default) — uses [PhyloTreeBuilder]
///
/// # Configuration
/// * [`with_capacity_hint(num_nodes)`](Self::with_capacity_hint)
///     - Expected number of nodes per tree, otherwise it is taken from
///       the first parsed tree.
/// * [`with_builder(tree_builder)`](Self::with_builder)
///     - Replaces the tree builder, keeping the other settings.
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) — Parse single tree
/// * [`parse_all`](Self::parse_all) — Parse all trees eagerly
/// * [`into_iter`](Self::into_iter) — Parse trees lazily
///
/// # Example
/// ```
/// use phylgebra::newick::NewickParser;
/// use phylgebra::parser::ByteParser;
///
/// let input = "((A:1.0,B:1.0)95:0.5,C:1.5,D:1.5);";
/// let mut byte_parser = ByteParser::for_str(input);
/// let mut newick_parser = NewickParser::default();
///
/// let tree = newick_parser.parse_str(&mut byte_parser).unwrap();
/// assert_eq!(tree.num_leaves(), 4);
/// ```
pub struct NewickParser<T: TreeBuilder> {
    know_num_nodes: bool,
    num_nodes: usize,
    tree_builder: T,
}

// ============================================================================
// Construction & Configuration, Deconstruction (pub)
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Creates a new [NewickParser] with the given tree builder.
    pub fn new(tree_builder: T) -> Self {
        Self {
            know_num_nodes: false,
            num_nodes: DEFAULT_NUM_NODES_GUESS,
            tree_builder,
        }
    }

    /// Sets the expected number of nodes in each parsed tree.
    ///
    /// This allows pre-allocation of data structures for better performance.
    /// If not set, the parser will count nodes of the first tree.
    pub fn with_capacity_hint(mut self, num_nodes: usize) -> Self {
        self.num_nodes = num_nodes;
        self.know_num_nodes = true;
        self
    }

    /// Replaces the tree builder, keeping all other settings.
    pub fn with_builder<U: TreeBuilder>(self, tree_builder: U) -> NewickParser<U> {
        NewickParser {
            know_num_nodes: self.know_num_nodes,
            num_nodes: self.num_nodes,
            tree_builder,
        }
    }

    /// Consumes the parser and returns the tree builder.
    pub fn into_builder(self) -> T {
        self.tree_builder
    }
}

impl Default for NewickParser<PhyloTreeBuilder> {
    fn default() -> Self {
        Self::new(PhyloTreeBuilder::new())
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Consumes the parser and returns an iterator over trees from the byte source.
    ///
    /// The parser can be retrieved again via [NewickIterator::into_parser].
    ///
    /// # Arguments
    /// * `byte_parser` - A byte parser with underlying source containing only
    ///   Newick strings, except for whitespace and `[...]` comments.
    pub fn into_iter(self, byte_parser: ByteParser) -> NewickIterator<T> {
        NewickIterator {
            byte_parser,
            parser: self,
            done: false,
        }
    }

    /// Parses all Newick trees from the byte source until EOF.
    ///
    /// # Returns
    /// * `Ok(Vec<T::Tree>)` - All parsed trees
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all(&mut self, mut byte_parser: ByteParser) -> Result<Vec<T::Tree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(&mut byte_parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree from the given [ByteParser],
    /// consuming the terminating `;`.
    ///
    /// # Returns
    /// * `Ok(T::Tree)` - The parsed phylogenetic tree
    /// * `Err(ParsingError)` - If the Newick format is invalid
    pub fn parse_str(&mut self, parser: &mut ByteParser) -> Result<T::Tree, ParsingError> {
        self.tree_builder.init_next(self.num_nodes);

        let num_nodes = self.parse_tree(parser)?;

        // Having parsed a full tree, its size is a good guess for the next
        if !self.know_num_nodes {
            self.num_nodes = num_nodes;
            self.know_num_nodes = true;
        }

        self.tree_builder
            .finish_tree()
            .ok_or_else(|| ParsingError::without_context(ParsingErrorType::InvalidTreeStructure))
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Parses one tree up to and including `;` and returns its number of nodes.
    ///
    /// Works with an explicit stack of open parentheses, each holding the
    /// children completed so far, so nesting depth is not limited by the call stack.
    fn parse_tree(&mut self, parser: &mut ByteParser) -> Result<usize, ParsingError> {
        let mut open: Vec<Vec<T::NodeIdx>> = Vec::new();
        let mut num_nodes = 0;

        loop {
            // Expecting the start of a node
            parser.skip_comment_and_whitespace()?;
            if parser.consume_if(b'(') {
                open.push(Vec::new());
                continue;
            }
            if open.is_empty() {
                // Tree consisting of a single node
                let (label, branch_length) = self.parse_label_and_length(parser)?;
                self.expect_semicolon(parser)?;
                self.tree_builder.add_root(&[], label, branch_length);
                return Ok(num_nodes + 1);
            }
            let (label, branch_length) = self.parse_label_and_length(parser)?;
            let mut completed = self.tree_builder.add_leaf(label, branch_length);
            num_nodes += 1;

            // Completed a node, expecting ',' or ')'
            loop {
                parser.skip_comment_and_whitespace()?;
                let children = match open.last_mut() {
                    Some(children) => children,
                    None => return Err(ParsingError::from_parser(ParsingErrorType::InvalidTreeStructure, parser)),
                };
                children.push(completed);

                if parser.consume_if(b',') {
                    break;
                }
                if !parser.consume_if(b')') {
                    return Err(self.unexpected(parser, "',' or ')'"));
                }

                let children = open.pop().unwrap_or_default();
                let (label, branch_length) = self.parse_label_and_length(parser)?;
                num_nodes += 1;
                if open.is_empty() {
                    self.expect_semicolon(parser)?;
                    self.tree_builder.add_root(&children, label, branch_length);
                    trace!("Parsed Newick tree with {} nodes", num_nodes);
                    return Ok(num_nodes);
                }
                completed = self.tree_builder.add_internal(&children, label, branch_length);
            }
        }
    }

    /// Parses optional label and optional branch length `[label][:number]`.
    fn parse_label_and_length(
        &mut self,
        parser: &mut ByteParser,
    ) -> Result<(Option<String>, Option<f64>), ParsingError> {
        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser));
        }
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        let branch_length = self.parse_branch_length(parser)?;
        Ok((label, branch_length))
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - `Ok(Some(branch_length))` if found a branch length and was able to parse it
    /// - `Ok(None)` if no branch length found
    /// - [ParsingError] if the value is malformed, negative or not finite
    fn parse_branch_length(&mut self, parser: &mut ByteParser) -> Result<Option<f64>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let token = parser.parse_number_token();
        let value: f64 = token
            .parse()
            .map_err(|_| ParsingError::invalid_branch_length(parser, format!("'{}' is not a number", token)))?;
        if !value.is_finite() || value < 0.0 {
            return Err(ParsingError::invalid_branch_length(
                parser,
                format!("{} is negative or not finite", value),
            ));
        }
        Ok(Some(value))
    }

    /// Consumes the terminating `;`.
    fn expect_semicolon(&self, parser: &mut ByteParser) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.consume_if(b';') {
            Ok(())
        } else {
            Err(self.unexpected(parser, "';' at end of tree"))
        }
    }

    fn unexpected(&self, parser: &ByteParser, expected: &str) -> ParsingError {
        match parser.peek() {
            None => ParsingError::unexpected_eof(parser),
            Some(b) => ParsingError::invalid_newick_string(
                parser,
                format!("Expected {} but found {:?}", expected, char::from(b)),
            ),
        }
    }
}

// =#========================================================================#=
// NEWICK ITERATOR (lazy parser)
// =#========================================================================$=
/// Iterator to parse Newick trees.
///
/// Created by [NewickParser::into_iter()].
/// Yields `Result<T::Tree, ParsingError>` for each tree.
///
/// After iteration, the underlying [NewickParser] can be retrieved
/// via [into_parser()](Self::into_parser).
pub struct NewickIterator<T>
where
    T: TreeBuilder,
{
    parser: NewickParser<T>,
    byte_parser: ByteParser,
    done: bool,
}

impl<T> NewickIterator<T>
where
    T: TreeBuilder,
{
    /// Consumes the iterator and returns the underlying [NewickParser].
    pub fn into_parser(self) -> NewickParser<T> {
        self.parser
    }
}

impl<T> Iterator for NewickIterator<T>
where
    T: TreeBuilder,
{
    type Item = Result<T::Tree, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Skip whitespace and check EOF before each tree
        if let Err(e) = self.byte_parser.skip_comment_and_whitespace() {
            self.done = true;
            return Some(Err(e));
        }
        if self.byte_parser.is_eof() {
            self.done = true;
            return None;
        }

        let result = self.parser.parse_str(&mut self.byte_parser);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
