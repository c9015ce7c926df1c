//! Newick format writing for [PhyloTree]s.

use crate::model::label::encode_label;
use crate::model::{Node, NodeIndex, PhyloTree};
use crate::newick::defs::BUFFER_CHARS;
use crate::parser::utils::escape_label;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Style for serializing a tree to Newick format,
/// controlling which node attributes end up in the output string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewickStyle {
    /// Names, supports (as label prefix) and branch lengths
    #[default]
    Full,
    /// Names and supports, but no branch lengths
    NoLengths,
    /// Leaf names only
    TopologyOnly,
}

/// Writes given list of trees to a file in Newick format, one tree per line.
///
/// # Arguments
/// * `path` - Path of the file to (over)write
/// * `trees` - Trees to write
/// * `style` - The [NewickStyle] used for all trees
///
/// # Errors
/// Returns an I/O error if creating or writing the file fails.
pub fn write_newick_file<P: AsRef<Path>>(path: P, trees: &[PhyloTree], style: NewickStyle) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for tree in trees {
        writer.write_all(to_newick(tree, style).as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Returns the Newick representation of a tree with closing semicolon.
///
/// Labels are escaped where needed, so that parsing the result yields the
/// same names. An assigned support is written in front of the name
/// (see [encode_label]), a support still embedded in the name stays as it is.
///
/// # Example
/// ```
/// use phylgebra::newick::{to_newick, NewickStyle};
/// use phylgebra::parse_newick_str;
///
/// let tree = parse_newick_str("((A:1,'B b':2)95:0.5,C:1.5);").unwrap();
/// assert_eq!(to_newick(&tree, NewickStyle::Full), "((A:1,'B b':2)95:0.5,C:1.5);");
/// assert_eq!(to_newick(&tree, NewickStyle::NoLengths), "((A,'B b')95,C);");
/// assert_eq!(to_newick(&tree, NewickStyle::TopologyOnly), "((A,'B b'),C);");
/// ```
pub fn to_newick(tree: &PhyloTree, style: NewickStyle) -> String {
    let mut newick = String::with_capacity(estimate_newick_len(tree, style));
    if !tree.is_root_set() {
        newick.push(';');
        return newick;
    }

    let mut stack = vec![Step::Enter(tree.root_index())];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(index) if tree[index].is_internal() => {
                newick.push('(');
                stack.push(Step::Leave(index));
                // Reversed, so the first child is written first
                for (i, &child) in tree[index].children().iter().enumerate().rev() {
                    stack.push(Step::Enter(child));
                    if i > 0 {
                        stack.push(Step::Comma);
                    }
                }
            }
            Step::Enter(index) => push_node_label(&mut newick, &tree[index], style),
            Step::Leave(index) => {
                newick.push(')');
                push_node_label(&mut newick, &tree[index], style);
            }
            Step::Comma => newick.push(','),
        }
    }

    newick.push(';');
    newick
}

/// Pending work while writing a tree without recursion.
enum Step {
    /// Write the node (and open its children)
    Enter(NodeIndex),
    /// Close the children of the node and write its label
    Leave(NodeIndex),
    Comma,
}

/// Appends label and branch length of `node` according to `style`.
fn push_node_label(newick: &mut String, node: &Node, style: NewickStyle) {
    let label = match style {
        NewickStyle::TopologyOnly if node.is_leaf() => node.name().map(str::to_string),
        NewickStyle::TopologyOnly => None,
        NewickStyle::Full | NewickStyle::NoLengths => encode_label(node.name(), node.assigned_support()),
    };
    if let Some(label) = label.filter(|l| !l.is_empty()) {
        newick.push_str(&escape_label(&label));
    }

    if style == NewickStyle::Full
        && let Some(length) = node.branch_length()
    {
        newick.push(':');
        newick.push_str(&length.to_string());
    }
}

/// Estimates the length of a Newick string for a given tree,
/// used to pre-allocate string capacity.
fn estimate_newick_len(tree: &PhyloTree, style: NewickStyle) -> usize {
    // Parentheses and commas, roughly two per node
    const STRUCTURE_CHARS: usize = 2;
    // Branch lengths: ~20 chars each (e.g., ":0.009529961339106089")
    const BRANCH_LENGTH_CHARS: usize = 20;

    if !tree.is_root_set() {
        return BUFFER_CHARS;
    }
    let num_nodes = tree.num_nodes();
    let label_chars: usize = tree.pre_order_iter().filter_map(|n| n.name()).map(str::len).sum();
    let length_chars = if style == NewickStyle::Full {
        num_nodes * BRANCH_LENGTH_CHARS
    } else {
        0
    };

    num_nodes * STRUCTURE_CHARS + label_chars + length_chars + BUFFER_CHARS
}
