//! Compound node labels: support values and names sharing one string.
//!
//! Tree files often store the support of a branch as the label of the node
//! below it, either alone (`"75"`) or in front of a name (`"75:Bacteria"`).
//! [decode_label] tells these cases apart, [assign_supports] moves the values
//! out of the names into the support field of each node, and [encode_label]
//! rebuilds the string when writing trees.

use crate::model::node::Node;
use crate::model::tree::PhyloTree;
use log::debug;

/// Decoded content of a node label.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    /// Plain name, e.g. `"Bacteria"`
    Name(String),
    /// Support value only, e.g. `"75"`
    Support(f64),
    /// Support value followed by a name, e.g. `"75:Bacteria"`
    Both(f64, String),
    /// No label
    Empty,
}

/// Decodes a raw label into its support and name parts.
///
/// A label counts as support value if it is a finite decimal number;
/// words like `nan` or `inf` are names. A compound label `"<number>:<rest>"`
/// is split at the first `:` only, so the name part may contain further colons.
///
/// # Example
/// ```
/// use phylgebra::model::label::{decode_label, Label};
///
/// assert_eq!(decode_label("0.95"), Label::Support(0.95));
/// assert_eq!(decode_label("80:X"), Label::Both(80.0, "X".to_string()));
/// assert_eq!(decode_label("x"), Label::Name("x".to_string()));
/// assert_eq!(decode_label(""), Label::Empty);
/// ```
pub fn decode_label(raw: &str) -> Label {
    if raw.is_empty() {
        return Label::Empty;
    }

    if let Some(value) = parse_number(raw) {
        return Label::Support(value);
    }

    if let Some((head, rest)) = raw.split_once(':')
        && let Some(value) = parse_number(head)
    {
        return if rest.is_empty() {
            Label::Support(value)
        } else {
            Label::Both(value, rest.to_string())
        };
    }

    Label::Name(raw.to_string())
}

/// Encodes a name and a support value into one label; inverse of [decode_label].
///
/// Returns `None` if both parts are absent.
pub fn encode_label(name: Option<&str>, support: Option<f64>) -> Option<String> {
    match (support, name.filter(|n| !n.is_empty())) {
        (Some(value), Some(name)) => Some(format!("{}:{}", value, name)),
        (Some(value), None) => Some(value.to_string()),
        (None, Some(name)) => Some(name.to_string()),
        (None, None) => None,
    }
}

/// Returns the support value of a node.
///
/// Reads the value from the label if it is numeric or compound, and falls
/// back to the support field populated by [assign_supports] otherwise.
pub fn support(node: &Node) -> Option<f64> {
    match node.name().map(decode_label) {
        Some(Label::Support(value)) | Some(Label::Both(value, _)) => Some(value),
        _ => node.assigned_support(),
    }
}

/// Moves support values out of the labels of all internal, non-root nodes.
///
/// A label that is a pure support value is cleared; a compound label keeps
/// its name part. Leaves and the root are never touched and plain names stay,
/// so calling this twice has no further effect.
pub fn assign_supports(tree: &mut PhyloTree) {
    let root = tree.root_index();
    let candidates: Vec<_> = tree
        .pre_order_iter()
        .filter(|n| n.is_internal() && n.index() != root)
        .map(|n| n.index())
        .collect();

    let mut assigned = 0;
    for index in candidates {
        let decoded = match tree[index].name() {
            Some(raw) => decode_label(raw),
            None => continue,
        };
        let node = &mut tree[index];
        match decoded {
            Label::Support(value) => {
                node.set_support(Some(value));
                node.set_name(None);
            }
            Label::Both(value, name) => {
                node.set_support(Some(value));
                node.set_name(Some(name));
            }
            Label::Name(_) | Label::Empty => continue,
        }
        assigned += 1;
    }
    debug!("Assigned support values to {} nodes", assigned);
}

/// Parses `s` as finite decimal number, rejecting `nan`, `inf` and friends.
fn parse_number(s: &str) -> Option<f64> {
    let starts_numeric = s
        .trim_start_matches(['+', '-'])
        .starts_with(|c: char| c.is_ascii_digit() || c == '.');
    if !starts_numeric {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_support() {
        assert_eq!(decode_label("75"), Label::Support(75.0));
        assert_eq!(decode_label("0.85"), Label::Support(0.85));
        assert_eq!(decode_label("1e2"), Label::Support(100.0));
    }

    #[test]
    fn test_decode_compound() {
        assert_eq!(decode_label("80:X"), Label::Both(80.0, "X".to_string()));
        assert_eq!(decode_label("1.0:a:b"), Label::Both(1.0, "a:b".to_string()));
        assert_eq!(decode_label("95:"), Label::Support(95.0));
    }

    #[test]
    fn test_decode_names() {
        assert_eq!(decode_label("x"), Label::Name("x".to_string()));
        assert_eq!(decode_label("x:80"), Label::Name("x:80".to_string()));
        assert_eq!(decode_label("nan"), Label::Name("nan".to_string()));
        assert_eq!(decode_label("inf:X"), Label::Name("inf:X".to_string()));
        assert_eq!(decode_label("Infinity"), Label::Name("Infinity".to_string()));
        assert_eq!(decode_label(""), Label::Empty);
    }

    #[test]
    fn test_encode_inverts_decode() {
        assert_eq!(encode_label(None, Some(75.0)).as_deref(), Some("75"));
        assert_eq!(encode_label(Some("X"), Some(0.5)).as_deref(), Some("0.5:X"));
        assert_eq!(encode_label(Some("X"), None).as_deref(), Some("X"));
        assert_eq!(encode_label(Some(""), None), None);
        assert_eq!(encode_label(None, None), None);

        assert_eq!(decode_label("0.5:X"), Label::Both(0.5, "X".to_string()));
    }

    #[test]
    fn test_support_falls_back_to_field() {
        let mut node = Node::new(0, Some("x".to_string()), None);
        assert_eq!(support(&node), None);

        node.set_support(Some(0.9));
        assert_eq!(support(&node), Some(0.9));

        node.set_name(Some("70".to_string()));
        assert_eq!(support(&node), Some(70.0));
    }
}
