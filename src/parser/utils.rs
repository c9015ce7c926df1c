//! Utility functions for label escaping in Newick strings.

/// Characters that end an unquoted Newick label.
const SPECIAL_CHARS: &[char] = &[' ', ',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\''];

/// Checks if a label can be written without quotes.
///
/// # Examples
/// ```
/// # use phylgebra::parser::utils::is_plain;
/// assert!(is_plain("Pukeko"));
/// assert!(is_plain("Australasian_Swamphen"));
/// assert!(!is_plain("Australasian Swamphen"));
/// assert!(!is_plain("Pu[ke]ko"));
/// assert!(!is_plain(""));
/// ```
pub fn is_plain(label: &str) -> bool {
    !label.is_empty() && !label.contains(SPECIAL_CHARS)
}

/// Escapes a label for use in a Newick string.
///
/// Labels containing whitespace or Newick punctuation are wrapped in single
/// quotes, with internal single quotes doubled. Reading the result back
/// yields the original label.
///
/// # Examples
/// ```
/// # use phylgebra::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// assert_eq!(escape_label("80:X"), "'80:X'");
/// ```
pub fn escape_label(label: &str) -> String {
    if is_plain(label) {
        label.to_string()
    } else {
        format!("'{}'", label.replace('\'', "''"))
    }
}
