//! Semantic classification of page nodes
//!
//! Pure functions over a single node (plus tree context for label lookups):
//! - accessible-name resolution with label-source tracking
//! - semantic role inference (explicit role, then implicit tag semantics)
//! - interaction state extraction

pub mod name;
pub mod role;
pub mod states;

pub use name::{resolve_name, LabelSource};
pub use role::resolve_role;
pub use states::{extract_states, ElementStates};

/// Collapse runs of whitespace and cap the result at `max` characters
pub(crate) fn collapse_ws(text: &str, max: usize) -> String {
    let collapsed: Vec<&str> = text.split_whitespace().collect();
    let joined = collapsed.join(" ");
    truncate_chars(&joined, max)
}

/// Truncate on a character boundary
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_ws() {
        assert_eq!(collapse_ws("  Add \n\t to   cart ", 200), "Add to cart");
        assert_eq!(collapse_ws("abcdef", 3), "abc");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        // Truncation must not split a multi-byte character
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
