use crate::page::PageNode;
use serde::{Deserialize, Serialize};

/// Interaction states of an element
///
/// Each boolean is the native property OR its ARIA equivalent; `expanded` has
/// no native counterpart and is tri-state (absent when aria-expanded is not
/// set).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElementStates {
    pub disabled: bool,
    pub checked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    pub selected: bool,
    pub required: bool,
    pub readonly: bool,
}

/// Extract interaction states from a node
pub fn extract_states(node: &PageNode) -> ElementStates {
    ElementStates {
        disabled: node.disabled || aria_true(node, "aria-disabled"),
        checked: node.checked || aria_true(node, "aria-checked"),
        expanded: match node.attr("aria-expanded") {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        },
        selected: node.selected || aria_true(node, "aria-selected"),
        required: node.required || aria_true(node, "aria-required"),
        readonly: node.readonly || aria_true(node, "aria-readonly"),
    }
}

fn aria_true(node: &PageNode, attr: &str) -> bool {
    node.attr(attr) == Some("true")
}
