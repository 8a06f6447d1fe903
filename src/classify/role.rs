use crate::page::{NodeId, PageTree};

/// Resolve the semantic role of a node
///
/// An explicit `role` attribute always wins; otherwise the implicit role is
/// derived from the tag (with sub-type dispatch for `input` and `select`).
/// Returns an empty string when the node has no semantic role.
pub fn resolve_role(tree: &PageTree, id: NodeId) -> String {
    let node = tree.get(id);
    if let Some(explicit) = node.explicit_role() {
        return explicit.to_string();
    }
    implicit_role(tree, id).unwrap_or("").to_string()
}

/// Implicit role from tag semantics
fn implicit_role(tree: &PageTree, id: NodeId) -> Option<&'static str> {
    let node = tree.get(id);
    match node.tag.as_str() {
        // Anchors are links only when they navigate somewhere
        "a" => node.attr("href").map(|_| "link"),
        "button" => Some("button"),
        "input" => Some(input_role(node.attr("type").unwrap_or("text"))),
        "select" => Some(if node.multiple { "listbox" } else { "combobox" }),
        "textarea" => Some("textbox"),
        "summary" => Some("button"),
        "img" => Some("img"),
        "nav" => Some("navigation"),
        "main" => Some("main"),
        "header" => Some("banner"),
        "footer" => Some("contentinfo"),
        "aside" => Some("complementary"),
        "form" => Some("form"),
        // A section is only a region when it carries a label
        "section" => {
            if node.attr("aria-label").is_some() || node.attr("aria-labelledby").is_some() {
                Some("region")
            } else {
                None
            }
        }
        "ul" | "ol" => Some("list"),
        "li" => Some("listitem"),
        "table" => Some("table"),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some("heading"),
        _ => None,
    }
}

/// Role of an `input` element by its `type` attribute
fn input_role(input_type: &str) -> &'static str {
    match input_type.to_ascii_lowercase().as_str() {
        "search" => "searchbox",
        "number" => "spinbutton",
        "range" => "slider",
        "checkbox" => "checkbox",
        "radio" => "radio",
        "submit" | "reset" | "button" | "image" => "button",
        // text, email, url, tel, password and anything unrecognized
        _ => "textbox",
    }
}
