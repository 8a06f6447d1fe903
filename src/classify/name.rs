use crate::classify::collapse_ws;
use crate::page::{NodeId, PageTree};
use serde::{Deserialize, Serialize};

/// Maximum length of a resolved accessible name
const NAME_MAX: usize = 200;

/// Which rule of the accessible-name chain produced the name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelSource {
    LabelledBy,
    AriaLabel,
    LabelFor,
    AncestorLabel,
    Alt,
    Title,
    Placeholder,
    /// Rendered visible text (layout-aware, hidden descendants skipped)
    Text,
    /// Raw text content, used when layout information is unavailable
    TextContent,
    Value,
    Unknown,
}

impl LabelSource {
    /// Sources worth calling out in the consumer line format; text and
    /// aria-label are the expected cases and stay implicit.
    pub fn is_notable(&self) -> bool {
        !matches!(self, LabelSource::Text | LabelSource::AriaLabel | LabelSource::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelSource::LabelledBy => "labelled-by",
            LabelSource::AriaLabel => "aria-label",
            LabelSource::LabelFor => "label-for",
            LabelSource::AncestorLabel => "ancestor-label",
            LabelSource::Alt => "alt",
            LabelSource::Title => "title",
            LabelSource::Placeholder => "placeholder",
            LabelSource::Text => "text",
            LabelSource::TextContent => "text-content",
            LabelSource::Value => "value",
            LabelSource::Unknown => "unknown",
        }
    }
}

/// Resolve the accessible name of a node (simplified WAI-ARIA computation)
///
/// Ordered rule chain, first non-empty match wins. The result is
/// whitespace-collapsed and capped at 200 characters.
pub fn resolve_name(tree: &PageTree, id: NodeId) -> (String, LabelSource) {
    let node = tree.get(id);

    // 1. aria-labelledby: concatenated text of the referenced elements
    if let Some(refs) = node.attr_trimmed("aria-labelledby") {
        let parts: Vec<String> = refs
            .split_whitespace()
            .filter_map(|ref_id| tree.element_by_id(ref_id))
            .map(|ref_node| tree.text_content(ref_node))
            .filter(|t| !t.is_empty())
            .collect();
        if !parts.is_empty() {
            return (collapse_ws(&parts.join(" "), NAME_MAX), LabelSource::LabelledBy);
        }
    }

    // 2. aria-label
    if let Some(label) = node.attr_trimmed("aria-label") {
        return (collapse_ws(label, NAME_MAX), LabelSource::AriaLabel);
    }

    // 3. <label for="...">
    if let Some(elem_id) = node.id() {
        if let Some(label) = label_for(tree, elem_id) {
            let txt = tree.text_content(label);
            if !txt.is_empty() {
                return (collapse_ws(&txt, NAME_MAX), LabelSource::LabelFor);
            }
        }
    }

    // 4. wrapping <label>
    if let Some(label) = tree.closest(id, |n| n.is_tag("label")) {
        if label != id {
            let txt = tree.text_content(label);
            if !txt.is_empty() {
                return (collapse_ws(&txt, NAME_MAX), LabelSource::AncestorLabel);
            }
        }
    }

    // 5. alt (img, area, input[type=image])
    if let Some(alt) = node.attr_trimmed("alt") {
        return (collapse_ws(alt, NAME_MAX), LabelSource::Alt);
    }

    // 6. title
    if let Some(title) = node.attr_trimmed("title") {
        return (collapse_ws(title, NAME_MAX), LabelSource::Title);
    }

    // 7. placeholder
    if let Some(placeholder) = node.attr_trimmed("placeholder") {
        return (collapse_ws(placeholder, NAME_MAX), LabelSource::Placeholder);
    }

    // 8. rendered text for clickable elements
    let role = node.explicit_role().unwrap_or("");
    if matches!(node.tag.as_str(), "button" | "a" | "summary") || role == "button" || role == "link"
    {
        match tree.visible_text(id) {
            Some(txt) if !txt.trim().is_empty() => {
                return (collapse_ws(&txt, NAME_MAX), LabelSource::Text);
            }
            Some(_) => {}
            // Detached node: no layout, fall back to raw text content
            None => {
                let txt = tree.text_content(id);
                if !txt.is_empty() {
                    return (collapse_ws(&txt, NAME_MAX), LabelSource::TextContent);
                }
            }
        }
    }

    // 9. value for submit/reset/plain-button inputs
    if node.is_tag("input") {
        let input_type = node.attr("type").unwrap_or("text").to_ascii_lowercase();
        if matches!(input_type.as_str(), "submit" | "reset" | "button") {
            if let Some(val) = node.attr_trimmed("value") {
                return (collapse_ws(val, NAME_MAX), LabelSource::Value);
            }
        }
    }

    (String::new(), LabelSource::Unknown)
}

/// Find a `<label>` whose `for` attribute references `elem_id`
fn label_for(tree: &PageTree, elem_id: &str) -> Option<NodeId> {
    tree.iter().find(|&n| {
        let node = tree.get(n);
        node.is_tag("label") && node.attr("for") == Some(elem_id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ComputedStyle, PageNode, Viewport};

    fn empty_tree() -> (PageTree, NodeId) {
        let mut tree = PageTree::new("", "", Viewport::default());
        let body = tree.insert(None, PageNode::new("body"));
        (tree, body)
    }

    #[test]
    fn test_labelled_by_concatenates_references() {
        let (mut tree, body) = empty_tree();
        tree.insert(Some(body), PageNode::new("span").with_attr("id", "a").with_text("First"));
        tree.insert(Some(body), PageNode::new("span").with_attr("id", "b").with_text("Second"));
        let input = tree.insert(
            Some(body),
            PageNode::new("input").with_attr("aria-labelledby", "a b missing"),
        );

        let (name, source) = resolve_name(&tree, input);
        assert_eq!(name, "First Second");
        assert_eq!(source, LabelSource::LabelledBy);
    }

    #[test]
    fn test_aria_label_beats_label_for() {
        let (mut tree, body) = empty_tree();
        tree.insert(Some(body), PageNode::new("label").with_attr("for", "q").with_text("Query"));
        let input = tree.insert(
            Some(body),
            PageNode::new("input").with_attr("id", "q").with_attr("aria-label", "Search"),
        );

        let (name, source) = resolve_name(&tree, input);
        assert_eq!(name, "Search");
        assert_eq!(source, LabelSource::AriaLabel);
    }

    #[test]
    fn test_label_for_association() {
        let (mut tree, body) = empty_tree();
        tree.insert(Some(body), PageNode::new("label").with_attr("for", "email").with_text("Email address"));
        let input = tree.insert(Some(body), PageNode::new("input").with_attr("id", "email"));

        let (name, source) = resolve_name(&tree, input);
        assert_eq!(name, "Email address");
        assert_eq!(source, LabelSource::LabelFor);
    }

    #[test]
    fn test_wrapping_label() {
        let (mut tree, body) = empty_tree();
        let label = tree.insert(Some(body), PageNode::new("label").with_text("Remember me"));
        let input = tree.insert(Some(label), PageNode::new("input").with_attr("type", "checkbox"));

        let (name, source) = resolve_name(&tree, input);
        assert_eq!(name, "Remember me");
        assert_eq!(source, LabelSource::AncestorLabel);
    }

    #[test]
    fn test_alt_title_placeholder_order() {
        let (mut tree, body) = empty_tree();
        let img = tree.insert(
            Some(body),
            PageNode::new("img").with_attr("alt", "Logo").with_attr("title", "Home"),
        );
        assert_eq!(resolve_name(&tree, img), ("Logo".to_string(), LabelSource::Alt));

        let (mut tree, body) = empty_tree();
        let input = tree.insert(
            Some(body),
            PageNode::new("input").with_attr("title", "Amount").with_attr("placeholder", "0.00"),
        );
        assert_eq!(resolve_name(&tree, input), ("Amount".to_string(), LabelSource::Title));

        let (mut tree, body) = empty_tree();
        let input = tree.insert(Some(body), PageNode::new("input").with_attr("placeholder", "0.00"));
        assert_eq!(resolve_name(&tree, input), ("0.00".to_string(), LabelSource::Placeholder));
    }

    #[test]
    fn test_button_visible_text_skips_hidden() {
        let (mut tree, body) = empty_tree();
        let button = tree.insert(Some(body), PageNode::new("button").with_text("Buy now"));
        tree.insert(
            Some(button),
            PageNode::new("span").with_text("(internal)").with_style(ComputedStyle::hidden()),
        );

        let (name, source) = resolve_name(&tree, button);
        assert_eq!(name, "Buy now");
        assert_eq!(source, LabelSource::Text);
    }

    #[test]
    fn test_detached_button_falls_back_to_text_content() {
        let (mut tree, body) = empty_tree();
        let button = tree.insert(Some(body), PageNode::new("button").with_text("Save").detached());

        let (name, source) = resolve_name(&tree, button);
        assert_eq!(name, "Save");
        assert_eq!(source, LabelSource::TextContent);
    }

    #[test]
    fn test_submit_input_value() {
        let (mut tree, body) = empty_tree();
        let input = tree.insert(
            Some(body),
            PageNode::new("input").with_attr("type", "submit").with_attr("value", "Order"),
        );

        let (name, source) = resolve_name(&tree, input);
        assert_eq!(name, "Order");
        assert_eq!(source, LabelSource::Value);
    }

    #[test]
    fn test_unnamed_element() {
        let (mut tree, body) = empty_tree();
        let div = tree.insert(Some(body), PageNode::new("div").with_attr("role", "checkbox"));

        let (name, source) = resolve_name(&tree, div);
        assert_eq!(name, "");
        assert_eq!(source, LabelSource::Unknown);
    }

    #[test]
    fn test_name_truncated_to_200_chars() {
        let (mut tree, body) = empty_tree();
        let long = "x".repeat(400);
        let button = tree.insert(Some(body), PageNode::new("button").with_attr("aria-label", long));

        let (name, _) = resolve_name(&tree, button);
        assert_eq!(name.chars().count(), 200);
    }

    #[test]
    fn test_label_source_serialization() {
        assert_eq!(serde_json::to_string(&LabelSource::LabelFor).unwrap(), "\"label-for\"");
        assert_eq!(serde_json::to_string(&LabelSource::LabelledBy).unwrap(), "\"labelled-by\"");
        assert_eq!(serde_json::to_string(&LabelSource::TextContent).unwrap(), "\"text-content\"");
    }
}
