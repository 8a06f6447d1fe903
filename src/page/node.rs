use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handle to a node inside a [`PageTree`](crate::page::PageTree) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Arena index of this node (document order)
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Bounding rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "w")]
    pub width: f64,
    #[serde(rename = "h")]
    pub height: f64,
}

impl Rect {
    /// Create a new Rect
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether any part of the rect lies inside a `w` x `h` viewport
    pub fn intersects_viewport(&self, w: f64, h: f64) -> bool {
        self.bottom() > 0.0 && self.y < h && self.right() > 0.0 && self.x < w
    }

    /// Integer-rounded rect for the wire format
    pub fn rounded(&self) -> ElementRect {
        ElementRect {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
            w: self.width.round() as i32,
            h: self.height.round() as i32,
        }
    }
}

/// Integer-rounded rectangle as emitted in snapshots
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElementRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// The subset of computed style the engine reads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComputedStyle {
    #[serde(default = "default_display")]
    pub display: String,

    #[serde(default = "default_visibility")]
    pub visibility: String,

    #[serde(default = "default_position")]
    pub position: String,

    #[serde(default = "default_opacity")]
    pub opacity: f32,

    #[serde(default, rename = "zIndex")]
    pub z_index: i32,
}

fn default_display() -> String {
    "block".to_string()
}

fn default_visibility() -> String {
    "visible".to_string()
}

fn default_position() -> String {
    "static".to_string()
}

fn default_opacity() -> f32 {
    1.0
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: default_display(),
            visibility: default_visibility(),
            position: default_position(),
            opacity: default_opacity(),
            z_index: 0,
        }
    }
}

impl ComputedStyle {
    /// Style that hides the element from layout entirely
    pub fn hidden() -> Self {
        Self { display: "none".to_string(), ..Self::default() }
    }
}

/// One element of the host page tree
///
/// Nodes are read-only from the engine's point of view; the builder methods
/// exist for capture deserialization and for constructing trees in tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageNode {
    /// Lowercased tag name (e.g. "div", "button", "input")
    pub tag: String,

    /// Element attributes (id, class, href, aria-*, data-*, ...)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Text directly inside this node, excluding descendants
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Computed style; `None` for a detached node with no layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ComputedStyle>,

    /// Bounding rectangle in viewport space
    #[serde(default)]
    pub rect: Rect,

    /// Current value of a form control
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Native boolean properties of form controls
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub readonly: bool,
    /// `multiple` property of select elements
    #[serde(default)]
    pub multiple: bool,
}

impl PageNode {
    /// Create a new node with default style and empty geometry
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: HashMap::new(),
            text: String::new(),
            style: Some(ComputedStyle::default()),
            rect: Rect::default(),
            value: None,
            checked: false,
            selected: false,
            disabled: false,
            required: false,
            readonly: false,
            multiple: false,
        }
    }

    /// Builder method: set a single attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method: set direct text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder method: set the bounding rect
    pub fn with_rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Rect::new(x, y, width, height);
        self
    }

    /// Builder method: set computed style
    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Builder method: mark the node as detached (no layout information)
    pub fn detached(mut self) -> Self {
        self.style = None;
        self
    }

    /// Builder method: set the form control value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Get attribute value by key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Get a trimmed, non-empty attribute value
    pub fn attr_trimmed(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    /// Element id attribute
    pub fn id(&self) -> Option<&str> {
        self.attr_trimmed("id")
    }

    /// Class attribute tokens
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Check if the node has a specific class token
    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes().any(|c| c == class_name)
    }

    /// Check if the node is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Explicit role attribute, trimmed
    pub fn explicit_role(&self) -> Option<&str> {
        self.attr_trimmed("role")
    }

    /// The node's computed z-index, 0 when detached or auto
    pub fn z_index(&self) -> i32 {
        self.style.as_ref().map(|s| s.z_index).unwrap_or(0)
    }

    /// Whether the node is positioned fixed or absolute
    pub fn is_fixed_or_absolute(&self) -> bool {
        self.style
            .as_ref()
            .map(|s| s.position == "fixed" || s.position == "absolute")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = PageNode::new("BUTTON")
            .with_attr("id", "submit-btn")
            .with_attr("class", "btn primary")
            .with_text("Submit")
            .with_rect(10.0, 20.0, 100.0, 30.0);

        assert_eq!(node.tag, "button");
        assert_eq!(node.id(), Some("submit-btn"));
        assert!(node.has_class("btn"));
        assert!(node.has_class("primary"));
        assert!(!node.has_class("secondary"));
        assert_eq!(node.text, "Submit");
        assert_eq!(node.rect.area(), 3000.0);
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(-50.0, 10.0, 30.0, 20.0);
        assert_eq!(rect.right(), -20.0);
        assert_eq!(rect.bottom(), 30.0);
        assert!(rect.intersects_viewport(1280.0, 720.0));

        let off = Rect::new(-2000.0, 0.0, 10.0, 10.0);
        assert!(!off.intersects_viewport(1280.0, 720.0));
    }

    #[test]
    fn test_rect_rounding() {
        let rect = Rect::new(10.4, 20.6, 99.5, 30.2);
        let rounded = rect.rounded();
        assert_eq!(rounded, ElementRect { x: 10, y: 21, w: 100, h: 30 });
    }

    #[test]
    fn test_style_defaults() {
        let style: ComputedStyle = serde_json::from_str("{}").unwrap();
        assert_eq!(style.display, "block");
        assert_eq!(style.visibility, "visible");
        assert_eq!(style.position, "static");
        assert_eq!(style.opacity, 1.0);
        assert_eq!(style.z_index, 0);
    }

    #[test]
    fn test_detached_node_has_no_style() {
        let node = PageNode::new("a").detached();
        assert!(node.style.is_none());
        assert_eq!(node.z_index(), 0);
        assert!(!node.is_fixed_or_absolute());
    }

    #[test]
    fn test_node_serialization_roundtrip() {
        let node = PageNode::new("input")
            .with_attr("type", "checkbox")
            .with_value("on")
            .with_rect(0.0, 0.0, 16.0, 16.0);

        let json = serde_json::to_string(&node).unwrap();
        let back: PageNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
