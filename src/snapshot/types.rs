use crate::classify::{ElementStates, LabelSource};
use crate::page::ElementRect;
use serde::{Deserialize, Serialize};

/// Version tag carried by every snapshot
pub const SCHEMA_VERSION: u32 = 1;

/// Hard cap on extracted elements per snapshot
pub const MAX_ELEMENTS: usize = 200;

/// One extracted interactive affordance
///
/// Created fresh per snapshot and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractiveElement {
    /// Stable content-derived identifier, unique within one snapshot
    pub eid: String,

    /// Tag of the element the user actually interacts with (the proxy's tag
    /// when a hidden control was promoted)
    pub tag: String,

    /// Resolved semantic role, empty when none
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,

    /// Resolved accessible name, at most 200 characters
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Which rule of the name chain produced `name`
    #[serde(rename = "labelSource")]
    pub label_source: LabelSource,

    /// Current value of a form control or contenteditable region
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,

    /// aria-describedby text, at most 200 characters
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    pub states: ElementStates,

    /// Re-query expression for the clickable element (best-effort)
    pub selector: String,

    /// Integer-rounded viewport rectangle
    pub rect: ElementRect,

    /// Short human-readable ancestor descriptor
    #[serde(rename = "parentContext", default, skip_serializing_if = "String::is_empty")]
    pub parent_context: String,

    /// Nearest enclosing landmark region, empty when none
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub landmark: String,

    /// Whether the element sits inside the detected active layer
    #[serde(rename = "inActiveLayer", default, skip_serializing_if = "std::ops::Not::not")]
    pub in_active_layer: bool,

    /// Nearest enclosing block, empty when none
    #[serde(rename = "blockId", default, skip_serializing_if = "String::is_empty")]
    pub block_id: String,

    /// Titles of every enclosing block, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breadcrumbs: Vec<String>,
}

/// Kind of the detected active layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// ARIA-marked dialog
    Modal,
    /// Heuristically detected covering layer
    Overlay,
}

/// Active-layer summary carried in a snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActiveLayerInfo {
    pub present: bool,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<LayerKind>,

    /// Block id of the layer root; always resolvable when `present`
    #[serde(rename = "rootBlockId", default, skip_serializing_if = "String::is_empty")]
    pub root_block_id: String,
}

/// A named structural grouping of elements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    #[serde(rename = "blockId")]
    pub block_id: String,

    /// Resolved region/role name of the container
    #[serde(rename = "type")]
    pub kind: String,

    /// Best-effort label, may be empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Member eids in snapshot order
    #[serde(default)]
    pub children: Vec<String>,
}

/// Visible text captured from a modal/announcement layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Overlay {
    pub tag: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,

    #[serde(rename = "className", default, skip_serializing_if = "String::is_empty")]
    pub class_name: String,

    /// Rendered text, at most 500 characters
    pub text: String,

    pub rect: ElementRect,

    #[serde(rename = "zIndex")]
    pub z_index: i32,

    pub position: String,
}

/// One bounded observation of a page's interactive surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(rename = "schemaVersion")]
    pub schema_version: u32,

    /// Short human-readable page digest
    #[serde(rename = "treeSummary", default, skip_serializing_if = "String::is_empty")]
    pub tree_summary: String,

    pub elements: Vec<InteractiveElement>,

    #[serde(rename = "elementCount")]
    pub element_count: usize,

    #[serde(rename = "activeLayer", default)]
    pub active_layer: ActiveLayerInfo,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overlays: Vec<Overlay>,

    /// Set when extraction failed; the rest of the snapshot is empty then
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Snapshot {
    /// A well-formed empty snapshot carrying an error marker
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            tree_summary: String::new(),
            elements: Vec::new(),
            element_count: 0,
            active_layer: ActiveLayerInfo::default(),
            blocks: Vec::new(),
            overlays: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Find an element by its eid
    pub fn element(&self, eid: &str) -> Option<&InteractiveElement> {
        self.elements.iter().find(|el| el.eid == eid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_snapshot_shape() {
        let snap = Snapshot::from_error("boom");
        assert_eq!(snap.schema_version, SCHEMA_VERSION);
        assert!(snap.elements.is_empty());
        assert_eq!(snap.element_count, 0);
        assert!(!snap.active_layer.present);
        assert_eq!(snap.error.as_deref(), Some("boom"));

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["elementCount"], 0);
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn test_layer_kind_serialization() {
        assert_eq!(serde_json::to_string(&LayerKind::Modal).unwrap(), "\"modal\"");
        assert_eq!(serde_json::to_string(&LayerKind::Overlay).unwrap(), "\"overlay\"");
    }
}
