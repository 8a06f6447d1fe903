use crate::page::{NodeId, PageTree};
use crate::snapshot::types::LayerKind;
use crate::snapshot::visibility::is_visible;

/// Stacking order at or above which a node counts as overlay material
const MIN_OVERLAY_Z: i32 = 900;

/// Minimum share of the viewport a covering layer must occupy
const MIN_VIEWPORT_COVERAGE: f64 = 0.1;

/// Page-chrome tags that never count as overlays
const CHROME_TAGS: [&str; 4] = ["header", "nav", "footer", "aside"];

/// Result of modal/overlay detection, computed once per snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveLayerResult {
    pub present: bool,
    pub kind: Option<LayerKind>,
    pub root: Option<NodeId>,
}

impl ActiveLayerResult {
    pub fn absent() -> Self {
        Self { present: false, kind: None, root: None }
    }
}

/// Whether the node is explicitly marked as a dialog
pub fn is_dialog_marked(tree: &PageTree, id: NodeId) -> bool {
    let node = tree.get(id);
    node.explicit_role() == Some("dialog") || node.attr("aria-modal") == Some("true")
}

fn has_modal_class(tree: &PageTree, id: NodeId) -> bool {
    tree.get(id).classes().any(|c| {
        let lower = c.to_ascii_lowercase();
        lower.contains("modal") || lower.contains("popup") || lower.contains("dialog")
    })
}

fn covers_viewport(tree: &PageTree, id: NodeId) -> bool {
    let viewport = tree.viewport();
    let vp_area = viewport.w * viewport.h;
    vp_area > 0.0 && tree.get(id).rect.area() >= vp_area * MIN_VIEWPORT_COVERAGE
}

/// Collect modal/overlay candidates: three independent passes, merged
///
/// (a) explicit ARIA dialog marking; (b) modal/popup/dialog class convention
/// with fixed/absolute positioning, high stacking order and >=10% viewport
/// coverage; (c) any fixed node with high stacking order and >=10% coverage.
/// Page-chrome tags and unrendered nodes are excluded throughout. This is a
/// bounded heuristic, not a general classifier.
pub fn discover_layer_candidates(tree: &PageTree) -> Vec<NodeId> {
    let mut out = Vec::new();
    for id in tree.iter() {
        let node = tree.get(id);
        if CHROME_TAGS.contains(&node.tag.as_str()) {
            continue;
        }
        if !is_visible(tree, id) {
            continue;
        }

        let aria = is_dialog_marked(tree, id);
        let class = has_modal_class(tree, id)
            && node.is_fixed_or_absolute()
            && node.z_index() >= MIN_OVERLAY_Z
            && covers_viewport(tree, id);
        let style = node.style.as_ref().is_some_and(|s| s.position == "fixed")
            && node.z_index() >= MIN_OVERLAY_Z
            && covers_viewport(tree, id);

        if aria || class || style {
            out.push(id);
        }
    }
    out
}

/// Detect the currently foregrounded modal/overlay root
///
/// Candidates are ranked by stacking order descending, then area ascending:
/// at equal stacking order the smaller box is assumed to be the dialog and
/// the bigger one its backdrop. When a generic overlay wins, a dialog-marked
/// candidate contained in it is promoted instead (backdrop correction).
pub fn detect_active_layer(tree: &PageTree) -> ActiveLayerResult {
    let mut candidates = discover_layer_candidates(tree);
    if candidates.is_empty() {
        return ActiveLayerResult::absent();
    }

    candidates.sort_by(|&a, &b| {
        let za = tree.get(a).z_index();
        let zb = tree.get(b).z_index();
        zb.cmp(&za).then_with(|| {
            tree.get(a)
                .rect
                .area()
                .partial_cmp(&tree.get(b).rect.area())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });

    let mut root = candidates[0];
    if !is_dialog_marked(tree, root) {
        if let Some(&dialog) = candidates[1..]
            .iter()
            .find(|&&c| is_dialog_marked(tree, c) && tree.contains(root, c) && c != root)
        {
            log::debug!("active layer: promoting dialog inside generic overlay winner");
            root = dialog;
        }
    }

    let kind = if is_dialog_marked(tree, root) { LayerKind::Modal } else { LayerKind::Overlay };
    ActiveLayerResult { present: true, kind: Some(kind), root: Some(root) }
}
