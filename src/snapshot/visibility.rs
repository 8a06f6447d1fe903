use crate::page::{NodeId, PageTree, Rect};
use std::collections::HashSet;

/// Coordinates beyond this edge are treated as deliberate CSS hiding
/// (`left: -9999px` and friends) rather than scroll-to-reveal positioning.
const OFF_SCREEN_THRESHOLD: f64 = -1000.0;

/// Whether a node is rendered at all
///
/// Visible means a non-empty bounding rect and no hiding style. A detached
/// node (no computed style) is not visible.
pub fn is_visible(tree: &PageTree, id: NodeId) -> bool {
    let node = tree.get(id);
    if node.rect.width <= 0.0 || node.rect.height <= 0.0 {
        return false;
    }
    match &node.style {
        Some(s) => s.display != "none" && s.visibility != "hidden" && s.opacity != 0.0,
        None => false,
    }
}

/// Whether a rect is intentionally parked far off-screen
///
/// Only large negative coordinates count; positive or small-magnitude
/// positions are legitimate "scroll to reveal" layout.
pub fn is_off_screen(rect: &Rect) -> bool {
    rect.right() < OFF_SCREEN_THRESHOLD || rect.bottom() < OFF_SCREEN_THRESHOLD
}

/// Find the visible stand-in for an off-screen checkbox/radio input
///
/// Pages routinely hide the real control and style a label or list item as
/// the clickable surface. Search order: `label[for]` association, wrapping
/// label, ancestor list item. The candidate must itself be visible and
/// on-screen.
pub fn find_visible_proxy(tree: &PageTree, id: NodeId) -> Option<NodeId> {
    let node = tree.get(id);
    if !node.is_tag("input") {
        return None;
    }
    let input_type = node.attr("type").unwrap_or("").to_ascii_lowercase();
    if input_type != "radio" && input_type != "checkbox" {
        return None;
    }

    let usable = |candidate: NodeId| {
        is_visible(tree, candidate) && !is_off_screen(&tree.get(candidate).rect)
    };

    // 1. label[for=id]
    if let Some(elem_id) = node.id() {
        let label = tree.iter().find(|&n| {
            let m = tree.get(n);
            m.is_tag("label") && m.attr("for") == Some(elem_id)
        });
        if let Some(label) = label {
            if usable(label) {
                return Some(label);
            }
        }
    }

    // 2. wrapping <label>
    if let Some(label) = tree.closest(id, |n| n.is_tag("label")) {
        if label != id && usable(label) {
            return Some(label);
        }
    }

    // 3. ancestor <li> (custom sort/filter widgets)
    if let Some(li) = tree.closest(id, |n| n.is_tag("li")) {
        if li != id && usable(li) {
            return Some(li);
        }
    }

    None
}

/// Resolution of one candidate against visibility rules
pub enum VisibilityOutcome {
    /// Use the element itself
    Direct,
    /// Off-screen control promoted to a visible proxy
    Proxied(NodeId),
    /// Not rendered, or off-screen with no proxy: drop it
    Drop,
}

/// Decide how (and whether) a candidate enters the snapshot
///
/// `claimed` prevents two off-screen siblings from being promoted to the
/// same visible proxy.
pub fn resolve_visibility(
    tree: &PageTree,
    id: NodeId,
    claimed: &mut HashSet<NodeId>,
) -> VisibilityOutcome {
    if !is_visible(tree, id) {
        return VisibilityOutcome::Drop;
    }
    if !is_off_screen(&tree.get(id).rect) {
        return VisibilityOutcome::Direct;
    }
    match find_visible_proxy(tree, id) {
        Some(proxy) if claimed.insert(proxy) => VisibilityOutcome::Proxied(proxy),
        // No proxy (genuinely inaccessible) or proxy already claimed
        _ => VisibilityOutcome::Drop,
    }
}
