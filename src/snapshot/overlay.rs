use crate::classify::collapse_ws;
use crate::classify::truncate_chars;
use crate::page::{NodeId, PageTree};
use crate::snapshot::layer::discover_layer_candidates;
use crate::snapshot::types::Overlay;
use crate::snapshot::visibility::is_visible;

/// Maximum overlays captured per snapshot
const MAX_OVERLAYS: usize = 5;

/// Maximum length of captured overlay text
const TEXT_MAX: usize = 500;

/// Capture the visible text of modal/announcement layers
///
/// Runs the same candidate discovery as active-layer detection, then keeps
/// candidates that intersect the viewport and actually render some text.
/// Surfaces dialog prose that is not itself interactive.
pub fn extract_overlays(tree: &PageTree) -> Vec<Overlay> {
    let viewport = tree.viewport();
    let mut overlays = Vec::new();

    for id in discover_layer_candidates(tree) {
        if !overlay_visible(tree, id, viewport.w, viewport.h) {
            continue;
        }

        let text = match tree.visible_text(id) {
            Some(t) => collapse_ws(&t, TEXT_MAX),
            None => continue,
        };
        if text.is_empty() {
            continue;
        }

        let node = tree.get(id);
        overlays.push(Overlay {
            tag: node.tag.clone(),
            role: node.explicit_role().unwrap_or("").to_string(),
            class_name: truncate_chars(node.attr("class").unwrap_or(""), 100),
            text,
            rect: node.rect.rounded(),
            z_index: node.z_index(),
            position: node
                .style
                .as_ref()
                .map(|s| s.position.clone())
                .unwrap_or_else(|| "static".to_string()),
        });

        if overlays.len() >= MAX_OVERLAYS {
            break;
        }
    }

    overlays
}

fn overlay_visible(tree: &PageTree, id: NodeId, vw: f64, vh: f64) -> bool {
    is_visible(tree, id) && tree.get(id).rect.intersects_viewport(vw, vh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ComputedStyle, PageNode, Viewport};

    fn overlay_node(z: i32) -> PageNode {
        PageNode::new("div")
            .with_attr("class", "modal-content")
            .with_style(ComputedStyle {
                position: "fixed".to_string(),
                z_index: z,
                ..ComputedStyle::default()
            })
            .with_rect(100.0, 100.0, 800.0, 500.0)
    }

    fn tree_with_body() -> (PageTree, crate::page::NodeId) {
        let mut tree = PageTree::new("", "", Viewport { w: 1000.0, h: 1000.0 });
        let body = tree.insert(None, PageNode::new("body").with_rect(0.0, 0.0, 1000.0, 1000.0));
        (tree, body)
    }

    #[test]
    fn test_overlay_text_captured() {
        let (mut tree, body) = tree_with_body();
        let modal = tree.insert(Some(body), overlay_node(1000));
        tree.insert(Some(modal), PageNode::new("p").with_text("Your session is about to expire."));

        let overlays = extract_overlays(&tree);
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].text, "Your session is about to expire.");
        assert_eq!(overlays[0].z_index, 1000);
        assert_eq!(overlays[0].position, "fixed");
        assert_eq!(overlays[0].class_name, "modal-content");
    }

    #[test]
    fn test_textless_overlay_skipped() {
        let (mut tree, body) = tree_with_body();
        tree.insert(Some(body), overlay_node(1000));
        assert!(extract_overlays(&tree).is_empty());
    }

    #[test]
    fn test_outside_viewport_skipped() {
        let (mut tree, body) = tree_with_body();
        let off = tree.insert(
            Some(body),
            overlay_node(1000).with_rect(2000.0, 2000.0, 800.0, 500.0),
        );
        tree.insert(Some(off), PageNode::new("p").with_text("Hidden message"));
        assert!(extract_overlays(&tree).is_empty());
    }

    #[test]
    fn test_overlay_cap() {
        let (mut tree, body) = tree_with_body();
        for i in 0..8 {
            let overlay = tree.insert(Some(body), overlay_node(1000 + i));
            tree.insert(Some(overlay), PageNode::new("p").with_text(format!("Message {}", i)));
        }
        assert_eq!(extract_overlays(&tree).len(), 5);
    }

    #[test]
    fn test_overlay_text_truncated() {
        let (mut tree, body) = tree_with_body();
        let modal = tree.insert(Some(body), overlay_node(1000));
        tree.insert(Some(modal), PageNode::new("p").with_text("word ".repeat(300)));

        let overlays = extract_overlays(&tree);
        assert_eq!(overlays[0].text.chars().count(), 500);
    }
}
