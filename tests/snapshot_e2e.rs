use ax_observe::classify::LabelSource;
use ax_observe::page::{ComputedStyle, PageNode, PageTree, Viewport};
use ax_observe::prompt::prune_for_prompt;
use ax_observe::snapshot::{observe, resolve_eid, LayerKind};

fn page() -> (PageTree, ax_observe::page::NodeId) {
    let mut tree = PageTree::new("https://shop.example.com", "Shop", Viewport { w: 1280.0, h: 720.0 });
    let body = tree.insert(None, PageNode::new("body").with_rect(0.0, 0.0, 1280.0, 720.0));
    (tree, body)
}

fn fixed(z: i32) -> ComputedStyle {
    ComputedStyle { position: "fixed".to_string(), z_index: z, ..ComputedStyle::default() }
}

/// A visible text input labelled via label[for] plus a visually hidden
/// checkbox wrapped in a visible label must yield exactly two elements: the
/// input named through the association, and the checkbox carried by its
/// proxy label.
#[test]
fn label_association_and_proxied_checkbox() {
    let (mut tree, body) = page();

    tree.insert(
        Some(body),
        PageNode::new("label").with_attr("for", "email").with_text("Email address").with_rect(
            20.0, 20.0, 120.0, 20.0,
        ),
    );
    tree.insert(
        Some(body),
        PageNode::new("input").with_attr("type", "text").with_attr("id", "email").with_rect(
            150.0, 20.0, 200.0, 28.0,
        ),
    );

    let wrap = tree.insert(
        Some(body),
        PageNode::new("label").with_text("Gift wrap this order").with_rect(20.0, 60.0, 180.0, 24.0),
    );
    tree.insert(
        Some(wrap),
        PageNode::new("input")
            .with_attr("type", "checkbox")
            .with_rect(-9999.0, -9999.0, 1.0, 1.0),
    );

    let snapshot = observe(&tree);
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.element_count, 2);

    let input = snapshot.elements.iter().find(|e| e.role == "textbox").unwrap();
    assert_eq!(input.name, "Email address");
    assert_eq!(input.label_source, LabelSource::LabelFor);
    assert_eq!(input.tag, "input");

    let checkbox = snapshot.elements.iter().find(|e| e.role == "checkbox").unwrap();
    assert_eq!(checkbox.name, "Gift wrap this order");
    assert_eq!(checkbox.label_source, LabelSource::AncestorLabel);
    // Geometry and tag come from the visible wrapping label, not the
    // far-offscreen input
    assert_eq!(checkbox.tag, "label");
    assert_eq!(checkbox.rect.x, 20);
    assert_eq!(checkbox.rect.y, 60);
    assert_eq!(checkbox.rect.w, 180);
}

/// A role=dialog node covering 40% of the viewport at z 1000 over a
/// same-size backdrop at z 999 must win as a modal, not the backdrop.
#[test]
fn dialog_wins_over_backdrop() {
    let (mut tree, body) = page();

    tree.insert(Some(body), PageNode::new("button").with_text("Open").with_rect(0.0, 0.0, 60.0, 24.0));

    tree.insert(
        Some(body),
        PageNode::new("div")
            .with_attr("class", "dialog-backdrop")
            .with_style(fixed(999))
            .with_rect(160.0, 90.0, 960.0, 384.0),
    );
    let dialog = tree.insert(
        Some(body),
        PageNode::new("div")
            .with_attr("role", "dialog")
            .with_style(fixed(1000))
            .with_rect(160.0, 90.0, 960.0, 384.0),
    );
    tree.insert(Some(dialog), PageNode::new("button").with_text("Confirm").with_rect(200.0, 300.0, 90.0, 30.0));

    let snapshot = observe(&tree);
    assert!(snapshot.active_layer.present);
    assert_eq!(snapshot.active_layer.kind, Some(LayerKind::Modal));

    // Dialog content is surfaced before background content
    assert_eq!(snapshot.elements[0].name, "Confirm");
    assert!(snapshot.elements[0].in_active_layer);
    assert_eq!(snapshot.elements[1].name, "Open");
    assert!(!snapshot.elements[1].in_active_layer);

    // The layer root resolves to a registered block
    let root_block = &snapshot.active_layer.root_block_id;
    assert!(!root_block.is_empty());
    assert!(snapshot.blocks.iter().any(|b| &b.block_id == root_block));
}

/// Two off-screen radio inputs sharing one visible list item collapse to a
/// single element entry.
#[test]
fn proxy_dedup_over_shared_list_item() {
    let (mut tree, body) = page();
    let list = tree.insert(Some(body), PageNode::new("ul").with_rect(0.0, 0.0, 300.0, 40.0));
    let item = tree.insert(Some(list), PageNode::new("li").with_text("Sort by price").with_rect(0.0, 0.0, 300.0, 40.0));
    for value in ["asc", "desc"] {
        tree.insert(
            Some(item),
            PageNode::new("input")
                .with_attr("type", "radio")
                .with_attr("name", "sort")
                .with_value(value)
                .with_rect(-9999.0, 0.0, 1.0, 1.0),
        );
    }

    let snapshot = observe(&tree);
    assert_eq!(snapshot.element_count, 1);
    assert_eq!(snapshot.elements[0].tag, "li");
}

/// Re-running extraction against an unchanged tree yields identical eids,
/// and an eid survives unrelated DOM mutation elsewhere in the tree.
#[test]
fn eids_stable_across_rerender() {
    let (mut tree, body) = page();
    let nav = tree.insert(Some(body), PageNode::new("nav"));
    tree.insert(
        Some(nav),
        PageNode::new("a").with_attr("href", "/cart").with_text("Cart").with_rect(0.0, 0.0, 60.0, 20.0),
    );
    tree.insert(
        Some(body),
        PageNode::new("button").with_attr("name", "buy").with_text("Buy now").with_rect(0.0, 40.0, 120.0, 32.0),
    );

    let first = observe(&tree);
    let second = observe(&tree);
    let eids =
        |snap: &ax_observe::snapshot::Snapshot| -> Vec<String> { snap.elements.iter().map(|e| e.eid.clone()).collect() };
    assert_eq!(eids(&first), eids(&second));

    // Re-render: same logical page with extra unrelated content
    let (mut mutated, body) = page();
    let nav = mutated.insert(Some(body), PageNode::new("nav"));
    mutated.insert(Some(nav), PageNode::new("span").with_text("New badge"));
    mutated.insert(
        Some(nav),
        PageNode::new("a").with_attr("href", "/cart").with_text("Cart").with_rect(10.0, 0.0, 60.0, 20.0),
    );
    let wrapper = mutated.insert(Some(body), PageNode::new("div"));
    mutated.insert(
        Some(wrapper),
        PageNode::new("button").with_attr("name", "buy").with_text("Buy now").with_rect(0.0, 80.0, 120.0, 32.0),
    );

    let third = observe(&mutated);
    let mut a = eids(&first);
    let mut b = eids(&third);
    a.sort();
    b.sort();
    assert_eq!(a, b, "eids must survive unrelated mutation and repositioning");
}

/// Repeated semantically identical rows collide on purpose and are suffixed
/// into unique identifiers, in document order.
#[test]
fn repeated_rows_get_suffixed_eids() {
    let (mut tree, body) = page();
    let list = tree.insert(Some(body), PageNode::new("ul"));
    for i in 0..3 {
        let item = tree.insert(Some(list), PageNode::new("li"));
        tree.insert(
            Some(item),
            PageNode::new("button").with_text("Add to cart").with_rect(0.0, i as f64 * 40.0, 100.0, 30.0),
        );
    }

    let snapshot = observe(&tree);
    assert_eq!(snapshot.element_count, 3);

    let base = &snapshot.elements[0].eid;
    assert_eq!(snapshot.elements[1].eid, format!("{}-1", base));
    assert_eq!(snapshot.elements[2].eid, format!("{}-2", base));
}

/// resolve_eid is a full re-extraction: identifiers from a snapshot resolve
/// to working selectors, unknown identifiers report found=false.
#[test]
fn resolve_after_snapshot() {
    let (mut tree, body) = page();
    tree.insert(
        Some(body),
        PageNode::new("input").with_attr("type", "search").with_attr("name", "q").with_rect(0.0, 0.0, 300.0, 32.0),
    );

    let snapshot = observe(&tree);
    let eid = snapshot.elements[0].eid.clone();

    let hit = resolve_eid(&tree, &eid);
    assert!(hit.found);
    assert_eq!(hit.selector.as_deref(), Some("input[name=\"q\"]"));

    let miss = resolve_eid(&tree, "e-deadbeef");
    assert!(!miss.found);
    assert!(miss.selector.is_none());
}

/// Pruning a snapshot of a chrome-heavy page keeps the budget exact and the
/// main content in front.
#[test]
fn prune_snapshot_end_to_end() {
    let (mut tree, body) = page();
    let nav = tree.insert(Some(body), PageNode::new("nav"));
    for i in 0..20 {
        tree.insert(
            Some(nav),
            PageNode::new("a")
                .with_attr("href", format!("/c/{}", i))
                .with_text(format!("Category {}", i))
                .with_rect(i as f64 * 60.0, 0.0, 56.0, 20.0),
        );
    }
    let main = tree.insert(Some(body), PageNode::new("main"));
    for i in 0..20 {
        tree.insert(
            Some(main),
            PageNode::new("button").with_text(format!("Product {}", i)).with_rect(0.0, 40.0 + i as f64 * 40.0, 160.0, 32.0),
        );
    }

    let snapshot = observe(&tree);
    assert_eq!(snapshot.element_count, 40);

    let pruned = prune_for_prompt(&snapshot.elements, 15);
    assert_eq!(pruned.len(), 15);
    assert!(pruned[0].landmark.is_empty() || pruned[0].landmark == "main");
    let nav_count = pruned.iter().filter(|e| e.landmark == "navigation").count();
    assert!(nav_count <= 8);
}

/// Live-capture smoke test, mirrors the library's Chrome integration.
#[cfg(feature = "chrome")]
#[test]
#[ignore] // Requires Chrome to be installed
fn capture_and_observe_live_page() {
    let browser = headless_chrome::Browser::default().expect("Failed to launch browser");
    let tab = browser.new_tab().expect("Failed to open tab");
    tab.navigate_to("data:text/html,<html><body><button id='go'>Go</button><a href='/x'>X</a></body></html>")
        .expect("Failed to navigate");
    std::thread::sleep(std::time::Duration::from_millis(500));

    let tree = PageTree::from_tab(&tab).expect("Failed to capture page");
    let snapshot = observe(&tree);
    assert!(snapshot.error.is_none());
    println!("captured {} nodes, {} interactive", tree.len(), snapshot.element_count);
}
