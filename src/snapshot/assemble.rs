use crate::classify::{collapse_ws, extract_states, resolve_name, resolve_role, truncate_chars};
use crate::error::Result;
use crate::identity::{build_selector, fingerprint, EidAllocator};
use crate::page::{NodeId, PageTree};
use crate::snapshot::blocks::BlockBuilder;
use crate::snapshot::layer::detect_active_layer;
use crate::snapshot::overlay::extract_overlays;
use crate::snapshot::types::{
    ActiveLayerInfo, InteractiveElement, Snapshot, MAX_ELEMENTS, SCHEMA_VERSION,
};
use crate::snapshot::visibility::{resolve_visibility, VisibilityOutcome};
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Roles that make an otherwise generic element an interactive candidate
const INTERACTIVE_ROLES: [&str; 9] =
    ["button", "link", "textbox", "combobox", "menuitem", "tab", "checkbox", "radio", "switch"];

/// Landmark roles reported on elements
const LANDMARK_ROLES: [&str; 6] =
    ["banner", "contentinfo", "navigation", "complementary", "main", "search"];

/// Build one observation of the page's interactive surface
///
/// Never fails: any internal fault is converted into a well-formed empty
/// snapshot carrying an error marker, so the calling loop degrades to "no
/// observation available this step".
pub fn observe(tree: &PageTree) -> Snapshot {
    let built = catch_unwind(AssertUnwindSafe(|| build(tree)));
    match built {
        Ok(Ok(snapshot)) => snapshot,
        Ok(Err(e)) => {
            log::warn!("snapshot extraction failed: {}", e);
            Snapshot::from_error(e.to_string())
        }
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "extraction panicked".to_string());
            let err = crate::error::ObserveError::ExtractionFailed(msg);
            log::warn!("{}", err);
            Snapshot::from_error(err.to_string())
        }
    }
}

/// Re-locate an element by its stable identifier
///
/// Always rebuilds a full snapshot against the current tree and searches it;
/// freshness over speed. If the page mutated since the identifier was
/// issued, the match may be a different logical instance of a repeated
/// element.
pub fn resolve_eid(tree: &PageTree, eid: &str) -> Resolution {
    let snapshot = observe(tree);
    match snapshot.element(eid) {
        Some(el) => Resolution { found: true, selector: Some(el.selector.clone()), eid: el.eid.clone() },
        None => Resolution { found: false, selector: None, eid: eid.to_string() },
    }
}

/// Outcome of [`resolve_eid`]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    pub found: bool,
    pub selector: Option<String>,
    pub eid: String,
}

fn build(tree: &PageTree) -> Result<Snapshot> {
    let layer = detect_active_layer(tree);

    // Interactive candidates in document order
    let candidates: Vec<NodeId> =
        tree.iter().filter(|&id| is_interactive_candidate(tree, id)).collect();

    // Active-layer content is processed first; within each partition a
    // stable sort by stacking order keeps document order among ties
    let (mut foreground, mut background): (Vec<NodeId>, Vec<NodeId>) = match layer.root {
        Some(root) => candidates.into_iter().partition(|&id| tree.contains(root, id)),
        None => (Vec::new(), candidates),
    };
    foreground.sort_by_key(|&id| std::cmp::Reverse(tree.get(id).z_index()));
    background.sort_by_key(|&id| std::cmp::Reverse(tree.get(id).z_index()));

    let mut allocator = EidAllocator::new();
    let mut blocks = BlockBuilder::new(tree);
    let mut claimed_proxies: HashSet<NodeId> = HashSet::new();
    let mut elements = Vec::new();

    for (id, in_active_layer) in foreground
        .into_iter()
        .map(|id| (id, true))
        .chain(background.into_iter().map(|id| (id, false)))
    {
        if elements.len() >= MAX_ELEMENTS {
            log::debug!("element cap reached, truncating snapshot");
            break;
        }

        let target = match resolve_visibility(tree, id, &mut claimed_proxies) {
            VisibilityOutcome::Direct => id,
            VisibilityOutcome::Proxied(proxy) => proxy,
            VisibilityOutcome::Drop => continue,
        };

        // Identity comes from the original control so the eid survives
        // whichever of proxy/original the page renders interactive
        let eid = allocator.assign(fingerprint(tree, id));
        let (block_id, breadcrumbs) = blocks.assign(target, &eid);

        let node = tree.get(id);
        let (name, label_source) = resolve_name(tree, id);

        elements.push(InteractiveElement {
            eid,
            tag: tree.get(target).tag.clone(),
            role: resolve_role(tree, id),
            name,
            label_source,
            value: extract_value(tree, id),
            description: describe(tree, id),
            states: extract_states(node),
            selector: build_selector(tree, target),
            rect: tree.get(target).rect.rounded(),
            parent_context: parent_context(tree, target),
            landmark: nearest_landmark(tree, target),
            in_active_layer,
            block_id,
            breadcrumbs,
        });
    }

    // The layer root must always resolve to a block, container or not
    let active_layer = match layer.root {
        Some(root) => ActiveLayerInfo {
            present: true,
            kind: layer.kind,
            root_block_id: blocks.ensure_block(root),
        },
        None => ActiveLayerInfo::default(),
    };

    let element_count = elements.len();
    Ok(Snapshot {
        schema_version: SCHEMA_VERSION,
        tree_summary: tree_summary(tree),
        elements,
        element_count,
        active_layer,
        blocks: blocks.finish(),
        overlays: extract_overlays(tree),
        error: None,
    })
}

/// Whether a node belongs to the interactive-candidate set
fn is_interactive_candidate(tree: &PageTree, id: NodeId) -> bool {
    let node = tree.get(id);
    match node.tag.as_str() {
        "a" => node.attr("href").is_some(),
        "button" | "input" | "select" | "textarea" | "summary" => true,
        _ => {
            node.explicit_role().is_some_and(|r| INTERACTIVE_ROLES.contains(&r))
                || node.attr("tabindex").is_some_and(|t| t != "-1")
                || node.attr("contenteditable") == Some("true")
        }
    }
}

/// Current value of a form control or contenteditable region
fn extract_value(tree: &PageTree, id: NodeId) -> String {
    let node = tree.get(id);
    if matches!(node.tag.as_str(), "input" | "textarea" | "select") {
        return node.value.clone().unwrap_or_default();
    }
    if node.attr("contenteditable") == Some("true") {
        return truncate_chars(tree.text_content(id).trim(), 200);
    }
    String::new()
}

/// aria-describedby text, concatenated across references
fn describe(tree: &PageTree, id: NodeId) -> String {
    let Some(refs) = tree.get(id).attr_trimmed("aria-describedby") else {
        return String::new();
    };
    let parts: Vec<String> = refs
        .split_whitespace()
        .filter_map(|ref_id| tree.element_by_id(ref_id))
        .map(|n| tree.text_content(n))
        .filter(|t| !t.is_empty())
        .collect();
    collapse_ws(&parts.join(" "), 200)
}

/// Short descriptor of the nearest identifiable ancestor
fn parent_context(tree: &PageTree, id: NodeId) -> String {
    const CONTEXT_TAGS: [&str; 9] =
        ["form", "nav", "main", "header", "footer", "aside", "section", "article", "dialog"];

    for (depth, ancestor) in tree.ancestors(id).enumerate() {
        if depth >= 5 {
            break;
        }
        let node = tree.get(ancestor);
        if node.is_tag("body") || node.is_tag("html") {
            break;
        }

        let role = node.explicit_role();
        let has_classes = node.classes().next().is_some();
        if role.is_none() && !CONTEXT_TAGS.contains(&node.tag.as_str()) && node.id().is_none() && !has_classes
        {
            continue;
        }

        let mut ctx = node.tag.clone();
        if let Some(role) = role {
            ctx = format!("{}[role={}]", node.tag, role);
        }
        if let Some(id_attr) = node.id().filter(|i| i.chars().count() < 40) {
            ctx = format!("{}#{}", node.tag, id_attr);
        } else if has_classes {
            let cls: Vec<&str> =
                node.classes().filter(|c| c.chars().count() < 30).take(2).collect();
            if !cls.is_empty() {
                ctx = format!("{}.{}", node.tag, cls.join("."));
            }
        }
        return truncate_chars(&ctx, 60);
    }
    String::new()
}

/// Nearest enclosing landmark region
fn nearest_landmark(tree: &PageTree, id: NodeId) -> String {
    for ancestor in tree.ancestors(id) {
        let node = tree.get(ancestor);
        if node.is_tag("body") || node.is_tag("html") {
            break;
        }

        if let Some(role) = node.explicit_role() {
            let lower = role.to_ascii_lowercase();
            if LANDMARK_ROLES.contains(&lower.as_str()) {
                return lower;
            }
        }

        match node.tag.as_str() {
            "nav" => return "navigation".to_string(),
            "aside" => return "complementary".to_string(),
            "main" => return "main".to_string(),
            // header/footer are landmarks only at page level
            "header" | "footer" => {
                let at_page_level =
                    tree.parent(ancestor).is_some_and(|p| tree.get(p).is_tag("body"));
                if at_page_level {
                    return if node.is_tag("header") {
                        "banner".to_string()
                    } else {
                        "contentinfo".to_string()
                    };
                }
            }
            _ => {}
        }
    }
    String::new()
}

/// Cheap situational digest of the whole page
fn tree_summary(tree: &PageTree) -> String {
    let mut nav = 0usize;
    let mut main = 0usize;
    let mut headings = 0usize;
    let mut forms = 0usize;
    let mut inputs = 0usize;
    let mut buttons = 0usize;
    let mut links = 0usize;

    for id in tree.iter() {
        let node = tree.get(id);
        let role = node.explicit_role().unwrap_or("");
        let tag = node.tag.as_str();

        if tag == "nav" || role == "navigation" {
            nav += 1;
        }
        if tag == "main" || role == "main" {
            main += 1;
        }
        if matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") || role == "heading" {
            headings += 1;
        }
        if tag == "form" || role == "form" {
            forms += 1;
        }
        if matches!(tag, "input" | "select" | "textarea")
            || matches!(role, "textbox" | "combobox" | "searchbox")
        {
            inputs += 1;
        }
        let input_type = node.attr("type").unwrap_or("");
        if tag == "button"
            || role == "button"
            || (tag == "input" && matches!(input_type, "submit" | "button" | "reset"))
        {
            buttons += 1;
        }
        if (tag == "a" && node.attr("href").is_some()) || role == "link" {
            links += 1;
        }
    }

    let title = if tree.title().is_empty() { "(no title)" } else { tree.title() };
    format!(
        "Page: \"{}\" | {} nav, {} main | {} headings | {} form, {} inputs | {} buttons, {} links",
        title, nav, main, headings, forms, inputs, buttons, links
    )
}
