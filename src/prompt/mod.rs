//! Prompt-budget pruning and the consumer-facing element line format
//!
//! Consumes a snapshot's element list at consumption time: buckets elements
//! into chrome/filter/main tiers by landmark, scores them, and caps the list
//! for a fixed prompt budget. Token order and truncation lengths of the line
//! format are load-bearing for downstream prompt-size budgeting.

use crate::classify::truncate_chars;
use crate::snapshot::InteractiveElement;

/// Slots reserved for page chrome (navigation, banner, footer)
const CHROME_MAX: usize = 8;

/// Slots reserved for complementary content (sidebars, filters)
const FILTER_MAX: usize = 7;

/// Share of the budget reserved for active-layer elements when present
const ACTIVE_LAYER_SHARE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Chrome,
    Filter,
    Main,
}

/// Landmark-based tier of an element
fn classify_tier(el: &InteractiveElement) -> Tier {
    match el.landmark.as_str() {
        "navigation" | "banner" | "contentinfo" => Tier::Chrome,
        "complementary" => Tier::Filter,
        _ => Tier::Main,
    }
}

/// Relevance score; `idx` is the element's document-order position
fn score_element(el: &InteractiveElement, idx: usize) -> f64 {
    let mut score = 0.0;
    if el.states.disabled {
        score -= 10.0;
    }
    if !el.name.is_empty() {
        score += 3.0;
    }
    if matches!(el.role.as_str(), "textbox" | "searchbox" | "combobox") {
        score += 2.0;
    }
    if el.role == "button" {
        score += 1.0;
    }
    score - idx as f64 * 0.01
}

/// Select at most `top_k` elements for prompt inclusion
///
/// Lists that already fit are returned unchanged. When active-layer elements
/// are present they get ~70% of the budget first, tiered the same way; the
/// remainder goes to background content. Otherwise chrome and filter tiers
/// are capped and main content takes every remaining slot. Output order:
/// main, then filter, then chrome.
pub fn prune_for_prompt(elements: &[InteractiveElement], top_k: usize) -> Vec<InteractiveElement> {
    if elements.len() <= top_k {
        return elements.to_vec();
    }

    let indexed: Vec<(usize, &InteractiveElement)> = elements.iter().enumerate().collect();
    let (modal, background): (Vec<_>, Vec<_>) =
        indexed.into_iter().partition(|(_, el)| el.in_active_layer);

    if modal.is_empty() {
        return select_tiered(background, top_k);
    }

    // Reserve the modal share, then hand unused slots to the other side
    let mut modal_slots = ((top_k as f64 * ACTIVE_LAYER_SHARE).round() as usize).min(modal.len());
    let background_slots = (top_k - modal_slots).min(background.len());
    modal_slots = (top_k - background_slots).min(modal.len());

    let mut out = select_tiered(modal, modal_slots);
    out.extend(select_tiered(background, background_slots));
    out
}

/// Score, bucket and cap one partition; output is main, filter, chrome
fn select_tiered(items: Vec<(usize, &InteractiveElement)>, top_k: usize) -> Vec<InteractiveElement> {
    let mut chrome = Vec::new();
    let mut filter = Vec::new();
    let mut main = Vec::new();

    for (idx, el) in items {
        let scored = (score_element(el, idx), el);
        match classify_tier(el) {
            Tier::Chrome => chrome.push(scored),
            Tier::Filter => filter.push(scored),
            Tier::Main => main.push(scored),
        }
    }

    for bucket in [&mut chrome, &mut filter, &mut main] {
        bucket.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    }

    let mut chrome_slots = CHROME_MAX.min(chrome.len()).min(top_k);
    let mut filter_slots = FILTER_MAX.min(filter.len()).min(top_k.saturating_sub(chrome_slots));
    let main_slots = main.len().min(top_k - chrome_slots - filter_slots);

    // Fill unused slots from the other buckets so a full page yields a full
    // budget
    let mut leftover = top_k - chrome_slots - filter_slots - main_slots;
    let grow_filter = leftover.min(filter.len() - filter_slots);
    filter_slots += grow_filter;
    leftover -= grow_filter;
    chrome_slots = (chrome_slots + leftover).min(chrome.len());

    let mut out: Vec<InteractiveElement> =
        main.into_iter().take(main_slots).map(|(_, el)| el.clone()).collect();
    out.extend(filter.into_iter().take(filter_slots).map(|(_, el)| el.clone()));
    out.extend(chrome.into_iter().take(chrome_slots).map(|(_, el)| el.clone()));
    out
}

/// Format one element as a single prompt line
///
/// Example: `[e-9f03c2a1] button "Add to cart" [disabled] (340,520) @main in:form#cart`
pub fn format_element_line(el: &InteractiveElement) -> String {
    let mut parts = vec![format!("[{}]", el.eid), el.tag.clone()];

    if !el.role.is_empty() && el.role != el.tag {
        parts.push(format!("role={}", el.role));
    }
    if !el.name.is_empty() {
        parts.push(format!("\"{}\"", truncate_chars(&el.name, 60)));
    }
    if !el.value.is_empty() {
        parts.push(format!("value=\"{}\"", truncate_chars(&el.value, 40)));
    }
    // Call out how the name was derived when it is not the obvious way
    if !el.name.is_empty() && el.label_source.is_notable() {
        parts.push(format!("src={}", el.label_source.as_str()));
    }

    let mut states = Vec::new();
    if el.states.disabled {
        states.push("disabled");
    }
    if el.states.checked {
        states.push("checked");
    }
    match el.states.expanded {
        Some(true) => states.push("expanded"),
        Some(false) => states.push("collapsed"),
        None => {}
    }
    if el.states.required {
        states.push("required");
    }
    if el.states.readonly {
        states.push("readonly");
    }
    if !states.is_empty() {
        parts.push(format!("[{}]", states.join(",")));
    }

    parts.push(format!("({},{})", el.rect.x, el.rect.y));

    if !el.breadcrumbs.is_empty() {
        parts.push(format!("path={}", el.breadcrumbs.join(">")));
    } else if !el.landmark.is_empty() {
        parts.push(format!("@{}", el.landmark));
    }

    if el.in_active_layer {
        parts.push("in-active-layer".to_string());
    }

    if !el.parent_context.is_empty() {
        parts.push(format!("in:{}", el.parent_context));
    }

    parts.join(" ")
}

/// Tree summary line for prompt inclusion
pub fn format_tree_summary(summary: &str) -> String {
    if summary.is_empty() { "(no tree summary)".to_string() } else { summary.to_string() }
}
