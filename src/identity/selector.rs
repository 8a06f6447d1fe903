use crate::page::{NodeId, PageTree};

/// Data attributes tried for selector generation, most conventional first
const DATA_ATTRS: [&str; 6] =
    ["data-testid", "data-test", "data-qa", "data-cy", "data-id", "data-item-id"];

/// One step of a structural path: `tag` or `tag:nth-of-type(n)`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    tag: String,
    nth: Option<usize>,
}

impl Segment {
    fn render(&self) -> String {
        match self.nth {
            Some(n) => format!("{}:nth-of-type({})", self.tag, n),
            None => self.tag.clone(),
        }
    }
}

/// Build a re-query expression for a node
///
/// Tries each candidate in order and returns the first that matches exactly
/// one node in the current tree. The final structural path is returned
/// unconditionally even when not provably unique — a best-effort, not a
/// guarantee.
pub fn build_selector(tree: &PageTree, id: NodeId) -> String {
    let node = tree.get(id);
    let tag = node.tag.clone();

    // 1. id
    if let Some(elem_id) = node.id() {
        let sel = format!("#{}", css_escape_ident(elem_id));
        if count_with_id(tree, elem_id) == 1 {
            return sel;
        }
    }

    // 2. test/data attributes
    for attr in DATA_ATTRS {
        if let Some(v) = node.attr(attr) {
            if count_with_attr(tree, attr, v) == 1 {
                return format!("[{}=\"{}\"]", attr, attr_escape(v));
            }
        }
    }

    // 3. role + aria-label combination
    let aria_label = node.attr("aria-label");
    if let (Some(role), Some(label)) = (node.explicit_role(), aria_label) {
        let matches = tree
            .iter()
            .filter(|&n| {
                let m = tree.get(n);
                m.explicit_role() == Some(role) && m.attr("aria-label") == Some(label)
            })
            .count();
        if matches == 1 {
            return format!("[role=\"{}\"][aria-label=\"{}\"]", role, attr_escape(label));
        }
    }

    // 4. name attribute scoped by tag
    if let Some(name) = node.attr("name") {
        if count_with_tag_attr(tree, &tag, "name", name) == 1 {
            return format!("{}[name=\"{}\"]", tag, attr_escape(name));
        }
    }

    // 5. aria-label scoped by tag
    if let Some(label) = aria_label {
        if count_with_tag_attr(tree, &tag, "aria-label", label) == 1 {
            return format!("{}[aria-label=\"{}\"]", tag, attr_escape(label));
        }
    }

    // 6. exact href for anchors
    if tag == "a" {
        if let Some(href) = node.attr("href") {
            if href.len() < 200 && count_with_tag_attr(tree, "a", "href", href) == 1 {
                return format!("a[href=\"{}\"]", attr_escape(href));
            }
        }
    }

    // 7. type + placeholder for text inputs
    if tag == "input" {
        if let Some(placeholder) = node.attr("placeholder") {
            let input_type = node.attr("type").unwrap_or("text");
            let matches = tree
                .iter()
                .filter(|&n| {
                    let m = tree.get(n);
                    m.tag == "input"
                        && m.attr("type").unwrap_or("text") == input_type
                        && m.attr("placeholder") == Some(placeholder)
                })
                .count();
            if matches == 1 {
                return format!(
                    "input[type=\"{}\"][placeholder=\"{}\"]",
                    input_type,
                    attr_escape(placeholder)
                );
            }
        }
    }

    // 8. one or two short class tokens scoped by tag
    let classes: Vec<&str> = node
        .classes()
        .filter(|c| c.len() > 1 && c.len() < 50 && !c.starts_with(|ch: char| ch.is_ascii_digit()))
        .collect();
    for c in &classes {
        if count_with_tag_classes(tree, &tag, &[c]) == 1 {
            return format!("{}.{}", tag, css_escape_ident(c));
        }
    }
    if classes.len() >= 2 {
        let pair = [classes[0], classes[1]];
        if count_with_tag_classes(tree, &tag, &pair) == 1 {
            return format!(
                "{}.{}.{}",
                tag,
                css_escape_ident(pair[0]),
                css_escape_ident(pair[1])
            );
        }
    }

    // 9. ancestor-id-relative structural path
    for (depth, ancestor) in tree.ancestors(id).enumerate() {
        if depth >= 5 {
            break;
        }
        let Some(ancestor_id) = tree.get(ancestor).id() else { continue };
        if count_with_id(tree, ancestor_id) != 1 {
            break;
        }
        let prefix = format!("#{}", css_escape_ident(ancestor_id));

        // nth-of-type among all same-tag descendants of the ancestor
        let nth = nth_of_type(tree, id);
        if count_descendant_nth(tree, ancestor, &tag, nth) == 1 {
            return format!("{} {}:nth-of-type({})", prefix, tag, nth);
        }

        // child-combinator path below the ancestor
        if let Some(segments) = path_between(tree, id, ancestor, 6) {
            if count_descendant_path(tree, ancestor, &segments) == 1 {
                let path: Vec<String> = segments.iter().map(Segment::render).collect();
                return format!("{} {}", prefix, path.join(" > "));
            }
        }
        break;
    }

    // 10. full structural path, best-effort
    let segments = full_path(tree, id, 8);
    let path: Vec<String> = segments.iter().map(Segment::render).collect();
    if path.is_empty() { tag } else { path.join(" > ") }
}

/// 1-based position among same-tag siblings
fn nth_of_type(tree: &PageTree, id: NodeId) -> usize {
    let tag = &tree.get(id).tag;
    match tree.parent(id) {
        Some(parent) => {
            tree.children(parent)
                .iter()
                .filter(|&&sib| &tree.get(sib).tag == tag)
                .position(|&sib| sib == id)
                .unwrap_or(0)
                + 1
        }
        None => 1,
    }
}

/// Number of same-tag siblings (including the node itself)
fn same_tag_sibling_count(tree: &PageTree, id: NodeId) -> usize {
    let tag = &tree.get(id).tag;
    match tree.parent(id) {
        Some(parent) => {
            tree.children(parent).iter().filter(|&&sib| &tree.get(sib).tag == tag).count()
        }
        None => 1,
    }
}

/// Child-combinator path from below `ancestor` down to `id` (exclusive of the
/// ancestor), or `None` when the hop limit is exceeded
fn path_between(tree: &PageTree, id: NodeId, ancestor: NodeId, max_len: usize) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut cur = id;
    while cur != ancestor {
        if segments.len() >= max_len {
            return None;
        }
        segments.push(make_segment(tree, cur));
        cur = tree.parent(cur)?;
    }
    segments.reverse();
    Some(segments)
}

/// Structural path from just below body/html, capped at `max_depth` hops
fn full_path(tree: &PageTree, id: NodeId, max_depth: usize) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cur = id;
    for _ in 0..max_depth {
        let node = tree.get(cur);
        if node.is_tag("body") || node.is_tag("html") {
            break;
        }
        let Some(parent) = tree.parent(cur) else {
            break;
        };
        segments.push(make_segment(tree, cur));
        cur = parent;
    }
    segments.reverse();
    segments
}

fn make_segment(tree: &PageTree, id: NodeId) -> Segment {
    let nth = if same_tag_sibling_count(tree, id) > 1 {
        Some(nth_of_type(tree, id))
    } else {
        None
    };
    Segment { tag: tree.get(id).tag.clone(), nth }
}

fn count_with_id(tree: &PageTree, elem_id: &str) -> usize {
    tree.iter().filter(|&n| tree.get(n).id() == Some(elem_id)).count()
}

fn count_with_attr(tree: &PageTree, attr: &str, value: &str) -> usize {
    tree.iter().filter(|&n| tree.get(n).attr(attr) == Some(value)).count()
}

fn count_with_tag_attr(tree: &PageTree, tag: &str, attr: &str, value: &str) -> usize {
    tree.iter()
        .filter(|&n| {
            let m = tree.get(n);
            m.tag == tag && m.attr(attr) == Some(value)
        })
        .count()
}

fn count_with_tag_classes(tree: &PageTree, tag: &str, classes: &[&str]) -> usize {
    tree.iter()
        .filter(|&n| {
            let m = tree.get(n);
            m.tag == tag && classes.iter().all(|c| m.has_class(c))
        })
        .count()
}

/// Matches of `#ancestor tag:nth-of-type(n)` under CSS semantics
fn count_descendant_nth(tree: &PageTree, ancestor: NodeId, tag: &str, nth: usize) -> usize {
    tree.iter()
        .filter(|&n| {
            n != ancestor
                && tree.get(n).tag == tag
                && nth_of_type(tree, n) == nth
                && tree.contains(ancestor, n)
        })
        .count()
}

/// Matches of `#ancestor seg1 > seg2 > ...` under CSS semantics
fn count_descendant_path(tree: &PageTree, ancestor: NodeId, segments: &[Segment]) -> usize {
    tree.iter().filter(|&n| matches_path(tree, ancestor, segments, n)).count()
}

fn matches_path(tree: &PageTree, ancestor: NodeId, segments: &[Segment], node: NodeId) -> bool {
    let Some((last, rest)) = segments.split_last() else {
        return false;
    };
    if !matches_segment(tree, node, last) {
        return false;
    }
    // Walk the child-combinator chain upward
    let mut cur = node;
    for seg in rest.iter().rev() {
        let Some(parent) = tree.parent(cur) else {
            return false;
        };
        if !matches_segment(tree, parent, seg) {
            return false;
        }
        cur = parent;
    }
    // The chain head must sit strictly below the ancestor
    cur != ancestor && tree.contains(ancestor, cur)
}

fn matches_segment(tree: &PageTree, id: NodeId, seg: &Segment) -> bool {
    tree.get(id).tag == seg.tag && seg.nth.is_none_or(|n| nth_of_type(tree, id) == n)
}

/// Escape an identifier for use in `#id` / `.class` position
fn css_escape_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    for (i, c) in ident.chars().enumerate() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            if i == 0 && c.is_ascii_digit() {
                out.push_str(&format!("\\3{} ", c));
            } else {
                out.push(c);
            }
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// Escape a value for use inside a double-quoted attribute selector
fn attr_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
