use crate::classify::{resolve_name, resolve_role, truncate_chars};
use crate::page::{NodeId, PageNode, PageTree};
use indexmap::IndexMap;

/// Non-cryptographic rolling hash (djb2), hex-encoded to 8 digits
///
/// Deliberately coarse: stable across re-renders as long as the input string
/// is unchanged, and collision-tolerant for repeated semantically identical
/// elements.
pub fn djb2_hash(input: &str) -> String {
    let mut hash: u32 = 5381;
    for c in input.chars() {
        hash = hash.wrapping_mul(33).wrapping_add(c as u32);
    }
    format!("{:08x}", hash)
}

/// Pick the most render-stable attribute of a node for fingerprinting
///
/// First non-empty wins: test ids, a non-generated id, name, aria-label,
/// href path, placeholder. Returns an empty string when nothing qualifies.
pub fn stable_attribute(node: &PageNode) -> String {
    // Test ids are the most stable thing a page can offer
    for attr in ["data-testid", "data-test", "data-cy"] {
        if let Some(v) = node.attr_trimmed(attr) {
            return format!("testid:{}", v);
        }
    }

    if let Some(id) = node.id() {
        if !is_auto_generated_id(id) {
            return format!("id:{}", id);
        }
    }

    if let Some(name) = node.attr_trimmed("name") {
        return format!("name:{}", name);
    }

    if let Some(label) = node.attr_trimmed("aria-label") {
        return format!("aria:{}", truncate_chars(label, 60));
    }

    if let Some(href) = node.attr_trimmed("href") {
        return format!("href:{}", href_path(href));
    }

    if let Some(placeholder) = node.attr_trimmed("placeholder") {
        return format!("ph:{}", truncate_chars(placeholder, 40));
    }

    String::new()
}

/// Detect framework-generated ids that change between renders
fn is_auto_generated_id(id: &str) -> bool {
    let lower = id.to_ascii_lowercase();
    if [":", "ember", "react", "vue", "ng-", "__"].iter().any(|p| lower.starts_with(p)) {
        return true;
    }
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    // Long hex-like blobs (uuids, content hashes)
    id.chars().count() >= 20 && lower.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

/// Reduce an href to its path component
fn href_path(href: &str) -> String {
    let strip_tail = |s: &str| {
        let end = s.find(['?', '#']).unwrap_or(s.len());
        s[..end].to_string()
    };

    if let Some(rest) = href.strip_prefix("https://").or_else(|| href.strip_prefix("http://")) {
        return match rest.find('/') {
            Some(slash) => strip_tail(&rest[slash..]),
            None => "/".to_string(),
        };
    }
    if href.starts_with('/') {
        return strip_tail(href);
    }
    if href.starts_with('#') || href.starts_with('?') {
        return "/".to_string();
    }
    // Non-http schemes (mailto:, javascript:) keep a truncated literal
    if href.contains(':') {
        return truncate_chars(href, 60);
    }
    // Bare relative path, resolved against the site root
    format!("/{}", strip_tail(href))
}

/// Compute the content fingerprint of a node
///
/// The hash input is `role|tag|name|stableAttribute`; two nodes with an
/// identical tuple produce the same fingerprint regardless of position.
pub fn fingerprint(tree: &PageTree, id: NodeId) -> String {
    let node = tree.get(id);
    let role = resolve_role(tree, id);
    let (name, _) = resolve_name(tree, id);
    let stable = stable_attribute(node);
    let raw = format!("{}|{}|{}|{}", role, node.tag, name, stable);
    format!("e-{}", djb2_hash(&raw))
}

/// Assigns snapshot-unique eids by suffixing fingerprint collisions
///
/// The first occurrence keeps the bare fingerprint; later occurrences get
/// `-1`, `-2`, ... in document order.
#[derive(Debug, Default)]
pub struct EidAllocator {
    counts: IndexMap<String, u32>,
}

impl EidAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn a fingerprint into a snapshot-unique eid
    pub fn assign(&mut self, fingerprint: String) -> String {
        match self.counts.get_mut(&fingerprint) {
            None => {
                self.counts.insert(fingerprint.clone(), 0);
                fingerprint
            }
            Some(count) => {
                *count += 1;
                format!("{}-{}", fingerprint, count)
            }
        }
    }
}
