use crate::error::{ObserveError, Result};
use crate::page::node::{NodeId, PageNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Viewport dimensions of the captured page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub w: f64,
    pub h: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { w: 1280.0, h: 720.0 }
    }
}

struct TreeEntry {
    node: PageNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Read-only arena over the host page's structural tree
///
/// Nodes are stored in document order; `NodeId`s are stable for the lifetime
/// of the tree. The engine never mutates a tree after it is built.
pub struct PageTree {
    url: String,
    title: String,
    viewport: Viewport,
    entries: Vec<TreeEntry>,
    id_index: HashMap<String, NodeId>,
}

/// Wire format of one captured node: a [`PageNode`] plus its parent index
#[derive(Deserialize)]
struct RawNode {
    parent: Option<usize>,
    #[serde(flatten)]
    node: PageNode,
}

/// Wire format of a full page capture
#[derive(Deserialize)]
struct RawCapture {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    viewport: Viewport,
    nodes: Vec<RawNode>,
}

impl PageTree {
    /// Create an empty tree with page metadata
    pub fn new(url: impl Into<String>, title: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            viewport,
            entries: Vec::new(),
            id_index: HashMap::new(),
        }
    }

    /// Parse a capture payload (the JSON emitted by `capture_page.js`)
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCapture =
            serde_json::from_str(json).map_err(|e| ObserveError::TreeParseFailed(e.to_string()))?;

        let mut tree = Self::new(raw.url, raw.title, raw.viewport);
        for (i, raw_node) in raw.nodes.into_iter().enumerate() {
            let parent = match raw_node.parent {
                Some(p) if p >= i => {
                    return Err(ObserveError::MalformedTree(format!(
                        "node {} references parent {} out of document order",
                        i, p
                    )));
                }
                Some(p) => Some(NodeId(p)),
                None => None,
            };
            if parent.is_none() && !tree.entries.is_empty() {
                return Err(ObserveError::MalformedTree(format!(
                    "node {} is a second root",
                    i
                )));
            }
            tree.insert(parent, raw_node.node);
        }
        Ok(tree)
    }

    /// Append a node under `parent` (or as the root) and return its id
    ///
    /// Nodes must be inserted in document order: parents before children,
    /// siblings left to right.
    pub fn insert(&mut self, parent: Option<NodeId>, node: PageNode) -> NodeId {
        let id = NodeId(self.entries.len());
        if let Some(elem_id) = node.id() {
            // First occurrence wins, like getElementById
            self.id_index.entry(elem_id.to_string()).or_insert(id);
        }
        self.entries.push(TreeEntry { node, parent, children: Vec::new() });
        if let Some(p) = parent {
            self.entries[p.0].children.push(id);
        }
        id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The document root, if the tree is non-empty
    pub fn root(&self) -> Option<NodeId> {
        if self.entries.is_empty() { None } else { Some(NodeId(0)) }
    }

    /// Borrow a node by id
    pub fn get(&self, id: NodeId) -> &PageNode {
        &self.entries[id.0].node
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.entries[id.0].children
    }

    /// All node ids in document order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.entries.len()).map(NodeId)
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut cur = self.parent(id);
        std::iter::from_fn(move || {
            let next = cur?;
            cur = self.parent(next);
            Some(next)
        })
    }

    /// Nearest ancestor-or-self matching a predicate (DOM `closest`)
    pub fn closest<F>(&self, id: NodeId, mut pred: F) -> Option<NodeId>
    where
        F: FnMut(&PageNode) -> bool,
    {
        if pred(self.get(id)) {
            return Some(id);
        }
        self.ancestors(id).find(|&a| pred(self.get(a)))
    }

    /// Whether `node` is `root` or contained in its subtree
    pub fn contains(&self, root: NodeId, node: NodeId) -> bool {
        node == root || self.ancestors(node).any(|a| a == root)
    }

    /// Look up an element by its id attribute (first occurrence wins)
    pub fn element_by_id(&self, elem_id: &str) -> Option<NodeId> {
        self.id_index.get(elem_id).copied()
    }

    /// Pre-order traversal of the subtree rooted at `id`, including `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            for &child in self.children(cur).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Raw text of the subtree: every node's direct text, document order
    pub fn text_content(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        for n in self.descendants(id) {
            let t = self.get(n).text.trim();
            if !t.is_empty() {
                parts.push(t);
            }
        }
        parts.join(" ")
    }

    /// Layout-aware text: skips subtrees hidden via display/visibility
    ///
    /// Returns `None` when the node is detached (no computed style), in which
    /// case callers fall back to [`text_content`](Self::text_content).
    pub fn visible_text(&self, id: NodeId) -> Option<String> {
        self.get(id).style.as_ref()?;
        let mut parts = Vec::new();
        self.collect_visible_text(id, &mut parts);
        Some(parts.join(" "))
    }

    fn collect_visible_text<'a>(&'a self, id: NodeId, parts: &mut Vec<&'a str>) {
        let node = self.get(id);
        if let Some(style) = &node.style {
            if style.display == "none" || style.visibility == "hidden" {
                return;
            }
        }
        let t = node.text.trim();
        if !t.is_empty() {
            parts.push(t);
        }
        for &child in self.children(id) {
            self.collect_visible_text(child, parts);
        }
    }
}
