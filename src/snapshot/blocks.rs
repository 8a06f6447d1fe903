use crate::classify::{collapse_ws, resolve_name, resolve_role, LabelSource};
use crate::identity::{djb2_hash, stable_attribute};
use crate::page::{NodeId, PageTree};
use crate::snapshot::types::Block;
use indexmap::IndexMap;

/// Maximum length of a block title (breadcrumb segment)
const TITLE_MAX: usize = 60;

/// Container tags that form blocks regardless of attributes
const CONTAINER_TAGS: [&str; 7] = ["dialog", "form", "section", "article", "main", "nav", "aside"];

/// ARIA roles that mark a node as a structural container
const STRUCTURAL_ROLES: [&str; 11] = [
    "dialog",
    "alertdialog",
    "form",
    "navigation",
    "main",
    "complementary",
    "region",
    "banner",
    "contentinfo",
    "search",
    "article",
];

/// Whether a node qualifies as a block container
pub fn is_block_container(tree: &PageTree, id: NodeId) -> bool {
    let node = tree.get(id);
    CONTAINER_TAGS.contains(&node.tag.as_str())
        || node.explicit_role().is_some_and(|r| STRUCTURAL_ROLES.contains(&r))
}

struct BlockEntry {
    block_id: String,
    kind: String,
    title: String,
    children: Vec<String>,
}

/// Incrementally builds the block hierarchy while elements are extracted
///
/// Containers are registered the first time an element's ancestry touches
/// them; an element belongs to its nearest qualifying ancestor only, while
/// breadcrumbs span every qualifying ancestor outermost-first.
pub struct BlockBuilder<'t> {
    tree: &'t PageTree,
    entries: IndexMap<NodeId, BlockEntry>,
}

impl<'t> BlockBuilder<'t> {
    pub fn new(tree: &'t PageTree) -> Self {
        Self { tree, entries: IndexMap::new() }
    }

    /// Register the block ancestry of `target` and record `eid` as a member
    /// of the nearest block. Returns `(block_id, breadcrumbs)`.
    pub fn assign(&mut self, target: NodeId, eid: &str) -> (String, Vec<String>) {
        let mut containers: Vec<NodeId> =
            self.tree.ancestors(target).filter(|&a| is_block_container(self.tree, a)).collect();
        containers.reverse(); // outermost first

        let mut breadcrumbs = Vec::new();
        for &container in &containers {
            let entry = self.ensure(container);
            if !entry.title.is_empty() {
                breadcrumbs.push(entry.title.clone());
            }
        }

        match containers.last() {
            Some(&nearest) => {
                let entry = self.ensure(nearest);
                entry.children.push(eid.to_string());
                (entry.block_id.clone(), breadcrumbs)
            }
            None => (String::new(), breadcrumbs),
        }
    }

    /// Force-insert a block for a node, container or not
    ///
    /// Used for an active-layer root that is not itself a recognized
    /// container, so the layer's block id always resolves.
    pub fn ensure_block(&mut self, id: NodeId) -> String {
        self.ensure(id).block_id.clone()
    }

    fn ensure(&mut self, id: NodeId) -> &mut BlockEntry {
        let tree = self.tree;
        self.entries.entry(id).or_insert_with(|| make_entry(tree, id))
    }

    /// Emit all discovered blocks in discovery order
    pub fn finish(self) -> Vec<Block> {
        self.entries
            .into_values()
            .map(|e| Block { block_id: e.block_id, kind: e.kind, title: e.title, children: e.children })
            .collect()
    }
}

fn make_entry(tree: &PageTree, id: NodeId) -> BlockEntry {
    let node = tree.get(id);
    let role = resolve_role(tree, id);
    let kind = if role.is_empty() { node.tag.clone() } else { role };

    // Key on the most stable thing the container offers; tag+class keeps
    // repeated anonymous containers distinct enough in practice
    let stable = {
        let s = stable_attribute(node);
        if s.is_empty() {
            let classes: Vec<&str> = node.classes().take(2).collect();
            format!("{}.{}", node.tag, classes.join("."))
        } else {
            s
        }
    };
    let block_id = format!("b-{}", djb2_hash(&format!("{}|{}", kind, stable)));

    BlockEntry { block_id, kind, title: resolve_title(tree, id), children: Vec::new() }
}

/// Block title: the accessible-name chain, then an inner heading
fn resolve_title(tree: &PageTree, id: NodeId) -> String {
    let (name, source) = resolve_name(tree, id);
    if source != LabelSource::Unknown && !name.is_empty() {
        return collapse_ws(&name, TITLE_MAX);
    }

    for descendant in tree.descendants(id) {
        if descendant == id {
            continue;
        }
        let node = tree.get(descendant);
        let is_heading = matches!(node.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
            || node.explicit_role() == Some("heading");
        if is_heading {
            let text = tree.text_content(descendant);
            if !text.is_empty() {
                return collapse_ws(&text, TITLE_MAX);
            }
        }
    }
    String::new()
}
