//! Host page tree access
//!
//! This module is the engine's read-only view of the page being observed:
//! - PageNode: one element with attributes, computed style and geometry
//! - PageTree: document-ordered arena with parent/child/ancestor traversal
//! - Capture from a live Chrome tab (feature `chrome`) or from a JSON payload
//!
//! The tree is supplied by the host environment; the engine itself never
//! mutates it and holds no reference to it across observation calls.

pub mod node;
pub mod tree;

#[cfg(feature = "chrome")]
pub mod chrome;

pub use node::{ComputedStyle, ElementRect, NodeId, PageNode, Rect};
pub use tree::{PageTree, Viewport};
