//! # ax-observe
//!
//! A Rust library for page-structure observation, designed for AI agent integration.
//!
//! Given a hierarchical document tree, the engine produces a bounded,
//! deduplicated, semantically-classified snapshot of the page's interactive
//! surface. Each element gets a content-derived identifier that stays stable
//! across repeated observations of the same logical page state, so an
//! automated decision process can refer back to elements it saw earlier.
//!
//! ## Features
//!
//! - **Semantic classification**: accessible-name resolution, role inference
//!   and interaction states per element
//! - **Stable identities**: collision-tolerant content fingerprints plus a
//!   best-effort CSS selector fallback chain for re-querying
//! - **Active-layer detection**: modal/overlay discovery with backdrop
//!   correction; foreground content is surfaced first
//! - **Prompt pruning**: landmark-tiered selection under a fixed element
//!   budget for a text-based consumer
//!
//! ## Observing a page
//!
//! ```rust
//! use ax_observe::page::{PageNode, PageTree, Viewport};
//! use ax_observe::snapshot::observe;
//!
//! let mut tree = PageTree::new("https://example.com", "Example", Viewport::default());
//! let body = tree.insert(None, PageNode::new("body").with_rect(0.0, 0.0, 1280.0, 720.0));
//! tree.insert(
//!     Some(body),
//!     PageNode::new("button").with_text("Sign in").with_rect(40.0, 40.0, 120.0, 32.0),
//! );
//!
//! let snapshot = observe(&tree);
//! assert_eq!(snapshot.element_count, 1);
//! assert!(snapshot.elements[0].eid.starts_with("e-"));
//! ```
//!
//! ## Capturing from a live browser
//!
//! With the `chrome` feature (enabled by default), a tree can be captured
//! from a running Chrome tab:
//!
//! ```rust,no_run
//! # #[cfg(feature = "chrome")]
//! # fn run() -> ax_observe::Result<()> {
//! use ax_observe::page::PageTree;
//! use ax_observe::snapshot::observe;
//!
//! let browser = headless_chrome::Browser::default()
//!     .map_err(|e| ax_observe::ObserveError::CaptureFailed(e.to_string()))?;
//! let tab = browser.new_tab()
//!     .map_err(|e| ax_observe::ObserveError::CaptureFailed(e.to_string()))?;
//! tab.navigate_to("https://example.com").ok();
//!
//! let tree = PageTree::from_tab(&tab)?;
//! let snapshot = observe(&tree);
//! println!("Found {} interactive elements", snapshot.element_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pruning for a prompt budget
//!
//! ```rust
//! use ax_observe::prompt::{format_element_line, prune_for_prompt};
//! # use ax_observe::page::{PageNode, PageTree, Viewport};
//! # use ax_observe::snapshot::observe;
//! # let mut tree = PageTree::new("", "", Viewport::default());
//! # let body = tree.insert(None, PageNode::new("body").with_rect(0.0, 0.0, 1280.0, 720.0));
//! # tree.insert(Some(body), PageNode::new("button").with_text("Go").with_rect(0.0, 0.0, 60.0, 24.0));
//! # let snapshot = observe(&tree);
//!
//! for element in prune_for_prompt(&snapshot.elements, 50) {
//!     println!("{}", format_element_line(&element));
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`page`]: the host tree — nodes, geometry, computed style, capture
//! - [`classify`]: accessible names, roles and states
//! - [`identity`]: fingerprints, eids and selector generation
//! - [`snapshot`]: extraction pipeline and the snapshot data model
//! - [`prompt`]: budget pruning and the consumer line format
//! - [`protocol`]: JSON message boundary for embedding hosts
//! - [`error`]: error types and result alias

pub mod classify;
pub mod error;
pub mod identity;
pub mod page;
pub mod prompt;
pub mod protocol;
pub mod snapshot;

pub use classify::{ElementStates, LabelSource};
pub use error::{ObserveError, Result};
pub use page::{PageNode, PageTree, Viewport};
pub use prompt::{format_element_line, prune_for_prompt};
pub use protocol::{handle, handle_json, install, ObserveRequest, ObserveResponse};
pub use snapshot::{observe, resolve_eid, InteractiveElement, Resolution, Snapshot};
