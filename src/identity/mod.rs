//! Element identity and re-query expressions
//!
//! - fingerprint: content-derived stable identifiers (eids) that survive
//!   re-renders as long as role/tag/name/stable-attribute are unchanged
//! - selector: a fallback chain producing a CSS expression that re-locates
//!   the element in the live tree

pub mod fingerprint;
pub mod selector;

pub use fingerprint::{djb2_hash, fingerprint, stable_attribute, EidAllocator};
pub use selector::build_selector;
