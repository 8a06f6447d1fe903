//! Snapshot extraction
//!
//! One observation call turns a [`PageTree`](crate::page::PageTree) into a
//! bounded [`Snapshot`]: interactive elements with stable identifiers,
//! active-layer detection, block grouping and overlay text. Extraction is
//! synchronous, single-pass and side-effect free; a failed extraction
//! degrades to an error-annotated empty snapshot instead of an error.

pub mod assemble;
pub mod blocks;
pub mod layer;
pub mod overlay;
pub mod types;
pub mod visibility;

pub use assemble::{observe, resolve_eid, Resolution};
pub use layer::{detect_active_layer, ActiveLayerResult};
pub use types::{
    ActiveLayerInfo, Block, InteractiveElement, LayerKind, Overlay, Snapshot, MAX_ELEMENTS,
    SCHEMA_VERSION,
};
