//! Message protocol for hosts that drive the engine over a JSON channel
//!
//! Mirrors the two inbound requests of the observation interface: build a
//! snapshot, or resolve a previously issued element identifier. Failures are
//! carried inside the response payloads; nothing here returns an error to
//! the transport.

use crate::error::ObserveError;
use crate::page::PageTree;
use crate::snapshot::{observe, resolve_eid, Resolution, Snapshot};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// One-time installation guard for the host's message handler
///
/// Returns `true` on the first call and `false` afterwards; repeated
/// initialization is a no-op, not an error. Process-wide, scoped to the
/// document's lifetime.
pub fn install() -> bool {
    !INSTALLED.swap(true, Ordering::SeqCst)
}

/// Inbound observation request
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObserveRequest {
    /// Build one snapshot of the current page state
    ExtractSnapshot,
    /// Re-locate an element by its stable identifier
    ResolveEid {
        /// Identifier issued by an earlier snapshot
        eid: String,
    },
}

/// Outbound response, shaped by the request kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObserveResponse {
    Snapshot(Box<Snapshot>),
    Resolution(Resolution),
}

/// Dispatch one request against the current page tree
pub fn handle(tree: &PageTree, request: ObserveRequest) -> ObserveResponse {
    match request {
        ObserveRequest::ExtractSnapshot => ObserveResponse::Snapshot(Box::new(observe(tree))),
        ObserveRequest::ResolveEid { eid } => ObserveResponse::Resolution(resolve_eid(tree, &eid)),
    }
}

/// Dispatch a raw JSON request and serialize the response
///
/// An undecodable request degrades to an error-annotated empty snapshot, so
/// the transport never sees a failure.
pub fn handle_json(tree: &PageTree, request_json: &str) -> String {
    let response = match serde_json::from_str::<ObserveRequest>(request_json) {
        Ok(request) => handle(tree, request),
        Err(e) => {
            let err = ObserveError::InvalidRequest(e.to_string());
            log::warn!("{}", err);
            ObserveResponse::Snapshot(Box::new(Snapshot::from_error(err.to_string())))
        }
    };
    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!("{{\"error\":\"failed to serialize response: {}\"}}", e)
    })
}
