//! Live capture of a [`PageTree`] from a Chrome tab

use crate::error::{ObserveError, Result};
use crate::page::PageTree;
use headless_chrome::Tab;
use std::sync::Arc;

impl PageTree {
    /// Capture the current page of a browser tab
    ///
    /// Evaluates the bundled capture script in the tab; the script walks the
    /// document once and returns the flat node list as a JSON string.
    pub fn from_tab(tab: &Arc<Tab>) -> Result<Self> {
        let js_code = include_str!("capture_page.js");

        let result = tab.evaluate(js_code, false).map_err(|e| {
            ObserveError::CaptureFailed(format!("Failed to execute capture script: {}", e))
        })?;

        let json_value = result
            .value
            .ok_or_else(|| ObserveError::CaptureFailed("No value returned from capture".to_string()))?;

        // The script returns a JSON string, not a JSON object
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| ObserveError::CaptureFailed(format!("Failed to get JSON string: {}", e)))?;

        Self::from_json(&json_str)
    }
}
