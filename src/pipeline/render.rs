//! Structure rendering: flatten a [`SemanticMap`] into a text outline.
//!
//! The outline is what the model actually "sees" of the document's layout,
//! so it is deliberately plain: two labelled sections, one `- type: content`
//! line per element, in the order the OCR backend reported them.
//!
//! ```text
//! Hierarchy:
//! - title: Sample Document
//! - heading: Introduction
//!
//! Content Blocks:
//! - title: Sample Document
//! ```
//!
//! Types are emitted verbatim (no title-casing) and relations are never
//! rendered. The output depends only on the map, so rendering the same map
//! twice yields byte-identical text.

use crate::semantic::SemanticMap;
use serde_json::Value;
use tracing::{debug, warn};

/// Prefix of the diagnostic returned when an untyped map cannot be read.
pub const STRUCTURE_ERROR_PREFIX: &str = "Structure parsing error: ";

/// Render a semantic map into the two-section outline.
///
/// An empty map renders as `"Hierarchy:\n\nContent Blocks:\n"`.
pub fn render_structure(map: &SemanticMap) -> String {
    let mut out = String::from("Hierarchy:\n");
    for item in &map.hierarchy {
        out.push_str(&format!("- {}: {}\n", item.kind, item.content));
    }

    out.push_str("\nContent Blocks:\n");
    for block in &map.blocks {
        out.push_str(&format!("- {}: {}\n", block.kind, block.content));
    }

    debug!(
        hierarchy = map.hierarchy.len(),
        blocks = map.blocks.len(),
        bytes = out.len(),
        "Rendered structure outline"
    );
    out
}

/// Render an untyped JSON semantic map.
///
/// Missing `hierarchy` / `blocks` keys and missing or null item fields are tolerated
/// (see [`crate::semantic`] defaults). Input that cannot be read as a map at
/// all (say, `hierarchy` is not an array) is returned as
/// `"Structure parsing error: <message>"` instead of an error.
pub fn render_structure_value(value: &Value) -> String {
    match SemanticMap::deserialize_from(value) {
        Ok(map) => render_structure(&map),
        Err(e) => {
            warn!("Semantic map could not be parsed: {}", e);
            format!("{STRUCTURE_ERROR_PREFIX}{e}")
        }
    }
}
