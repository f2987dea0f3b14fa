//! The data contract produced by document analysis.
//!
//! A [`SemanticMap`] describes a parsed document three ways: a reading-order
//! `hierarchy` (title, headings, paragraphs…), positioned content `blocks`,
//! and informational `relations` between blocks. Every collection and most
//! scalar fields default when absent so a sparse OCR payload still
//! deserialises; the renderer decides what to make of the gaps.
//!
//! Field names on the wire (`type`, `from`, `to`, …) match the OCR service
//! schema exactly, so the same types serve both as the processor's output
//! and as the gateway's JSON response body.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

fn unknown_kind() -> String {
    "unknown".to_string()
}

/// Treat an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_kind))
}

/// Structured representation of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticMap {
    /// Top-to-bottom reading order. Levels are not required to be monotonic.
    #[serde(default)]
    pub hierarchy: Vec<HierarchyItem>,

    /// Positioned content blocks; `id` is unique within the map.
    #[serde(default)]
    pub blocks: Vec<Block>,

    /// Block-to-block relations. Never rendered, never validated.
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl SemanticMap {
    /// Read a map out of an arbitrary JSON value without consuming it.
    pub fn deserialize_from(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// `true` when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.hierarchy.is_empty() && self.blocks.is_empty()
    }
}

/// One entry of the reading-order outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyItem {
    /// Element kind, e.g. `title`, `heading`, `paragraph`, `list`.
    #[serde(
        rename = "type",
        default = "unknown_kind",
        deserialize_with = "null_as_unknown"
    )]
    pub kind: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Content,

    /// Nesting depth as reported by OCR. Any integer is accepted; the
    /// sequence need not be monotonic or start at 1.
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: i64,
}

/// Text payload of a hierarchy item: a single string or a list of strings
/// (list items, table cells).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    List(Vec<String>),
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_string())
    }
}

impl From<Vec<String>> for Content {
    fn from(items: Vec<String>) -> Self {
        Content::List(items)
    }
}

/// Lists render as `[a, b, c]`; they are not flattened into separate lines.
impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Text(s) => f.write_str(s),
            Content::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// A positioned region of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(
        rename = "type",
        default = "unknown_kind",
        deserialize_with = "null_as_unknown"
    )]
    pub kind: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub position: Position,
}

/// Page coordinates of a block's anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, deserialize_with = "null_as_default")]
    pub x: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub y: f64,
}

/// A directed, typed edge between two blocks (e.g. `contains`).
///
/// Relations are carried, never checked: missing endpoints or type come
/// through as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

/// Document-level layout metadata. Not rendered; passed through to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    /// Document genre, e.g. `academic_paper`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Classifier confidence, 0.0–1.0.
    #[serde(default)]
    pub confidence: f64,

    #[serde(default)]
    pub sections: Vec<String>,

    #[serde(default)]
    pub has_tables: bool,

    #[serde(default)]
    pub has_figures: bool,
}

/// Everything a document processor returns for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    #[serde(default)]
    pub semantic_map: SemanticMap,

    #[serde(default)]
    pub cleaned_text: String,

    #[serde(default)]
    pub layout_descriptor: LayoutDescriptor,

    /// Wall-clock seconds spent extracting.
    #[serde(default)]
    pub processing_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sparse_map_deserialises_with_defaults() {
        let map: SemanticMap = serde_json::from_value(json!({
            "hierarchy": [{"level": 2}],
            "blocks": [{"id": "b1"}]
        }))
        .unwrap();

        assert_eq!(map.hierarchy[0].kind, "unknown");
        assert_eq!(map.hierarchy[0].content, Content::Text(String::new()));
        assert_eq!(map.blocks[0].kind, "unknown");
        assert_eq!(map.blocks[0].position, Position::default());
        assert!(map.relations.is_empty());
    }

    #[test]
    fn empty_object_is_empty_map() {
        let map: SemanticMap = serde_json::from_value(json!({})).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn content_accepts_string_or_list() {
        let item: HierarchyItem = serde_json::from_value(json!({
            "type": "list", "content": ["Method 1", "Method 2"], "level": 3
        }))
        .unwrap();
        assert_eq!(
            item.content,
            Content::List(vec!["Method 1".into(), "Method 2".into()])
        );
        assert_eq!(item.content.to_string(), "[Method 1, Method 2]");
    }

    #[test]
    fn wire_names_are_preserved() {
        let rel = Relation {
            from: "heading_1".into(),
            to: "para_1".into(),
            kind: "contains".into(),
        };
        let v = serde_json::to_value(&rel).unwrap();
        assert_eq!(
            v,
            json!({"from": "heading_1", "to": "para_1", "type": "contains"})
        );
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let map: SemanticMap = serde_json::from_value(json!({
            "hierarchy": [{"type": null, "content": null, "level": null}],
            "blocks": [{"id": "b1", "type": "paragraph", "content": null,
                        "position": {"x": null}}],
            "relations": [{"from": null}]
        }))
        .unwrap();

        assert_eq!(map.hierarchy[0].kind, "unknown");
        assert_eq!(map.hierarchy[0].content, Content::default());
        assert_eq!(map.hierarchy[0].level, 0);
        assert_eq!(map.blocks[0].content, "");
        assert_eq!(map.blocks[0].position, Position::default());
        assert_eq!(map.relations[0], Relation::default());
    }

    #[test]
    fn negative_levels_are_kept() {
        let item: HierarchyItem =
            serde_json::from_value(json!({"type": "note", "content": "x", "level": -2})).unwrap();
        assert_eq!(item.level, -2);
    }
}
