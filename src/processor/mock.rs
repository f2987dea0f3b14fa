//! Mock OCR backend returning a fixed sample extraction.
//!
//! Lets the gateway and any frontend be developed end-to-end before a real
//! OCR service is wired in. The file is still checked for existence so that
//! staging bugs surface here rather than only against the remote backend.

use super::DocumentProcessor;
use crate::error::GatewayError;
use crate::semantic::{
    Block, Content, Extraction, HierarchyItem, LayoutDescriptor, Position, Relation, SemanticMap,
};
use async_trait::async_trait;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Returns [`sample_extraction`] after a simulated delay.
#[derive(Debug, Clone)]
pub struct MockProcessor {
    latency: Duration,
}

impl MockProcessor {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockProcessor {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[async_trait]
impl DocumentProcessor for MockProcessor {
    async fn extract(&self, path: &Path) -> Result<Extraction, GatewayError> {
        let start = Instant::now();
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(GatewayError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut extraction = sample_extraction();
        extraction.processing_time = start.elapsed().as_secs_f64();
        debug!(
            "Mock extraction for {} in {:.3}s",
            path.display(),
            extraction.processing_time
        );
        Ok(extraction)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

fn item(kind: &str, content: Content, level: i64) -> HierarchyItem {
    HierarchyItem {
        kind: kind.to_string(),
        content,
        level,
    }
}

fn block(id: &str, kind: &str, content: &str, x: f64, y: f64) -> Block {
    Block {
        id: id.to_string(),
        kind: kind.to_string(),
        content: content.to_string(),
        position: Position { x, y },
    }
}

/// The fixed extraction served by [`MockProcessor`]: a short academic paper
/// with a title, two sections and one `contains` relation.
pub fn sample_extraction() -> Extraction {
    Extraction {
        semantic_map: SemanticMap {
            hierarchy: vec![
                item("title", "Sample Document".into(), 1),
                item("heading", "Introduction".into(), 2),
                item("paragraph", "This is a sample paragraph.".into(), 3),
                item("heading", "Methods".into(), 2),
                item(
                    "list",
                    Content::List(vec!["Method 1".to_string(), "Method 2".to_string()]),
                    3,
                ),
            ],
            blocks: vec![
                block("title_1", "title", "Sample Document", 50.0, 100.0),
                block("heading_1", "heading", "Introduction", 50.0, 200.0),
                block("para_1", "paragraph", "This is a sample paragraph.", 50.0, 250.0),
            ],
            relations: vec![Relation {
                from: "heading_1".to_string(),
                to: "para_1".to_string(),
                kind: "contains".to_string(),
            }],
        },
        cleaned_text: "Sample Document\n\nIntroduction\nThis is a sample paragraph.\n\nMethods\nMethod 1\nMethod 2"
            .to_string(),
        layout_descriptor: LayoutDescriptor {
            kind: "academic_paper".to_string(),
            confidence: 0.95,
            sections: vec![
                "title".to_string(),
                "introduction".to_string(),
                "methods".to_string(),
            ],
            has_tables: false,
            has_figures: false,
        },
        processing_time: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render::render_structure;

    #[tokio::test]
    async fn returns_sample_for_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let processor = MockProcessor::new(Duration::ZERO);
        let extraction = processor.extract(file.path()).await.unwrap();

        assert_eq!(extraction.semantic_map.hierarchy.len(), 5);
        assert_eq!(extraction.semantic_map.blocks.len(), 3);
        assert_eq!(extraction.layout_descriptor.kind, "academic_paper");
        assert!(extraction.processing_time >= 0.0);
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.pdf");
        let err = MockProcessor::new(Duration::ZERO)
            .extract(&path)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn latency_is_reflected_in_processing_time() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let processor = MockProcessor::new(Duration::from_millis(20));
        let extraction = processor.extract(file.path()).await.unwrap();
        assert!(extraction.processing_time >= 0.02);
    }

    #[test]
    fn sample_renders_expected_outline() {
        let outline = render_structure(&sample_extraction().semantic_map);
        assert_eq!(
            outline,
            "Hierarchy:\n\
             - title: Sample Document\n\
             - heading: Introduction\n\
             - paragraph: This is a sample paragraph.\n\
             - heading: Methods\n\
             - list: [Method 1, Method 2]\n\
             \n\
             Content Blocks:\n\
             - title: Sample Document\n\
             - heading: Introduction\n\
             - paragraph: This is a sample paragraph.\n"
        );
    }
}
