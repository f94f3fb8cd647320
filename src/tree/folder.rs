use crate::error::{OutlineError, Result};
use crate::tree::outline::{Outline, OutlineSerializer};
use crate::tree::row::TreeRow;
use headless_chrome::Tab;
use std::sync::Arc;

/// Selector of the container holding the top-level folder rows
pub const FOLDER_ROWS_SELECTOR: &str = ".folder-list-body>.folder-list-background>.folder-list-rows";

/// Snapshot of the folder tree as rendered in a tab
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderTree {
    /// Top-level rows, in document order
    pub rows: Vec<TreeRow>,
}

impl FolderTree {
    pub fn new(rows: Vec<TreeRow>) -> Self {
        Self { rows }
    }

    /// Read the rows under `root_selector` from a browser tab
    pub fn from_tab(tab: &Arc<Tab>, root_selector: &str) -> Result<Self> {
        let selector = serde_json::to_string(root_selector)
            .map_err(|e| OutlineError::TreeParseFailed(format!("Invalid root selector: {}", e)))?;
        let js_code = format!("({})({})", include_str!("extract_rows.js"), selector);

        let result = tab
            .evaluate(&js_code, false)
            .map_err(|e| OutlineError::EvaluationFailed(format!("Failed to execute row extraction script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| OutlineError::TreeParseFailed("No value returned from row extraction".to_string()))?;

        // The script returns a JSON string rather than an object
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| OutlineError::TreeParseFailed(format!("Failed to get JSON string: {}", e)))?;

        let tree = Self::from_json(&json_str)?;
        log::debug!("Read {} folder rows from '{}'", tree.count_rows(), root_selector);
        Ok(tree)
    }

    /// Parse a JSON array of rows, as produced by the page script or saved snapshots
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<TreeRow> = serde_json::from_str(json)
            .map_err(|e| OutlineError::TreeParseFailed(format!("Failed to parse rows JSON: {}", e)))?;
        Ok(Self::new(rows))
    }

    /// Convert the rows to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.rows)
            .map_err(|e| OutlineError::TreeParseFailed(format!("Failed to serialize rows to JSON: {}", e)))
    }

    /// Count rows at every depth
    pub fn count_rows(&self) -> usize {
        self.rows.iter().map(TreeRow::count_rows).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the outline of this tree
    pub fn outline(&self, serializer: &OutlineSerializer) -> Outline {
        serializer.serialize(&self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::row::LeafItem;

    fn create_test_tree() -> FolderTree {
        FolderTree::new(vec![
            TreeRow::new()
                .with_item(LeafItem::new("Team").with_url("/team").with_expanded(true))
                .with_group(vec![
                    TreeRow::new().with_item(LeafItem::new("Roadmap").with_url("/roadmap")),
                    TreeRow::new().with_item(LeafItem::new("Notes").with_url("/notes")),
                ]),
            TreeRow::new().with_item(LeafItem::new("Archive").with_url("/archive")),
        ])
    }

    #[test]
    fn test_count_rows() {
        let tree = create_test_tree();
        assert_eq!(tree.count_rows(), 4);
        assert!(!tree.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let tree = create_test_tree();
        let json = tree.to_json().unwrap();

        assert!(json.contains("\"role\": \"treeitem\""));
        assert!(json.contains("\"role\": \"group\""));
        assert_eq!(FolderTree::from_json(&json).unwrap(), tree);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = FolderTree::from_json("{\"rows\": 3}").unwrap_err();
        assert!(matches!(err, OutlineError::TreeParseFailed(_)));
    }

    #[test]
    fn test_outline() {
        let serializer = OutlineSerializer::default();
        let outline = create_test_tree().outline(&serializer);

        assert_eq!(
            outline.text,
            "\n## [Archive](https://quip-amazon.com/archive)\
             \n## [Team](https://quip-amazon.com/team)\
             \n* [Notes](https://quip-amazon.com/notes)\
             \n* [Roadmap](https://quip-amazon.com/roadmap)"
        );
    }
}
