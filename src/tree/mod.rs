//! Folder tree extraction and outline rendering
//!
//! This module reads the lazily-loaded folder tree of the document UI and turns
//! it into a nested Markdown outline. It includes:
//! - TreeRow / RowChild / LeafItem: owned model of the rendered rows
//! - FolderTree: snapshot of the rows read from a tab or from JSON
//! - OutlineSerializer: the recursive, sorting outline writer

pub mod folder;
pub mod outline;
pub mod row;

pub use folder::{FOLDER_ROWS_SELECTOR, FolderTree};
pub use outline::{LoadState, Outline, OutlineNode, OutlineOptions, OutlineSerializer, escape_label, level_prefix};
pub use row::{LeafItem, RowChild, TreeRow};

use crate::error::Result;
use headless_chrome::Tab;
use std::sync::Arc;

/// Extract the folder tree from a browser tab
pub fn extract_folder_tree(tab: &Arc<Tab>) -> Result<FolderTree> {
    FolderTree::from_tab(tab, FOLDER_ROWS_SELECTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_item_export() {
        let item = LeafItem::new("Doc");
        assert_eq!(item.name, "Doc");
    }

    #[test]
    fn test_folder_tree_export() {
        let tree = FolderTree::default();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_serializer_export() {
        let outline = OutlineSerializer::default().serialize(&[]);
        assert!(outline.is_empty());
    }
}
