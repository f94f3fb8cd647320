use serde::{Deserialize, Serialize};

/// One `.folder-list-row` of the rendered folder tree
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TreeRow {
    /// Structural children of the row, in document order
    #[serde(default)]
    pub children: Vec<RowChild>,
}

/// Structural child of a row, discriminated by its `role` attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawChild", into = "RawChild")]
pub enum RowChild {
    /// `role="group"`: nested rows labeled by the item preceding it
    Group(Vec<TreeRow>),

    /// `role="treeitem"`
    Item(LeafItem),

    /// Any other role, kept verbatim for diagnostics
    Unknown(String),

    /// No role attribute at all
    Untagged,
}

/// A directly labeled tree entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeafItem {
    /// Label from `aria-label`
    pub name: String,

    /// `aria-expanded`: `None` when the item is not collapsible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,

    /// Link target from `href`, absent until the host resolved it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Wire shape of a row child as produced by the page script
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawChild {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    expanded: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    rows: Vec<TreeRow>,
}

impl From<RawChild> for RowChild {
    fn from(raw: RawChild) -> Self {
        match raw.role.as_deref() {
            Some("group") => RowChild::Group(raw.rows),
            Some("treeitem") => RowChild::Item(LeafItem {
                name: raw.name.unwrap_or_default(),
                expanded: match raw.expanded.as_deref() {
                    Some("true") => Some(true),
                    Some("false") => Some(false),
                    _ => None,
                },
                url: raw.url,
            }),
            Some(other) => RowChild::Unknown(other.to_string()),
            None => RowChild::Untagged,
        }
    }
}

impl From<RowChild> for RawChild {
    fn from(child: RowChild) -> Self {
        match child {
            RowChild::Group(rows) => RawChild {
                role: Some("group".to_string()),
                rows,
                ..Default::default()
            },
            RowChild::Item(item) => RawChild {
                role: Some("treeitem".to_string()),
                name: Some(item.name),
                expanded: item.expanded.map(|e| e.to_string()),
                url: item.url,
                ..Default::default()
            },
            RowChild::Unknown(role) => RawChild {
                role: Some(role),
                ..Default::default()
            },
            RowChild::Untagged => RawChild::default(),
        }
    }
}

impl TreeRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: append a leaf item
    pub fn with_item(mut self, item: LeafItem) -> Self {
        self.children.push(RowChild::Item(item));
        self
    }

    /// Builder method: append a group of nested rows
    pub fn with_group(mut self, rows: Vec<TreeRow>) -> Self {
        self.children.push(RowChild::Group(rows));
        self
    }

    /// Builder method: append an arbitrary child
    pub fn with_child(mut self, child: RowChild) -> Self {
        self.children.push(child);
        self
    }

    /// Iterate over the leaf items directly in this row
    pub fn items(&self) -> impl Iterator<Item = &LeafItem> {
        self.children.iter().filter_map(|child| match child {
            RowChild::Item(item) => Some(item),
            _ => None,
        })
    }

    /// Count rows in this row's subtree, including itself
    pub fn count_rows(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| match child {
                RowChild::Group(rows) => rows.iter().map(TreeRow::count_rows).sum(),
                _ => 0,
            })
            .sum::<usize>()
    }
}

impl LeafItem {
    /// Create a non-collapsible item without a resolved link
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expanded: None,
            url: None,
        }
    }

    /// Builder method: set the link target
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder method: set the expansion state
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_item_builder() {
        let item = LeafItem::new("Specs").with_url("/abc").with_expanded(true);

        assert_eq!(item.name, "Specs");
        assert_eq!(item.url.as_deref(), Some("/abc"));
        assert_eq!(item.expanded, Some(true));
    }

    #[test]
    fn test_deserialize_roles() {
        let json = r#"{"children": [
            {"role": "treeitem", "name": "A", "expanded": "false", "url": "/a"},
            {"role": "group", "rows": [{"children": [{"role": "treeitem", "name": "B"}]}]},
            {"role": "presentation"},
            {}
        ]}"#;

        let row: TreeRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.children.len(), 4);
        assert_eq!(
            row.children[0],
            RowChild::Item(LeafItem::new("A").with_url("/a").with_expanded(false))
        );
        match &row.children[1] {
            RowChild::Group(rows) => assert_eq!(rows[0].items().next().unwrap().name, "B"),
            other => panic!("Expected group, got {:?}", other),
        }
        assert_eq!(row.children[2], RowChild::Unknown("presentation".to_string()));
        assert_eq!(row.children[3], RowChild::Untagged);
    }

    #[test]
    fn test_expanded_only_recognizes_literal_values() {
        let json = r#"{"role": "treeitem", "name": "A", "expanded": "mixed"}"#;
        let child: RowChild = serde_json::from_str(json).unwrap();
        assert_eq!(child, RowChild::Item(LeafItem::new("A")));
    }

    #[test]
    fn test_serialization() {
        let row = TreeRow::new()
            .with_item(LeafItem::new("Folder").with_url("/f").with_expanded(true))
            .with_group(vec![TreeRow::new().with_item(LeafItem::new("X").with_url("/x"))]);

        let json = serde_json::to_string(&row).unwrap();
        let deserialized: TreeRow = serde_json::from_str(&json).unwrap();

        assert_eq!(row, deserialized);
        assert!(json.contains("\"expanded\":\"true\""));
    }

    #[test]
    fn test_count_rows() {
        let row = TreeRow::new()
            .with_item(LeafItem::new("Folder"))
            .with_group(vec![
                TreeRow::new().with_item(LeafItem::new("X")),
                TreeRow::new().with_item(LeafItem::new("Y")),
            ]);

        assert_eq!(row.count_rows(), 3);
    }
}
