use crate::tree::row::{LeafItem, RowChild, TreeRow};
use serde::{Deserialize, Serialize};

/// Prefix of a top-level entry; an outline consisting of only this has no entries
pub const TOP_LEVEL_PREFIX: &str = "\n## ";

/// Markdown prefix placed before every entry of the given depth
pub fn level_prefix(level: usize) -> &'static str {
    match level {
        0 => TOP_LEVEL_PREFIX,
        1 => "\n* ",
        2 => "\n\t* ",
        3 => "\n\t\t* ",
        4 => "\n\t\t\t* ",
        5 => "\n\t\t\t\t* ",
        _ => "\n",
    }
}

/// Replace brackets so a label cannot break the surrounding link syntax
pub fn escape_label(name: &str) -> String {
    name.replace('[', "【").replace(']', "】")
}

/// Host-specific values used while rendering labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineOptions {
    /// Prepended to every item's relative `href`
    pub url_prefix: String,

    /// Label of the placeholder row shown while a folder is loading
    pub loading_label: String,

    /// Label of the index document itself, which is never listed
    pub index_label: String,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            url_prefix: "https://quip-amazon.com".to_string(),
            loading_label: "加载项目".to_string(),
            index_label: "0.全局索引".to_string(),
        }
    }
}

impl OutlineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the link prefix
    pub fn url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    /// Builder method: set the loading placeholder label
    pub fn loading_label(mut self, label: impl Into<String>) -> Self {
        self.loading_label = label.into();
        self
    }

    /// Builder method: set the global index label
    pub fn index_label(mut self, label: impl Into<String>) -> Self {
        self.index_label = label.into();
        self
    }
}

/// Whether every visited branch had finished loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    #[default]
    Complete,
    Incomplete,
}

impl LoadState {
    /// Combine two observations; `Incomplete` wins
    pub fn merge(self, other: LoadState) -> LoadState {
        match (self, other) {
            (LoadState::Complete, LoadState::Complete) => LoadState::Complete,
            _ => LoadState::Incomplete,
        }
    }

    pub fn is_complete(self) -> bool {
        self == LoadState::Complete
    }
}

/// A rendered entry of the outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Rendered label, usually a Markdown link; empty for an unlabeled group
    pub text: String,

    /// Depth of this entry, 0 for top level
    pub level: usize,

    /// Entries of the group following the label, sorted.
    /// `None` when the label had no group after it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<OutlineNode>>,
}

impl OutlineNode {
    /// A label without a sub-tree
    pub fn leaf(text: impl Into<String>, level: usize) -> Self {
        Self {
            text: text.into(),
            level,
            children: None,
        }
    }

    /// The entry's full text: its label followed by its rendered sub-tree
    pub fn entry(&self) -> String {
        match &self.children {
            Some(children) => format!("{}{}", self.text, render_block(children, self.level + 1)),
            None => self.text.clone(),
        }
    }

    /// Count entries in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(OutlineNode::count)
            .sum::<usize>()
    }
}

/// Join entries of one container with the level prefix, prefix first
fn render_block(nodes: &[OutlineNode], level: usize) -> String {
    let prefix = level_prefix(level);
    let entries: Vec<String> = nodes.iter().map(OutlineNode::entry).collect();
    format!("{}{}", prefix, entries.join(prefix))
}

/// Result of serializing one container of rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Final outline text
    pub text: String,

    /// Depth the outline was rendered at
    pub level: usize,

    /// Sorted entries of the container
    pub nodes: Vec<OutlineNode>,

    /// Completeness of the traversal that produced this outline
    pub load_state: LoadState,

    /// Number of items seen that had not finished loading
    pub unloaded: usize,
}

impl Outline {
    /// True when no entry was produced at all
    pub fn is_empty(&self) -> bool {
        self.text == level_prefix(self.level)
    }

    pub fn is_complete(&self) -> bool {
        self.load_state.is_complete()
    }

    /// Total number of entries at every depth
    pub fn count_entries(&self) -> usize {
        self.nodes.iter().map(OutlineNode::count).sum()
    }
}

/// Entries of one container plus what the traversal observed below it
#[derive(Debug, Default)]
struct Branch {
    nodes: Vec<OutlineNode>,
    load_state: LoadState,
    unloaded: usize,
}

impl Branch {
    fn absorb(&mut self, load_state: LoadState, unloaded: usize) {
        self.load_state = self.load_state.merge(load_state);
        self.unloaded += unloaded;
    }
}

/// Converts folder rows into a sorted, depth-prefixed Markdown outline
#[derive(Debug, Clone, Default)]
pub struct OutlineSerializer {
    options: OutlineOptions,
}

impl OutlineSerializer {
    pub fn new(options: OutlineOptions) -> Self {
        Self { options }
    }

    /// Serialize a top-level container of rows
    pub fn serialize(&self, rows: &[TreeRow]) -> Outline {
        self.serialize_at(rows, 0)
    }

    /// Serialize a container whose entries sit at `level`
    pub fn serialize_at(&self, rows: &[TreeRow], level: usize) -> Outline {
        let branch = self.walk(rows, level);
        Outline {
            text: render_block(&branch.nodes, level),
            level,
            nodes: branch.nodes,
            load_state: branch.load_state,
            unloaded: branch.unloaded,
        }
    }

    fn walk(&self, rows: &[TreeRow], level: usize) -> Branch {
        let mut branch = Branch::default();

        for row in rows {
            let mut pending: Option<String> = None;

            for child in &row.children {
                match child {
                    RowChild::Group(nested) => {
                        let sub = self.walk(nested, level + 1);
                        branch.absorb(sub.load_state, sub.unloaded);
                        branch.nodes.push(OutlineNode {
                            text: pending.take().unwrap_or_default(),
                            level,
                            children: Some(sub.nodes),
                        });
                    }
                    RowChild::Item(item) => {
                        if let Some(label) = pending.take() {
                            branch.nodes.push(OutlineNode::leaf(label, level));
                        }
                        if self.is_unloaded(item) {
                            log::debug!("Item '{}' at level {} has not finished loading", item.name, level);
                            branch.absorb(LoadState::Incomplete, 1);
                        }
                        if item.name != self.options.index_label {
                            pending = Some(self.link(item));
                        }
                    }
                    RowChild::Unknown(role) => {
                        log::warn!("Ignoring row child with unknown role '{}'", role);
                    }
                    RowChild::Untagged => {}
                }
            }

            if let Some(label) = pending {
                branch.nodes.push(OutlineNode::leaf(label, level));
            }
        }

        branch.nodes.sort_by_cached_key(OutlineNode::entry);
        branch
    }

    fn is_unloaded(&self, item: &LeafItem) -> bool {
        item.expanded == Some(false) || (item.name == self.options.loading_label && item.url.is_none())
    }

    fn link(&self, item: &LeafItem) -> String {
        format!(
            "[{}]({}{})",
            escape_label(&item.name),
            self.options.url_prefix,
            item.url.as_deref().unwrap_or_default()
        )
    }
}
