//! One user-triggered index run
//!
//! Waits for the folder UI, serializes the tree and decides what the user sees:
//! the outline goes to the clipboard only when the traversal produced entries and
//! every visited branch had finished loading.

use crate::browser::BrowserSession;
use crate::error::{OutlineError, Result};
use crate::resolver::{ObjectLocator, Resolver, Timer};
use crate::tree::{FolderTree, Outline, OutlineSerializer};
use std::fmt::Debug;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Present when the open document sits inside a folder hierarchy
pub const NAV_ANCHOR_SELECTOR: &str = ".nav-path-separator";

/// Breadcrumb bar the index command is attached to
pub const INSERTION_POINT_SELECTOR: &str = ".nav-path";

/// Surfaces a message to the user
pub trait Notifier {
    fn notify(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }
}

/// Receives the final outline text
pub trait ClipboardSink {
    fn write(&self, text: &str) -> Result<()>;
}

impl<T: ClipboardSink + ?Sized> ClipboardSink for &T {
    fn write(&self, text: &str) -> Result<()> {
        (**self).write(text)
    }
}

/// Notifier that writes to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::info!("{}", message);
    }
}

/// Clipboard sink writing to stdout or to a file
#[derive(Debug)]
pub enum TextSink {
    Stdout,
    File(PathBuf),
}

impl ClipboardSink for TextSink {
    fn write(&self, text: &str) -> Result<()> {
        match self {
            TextSink::Stdout => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", text).map_err(|e| OutlineError::ClipboardFailed(e.to_string()))
            }
            TextSink::File(path) => std::fs::write(path, text)
                .map_err(|e| OutlineError::ClipboardFailed(format!("{}: {}", path.display(), e))),
        }
    }
}

/// Sink keeping every written outline in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All texts written so far
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl ClipboardSink for MemorySink {
    fn write(&self, text: &str) -> Result<()> {
        self.writes
            .lock()
            .map_err(|e| OutlineError::ClipboardFailed(e.to_string()))?
            .push(text.to_string());
        Ok(())
    }
}

/// User-facing messages of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Messages {
    /// Some folders were still collapsed or loading
    pub incomplete: String,

    /// Nothing was serialized, usually because the folder view is not a list
    pub wrong_view_mode: String,

    /// Outline copied
    pub success: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            incomplete: "有项目尚没有加载完成，请点击这些项目来触发加载。".to_string(),
            wrong_view_mode: "需要先在菜单“查看”中把模式设置为“常规列表”或“小列表”".to_string(),
            success: "成功生成全局索引内容，已复制到剪贴板，请打开“0.全局索引”文件，进行粘贴即可。".to_string(),
        }
    }
}

/// What a run did with the outline
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Outline written to the sink
    Copied(Outline),

    /// Some branches had not loaded; nothing was written
    Incomplete(Outline),

    /// The traversal produced no entries
    EmptyOutline,
}

impl RunOutcome {
    pub fn is_copied(&self) -> bool {
        matches!(self, RunOutcome::Copied(_))
    }

    /// The produced outline, if there was one
    pub fn outline(&self) -> Option<&Outline> {
        match self {
            RunOutcome::Copied(outline) | RunOutcome::Incomplete(outline) => Some(outline),
            RunOutcome::EmptyOutline => None,
        }
    }
}

/// Elements found once the folder UI is ready
#[derive(Debug, Clone, PartialEq)]
pub struct Readiness<E> {
    pub anchor: E,
    pub insertion_point: E,
}

/// Wait for the navigation anchor, then the insertion point
pub async fn wait_until_ready<L, T>(
    resolver: &Resolver<T>,
    locator: &L,
    cancel: &CancellationToken,
) -> Result<Readiness<L::Element>>
where
    L: ObjectLocator,
    L::Element: Debug,
    T: Timer,
{
    let anchor = resolver
        .resolve_selector_with_cancel(locator, NAV_ANCHOR_SELECTOR, cancel)
        .await?;
    let insertion_point = resolver
        .resolve_selector_with_cancel(locator, INSERTION_POINT_SELECTOR, cancel)
        .await?;

    Ok(Readiness {
        anchor,
        insertion_point,
    })
}

/// Serializes folder trees and reports the result to the user
pub struct Indexer<N, C> {
    serializer: OutlineSerializer,
    messages: Messages,
    notifier: N,
    clipboard: C,
}

impl<N: Notifier, C: ClipboardSink> Indexer<N, C> {
    pub fn new(serializer: OutlineSerializer, notifier: N, clipboard: C) -> Self {
        Self {
            serializer,
            messages: Messages::default(),
            notifier,
            clipboard,
        }
    }

    /// Builder method: replace the user-facing messages
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Serialize `tree` and commit it if it is complete and non-empty
    pub fn trigger(&self, tree: &FolderTree) -> Result<RunOutcome> {
        let outline = tree.outline(&self.serializer);
        log::debug!("Generated outline:{}", outline.text);

        if outline.is_empty() {
            log::info!("Folder tree produced no entries");
            self.notifier.notify(&self.messages.wrong_view_mode);
            return Ok(RunOutcome::EmptyOutline);
        }

        if !outline.is_complete() {
            log::info!("{} folder items have not finished loading", outline.unloaded);
            self.notifier.notify(&self.messages.incomplete);
            return Ok(RunOutcome::Incomplete(outline));
        }

        self.clipboard.write(&outline.text)?;
        log::info!("Copied outline with {} entries", outline.count_entries());
        self.notifier.notify(&self.messages.success);
        Ok(RunOutcome::Copied(outline))
    }

    /// Read the folder tree from the session's active tab and trigger a run
    pub fn run(&self, session: &BrowserSession) -> Result<RunOutcome> {
        let tree = session.extract_folder_tree()?;
        self.trigger(&tree)
    }
}
