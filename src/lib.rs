//! # folder-outline
//!
//! A Rust library that turns the lazily-loaded folder tree of a document-management web UI
//! into a nested Markdown outline, driving the page via Chrome DevTools Protocol (CDP).
//!
//! ## Features
//!
//! - **Retrying Resolver**: waits for UI elements that are rendered some time after navigation
//! - **Tree Serializer**: walks the folder rows, sorts siblings, escapes labels and detects
//!   branches that have not finished loading
//! - **Index Runs**: decides whether an outline can be committed and notifies the user
//! - **Browser Session Management**: launch or connect to Chrome/Chromium instances
//!
//! ## CLI
//!
//! ```bash
//! # Attach to a browser started with --remote-debugging-port and index the open folder
//! cargo run --bin folder-outline -- --ws-endpoint ws://127.0.0.1:9222/devtools/browser/<id>
//!
//! # Serialize a saved row snapshot
//! cargo run --bin folder-outline -- --snapshot rows.json --output index.md
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use folder_outline::{BrowserSession, Indexer, LaunchOptions, LogNotifier, OutlineSerializer,
//!                      Resolver, RetryPolicy, TextSink, wait_until_ready};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> folder_outline::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://quip-amazon.com/some-document")?;
//!
//! // Wait until the breadcrumb bar shows a folder hierarchy
//! let resolver = Resolver::new(RetryPolicy::default());
//! wait_until_ready(&resolver, &session, &CancellationToken::new()).await?;
//!
//! let indexer = Indexer::new(OutlineSerializer::default(), LogNotifier, TextSink::Stdout);
//! let outcome = indexer.run(&session)?;
//! println!("copied: {}", outcome.is_copied());
//! # Ok(())
//! # }
//! ```
//!
//! ### Serializing Rows Directly
//!
//! ```rust
//! use folder_outline::{LeafItem, OutlineOptions, OutlineSerializer, TreeRow};
//!
//! let rows = vec![
//!     TreeRow::new()
//!         .with_item(LeafItem::new("Folder").with_url("/f"))
//!         .with_group(vec![TreeRow::new().with_item(LeafItem::new("X").with_url("/x"))]),
//! ];
//!
//! let serializer = OutlineSerializer::new(OutlineOptions::new().url_prefix("https://docs.test"));
//! let outline = serializer.serialize(&rows);
//! assert_eq!(outline.text, "\n## [Folder](https://docs.test/f)\n* [X](https://docs.test/x)");
//! assert!(outline.is_complete());
//! ```
//!
//! ## Module Overview
//!
//! - [`resolver`]: Retrying, cancellable element lookup
//! - [`tree`]: Folder row model, extraction and outline serialization
//! - [`index`]: Run wiring between the serializer, notifier and clipboard sink
//! - [`browser`]: Browser session management and configuration
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod error;
pub mod index;
pub mod resolver;
pub mod tree;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions, LocatedElement};
pub use error::{OutlineError, Result};
pub use index::{ClipboardSink, Indexer, LogNotifier, MemorySink, Messages, Notifier, Readiness, RunOutcome,
                TextSink, wait_until_ready};
pub use resolver::{ObjectLocator, Resolver, RetryPolicy, Timer, TokioTimer, resolve};
pub use tree::{FolderTree, LeafItem, LoadState, Outline, OutlineNode, OutlineOptions, OutlineSerializer, RowChild,
               TreeRow};
