//! folder-outline
//!
//! Reads the folder tree of the document UI from a Chrome tab (or from a saved row
//! snapshot) and emits the nested Markdown outline for the global index document.

use anyhow::Context;
use clap::Parser;
use folder_outline::{BrowserSession, ConnectionOptions, FolderTree, Indexer, LaunchOptions, Notifier,
                     OutlineOptions, OutlineSerializer, Resolver, RetryPolicy, RunOutcome, TextSink,
                     wait_until_ready};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "folder-outline")]
#[command(version)]
#[command(about = "Generate a Markdown outline of a document folder tree", long_about = None)]
struct Cli {
    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint URL of an already running browser
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// Document URL to open before indexing
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Serialize a saved row snapshot instead of reading a browser
    #[arg(long, value_name = "FILE", conflicts_with_all = [
        "ws_endpoint",
        "url",
        "headed",
        "save_snapshot",
        "executable_path",
        "user_data_dir",
        "max_attempts",
        "retry_delay_ms",
    ])]
    snapshot: Option<PathBuf>,

    /// Save the rows read from the browser as a JSON snapshot
    #[arg(long, value_name = "FILE")]
    save_snapshot: Option<PathBuf>,

    /// Write the outline to a file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Lookups before giving up on the folder UI
    #[arg(long, default_value_t = 20)]
    max_attempts: u32,

    /// Delay between lookups in milliseconds
    #[arg(long, default_value_t = 500)]
    retry_delay_ms: u64,

    /// Prefix prepended to every document link
    #[arg(long, default_value = "https://quip-amazon.com")]
    url_prefix: String,
}

/// Prints user-facing messages to stderr, keeping stdout for the outline
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let serializer = OutlineSerializer::new(OutlineOptions::new().url_prefix(cli.url_prefix.clone()));
    let sink = match &cli.output {
        Some(path) => TextSink::File(path.clone()),
        None => TextSink::Stdout,
    };
    let indexer = Indexer::new(serializer, StderrNotifier, sink);

    let tree = match &cli.snapshot {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
            FolderTree::from_json(&json)?
        }
        None => read_from_browser(&cli).await?,
    };

    let outcome = indexer.trigger(&tree)?;
    Ok(match outcome {
        RunOutcome::Copied(_) => ExitCode::SUCCESS,
        RunOutcome::Incomplete(_) | RunOutcome::EmptyOutline => ExitCode::from(2),
    })
}

async fn read_from_browser(cli: &Cli) -> anyhow::Result<FolderTree> {
    let session = match &cli.ws_endpoint {
        Some(endpoint) => {
            log::info!("Connecting to {}", endpoint);
            BrowserSession::connect(ConnectionOptions::new(endpoint.clone()))?
        }
        None => {
            let mut options = LaunchOptions::new().headless(!cli.headed);
            if let Some(path) = &cli.executable_path {
                options = options.chrome_path(path.clone());
            }
            if let Some(dir) = &cli.user_data_dir {
                options = options.user_data_dir(dir.clone());
            }
            log::info!("Launching browser ({})", if options.headless { "headless" } else { "headed" });
            BrowserSession::launch(options)?
        }
    };

    if let Some(url) = &cli.url {
        session.navigate(url)?;
        session.wait_for_navigation()?;
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let policy = RetryPolicy::new()
        .max_attempts(cli.max_attempts)
        .delay(Duration::from_millis(cli.retry_delay_ms));
    let ready = wait_until_ready(&Resolver::new(policy), &session, &cancel)
        .await
        .context("Folder UI did not become ready; is the open document inside a folder?")?;
    log::info!("Folder UI ready at <{}> '{}'", ready.insertion_point.tag_name, ready.insertion_point.text);

    let tree = session.extract_folder_tree()?;
    if let Some(path) = &cli.save_snapshot {
        std::fs::write(path, tree.to_json()?)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_rejects_browser_options() {
        for extra in [
            &["--max-attempts", "3"][..],
            &["--retry-delay-ms", "10"],
            &["--save-snapshot", "out.json"],
            &["--executable-path", "/usr/bin/chromium"],
            &["--user-data-dir", "/tmp/profile"],
            &["--url", "https://docs.test/folder"],
            &["--headed"],
        ] {
            let args = ["folder-outline", "--snapshot", "rows.json"].iter().chain(extra);
            let err = Cli::try_parse_from(args).err().expect("conflicting options accepted");
            assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict, "{:?}", extra);
        }
    }

    #[test]
    fn test_snapshot_with_output_options() {
        let cli = Cli::try_parse_from([
            "folder-outline",
            "--snapshot",
            "rows.json",
            "-o",
            "outline.md",
            "--url-prefix",
            "https://docs.test",
        ])
        .unwrap();

        assert_eq!(cli.snapshot, Some(PathBuf::from("rows.json")));
        assert_eq!(cli.output, Some(PathBuf::from("outline.md")));
        assert_eq!(cli.url_prefix, "https://docs.test");
    }
}
