use folder_outline::{BrowserSession, Indexer, LaunchOptions, LogNotifier, MemorySink, ObjectLocator, OutlineOptions,
                     OutlineSerializer, Resolver, RetryPolicy, RowChild, wait_until_ready};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const FOLDER_PAGE: &str = concat!(
    "<html><body>",
    "<div class='nav-path'><a>Home</a><span class='nav-path-separator'>/</span><a>Team</a></div>",
    "<div class='folder-list-body'><div class='folder-list-background'><div class='folder-list-rows'>",
    "<div class='folder-list-row'>",
    "<a role='treeitem' aria-label='Roadmaps' aria-expanded='true' href='/folder/roadmaps'>Roadmaps</a>",
    "<div role='group'>",
    "<div class='folder-list-row'><a role='treeitem' aria-label='Q3' href='/doc/q3'>Q3</a></div>",
    "</div>",
    "</div>",
    "<div class='folder-list-row'><span role='button'>x</span>",
    "<a role='treeitem' aria-label='Notes' href='/doc/notes'>Notes</a></div>",
    "</div></div></div>",
    "</body></html>"
);

fn launch_with_page() -> BrowserSession {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
    session
        .navigate(&format!("data:text/html,{}", FOLDER_PAGE))
        .expect("Failed to navigate");
    session.wait_for_navigation().expect("Navigation did not finish");
    session
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_extract_folder_tree() {
    let session = launch_with_page();

    let tree = session.extract_folder_tree().expect("Failed to extract rows");

    assert_eq!(tree.rows.len(), 2);
    assert_eq!(tree.count_rows(), 3);
    assert!(matches!(tree.rows[1].children[0], RowChild::Unknown(ref role) if role == "button"));
}

#[test]
#[ignore]
fn test_locator_snapshot() {
    let session = launch_with_page();

    let separator = session.locate(".nav-path-separator").expect("Separator missing");
    assert_eq!(separator.tag_name, "span");
    assert_eq!(separator.text, "/");
    assert!(session.locate(".does-not-exist").is_none());
}

#[tokio::test(flavor = "current_thread")]
#[ignore]
async fn test_ready_then_index() {
    let session = launch_with_page();
    let resolver = Resolver::new(RetryPolicy::new().max_attempts(5).delay(Duration::from_millis(100)));

    let ready = wait_until_ready(&resolver, &session, &CancellationToken::new())
        .await
        .expect("Folder UI not ready");
    assert_eq!(ready.insertion_point.tag_name, "div");

    let sink = MemorySink::new();
    let serializer = OutlineSerializer::new(OutlineOptions::new().url_prefix("https://docs.test"));
    let indexer = Indexer::new(serializer, LogNotifier, &sink);
    let outcome = indexer.run(&session).expect("Run failed");

    assert!(outcome.is_copied());
    assert_eq!(
        sink.writes(),
        vec![
            "\n## [Notes](https://docs.test/doc/notes)\n## [Roadmaps](https://docs.test/folder/roadmaps)\n* [Q3](https://docs.test/doc/q3)"
                .to_string()
        ]
    );
}
