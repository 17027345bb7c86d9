mod common;

use std::cell::RefCell;
use std::time::Duration;

use common::app::spawn_test_app;
use common::client::{serve, HeadlessView};
use common::fixtures::{new_tree, seed_trees, seed_user};
use forest_map::client::{
    run_load, search, FetchError, HttpTreeSource, LoadError, LoadRequest, LoaderConfig,
    MapController, StatusMessage,
};
use forest_map::model::Coordinate;

fn small_pages() -> LoaderConfig {
    LoaderConfig {
        page_limit: 2,
        max_batches: 50,
    }
}

#[tokio::test]
async fn it_loads_an_owner_map_over_http() {
    let app = spawn_test_app().await;
    seed_user(app.store(), 1, "ada@example.org", false);
    seed_trees(app.store(), 1, 1, 5);
    let duplicate = new_tree(6, "pb-1", 1);
    let mut broken = new_tree(7, "PB-7", 1);
    broken.lat = Some(Coordinate::from("not-a-number"));
    app.store().insert_trees(&[duplicate, broken]).unwrap();

    let base_url = serve(app.app.clone()).await;
    let source = HttpTreeSource::new(&base_url, Duration::from_secs(5));
    let controller = RefCell::new(MapController::new(HeadlessView::default()));

    let summary = search(&controller, &source, " ADA@example.org ", small_pages())
        .await
        .unwrap()
        .expect("lookup ran");

    assert_eq!(summary.total, 7);
    assert_eq!(summary.batches, 4);
    assert!(!summary.truncated);

    let mut ctl = controller.borrow_mut();
    assert_eq!(ctl.aggregator().marker_count(), 6);
    assert_eq!(ctl.aggregator().skipped(), 1);
    assert_eq!(ctl.status(), &StatusMessage::Loaded { count: 6 });
    assert_eq!(
        ctl.view().list_codes(),
        vec!["PB-1", "PB-2", "PB-3", "PB-4", "PB-5"]
    );
    assert!(ctl.view().fitted.is_some());

    assert!(ctl.select_by_code("pb-3"));
    assert_eq!(ctl.view().active_markers.len(), 1);
    assert!(ctl.view().active_items.contains("pb-3"));
    assert!(!ctl.select_by_code("PB-7"));
}

#[tokio::test]
async fn it_rejected_lookup_clears_the_map() {
    let app = spawn_test_app().await;
    seed_user(app.store(), 1, "ada@example.org", false);
    seed_trees(app.store(), 1, 1, 3);

    let base_url = serve(app.app.clone()).await;
    let source = HttpTreeSource::new(&base_url, Duration::from_secs(5));
    let controller = RefCell::new(MapController::new(HeadlessView::default()));

    search(&controller, &source, "1", small_pages()).await.unwrap();
    assert_eq!(controller.borrow().aggregator().marker_count(), 3);

    let err = search(&controller, &source, "not-an-id", small_pages())
        .await
        .unwrap_err();
    match err {
        LoadError::Fetch(FetchError::Status { status, code, .. }) => {
            assert_eq!(status, 400);
            assert_eq!(code.as_deref(), Some("MISSING_IDENTITY"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let ctl = controller.borrow();
    assert!(ctl.view().markers.is_empty());
    assert!(ctl.view().list.is_empty());
    assert!(matches!(ctl.status(), StatusMessage::Rejected { .. }));
}

#[tokio::test]
async fn it_loads_forest_heroes() {
    let app = spawn_test_app().await;
    seed_user(app.store(), 1, "casual@example.org", false);
    seed_user(app.store(), 2, "hero@example.org", true);
    seed_trees(app.store(), 1, 1, 2);
    seed_trees(app.store(), 2, 10, 3);

    let base_url = serve(app.app.clone()).await;
    let source = HttpTreeSource::new(&base_url, Duration::from_secs(5));
    let controller = RefCell::new(MapController::new(HeadlessView::default()));

    let summary = run_load(&controller, &source, &LoadRequest::ForestHeroes, small_pages())
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(
        controller.borrow().view().list_codes(),
        vec!["PB-10", "PB-11", "PB-12"]
    );
}

#[tokio::test]
async fn it_unreachable_server_reports_failure() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpTreeSource::new(&format!("http://{addr}"), Duration::from_secs(2));
    let controller = RefCell::new(MapController::new(HeadlessView::default()));

    let err = run_load(&controller, &source, &LoadRequest::ForestHeroes, small_pages())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LoadError::Fetch(FetchError::Network(_) | FetchError::Timeout)
    ));
    assert_eq!(controller.borrow().status(), &StatusMessage::Failed);
}
