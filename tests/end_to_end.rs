use axum::http::HeaderValue;
use task_manager::client::{ClientError, SortBy, TaskApi, TaskBackend, TaskDraft, TaskFilters, TaskStats, TaskStore};
use task_manager::{app, db, AppState, Priority};

/// Serves the app over a fresh in-memory database on an ephemeral port.
async fn spawn_server() -> String {
    let pool = db::connect_in_memory().await.unwrap();
    let app = app(AppState::new(pool), HeaderValue::from_static("http://localhost:3000"));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn store_round_trips_through_the_api() {
    let base_url = spawn_server().await;
    let mut store = TaskStore::new(TaskApi::new(base_url));

    store.fetch_all().await.unwrap();
    assert!(store.tasks().is_empty());

    store.add_task(TaskDraft::new("Banana", Priority::Low)).await.unwrap();
    store
        .add_task(TaskDraft::new("Apple", Priority::High).with_description("green ones"))
        .await
        .unwrap();

    let server_order: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(server_order, ["Apple", "Banana"]);
    assert_eq!(store.tasks()[0].description.as_deref(), Some("green ones"));

    let banana = store.tasks()[1].id.clone();
    store.toggle_task(&banana).await.unwrap();
    assert!(store.tasks()[1].completed);
    assert!(store.tasks()[1].completed_at.is_some());
    assert_eq!(store.stats(), TaskStats { total: 2, completed: 1 });

    store.set_filters(TaskFilters { sort_by: SortBy::Name, show_completed: false });
    let visible: Vec<_> = store.visible_tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(visible, ["Apple"]);

    store.toggle_task(&banana).await.unwrap();
    assert!(store.tasks()[1].completed_at.is_none());

    store.delete_task(&banana).await.unwrap();
    assert_eq!(store.stats(), TaskStats { total: 1, completed: 0 });
}

#[tokio::test]
async fn server_validation_message_reaches_the_store() {
    let base_url = spawn_server().await;
    let mut store = TaskStore::new(TaskApi::new(base_url));
    store.fetch_all().await.unwrap();

    let err = store.add_task(TaskDraft::new("   ", Priority::Medium)).await.unwrap_err();

    assert!(matches!(err, ClientError::Api(_)));
    assert_eq!(store.error(), Some("Title is required"));
    assert!(store.tasks().is_empty());
}

#[tokio::test]
async fn api_reports_not_found_for_unknown_ids() {
    let api = TaskApi::new(spawn_server().await);

    let err = api.set_completed("42", true).await.unwrap_err();
    assert_eq!(err.to_string(), "Task not found");

    let err = api.delete("42").await.unwrap_err();
    assert_eq!(err.to_string(), "Task not found");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut store = TaskStore::new(TaskApi::new(format!("http://{addr}")));
    let err = store.fetch_all().await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)));
    assert!(store.error().is_some());
    assert!(!store.is_loading());
}
