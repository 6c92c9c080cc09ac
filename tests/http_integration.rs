//! HTTP source and save client against a throwaway local server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use pipegallery::{
    HttpSaveClient, HttpSource, PhotoRecord, ResourceSource, SaveClient, SaveEnvelope, SaveError,
    SaveState, SaveTrigger, SourceError, load_site_config, submit,
};
use pipegallery::save::SaveFailure;

#[derive(Default)]
struct Hits {
    saves: AtomicUsize,
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn site_router(hits: Arc<Hits>) -> Router {
    Router::new()
        .route("/config.txt", get(|| async { "title=Remote\ntotal_pages=4\n" }))
        .route(
            "/save-ok",
            post(
                |State(hits): State<Arc<Hits>>, Json(envelope): Json<SaveEnvelope>| async move {
                    hits.saves.fetch_add(1, Ordering::SeqCst);
                    assert!(envelope.web_query.data.contains("Sunset"));
                    StatusCode::OK
                },
            ),
        )
        .route(
            "/save-fail",
            post(|State(hits): State<Arc<Hits>>| async move {
                hits.saves.fetch_add(1, Ordering::SeqCst);
                StatusCode::INTERNAL_SERVER_ERROR
            }),
        )
        .with_state(hits)
}

fn record() -> PhotoRecord {
    PhotoRecord::decode_payload(r#"{"title":"Sunset","url_max":"s.jpg"}"#).unwrap()
}

#[tokio::test]
async fn http_source_fetches_with_cache_busting() {
    let addr = spawn(site_router(Arc::default())).await;
    let source = HttpSource::new(format!("http://{addr}"));

    let site = load_site_config(&source).await.unwrap();
    assert_eq!(site.title, "Remote");
    assert_eq!(site.total_pages, 4);

    assert!(matches!(
        source.fetch_text("data/page_1.csv").await,
        Err(SourceError::Http { status: 404, .. })
    ));
}

#[tokio::test]
async fn save_success_is_terminal() {
    let hits = Arc::new(Hits::default());
    let addr = spawn(site_router(hits.clone())).await;
    let client = HttpSaveClient::new(format!("http://{addr}/save-ok"));

    let mut trigger = SaveTrigger::new(&record());
    assert_eq!(submit(&mut trigger, &client).await, SaveState::Saved);
    assert!(!trigger.is_enabled());
    assert_eq!(hits.saves.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_status_leaves_trigger_enabled_after_one_request() {
    let hits = Arc::new(Hits::default());
    let addr = spawn(site_router(hits.clone())).await;
    let client = HttpSaveClient::new(format!("http://{addr}/save-fail"));

    let mut trigger = SaveTrigger::new(&record());
    let state = submit(&mut trigger, &client).await;
    assert_eq!(state, SaveState::Failed(SaveFailure::Rejected(500)));
    assert!(trigger.is_enabled());
    assert_eq!(hits.saves.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpSaveClient::new(format!("http://{addr}/save"));
    let result = client.save(&SaveEnvelope::for_record(&record())).await;
    assert!(matches!(result, Err(SaveError::Transport(_))));
}
