//! Repository and catalog over a real HTTP remote served by axum.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use freshcache::repository::{CachedRepository, RefreshOutcome, RepositoryOptions};
use freshcache::store::InMemoryStore;
use freshcache::PlantCatalog;
use freshcache_client::{HttpClient, HttpRemoteSource};
use freshcache_core::models::{GrowZone, Plant, Title};
use freshcache_core::storage::ErrorKind;

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn title_repository(
    url: String,
    options: RepositoryOptions,
) -> CachedRepository<Title, InMemoryStore<Title>, HttpRemoteSource<Title>> {
    let remote = HttpRemoteSource::new(HttpClient::with_timeout(url, Duration::from_secs(30)));
    CachedRepository::new(Arc::new(InMemoryStore::new()), Arc::new(remote), options)
}

#[tokio::test]
async fn test_title_without_id_lands_in_store() {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route(
            "/titles/{id}",
            get(|State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(serde_json::json!({ "title": "Ok" }))
            }),
        )
        .with_state(hits.clone());
    let repo = title_repository(spawn_server(router).await, RepositoryOptions::default());

    assert_eq!(
        repo.refresh(&Title::CURRENT).await.unwrap(),
        RefreshOutcome::Fetched
    );
    assert_eq!(
        repo.read(&Title::CURRENT).await.unwrap(),
        Some(Title::new("Ok"))
    );

    // Within the freshness window the server is not asked again.
    repo.refresh(&Title::CURRENT).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_server_error_leaves_store_unchanged() {
    let router = Router::new().route(
        "/titles/{id}",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let repo = title_repository(spawn_server(router).await, RepositoryOptions::default());

    let err = repo.refresh(&Title::CURRENT).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteRejected);
    assert_eq!(repo.read(&Title::CURRENT).await.unwrap(), None);
}

#[tokio::test]
async fn test_repository_timeout_bounds_slow_server() {
    let router = Router::new().route(
        "/titles/{id}",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(serde_json::json!({ "title": "Late" }))
        }),
    );
    let repo = title_repository(
        spawn_server(router).await,
        RepositoryOptions::default().with_fetch_timeout(Duration::from_millis(200)),
    );

    let err = repo.refresh(&Title::CURRENT).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(repo.read(&Title::CURRENT).await.unwrap(), None);
}

type Plants = Arc<Mutex<HashMap<String, Plant>>>;

async fn list_plants(State(plants): State<Plants>) -> Json<Vec<Plant>> {
    Json(plants.lock().unwrap().values().cloned().collect())
}

async fn get_plant(
    State(plants): State<Plants>,
    Path(id): Path<String>,
) -> Result<Json<Plant>, StatusCode> {
    plants
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[tokio::test]
async fn test_catalog_sorts_with_remote_order() {
    let plants: Plants = Arc::new(Mutex::new(
        [
            Plant::new("apple", "Apple", 3),
            Plant::new("avocado", "Avocado", 10),
            Plant::new("tomato", "Tomato", 10),
        ]
        .into_iter()
        .map(|p| (p.plant_id.clone(), p))
        .collect(),
    ));
    let router = Router::new()
        .route("/plants", get(list_plants))
        .route(
            "/plants/sort-order",
            get(|| async { Json(vec!["tomato"]) }),
        )
        .route("/plants/{id}", get(get_plant))
        .with_state(plants);
    let url = spawn_server(router).await;

    let remote = Arc::new(HttpRemoteSource::<Plant>::new(HttpClient::new(url)));
    let repository = CachedRepository::new(
        Arc::new(InMemoryStore::new()),
        remote.clone(),
        RepositoryOptions::default(),
    );
    let catalog = PlantCatalog::new(repository, remote);

    catalog.set_grow_zone(GrowZone(10)).await.unwrap();
    let zone_ten: Vec<String> = catalog
        .plants()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(zone_ten, vec!["Tomato", "Avocado"]);

    catalog.clear_grow_zone().await.unwrap();
    let all: Vec<String> = catalog
        .plants()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(all, vec!["Tomato", "Apple", "Avocado"]);
    assert_eq!(catalog.sort_order().await, vec!["tomato".to_string()]);
}
