//! Drives `HttpRemoteStore` and `HttpFileStore` against fake backends on ephemeral ports.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tillpoint_data::{FileStore, Filter, HttpFileStore, HttpRemoteStore, Order, RemoteError, RemoteStore};

const API_KEY: &str = "test-key";
const BUCKET: &str = "menu-images";

#[derive(Clone, Default)]
struct Backend {
    rows: Arc<Mutex<HashMap<String, Vec<Value>>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {API_KEY}"))
}

fn unauthorized() -> axum::response::Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid API key" }))).into_response()
}

fn id_param(params: &HashMap<String, String>) -> Option<String> {
    params.get("id").and_then(|v| v.strip_prefix("eq.")).map(str::to_string)
}

async fn list(
    State(backend): State<Backend>,
    Path(collection): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let rows = backend.rows.lock().unwrap();
    let mut out: Vec<Value> = rows
        .get(&collection)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|row| {
            params.iter().all(|(key, value)| match value.strip_prefix("eq.") {
                Some(expected) => row.get(key).is_some_and(|v| match v {
                    Value::String(s) => s == expected,
                    other => other.to_string() == expected,
                }),
                None => true,
            })
        })
        .collect();
    if let Some(order) = params.get("order") {
        let (field, dir) = order.split_once('.').unwrap();
        out.sort_by_key(|row| row[field].as_i64().unwrap_or_default());
        if dir == "desc" {
            out.reverse();
        }
    }
    if let Some(limit) = params.get("limit") {
        out.truncate(limit.parse().unwrap());
    }
    Json(Value::Array(out)).into_response()
}

async fn create(
    State(backend): State<Backend>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(mut record): Json<Value>,
) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if record.get("name").and_then(Value::as_str) == Some("") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": "23502", "message": "name must not be empty" })),
        )
            .into_response();
    }
    if record.get("id").is_none() {
        let next = backend.rows.lock().unwrap().values().map(Vec::len).sum::<usize>() + 1;
        record["id"] = json!(format!("row-{next}"));
    }
    let wants_rows = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        == Some("return=representation");
    backend
        .rows
        .lock()
        .unwrap()
        .entry(collection)
        .or_default()
        .push(record.clone());
    if wants_rows {
        (StatusCode::CREATED, Json(json!([record]))).into_response()
    } else {
        StatusCode::CREATED.into_response()
    }
}

async fn update(
    State(backend): State<Backend>,
    Path(collection): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(patch): Json<Value>,
) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let id = id_param(&params);
    let mut rows = backend.rows.lock().unwrap();
    let mut changed = Vec::new();
    for row in rows.entry(collection).or_default().iter_mut() {
        if row.get("id").and_then(Value::as_str).map(str::to_string) == id {
            for (k, v) in patch.as_object().unwrap() {
                row[k] = v.clone();
            }
            changed.push(row.clone());
        }
    }
    Json(Value::Array(changed)).into_response()
}

async fn delete(
    State(backend): State<Backend>,
    Path(collection): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let id = id_param(&params);
    backend
        .rows
        .lock()
        .unwrap()
        .entry(collection)
        .or_default()
        .retain(|row| row.get("id").and_then(Value::as_str).map(str::to_string) != id);
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Clone, Default)]
struct Bucket {
    objects: Arc<Mutex<HashMap<String, (String, Vec<u8>)>>>,
}

async fn put_object(
    State(bucket): State<Bucket>,
    Path((name, path)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if name != BUCKET {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Bucket not found" }))).into_response();
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let key = path.trim_start_matches('/').to_string();
    bucket
        .objects
        .lock()
        .unwrap()
        .insert(key.clone(), (content_type, body.to_vec()));
    Json(json!({ "Key": format!("{name}/{key}") })).into_response()
}

async fn delete_object(
    State(bucket): State<Bucket>,
    Path((_name, path)): Path<(String, String)>,
    headers: HeaderMap,
) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    match bucket.objects.lock().unwrap().remove(path.trim_start_matches('/')) {
        Some(_) => Json(json!({ "message": "Successfully deleted" })).into_response(),
        None => (StatusCode::NOT_FOUND, "Object not found").into_response(),
    }
}

/// `/object/public/{bucket}/{path}` is served by the same route with `public` as the bucket.
async fn public_object(
    State(bucket): State<Bucket>,
    Path((name, path)): Path<(String, String)>,
) -> axum::response::Response {
    let path = path.trim_start_matches('/');
    let key = match (name.as_str(), path.split_once('/')) {
        ("public", Some((BUCKET, key))) => key,
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    match bucket.objects.lock().unwrap().get(key) {
        Some((content_type, bytes)) => {
            ([(header::CONTENT_TYPE, content_type.clone())], bytes.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let app = Router::new()
            .route("/:collection", get(list).post(create).patch(update).delete(delete))
            .with_state(Backend::default());
        Self::serve(app).await
    }

    async fn spawn_storage() -> Self {
        let app = Router::new()
            .route(
                "/object/:bucket/*path",
                post(put_object).delete(delete_object).get(public_object),
            )
            .with_state(Bucket::default());
        Self::serve(app).await
    }

    async fn serve(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn store(&self) -> HttpRemoteStore {
        HttpRemoteStore::new(&self.base_url).with_api_key(API_KEY)
    }

    fn files(&self) -> HttpFileStore {
        HttpFileStore::new(&self.base_url, BUCKET).with_api_key(API_KEY)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn crud_round_trip_over_http() {
    let server = TestServer::spawn().await;
    let store = server.store();

    let created = store
        .create("menu_items", json!({ "name": "Latte", "price": 4500, "category": "drink" }))
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    store
        .create("menu_items", json!({ "name": "Mocha", "price": 5000, "category": "drink" }))
        .await
        .unwrap();
    store
        .create("menu_items", json!({ "name": "Bagel", "price": 3000, "category": "meal" }))
        .await
        .unwrap();

    let drinks = store
        .list(
            "menu_items",
            &Filter::all().eq("category", "drink").order_by("price", Order::Desc),
        )
        .await
        .unwrap();
    let names: Vec<_> = drinks.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Mocha", "Latte"]);

    let updated = store
        .update("menu_items", &id, json!({ "price": 4800 }))
        .await
        .unwrap();
    assert_eq!(updated["price"], 4800);

    store.delete("menu_items", &id).await.unwrap();
    let remaining = store.list("menu_items", &Filter::all()).await.unwrap();
    assert_eq!(remaining.len(), 2);

    let missing = store.update("menu_items", &id, json!({ "price": 1 })).await;
    assert_eq!(missing, Err(RemoteError::NotFound));
}

#[tokio::test]
async fn backend_errors_carry_the_body_message() {
    let server = TestServer::spawn().await;

    let err = server
        .store()
        .create("suppliers", json!({ "name": "" }))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RemoteError::Api {
            status: 400,
            message: "name must not be empty".to_string()
        }
    );
    assert_eq!(err.user_message(), "name must not be empty");

    let err = HttpRemoteStore::new(&server.base_url)
        .list("suppliers", &Filter::all())
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Api { status: 401, ref message } if message == "Invalid API key"));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = HttpRemoteStore::new(format!("http://{addr}"))
        .list("sales", &Filter::all())
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Network(_)));
}

#[tokio::test]
async fn uploads_are_served_from_the_public_url() {
    let server = TestServer::spawn_storage().await;
    let files = server.files();

    let uploaded = files
        .upload("menu/latte/photo.png", vec![0x89, b'P', b'N', b'G'], "image/png")
        .await
        .unwrap();
    assert_eq!(uploaded.path, "menu/latte/photo.png");
    assert_eq!(
        uploaded.url,
        format!("{}/object/public/{BUCKET}/menu/latte/photo.png", server.base_url)
    );

    let resp = reqwest::get(&uploaded.url).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers()["content-type"], "image/png");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), &[0x89, b'P', b'N', b'G']);

    files.remove("menu/latte/photo.png").await.unwrap();
    let resp = reqwest::get(&uploaded.url).await.unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn storage_errors_map_to_api_errors() {
    let server = TestServer::spawn_storage().await;

    let err = HttpFileStore::new(&server.base_url, "no-such-bucket")
        .with_api_key(API_KEY)
        .upload("a.png", vec![1], "image/png")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RemoteError::Api {
            status: 404,
            message: "Bucket not found".to_string()
        }
    );

    let err = server.files().remove("never/uploaded.png").await.unwrap_err();
    assert_eq!(
        err,
        RemoteError::Api {
            status: 404,
            message: "Object not found".to_string()
        }
    );

    let err = HttpFileStore::new(&server.base_url, BUCKET)
        .upload("a.png", vec![1], "image/png")
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Api { status: 401, ref message } if message == "Invalid API key"));
}
