//! In-process stand-in for the remote REST store.
//!
//! Serves the five collections under `/api/` with the same conventions as the
//! real server: trailing-slash routes, server-assigned ids, partial `PUT`,
//! `{field: [message]}` rejection bodies, multipart document creation and
//! expanded relationships on read. Every request is recorded so tests can
//! assert on what went over the wire.

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::models::Id;

const COLLECTIONS: &[&str] = &["clients", "documents", "timesheets", "entries", "invoices"];

/// A request as seen by the mock server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
}

#[derive(Default)]
struct Store {
    collections: HashMap<&'static str, BTreeMap<Id, Map<String, Value>>>,
    uploads: HashMap<Id, Vec<u8>>,
    next_id: Id,
    requests: Vec<RecordedRequest>,
    fail_with: Option<u16>,
}

type Shared = Arc<Mutex<Store>>;
type Rejection = (StatusCode, Json<Value>);

pub struct MockServer {
    addr: SocketAddr,
    store: Shared,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> Self {
        let store: Shared = Arc::default();

        let app = Router::new()
            .route("/api/:collection/", get(list).post(create))
            .route("/api/:collection/:id/", get(fetch).put(update).delete(remove))
            .layer(from_fn_with_state(store.clone(), record))
            .with_state(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            store,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&ApiConfig::with_base_url(self.base_url())).unwrap()
    }

    /// Answer every following request with `status`
    pub fn fail_with(&self, status: u16) {
        self.store.lock().unwrap().fail_with = Some(status);
    }

    pub fn recover(&self) {
        self.store.lock().unwrap().fail_with = None;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.store.lock().unwrap().requests.clone()
    }

    /// Number of recorded requests with this method and path suffix
    pub fn count(&self, method: &str, path_suffix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path.ends_with(path_suffix))
            .count()
    }

    pub fn content_types(&self) -> Vec<Option<String>> {
        self.requests().into_iter().map(|r| r.content_type).collect()
    }

    pub fn uploaded_bytes(&self, id: Id) -> Option<Vec<u8>> {
        self.store.lock().unwrap().uploads.get(&id).cloned()
    }

    /// Seed a record directly, bypassing validation. Returns its id.
    pub fn seed(&self, collection: &str, record: Value) -> Id {
        let mut store = self.store.lock().unwrap();
        let name = collection_name(collection).unwrap();
        let Value::Object(fields) = record else {
            panic!("seed record must be an object");
        };
        store.insert(name, fields)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An address nothing listens on
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A listener that accepts connections and never answers them.
/// Abort the returned handle to stop accepting.
pub async fn silent_server() -> (SocketAddr, JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    (addr, handle)
}

fn collection_name(name: &str) -> Option<&'static str> {
    COLLECTIONS.iter().copied().find(|c| *c == name)
}

fn rejection(status: StatusCode, body: Value) -> Rejection {
    (status, Json(body))
}

fn not_found() -> Rejection {
    rejection(StatusCode::NOT_FOUND, json!({"detail": "Not found."}))
}

fn required_fields(collection: &str) -> &'static [&'static str] {
    match collection {
        "clients" => &["name"],
        "documents" => &["file"],
        "timesheets" => &["name", "week_start", "week_end"],
        "entries" => &["timesheet", "day"],
        "invoices" => &["timesheet", "invoice_number", "amount"],
        _ => &[],
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl Store {
    fn insert(&mut self, collection: &'static str, mut fields: Map<String, Value>) -> Id {
        self.next_id += 1;
        let id = self.next_id;
        fields.insert("id".to_string(), json!(id));
        self.collections
            .entry(collection)
            .or_default()
            .insert(id, fields);
        id
    }

    fn get(&self, collection: &str, id: Id) -> Option<&Map<String, Value>> {
        self.collections.get(collection).and_then(|c| c.get(&id))
    }

    /// Record as returned to readers, relationships expanded
    fn render(&self, collection: &str, record: &Map<String, Value>) -> Value {
        let mut out = record.clone();

        let embed = |out: &mut Map<String, Value>, key: &str, target: &str, from: &str| {
            if let Some(id) = record.get(from).and_then(Value::as_u64) {
                if let Some(related) = self.get(target, id) {
                    out.insert(key.to_string(), Value::Object(related.clone()));
                }
            }
        };

        match collection {
            "timesheets" => {
                embed(&mut out, "client", "clients", "client_id");
                embed(&mut out, "document", "documents", "document_id");
                let id = record.get("id").and_then(Value::as_u64);
                let entries: Vec<Value> = self
                    .collections
                    .get("entries")
                    .map(|all| {
                        all.values()
                            .filter(|e| e.get("timesheet").and_then(Value::as_u64) == id)
                            .map(|e| Value::Object(e.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                out.insert("entries".to_string(), Value::Array(entries));
            }
            "invoices" => embed(&mut out, "client", "clients", "client_id"),
            _ => {}
        }

        Value::Object(out)
    }

    fn validate(
        collection: &str,
        fields: &Map<String, Value>,
        partial: bool,
    ) -> Result<(), Rejection> {
        let mut errors = Map::new();
        for field in required_fields(collection) {
            let blank = match fields.get(*field) {
                None => !partial,
                Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if blank {
                errors.insert(field.to_string(), json!(["This field is required."]));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(rejection(StatusCode::BAD_REQUEST, Value::Object(errors)))
        }
    }

    fn apply_defaults(collection: &str, fields: &mut Map<String, Value>) {
        let defaults: Vec<(&str, Value)> = match collection {
            "documents" => vec![("uploaded_at", json!(now())), ("status", json!("pending"))],
            "timesheets" => vec![
                ("km_total", json!("0.00")),
                ("total_hours", json!("0.00")),
                ("status", json!("pending")),
                ("created_at", json!(now())),
            ],
            "entries" => vec![
                ("transport_hours", json!("0.00")),
                ("total_hours", json!("0.00")),
                ("meals", json!(false)),
                ("perdiem", json!(false)),
                ("created_at", json!(now())),
            ],
            "invoices" => vec![("status", json!("draft")), ("created_at", json!(now()))],
            _ => Vec::new(),
        };

        for (key, value) in defaults {
            fields.entry(key.to_string()).or_insert(value);
        }
    }
}

async fn record(State(store): State<Shared>, request: Request, next: Next) -> Response {
    let forced = {
        let mut store = store.lock().unwrap();
        store.requests.push(RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            content_type: request
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
        store.fail_with
    };

    match forced.and_then(|s| StatusCode::from_u16(s).ok()) {
        Some(status) => (status, "forced failure").into_response(),
        None => next.run(request).await,
    }
}

async fn list(
    State(store): State<Shared>,
    Path(collection): Path<String>,
) -> Result<Json<Value>, Rejection> {
    let name = collection_name(&collection).ok_or_else(not_found)?;
    let store = store.lock().unwrap();
    let items = store
        .collections
        .get(name)
        .map(|all| all.values().map(|r| store.render(name, r)).collect())
        .unwrap_or_default();
    Ok(Json(Value::Array(items)))
}

async fn fetch(
    State(store): State<Shared>,
    Path((collection, id)): Path<(String, Id)>,
) -> Result<Json<Value>, Rejection> {
    let name = collection_name(&collection).ok_or_else(not_found)?;
    let store = store.lock().unwrap();
    let record = store.get(name, id).ok_or_else(not_found)?;
    Ok(Json(store.render(name, record)))
}

async fn create(
    State(store): State<Shared>,
    Path(collection): Path<String>,
    request: Request,
) -> Result<(StatusCode, Json<Value>), Rejection> {
    let name = collection_name(&collection).ok_or_else(not_found)?;

    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        if name != "documents" {
            return Err(rejection(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                json!({"detail": "Unsupported media type."}),
            ));
        }
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| rejection(StatusCode::BAD_REQUEST, json!({"detail": e.body_text()})))?;
        return create_upload(store, multipart).await;
    }

    let Json(body) = Json::<Value>::from_request(request, &())
        .await
        .map_err(|e| rejection(e.status(), json!({"detail": e.body_text()})))?;
    let Value::Object(mut fields) = body else {
        return Err(rejection(
            StatusCode::BAD_REQUEST,
            json!({"non_field_errors": ["Expected an object."]}),
        ));
    };
    fields.remove("id");
    Store::validate(name, &fields, false)?;
    Store::apply_defaults(name, &mut fields);

    let mut store = store.lock().unwrap();
    let id = store.insert(name, fields);
    let created = store.render(name, store.get(name, id).ok_or_else(not_found)?);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_upload(
    store: Shared,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), Rejection> {
    let mut upload = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some(crate::api::UPLOAD_FIELD) {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| rejection(StatusCode::BAD_REQUEST, json!({"detail": e.body_text()})))?;
            upload = Some((file_name, bytes.to_vec()));
        }
    }

    let Some((file_name, bytes)) = upload else {
        return Err(rejection(
            StatusCode::BAD_REQUEST,
            json!({"file": ["No file was submitted."]}),
        ));
    };

    let mut fields = Map::new();
    fields.insert("file".to_string(), json!(format!("/media/uploads/{}", file_name)));
    fields.insert("extracted_json".to_string(), Value::Null);
    fields.insert("km_total".to_string(), Value::Null);
    fields.insert("consumables".to_string(), Value::Null);
    Store::apply_defaults("documents", &mut fields);

    let mut store = store.lock().unwrap();
    let id = store.insert("documents", fields);
    store.uploads.insert(id, bytes);
    let created = store.render("documents", store.get("documents", id).ok_or_else(not_found)?);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(store): State<Shared>,
    Path((collection, id)): Path<(String, Id)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    let name = collection_name(&collection).ok_or_else(not_found)?;
    let Value::Object(mut patch) = body else {
        return Err(rejection(
            StatusCode::BAD_REQUEST,
            json!({"non_field_errors": ["Expected an object."]}),
        ));
    };
    patch.remove("id");
    Store::validate(name, &patch, true)?;

    let mut store = store.lock().unwrap();
    let record = store
        .collections
        .get_mut(name)
        .and_then(|c| c.get_mut(&id))
        .ok_or_else(not_found)?;
    record.extend(patch);

    let updated = store.render(name, store.get(name, id).ok_or_else(not_found)?);
    Ok(Json(updated))
}

async fn remove(
    State(store): State<Shared>,
    Path((collection, id)): Path<(String, Id)>,
) -> Result<StatusCode, Rejection> {
    let name = collection_name(&collection).ok_or_else(not_found)?;
    let mut store = store.lock().unwrap();
    store
        .collections
        .get_mut(name)
        .and_then(|c| c.remove(&id))
        .ok_or_else(not_found)?;
    store.uploads.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
