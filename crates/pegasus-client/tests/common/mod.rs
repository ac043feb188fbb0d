//! In-process mock of the Pegasus API.
//!
//! Users:
//! - `a@pegasus.tv` / `secret` -> `{name: "A", role: "user"}`, token `t1`, active subscription
//! - `b@pegasus.tv` / `secret` -> `{name: "B", role: "user"}`, token `t2`, no subscription
//! - `down@pegasus.tv` -> 503
//!
//! Content item `premium` answers 401 without a token, 403 for `t2` and 200
//! for `t1`. Item `html` answers a 502 with an HTML body.
//!
//! Tokens `t403` and `t500` make the profile endpoint answer 403 and 500.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use pegasus_client::{ClientConfig, MemoryStorage, SessionContext, UserProfile};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const PREMIUM_TOKEN: &str = "t1";
pub const BASIC_TOKEN: &str = "t2";
/// Profile endpoint answers 403 with a JSON error.
pub const FORBIDDEN_PROFILE_TOKEN: &str = "t403";
/// Profile endpoint answers 500 with a JSON error.
pub const BROKEN_PROFILE_TOKEN: &str = "t500";
/// `favorites/check` reports this content as favorited but without an id.
pub const ORPHAN_FAVORITE: &str = "orphan";

/// One request seen by the mock.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone)]
struct FavoriteRow {
    id: u64,
    content_id: String,
    content_type: String,
}

#[derive(Debug, Default)]
struct MockState {
    hits: Vec<Hit>,
    favorites: Vec<FavoriteRow>,
    comments: Vec<Value>,
    next_id: u64,
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub addr: SocketAddr,
    state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState {
            next_id: 100,
            ..MockState::default()
        }));

        let app = Router::new()
            .route("/api/auth/signin", post(sign_in))
            .route("/api/auth/signup", post(sign_up))
            .route("/api/user/profile", get(profile))
            .route("/api/content", get(catalog))
            .route("/api/content/{kind}/{id}", get(content_item))
            .route("/api/favorites", get(list_favorites).post(add_favorite))
            .route("/api/favorites/check", get(check_favorite))
            .route("/api/favorites/{id}", delete(remove_favorite))
            .route("/api/comments", get(list_comments).post(post_comment))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A fresh context with in-memory storage.
    pub fn context(&self) -> SessionContext {
        SessionContext::new(
            ClientConfig::new(self.base_url()),
            Arc::new(MemoryStorage::new()),
        )
        .unwrap()
    }

    /// A context that already holds a session for `token`.
    pub fn context_with_token(&self, name: &str, token: &str) -> SessionContext {
        let ctx = self.context();
        ctx.store()
            .save(&UserProfile::new(name).with_role("user"), token, None)
            .unwrap();
        ctx
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.lock().unwrap().hits.clone()
    }

    pub fn hits_on(&self, path_prefix: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|h| h.path.starts_with(path_prefix))
            .collect()
    }

    pub fn favorite_count(&self) -> usize {
        self.state.lock().unwrap().favorites.len()
    }
}

/// Context pointed at a port nothing listens on.
pub fn unreachable_context() -> SessionContext {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    SessionContext::new(
        ClientConfig::new(format!("http://{addr}")),
        Arc::new(MemoryStorage::new()),
    )
    .unwrap()
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let hit = Hit {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        bearer: bearer(request.headers()),
    };
    state.lock().unwrap().hits.push(hit);
    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn user_for(token: &str) -> Option<Value> {
    match token {
        PREMIUM_TOKEN => Some(json!({"name": "A", "role": "user", "subscription_status": "active"})),
        BASIC_TOKEN => Some(json!({"name": "B", "role": "user", "subscription_status": "inactive"})),
        _ => None,
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Invalid or expired token"})),
    )
        .into_response()
}

/// Name of the authenticated user, or a 401 response.
fn authenticate(headers: &HeaderMap) -> Result<String, Response> {
    bearer(headers)
        .as_deref()
        .and_then(user_for)
        .and_then(|u| u["name"].as_str().map(str::to_string))
        .ok_or_else(unauthorized)
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn sign_in(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match (email, password) {
        ("a@pegasus.tv", "secret") => Json(json!({
            "user": {"name": "A", "role": "user"},
            "token": PREMIUM_TOKEN
        }))
        .into_response(),
        ("b@pegasus.tv", "secret") => Json(json!({
            "user": {"name": "B", "role": "user"},
            "token": BASIC_TOKEN
        }))
        .into_response(),
        ("down@pegasus.tv", _) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "Service unavailable"})),
        )
            .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials"})),
        )
            .into_response(),
    }
}

async fn sign_up(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@pegasus.tv" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Email already registered"})),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "user": {"name": body["name"], "role": "user"},
            "token": BASIC_TOKEN
        })),
    )
        .into_response()
}

async fn profile(headers: HeaderMap) -> Response {
    match bearer(&headers).as_deref() {
        Some(FORBIDDEN_PROFILE_TOKEN) => {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"error": "Premium required"})),
            )
                .into_response();
        }
        Some(BROKEN_PROFILE_TOKEN) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Database unavailable"})),
            )
                .into_response();
        }
        _ => {}
    }
    match bearer(&headers).as_deref().and_then(user_for) {
        Some(user) => Json(json!({ "user": user })).into_response(),
        None => unauthorized(),
    }
}

fn catalog_body() -> Value {
    json!({
        "live": [
            {"id": 1, "title": "Cup Final", "is_live": true, "viewers_count": 500, "category": "Football"}
        ],
        "vod": [
            {"id": 2, "title": "Season Replay", "views": 1200},
            {"id": 3, "name": "Classic Match", "view_count": 7, "requires_premium": true},
            {"id": 5, "title": "Press Conference", "views_count": 40, "embed_code": "<iframe src=\"x\"></iframe>"}
        ],
        "highlights": [
            {"id": 4, "title": "Top Goals", "views_count": 90, "type": "highlight"}
        ],
        "channels": []
    })
}

async fn catalog() -> Json<Value> {
    Json(catalog_body())
}

async fn content_item(Path((kind, id)): Path<(String, String)>, headers: HeaderMap) -> Response {
    match id.as_str() {
        "premium" => {
            return match bearer(&headers).as_deref() {
                None => (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Authentication required"})),
                )
                    .into_response(),
                Some(PREMIUM_TOKEN) => Json(json!({
                    "id": "premium", "title": "Members Final", "requires_premium": true, "type": kind
                }))
                .into_response(),
                Some(BASIC_TOKEN) => (
                    StatusCode::FORBIDDEN,
                    Json(json!({"error": "Premium subscription required"})),
                )
                    .into_response(),
                Some(_) => unauthorized(),
            };
        }
        "html" => {
            return (
                StatusCode::BAD_GATEWAY,
                [(header::CONTENT_TYPE, "text/html")],
                "<html><body>Bad Gateway</body></html>",
            )
                .into_response();
        }
        _ => {}
    }

    let key = match kind.as_str() {
        "highlight" => "highlights",
        "channel" => "channels",
        other => other,
    };
    let body = catalog_body();
    let found = body[key]
        .as_array()
        .and_then(|items| items.iter().find(|item| id_string(&item["id"]) == id))
        .cloned();
    match found {
        Some(item) => Json(item).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "Content not found"}))).into_response(),
    }
}

async fn list_favorites(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(response) = authenticate(&headers) {
        return response;
    }
    let favorites: Vec<Value> = state
        .lock()
        .unwrap()
        .favorites
        .iter()
        .map(|f| json!({"id": f.id, "content_id": f.content_id, "content_type": f.content_type}))
        .collect();
    Json(json!({ "favorites": favorites })).into_response()
}

async fn add_favorite(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authenticate(&headers) {
        return response;
    }
    let mut state = state.lock().unwrap();
    let id = state.next_id;
    state.next_id += 1;
    state.favorites.push(FavoriteRow {
        id,
        content_id: id_string(&body["contentId"]),
        content_type: body["contentType"].as_str().unwrap_or_default().to_string(),
    });
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "favorite": {"id": id}})),
    )
        .into_response()
}

async fn check_favorite(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = authenticate(&headers) {
        return response;
    }
    if params.get("contentId").map(String::as_str) == Some(ORPHAN_FAVORITE) {
        return Json(json!({"isFavorited": true})).into_response();
    }
    let state = state.lock().unwrap();
    let found = state.favorites.iter().find(|f| {
        Some(&f.content_id) == params.get("contentId")
            && Some(&f.content_type) == params.get("contentType")
    });
    Json(json!({
        "isFavorited": found.is_some(),
        "favoriteId": found.map(|f| f.id)
    }))
    .into_response()
}

async fn remove_favorite(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if let Err(response) = authenticate(&headers) {
        return response;
    }
    let mut state = state.lock().unwrap();
    let before = state.favorites.len();
    state.favorites.retain(|f| f.id != id);
    if state.favorites.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Favorite not found"}))).into_response();
    }
    Json(json!({"success": true})).into_response()
}

async fn list_comments(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let state = state.lock().unwrap();
    let comments: Vec<Value> = state
        .comments
        .iter()
        .filter(|c| params.get("contentId").map(String::as_str) == c["content_id"].as_str())
        .cloned()
        .collect();
    Json(json!({ "comments": comments }))
}

async fn post_comment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let name = match authenticate(&headers) {
        Ok(name) => name,
        Err(response) => return response,
    };
    let mut state = state.lock().unwrap();
    let id = state.next_id;
    state.next_id += 1;
    let comment = json!({
        "id": id,
        "content_id": id_string(&body["contentId"]),
        "content_type": body["contentType"],
        "user_name": name,
        "text": body["text"],
        "created_at": "2024-05-01 18:30:00"
    });
    state.comments.push(comment.clone());
    (StatusCode::CREATED, Json(json!({ "comment": comment }))).into_response()
}
