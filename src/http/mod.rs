//! HTTP transport for the dashboard's backing API.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /health`: returns `{ "ok": true, "collections": [...] }`.
//! - `POST /api/login`: exchange `{ "username", "password" }` for `{ "token" }`.
//!
//! Every other route needs `Authorization: Bearer <token>` and answers 401
//! without it.
//!
//! - `POST /api/logout`: close the caller's session.
//! - `GET /api/users`: one page of the user directory.
//! - `GET /api/:collection`: every document in a managed collection.
//! - `POST /api/:collection`: create from a JSON object, returns `{ "id": ... }`.
//! - `PUT /api/:collection/:id`: merge the given fields into a document.
//! - `DELETE /api/:collection/:id`: hard-delete a document.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use admin_sync::{http, Credentials, InMemoryDocumentStore, InMemoryUserDirectory};
//!
//! let state = http::AppState::new(
//!     Arc::new(InMemoryDocumentStore::new()),
//!     Arc::new(InMemoryUserDirectory::new()),
//!     Credentials::new("admin", "s3cret"),
//! );
//! http::serve(state, "0.0.0.0:3000").await?;
//! ```

use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::auth::{AuthError, Credentials, InMemorySessionStore, LoginGate};
use crate::collections::{self, Blog, ConnectRequest, Job, JobApplication};
use crate::document::{strip_reserved, Fields, Record};
use crate::error::SyncError;
use crate::store::{DocumentStore, StoreError};
use crate::users::{UserDirectory, MAX_USERS_PAGE};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub users: Arc<dyn UserDirectory>,
    pub gate: Arc<LoginGate<InMemorySessionStore>>,
    /// Accounts returned by `GET /api/users`.
    pub users_page: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        users: Arc<dyn UserDirectory>,
        credentials: Credentials,
    ) -> Self {
        AppState {
            store,
            users,
            gate: Arc::new(LoginGate::new(credentials, InMemorySessionStore::new())),
            users_page: MAX_USERS_PAGE,
        }
    }

    pub fn with_users_page(mut self, users_page: usize) -> Self {
        self.users_page = users_page;
        self
    }
}

/// Build an axum `Router` over the given state.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/logout", post(logout_handler))
        .route("/api/users", get(users_handler))
        .route("/api/:collection", get(list_handler).post(create_handler))
        .route(
            "/api/:collection/:id",
            axum::routing::put(update_handler).delete(delete_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/login", post(login_handler))
        .merge(protected)
        .with_state(state)
}

/// Serve the API over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve(state: AppState, addr: &str) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "admin API listening");
    axum::serve(listener, app).await
}

/// Error response for the collection routes.
#[derive(Debug)]
enum ApiError {
    UnknownCollection(String),
    BadBody(String),
    Auth(AuthError),
    Sync(SyncError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        ApiError::Sync(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Sync(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UnknownCollection(name) => {
                (StatusCode::NOT_FOUND, format!("unknown collection: {}", name))
            }
            ApiError::BadBody(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Auth(err) => (
                StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                err.to_string(),
            ),
            ApiError::Sync(err) => (
                StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                err.to_string(),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// Rejects requests that carry no open session token.
async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let verdict = match bearer_token(request.headers()) {
        Some(token) => state.gate.verify_session(token),
        None => Err(AuthError::Unauthenticated),
    };
    match verdict {
        Ok(()) => next.run(request).await,
        Err(err) => {
            debug!(path = %request.uri().path(), error = %err, "rejected unauthenticated request");
            ApiError::from(err).into_response()
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// `POST /api/login`
async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let token = state.gate.open_session(&body.username, &body.password)?;
    Ok(Json(json!({ "token": token })))
}

/// `POST /api/logout`
async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    if let Some(token) = bearer_token(&headers) {
        state.gate.close_session(token)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /health`: returns `{ "ok": true, "collections": [...] }`.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true, "collections": collections::COLLECTIONS }))
}

/// `GET /api/users`
async fn users_handler(State(state): State<AppState>) -> Response {
    match state.users.list_users(state.users_page).await {
        Ok(page) => {
            let mut body = match serde_json::to_value(&page) {
                Ok(Value::Object(body)) => body,
                _ => Fields::new(),
            };
            body.insert("success".into(), Value::Bool(true));
            (StatusCode::OK, Json(Value::Object(body))).into_response()
        }
        Err(err) => {
            error!(error = %err, "failed to list users");
            let body = json!({
                "success": false,
                "error": "Failed to fetch users",
                "details": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// `GET /api/:collection`
async fn list_handler(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<Value>, ApiError> {
    known(&collection)?;
    let docs = state.store.list_all(&collection).await?;
    let docs = serde_json::to_value(docs).map_err(|e| ApiError::BadBody(e.to_string()))?;
    Ok(Json(docs))
}

/// `POST /api/:collection`: the body must be a complete, valid record.
async fn create_handler(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    known(&collection)?;
    let fields = match collection.as_str() {
        Blog::COLLECTION => checked::<Blog>(body)?,
        Job::COLLECTION => checked::<Job>(body)?,
        JobApplication::COLLECTION => checked::<JobApplication>(body)?,
        _ => checked::<ConnectRequest>(body)?,
    };
    let id = state.store.create(&collection, fields).await?;
    info!(%collection, %id, "created document over http");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// `PUT /api/:collection/:id`: a partial update, fields are merged.
async fn update_handler(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    known(&collection)?;
    let mut fields = object(body)?;
    strip_reserved(&mut fields);
    state.store.update(&collection, &id, fields).await?;
    Ok(Json(json!({ "id": id })))
}

/// `DELETE /api/:collection/:id`
async fn delete_handler(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    known(&collection)?;
    state.store.delete(&collection, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn known(collection: &str) -> Result<(), ApiError> {
    if collections::is_known(collection) {
        Ok(())
    } else {
        Err(ApiError::UnknownCollection(collection.to_string()))
    }
}

fn object(body: Value) -> Result<Fields, ApiError> {
    match body {
        Value::Object(fields) => Ok(fields),
        other => Err(ApiError::BadBody(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Decode `body` as `R`, drop blank rows and validate, then re-encode.
fn checked<R: Record>(body: Value) -> Result<Fields, ApiError> {
    let mut fields = object(body)?;
    strip_reserved(&mut fields);
    let mut record = R::from_fields(fields).map_err(|e| ApiError::BadBody(e.to_string()))?;
    record.strip_empty();
    record.validate().map_err(SyncError::from)?;
    Ok(record.to_fields()?)
}
