use std::{net::SocketAddr, str::FromStr};

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{
    BoardError, DayTimeline, MonthGrid, Session, StoreError, TimelineWindow, WorkBoard, WorkItem,
    WorkItemDraft, WorkItemFilter, WorkItemId, WorkStatus,
};

#[derive(Clone)]
pub struct AppState {
    board: WorkBoard,
    window: TimelineWindow,
}

impl AppState {
    pub fn new(board: WorkBoard) -> Self {
        Self {
            board,
            window: TimelineWindow::default(),
        }
    }

    pub fn with_window(mut self, window: TimelineWindow) -> Self {
        self.window = window;
        self
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<BoardError> for ApiError {
    fn from(value: BoardError) -> Self {
        let message = value.to_string();
        match value {
            BoardError::Unauthenticated => ApiError::Unauthorized(message),
            BoardError::Forbidden { .. } => ApiError::Forbidden(message),
            BoardError::Invalid(_) | BoardError::Calendar(_) => ApiError::Invalid(message),
            BoardError::Store(StoreError::NotFound(_)) => ApiError::NotFound(message),
            BoardError::Store(StoreError::InvalidData(_)) => ApiError::Invalid(message),
            BoardError::Store(err) => {
                error!(error = %err, "work item store failure");
                ApiError::Internal(message)
            }
        }
    }
}

// Extractor failures get the same JSON body as every other client error.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Invalid(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Invalid(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, "unauthorized", message),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, "forbidden", message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    q: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    status: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(current_session))
        .route("/session/refresh", post(refresh_session))
        .route("/session/sign-out", post(sign_out))
        .route("/work-items", get(list_work_items).post(create_work_item))
        .route("/work-items/:id", get(get_work_item).put(update_work_item))
        .route("/work-items/:id/status", post(set_work_status))
        .route("/timeline/:date", get(day_timeline))
        .route("/calendar/:year/:month", get(month_grid))
        .route("/completed", get(search_completed))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "work calendar HTTP API listening");
    axum::serve(listener, app).await
}

/// Bearer token from the `Authorization` header, or empty when absent.
fn bearer(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default()
}

fn parse_id(raw: &str) -> Result<WorkItemId, ApiError> {
    WorkItemId::parse_str(raw).map_err(|_| ApiError::invalid(format!("invalid work item id '{raw}'")))
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(state.board.session(bearer(&headers))?))
}

async fn refresh_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(state.board.refresh_session(bearer(&headers))?))
}

async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    state.board.sign_out(bearer(&headers));
    StatusCode::NO_CONTENT
}

async fn list_work_items(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<WorkItem>>, ApiError> {
    let Query(query) = query?;
    let token = bearer(&headers);
    let mut filter = WorkItemFilter {
        from: query.from,
        to: query.to,
        statuses: Vec::new(),
    };
    if let Some(raw) = query.status.as_deref() {
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let status = WorkStatus::from_str(part).map_err(|err| ApiError::invalid(err.to_string()))?;
            filter = filter.with_status(status);
        }
    }

    let items = state.board.list(token, &filter)?;
    let items = match query.q.as_deref() {
        Some(term) => crate::search::active_board(&items, term),
        None => items,
    };
    Ok(Json(items))
}

async fn get_work_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<WorkItem>, ApiError> {
    let Path(id) = path?;
    let id = parse_id(&id)?;
    Ok(Json(state.board.get(bearer(&headers), id)?))
}

async fn create_work_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    draft: Result<Json<WorkItemDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkItem>), ApiError> {
    let Json(draft) = draft?;
    let created = state.board.create(bearer(&headers), draft)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_work_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
    draft: Result<Json<WorkItemDraft>, JsonRejection>,
) -> Result<Json<WorkItem>, ApiError> {
    let Path(id) = path?;
    let Json(draft) = draft?;
    let id = parse_id(&id)?;
    Ok(Json(state.board.edit(bearer(&headers), id, draft)?))
}

async fn set_work_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> Result<Json<WorkItem>, ApiError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let id = parse_id(&id)?;
    let status = WorkStatus::from_str(payload.status.trim())
        .map_err(|err| ApiError::invalid(err.to_string()))?;
    Ok(Json(state.board.set_status(bearer(&headers), id, status)?))
}

async fn day_timeline(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<NaiveDate>, PathRejection>,
) -> Result<Json<DayTimeline>, ApiError> {
    let Path(date) = path?;
    let timeline = state
        .board
        .day_timeline(bearer(&headers), date, &state.window, now())?;
    Ok(Json(timeline))
}

async fn month_grid(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Json<MonthGrid>, ApiError> {
    let Path((year, month)) = path?;
    Ok(Json(state.board.month(bearer(&headers), year, month, now())?))
}

async fn search_completed(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<WorkItem>>, ApiError> {
    let Query(query) = query?;
    let term = query.q.unwrap_or_default();
    Ok(Json(state.board.search_completed(bearer(&headers), &term)?))
}
