use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Most records the recent endpoint returns.
pub const RECENT_LIMIT: usize = 50;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sites: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

#[derive(Deserialize)]
pub struct LogRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub date: String,
    #[serde(default)]
    pub sites: Option<String>,
    #[serde(default)]
    pub cause: Option<String>,
}

#[derive(Deserialize)]
pub struct ApiKeyQuery {
    pub apikey: Option<String>,
}

pub type Db = Arc<RwLock<Vec<Record>>>;

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    db: Db,
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        db: Arc::new(RwLock::new(Vec::new())),
    };
    Router::new()
        .route("/api/recent-infusions", get(recent_records))
        .route("/api/log-infusion", post(log_record))
        .route("/api/log-treatment", post(log_record))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn authorize(state: &AppState, query: &ApiKeyQuery) -> Result<(), (StatusCode, &'static str)> {
    match query.apikey.as_deref() {
        Some(key) if key == &*state.api_key => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, "invalid api key")),
    }
}

async fn recent_records(
    State(state): State<AppState>,
    Query(query): Query<ApiKeyQuery>,
) -> Result<Json<Vec<Record>>, (StatusCode, &'static str)> {
    authorize(&state, &query)?;
    let records = state.db.read().await;
    Ok(Json(records.iter().rev().take(RECENT_LIMIT).cloned().collect()))
}

async fn log_record(
    State(state): State<AppState>,
    Query(query): Query<ApiKeyQuery>,
    Json(input): Json<LogRecord>,
) -> Result<(StatusCode, Json<Record>), (StatusCode, &'static str)> {
    authorize(&state, &query)?;
    if NaiveDate::parse_from_str(&input.date, "%Y-%m-%d").is_err() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "date must be YYYY-MM-DD"));
    }
    let record = Record {
        id: Uuid::new_v4().to_string(),
        date: input.date,
        record_type: input.record_type,
        sites: input.sites,
        cause: input.cause,
    };
    tracing::info!(id = %record.id, date = %record.date, "logged record");
    state.db.write().await.push(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}
