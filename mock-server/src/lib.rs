use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    #[serde(rename = "_id")]
    pub entity_id: String,
    #[serde(rename = "_type")]
    pub entity_type: String,
    pub id: String,
    pub case_id: u64,
    pub title: String,
    pub description: String,
    pub severity: u8,
    pub tlp: u8,
    pub status: String,
    pub tags: Vec<String>,
    pub owner: String,
    pub created_at: i64,
    pub created_by: String,
    pub custom_fields: HashMap<String, serde_json::Value>,
    pub metrics: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_status: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateCase {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_severity")]
    pub severity: u8,
    #[serde(default = "default_tlp")]
    pub tlp: u8,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_severity() -> u8 {
    2
}

fn default_tlp() -> u8 {
    2
}

#[derive(Deserialize)]
pub struct ListParams {
    pub range: Option<String>,
}

/// Cases in insertion order plus a count of list requests served.
#[derive(Clone, Default)]
pub struct AppState {
    cases: Arc<RwLock<Vec<Case>>>,
    list_calls: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cases(cases: Vec<Case>) -> Self {
        Self {
            cases: Arc::new(RwLock::new(cases)),
            list_calls: Arc::default(),
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/case", get(list_cases).post(create_case))
        .route("/api/case/{id}", get(get_case))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

/// Build a case the way the create endpoint would, numbered `case_id`.
pub fn new_case(case_id: u64, input: CreateCase) -> Case {
    let id = format!("~{}", Uuid::new_v4().simple());
    Case {
        entity_id: id.clone(),
        entity_type: "case".to_string(),
        id,
        case_id,
        title: input.title,
        description: input.description,
        severity: input.severity,
        tlp: input.tlp,
        status: "Open".to_string(),
        tags: input.tags,
        owner: "admin".to_string(),
        created_at: 1_700_000_000_000 + case_id as i64,
        created_by: "admin".to_string(),
        custom_fields: HashMap::new(),
        metrics: HashMap::new(),
        end_date: None,
        resolution_status: None,
    }
}

/// Mark `case` resolved, the way a closed case comes back from the server.
fn resolve(mut case: Case) -> Case {
    case.status = "Resolved".to_string();
    case.end_date = Some(case.created_at + 3_600_000);
    case.resolution_status = Some("TruePositive".to_string());
    case.custom_fields.insert(
        "businessUnit".to_string(),
        serde_json::json!({"string": "finance", "int": 1}),
    );
    case.metrics
        .insert("timeToResolve".to_string(), serde_json::json!(case.case_id * 60));
    case
}

/// `count` cases titled "Case 1" .. "Case {count}". Every third one is
/// resolved.
pub fn seed_cases(count: usize) -> Vec<Case> {
    (1..=count as u64)
        .map(|n| {
            let case = new_case(
                n,
                CreateCase {
                    title: format!("Case {n}"),
                    description: String::new(),
                    severity: default_severity(),
                    tlp: default_tlp(),
                    tags: Vec::new(),
                },
            );
            if n % 3 == 0 {
                resolve(case)
            } else {
                case
            }
        })
        .collect()
}

/// Parse a `start-end` window. `None` means the whole collection.
fn parse_range(raw: Option<&str>) -> Result<Option<(usize, usize)>, StatusCode> {
    match raw {
        None | Some("all") => Ok(None),
        Some(raw) => {
            let (start, end) = raw.split_once('-').ok_or(StatusCode::BAD_REQUEST)?;
            let start: usize = start.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
            let end: usize = end.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
            Ok(Some((start, end)))
        }
    }
}

async fn list_cases(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Case>>, StatusCode> {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    let window = parse_range(params.range.as_deref())?;
    let cases = state.cases.read().await;

    let page = match window {
        None => cases.clone(),
        Some((start, end)) => {
            let end = end.min(cases.len());
            cases.get(start..end).map(<[Case]>::to_vec).unwrap_or_default()
        }
    };
    debug!(range = ?params.range, returned = page.len(), "list cases");
    Ok(Json(page))
}

async fn create_case(
    State(state): State<AppState>,
    Json(input): Json<CreateCase>,
) -> (StatusCode, Json<Case>) {
    let mut cases = state.cases.write().await;
    let case = new_case(cases.len() as u64 + 1, input);
    cases.push(case.clone());
    (StatusCode::CREATED, Json(case))
}

async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Case>, StatusCode> {
    let cases = state.cases.read().await;
    cases
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
