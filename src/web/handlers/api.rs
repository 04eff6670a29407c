use axum::{extract::State, http::StatusCode, Json};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::persist::{NewSavedQuery, OutputMode};
use crate::query::{QueryContext, QueryResponse};
use crate::sql::templates;
use crate::web::state::AppState;

/// Body of `POST /api/query`. `action: "save"` persists a query; anything
/// else runs one.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRequest {
    pub action: Option<String>,
    /// Kept as a raw JSON value so a non-string `sql` yields the contract's
    /// "Missing or invalid SQL string" error instead of a decode rejection.
    pub sql: Option<serde_json::Value>,
    pub question: Option<String>,
    pub output_mode: Option<String>,
    pub columns: Option<serde_json::Value>,
    pub data_sample: Option<serde_json::Value>,
    pub user_id: Option<i64>,
    pub company_id: Option<i64>,
    pub visual_config: Option<serde_json::Value>,
    pub panel_position: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Save(SaveResponse),
    Query(QueryResponse),
}

/// One handler, two branches: save persists metadata, run executes SQL.
pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    if payload.action.as_deref() == Some("save") {
        save_query(state, payload).await
    } else {
        run_query(state, payload).await
    }
}

async fn save_query(
    state: Arc<AppState>,
    payload: QueryRequest,
) -> (StatusCode, Json<ApiResponse>) {
    let sql = payload
        .sql
        .as_ref()
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let (Some(question), Some(sql), Some(output_mode), Some(_columns)) = (
        payload.question,
        sql,
        payload.output_mode,
        payload.columns,
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::Save(SaveResponse {
                success: false,
                id: None,
                error: Some("Missing required fields".to_string()),
            })),
        );
    };

    let new_query = NewSavedQuery {
        user_id: payload.user_id.unwrap_or(1),
        company_id: payload.company_id.unwrap_or(1),
        question,
        sql,
        output_mode: OutputMode::parse(&output_mode),
        visual_config: payload.visual_config,
        panel_position: payload.panel_position,
    };

    match state.saved.insert(new_query).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(ApiResponse::Save(SaveResponse {
                success: true,
                id: Some(id),
                error: None,
            })),
        ),
        Err(e) => {
            error!(error = %e, "failed to store saved query");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::Save(SaveResponse {
                    success: false,
                    id: None,
                    error: Some(e.to_string()),
                })),
            )
        }
    }
}

async fn run_query(
    state: Arc<AppState>,
    payload: QueryRequest,
) -> (StatusCode, Json<ApiResponse>) {
    let sql_text = payload
        .sql
        .as_ref()
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let (sql, context) = match (sql_text, payload.question) {
        (Some(sql), _) if !sql.trim().is_empty() => {
            info!(sql = %sql, "executing SQL");
            (sql, QueryContext::manual())
        }
        (_, Some(question)) if !question.trim().is_empty() => {
            let generated = templates::generate_sql(&question);
            info!(
                template = generated.template,
                question = %question,
                "generated SQL from question"
            );
            (generated.sql, QueryContext::generated(question))
        }
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::Query(QueryResponse::failure(
                    "Missing or invalid SQL string",
                ))),
            );
        }
    };

    let response = state.executor.execute(&sql, &context).await;
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(ApiResponse::Query(response)))
}

// System status

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: i64,
}

pub async fn system_status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(state.startup_time)
        .num_seconds();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
    })
}
