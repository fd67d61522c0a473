//! Routine endpoints
//!
//! Endpoints:
//! - api_routines / api_routine_create / api_routine_delete
//! - api_routine_pause / api_routine_resume
//! - api_routines_run: Materialize due templates into pending entries
//! - page_routines: Routine overview page

use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use homeledger_core::models::{Frequency, OwnerFilter, TxnKind};
use homeledger_core::reports::{MaterializeReport, RoutineView};
use homeledger_core::routines;

use super::{parse_uuid, today};
use crate::error::ApiError;
use crate::{page_shell, AppState};

// ==================== JSON API ====================

/// List every routine template
pub async fn api_routines(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoutineView>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(routines::routine_list(&store)))
}

#[derive(Debug, Deserialize)]
pub struct RoutinePayload {
    pub name: String,
    pub amount: Decimal,
    /// `income` or `expense`
    pub kind: String,
    pub wallet_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    /// `weekly`, `monthly`, `quarterly`, or `yearly`
    pub frequency: String,
    pub next_run: NaiveDate,
    pub owner: String,
}

/// Create a routine template
pub async fn api_routine_create(
    State(state): State<AppState>,
    Json(payload): Json<RoutinePayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let kind: TxnKind = payload
        .kind
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;
    let frequency: Frequency = payload
        .frequency
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;
    let wallet_id = parse_uuid(&payload.wallet_id, "wallet")?;
    let category_id = payload
        .category_id
        .as_deref()
        .map(|s| parse_uuid(s, "category"))
        .transpose()?;

    let mut store = state.store.write().await;
    let id = routines::create_routine(
        &mut store,
        routines::NewRoutine {
            name: payload.name,
            amount: payload.amount,
            kind,
            wallet_id,
            category_id,
            frequency,
            next_run: payload.next_run,
            owner: payload.owner,
        },
    )?;
    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

/// Materialize due routines now, optionally scoped to one owner
pub async fn api_routines_run(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<MaterializeReport>, ApiError> {
    let owner: OwnerFilter = params
        .get("owner")
        .map(|s| s.parse())
        .transpose()
        .map_err(|e: String| ApiError::bad_request(e))?
        .unwrap_or_default();
    let mut store = state.store.write().await;
    Ok(Json(routines::materialize_due(&mut store, &owner, today())?))
}

/// Pause a routine
pub async fn api_routine_pause(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id, "routine")?;
    let mut store = state.store.write().await;
    routines::pause_routine(&mut store, id)?;
    Ok(Json(serde_json::json!({ "status": "PAUSED" })))
}

/// Resume a routine
pub async fn api_routine_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id, "routine")?;
    let mut store = state.store.write().await;
    routines::resume_routine(&mut store, id)?;
    Ok(Json(serde_json::json!({ "status": "ACTIVE" })))
}

/// Delete a routine template
pub async fn api_routine_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id, "routine")?;
    let mut store = state.store.write().await;
    routines::delete_routine(&mut store, id)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ==================== Pages ====================

/// Routines page
pub async fn page_routines(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let store = state.store.read().await;
    let list = routines::routine_list(&store);

    let mut rows = String::new();
    for r in &list {
        let status_class = if r.status == "ACTIVE" {
            "bg-green-100 text-green-700"
        } else {
            "bg-gray-100 text-gray-500"
        };
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50'>
                <td class='px-4 py-3 font-medium'>{}</td>
                <td class='px-4 py-3 text-sm text-gray-500'>{}</td>
                <td class='px-4 py-3 text-sm text-gray-500'>{}</td>
                <td class='px-4 py-3 text-sm'>{}</td>
                <td class='px-4 py-3'><span class='px-2 py-0.5 text-xs rounded-full {}'>{}</span></td>
                <td class='px-4 py-3 text-right font-mono'>{:.2}</td>
            </tr>"#,
            r.name, r.wallet_name, r.frequency, r.next_run, status_class, r.status, r.amount
        ));
    }
    if list.is_empty() {
        rows.push_str("<tr><td colspan='6' class='px-4 py-6 text-center text-gray-400'>No routines yet</td></tr>");
    }

    let content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Routines</h2>
            <button hx-post='/api/routines/run' hx-swap='none' onclick='setTimeout(() => window.location.reload(), 300)'
                class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Run now</button>
        </div>
        <div class='bg-white rounded-xl shadow-sm overflow-hidden'>
            <table class='w-full text-left'>
                <thead class='bg-gray-50 text-xs uppercase text-gray-500'>
                    <tr><th class='px-4 py-3'>Name</th><th class='px-4 py-3'>Wallet</th><th class='px-4 py-3'>Frequency</th><th class='px-4 py-3'>Next run</th><th class='px-4 py-3'>Status</th><th class='px-4 py-3 text-right'>Amount</th></tr>
                </thead>
                <tbody>{}</tbody>
            </table>
        </div>"#,
        rows
    );
    Ok(Html(page_shell("Routines", "/routines", &content)))
}
