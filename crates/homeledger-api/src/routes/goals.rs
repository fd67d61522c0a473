//! Goal endpoints
//!
//! Every read takes a `member` query param naming the requester, because
//! private goals are invisible to other members.
//!
//! Endpoints:
//! - api_goals / api_goal_detail / api_goal_create / api_goal_delete
//! - api_goal_item_create
//! - page_goals: Goal overview page

use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use homeledger_core::goals;
use homeledger_core::models::{Owner, Visibility};
use homeledger_core::reports::{GoalDetail, GoalSummary};

use super::parse_uuid;
use crate::error::ApiError;
use crate::{page_shell, AppState};

fn requester(params: &HashMap<String, String>) -> Result<&str, ApiError> {
    params
        .get("member")
        .map(|s| s.as_str())
        .ok_or_else(|| ApiError::bad_request("Missing member query param"))
}

// ==================== JSON API ====================

/// Goals visible to the requesting member
pub async fn api_goals(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<GoalSummary>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(goals::goal_list(&store, requester(&params)?)?))
}

/// Goal rollup with items and payment history
pub async fn api_goal_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<GoalDetail>, ApiError> {
    let id = parse_uuid(&id, "goal")?;
    let store = state.store.read().await;
    Ok(Json(goals::goal_detail(&store, id, requester(&params)?)?))
}

#[derive(Debug, Deserialize)]
pub struct GoalPayload {
    pub name: String,
    /// Member id or `joint`
    pub owner: String,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    /// `private` or `shared`
    pub visibility: String,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Create a goal
pub async fn api_goal_create(
    State(state): State<AppState>,
    Json(payload): Json<GoalPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let visibility: Visibility = payload
        .visibility
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;
    let owner = if payload.owner.eq_ignore_ascii_case("joint") {
        Owner::Joint
    } else {
        Owner::Member(payload.owner)
    };
    let mut store = state.store.write().await;
    let id = goals::create_goal(
        &mut store,
        goals::NewGoal {
            name: payload.name,
            owner,
            target_date: payload.target_date,
            visibility,
            theme: payload.theme,
            groups: payload.groups,
        },
    )?;
    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

/// Delete a goal and its items; payments stay in the ledger
pub async fn api_goal_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id, "goal")?;
    let mut store = state.store.write().await;
    goals::delete_goal(&mut store, id)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[derive(Debug, Deserialize)]
pub struct GoalItemPayload {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    pub estimated_amount: Decimal,
}

/// Add an item to a goal
pub async fn api_goal_item_create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<GoalItemPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let goal_id = parse_uuid(&id, "goal")?;
    let mut store = state.store.write().await;
    let item_id = goals::add_goal_item(
        &mut store,
        goals::NewGoalItem {
            goal_id,
            name: payload.name,
            group: payload.group,
            estimated_amount: payload.estimated_amount,
        },
    )?;
    Ok(Json(serde_json::json!({ "id": item_id.to_string() })))
}

// ==================== Pages ====================

/// Goals page: progress cards for every visible goal
pub async fn page_goals(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    // without a member param the page shows shared goals only, using the
    // first configured member as a stand-in requester
    let fallback = state
        .config
        .household
        .members
        .first()
        .map(|m| m.id.clone())
        .unwrap_or_default();
    let member = params.get("member").cloned().unwrap_or(fallback);

    let store = state.store.read().await;
    let list = goals::goal_list(&store, &member)?;

    let mut cards = String::new();
    for g in &list {
        let pct = g.progress.clamp(0.0, 100.0);
        cards.push_str(&format!(
            r#"<div class='bg-white rounded-xl shadow-sm p-5'>
                <div class='flex items-center justify-between mb-2'>
                    <h3 class='font-bold'>{}</h3>
                    <span class='text-xs text-gray-400'>{} items</span>
                </div>
                <div class='w-full bg-gray-100 rounded-full h-2 mb-2'>
                    <div class='bg-indigo-500 h-2 rounded-full' style='width: {:.0}%'></div>
                </div>
                <p class='text-sm text-gray-500'><span class='font-mono'>{:.2}</span> of <span class='font-mono'>{:.2}</span> ({:.1}%)</p>
            </div>"#,
            g.name, g.item_count, pct, g.total_actual, g.total_estimated, g.progress
        ));
    }
    if list.is_empty() {
        cards.push_str("<p class='text-gray-400 col-span-3 text-center py-10'>No goals yet</p>");
    }

    let content = format!(
        r#"<h2 class='text-2xl font-bold mb-4'>Goals</h2>
        <div class='grid grid-cols-1 md:grid-cols-3 gap-4'>{}</div>"#,
        cards
    );
    Ok(Html(page_shell("Goals", "/goals", &content)))
}
