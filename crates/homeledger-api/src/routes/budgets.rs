//! Budget endpoints
//!
//! Endpoints:
//! - api_budget_get / api_budget_put: Raw budget document per member+period
//! - api_budget_summary: Spending rolled up against the limits
//! - page_budgets: Budget overview page for the current month

use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::Json;
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use homeledger_core::budgets;
use homeledger_core::models::{BudgetCadence, BudgetGroup, MonthlyBudget};
use homeledger_core::reports::BudgetSummary;
use homeledger_core::CoreError;

use super::{parse_uuid, today};
use crate::error::ApiError;
use crate::{page_shell, AppState};

// ==================== JSON API ====================

/// Fetch the raw budget document
pub async fn api_budget_get(
    State(state): State<AppState>,
    Path((member, period)): Path<(String, String)>,
) -> Result<Json<MonthlyBudget>, ApiError> {
    let store = state.store.read().await;
    let budget = store
        .budget_for(&member, &period)
        .cloned()
        .ok_or(CoreError::BudgetNotFound { member, period })?;
    Ok(Json(budget))
}

#[derive(Debug, Deserialize)]
pub struct BudgetGroupPayload {
    pub name: String,
    pub limit: Decimal,
    /// `weekly` or `monthly`; defaults to monthly
    #[serde(default)]
    pub cadence: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BudgetPayload {
    pub groups: Vec<BudgetGroupPayload>,
}

/// Create or replace the budget for a member and period
pub async fn api_budget_put(
    State(state): State<AppState>,
    Path((member, period)): Path<(String, String)>,
    Json(payload): Json<BudgetPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut groups = Vec::with_capacity(payload.groups.len());
    for group in payload.groups {
        let cadence = match group.cadence.as_deref() {
            None | Some("monthly") => BudgetCadence::Monthly,
            Some("weekly") => BudgetCadence::Weekly,
            Some(other) => {
                return Err(ApiError::bad_request(format!(
                    "Invalid cadence: {}",
                    other
                )))
            }
        };
        let mut category_ids = Vec::with_capacity(group.category_ids.len());
        for raw in &group.category_ids {
            category_ids.push(parse_uuid(raw, "category")?);
        }
        groups.push(BudgetGroup {
            name: group.name,
            limit: group.limit,
            cadence,
            category_ids,
        });
    }

    let mut store = state.store.write().await;
    let id = budgets::upsert_budget(
        &mut store,
        budgets::NewBudget {
            member_id: member,
            period,
            groups,
        },
    )?;
    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

/// Spending rolled up against the budget
pub async fn api_budget_summary(
    State(state): State<AppState>,
    Path((member, period)): Path<(String, String)>,
) -> Result<Json<BudgetSummary>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(budgets::budget_summary(&store, &member, &period)?))
}

// ==================== Pages ====================

/// Budgets page: every member's current-month budget, where one exists
pub async fn page_budgets(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let now = today();
    let period = params
        .get("period")
        .cloned()
        .unwrap_or_else(|| format!("{:04}-{:02}", now.year(), now.month()));

    let store = state.store.read().await;
    let mut sections = String::new();
    for member in &state.config.household.members {
        let summary = match budgets::budget_summary(&store, &member.id, &period) {
            Ok(summary) => summary,
            Err(CoreError::BudgetNotFound { .. }) => continue,
            Err(err) => return Err(err.into()),
        };

        let mut bars = String::new();
        for group in &summary.groups {
            let pct = group.used.clamp(0.0, 100.0);
            let bar_class = if group.used > 100.0 {
                "bg-red-500"
            } else if group.used > 80.0 {
                "bg-amber-500"
            } else {
                "bg-green-500"
            };
            bars.push_str(&format!(
                r#"<div class='mb-3'>
                    <div class='flex justify-between text-sm mb-1'>
                        <span>{}</span>
                        <span class='font-mono'>{:.2} / {:.2}</span>
                    </div>
                    <div class='w-full bg-gray-100 rounded-full h-2'>
                        <div class='{} h-2 rounded-full' style='width: {:.0}%'></div>
                    </div>
                </div>"#,
                group.name, group.spent, group.limit, bar_class, pct
            ));
        }

        sections.push_str(&format!(
            r#"<div class='bg-white rounded-xl shadow-sm p-5'>
                <h3 class='font-bold mb-3'>{}</h3>
                {}
                <p class='text-sm text-gray-500 mt-2'>Total: <span class='font-mono'>{:.2}</span> of <span class='font-mono'>{:.2}</span></p>
            </div>"#,
            member.name, bars, summary.total_spent, summary.total_limit
        ));
    }
    if sections.is_empty() {
        sections.push_str(&format!(
            "<p class='text-gray-400 text-center py-10 col-span-2'>No budgets set for {}</p>",
            period
        ));
    }

    let content = format!(
        r#"<h2 class='text-2xl font-bold mb-4'>Budgets for {}</h2>
        <div class='grid grid-cols-1 md:grid-cols-2 gap-4'>{}</div>"#,
        period, sections
    );
    Ok(Html(page_shell("Budgets", "/budgets", &content)))
}
