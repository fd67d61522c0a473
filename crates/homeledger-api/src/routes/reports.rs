//! Aggregation report endpoints
//!
//! Endpoints:
//! - api_summary: Income/expense totals with per-period buckets
//! - api_category_report: Breakdown by category, descending
//! - api_trend: Daily and monthly series for charts
//! - api_net_worth: Household net worth history

use axum::extract::{Query, State};
use axum::Json;
use std::collections::HashMap;

use homeledger_core::ledger;
use homeledger_core::models::TxnKind;
use homeledger_core::reports::{CategoryReport, NetWorthReport, PeriodSummary, TrendReport};

use super::{parse_filter, today};
use crate::error::ApiError;
use crate::AppState;

/// Period summary for the filter scope
pub async fn api_summary(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PeriodSummary>, ApiError> {
    let filter = parse_filter(&params)?;
    let store = state.store.read().await;
    Ok(Json(ledger::period_summary(&store, &filter, today())?))
}

/// Category breakdown; `kind` defaults to expense
pub async fn api_category_report(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<CategoryReport>, ApiError> {
    let filter = parse_filter(&params)?;
    let kind: TxnKind = params
        .get("kind")
        .map(|s| s.parse())
        .transpose()
        .map_err(|e: String| ApiError::bad_request(e))?
        .unwrap_or(TxnKind::Expense);
    let store = state.store.read().await;
    Ok(Json(ledger::category_breakdown(
        &store,
        &filter,
        today(),
        kind,
    )?))
}

/// Daily series for the current month plus the trailing six months
pub async fn api_trend(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TrendReport>, ApiError> {
    let filter = parse_filter(&params)?;
    let store = state.store.read().await;
    Ok(Json(ledger::trend(&store, &filter, today())?))
}

/// Net worth as of each of the last `months` month ends (default 12)
pub async fn api_net_worth(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<NetWorthReport>, ApiError> {
    let months = params
        .get("months")
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| ApiError::bad_request(format!("Invalid months value: {}", s)))
        })
        .transpose()?
        .unwrap_or(12);
    let store = state.store.read().await;
    Ok(Json(ledger::net_worth_series(&store, months, today())))
}
