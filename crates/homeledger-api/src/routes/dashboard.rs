//! Dashboard page
//!
//! Loading the dashboard first materializes due routines, so freshly due
//! recurring payments always show up as pending entries without a separate
//! trigger.

use axum::extract::{Query, State};
use axum::response::Html;
use std::collections::HashMap;

use homeledger_core::models::TxnKind;
use homeledger_core::{ledger, routines};

use super::{parse_filter, today};
use crate::error::ApiError;
use crate::{page_shell, AppState};

/// Overview page: period summary, wallet balances, top spending categories
pub async fn page_dashboard(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let filter = parse_filter(&params)?;
    let now = today();

    {
        let mut store = state.store.write().await;
        let report = routines::materialize_due(&mut store, &filter.owner, now)?;
        if !report.generated_txn_ids.is_empty() {
            log::debug!(
                "dashboard load generated {} pending entries",
                report.generated_txn_ids.len()
            );
        }
    }

    let store = state.store.read().await;
    let summary = ledger::period_summary(&store, &filter, now)?;
    let wallets = ledger::wallet_views(&store, &filter.owner)?;
    let categories = ledger::category_breakdown(&store, &filter, now, TxnKind::Expense)?;
    let net_worth = ledger::net_worth_series(&store, 1, now);

    let current_net_worth = net_worth.points.last().map(|p| p.net_worth).unwrap_or(0.0);

    let mut wallet_rows = String::new();
    for w in wallets.iter().take(8) {
        wallet_rows.push_str(&format!(
            r#"<li class='flex justify-between py-2 border-b last:border-0'>
                <span>{} <span class='text-xs text-gray-400'>({})</span></span>
                <span class='font-mono'>{:.2}</span>
            </li>"#,
            w.name, w.kind, w.current_balance
        ));
    }
    if wallets.is_empty() {
        wallet_rows.push_str("<li class='py-4 text-center text-gray-400'>No wallets yet</li>");
    }

    let mut category_rows = String::new();
    for entry in categories.entries.iter().take(6) {
        category_rows.push_str(&format!(
            r#"<li class='flex justify-between py-2 border-b last:border-0'>
                <span>{}</span>
                <span class='font-mono'>{:.2} <span class='text-xs text-gray-400'>({:.1}%)</span></span>
            </li>"#,
            entry.category, entry.amount, entry.percentage
        ));
    }
    if categories.entries.is_empty() {
        category_rows.push_str("<li class='py-4 text-center text-gray-400'>No spending yet</li>");
    }

    let period_label = match (&summary.start_date, &summary.end_date) {
        (Some(start), Some(end)) => format!("{} to {}", start, end),
        _ => "all time".to_string(),
    };

    let content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Dashboard</h2>
            <p class='text-sm text-gray-500'>{}</p>
        </div>
        <div class='grid grid-cols-2 md:grid-cols-4 gap-3 mb-6'>
            <div class='bg-green-50 p-4 rounded-lg border border-green-100'><p class='text-xs text-green-600'>Income</p><p class='text-xl font-bold font-mono'>{:.2}</p></div>
            <div class='bg-red-50 p-4 rounded-lg border border-red-100'><p class='text-xs text-red-600'>Expense</p><p class='text-xl font-bold font-mono'>{:.2}</p></div>
            <div class='bg-indigo-50 p-4 rounded-lg border border-indigo-100'><p class='text-xs text-indigo-600'>Net</p><p class='text-xl font-bold font-mono'>{:.2}</p></div>
            <div class='bg-purple-50 p-4 rounded-lg border border-purple-100'><p class='text-xs text-purple-600'>Net worth</p><p class='text-xl font-bold font-mono'>{:.2}</p></div>
        </div>
        <div class='grid grid-cols-1 md:grid-cols-2 gap-4'>
            <div class='bg-white rounded-xl shadow-sm p-5'>
                <h3 class='font-bold mb-2'>Wallets</h3>
                <ul>{}</ul>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-5'>
                <h3 class='font-bold mb-2'>Top spending</h3>
                <ul>{}</ul>
            </div>
        </div>"#,
        period_label,
        summary.total_income,
        summary.total_expense,
        summary.net,
        current_net_worth,
        wallet_rows,
        category_rows
    );

    Ok(Html(page_shell("Dashboard", "/", &content)))
}
